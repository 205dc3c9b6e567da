use rand::Rng;

use super::Choice;

/// Epsilon greedy exploration policy
///
/// Explores with probability `epsilon` and exploits otherwise. The threshold is
/// not validated: values at or below `0` always exploit, values above `1`
/// always explore.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EpsilonGreedy {
    epsilon: f32,
}

impl EpsilonGreedy {
    pub fn new(epsilon: f32) -> Self {
        Self { epsilon }
    }

    /// Invoke epsilon greedy policy with one uniform draw from `[0, 1)`
    pub fn choose<R: Rng>(&self, rng: &mut R) -> Choice {
        if rng.gen::<f32>() < self.epsilon {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }
}
