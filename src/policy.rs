//! Read-only views of learned values for display

use crate::{algo::tabular::ActionValues, gym::Action};

/// Direction of the best action for a policy arrow overlay
///
/// Returns `None` for a cell whose values are all still zero. Ties resolve to
/// the first maximizer; this is for drawing only and is not how the agent acts.
pub fn greedy_arrow(values: &ActionValues) -> Option<Action> {
    if values.iter().all(|&v| v == 0.0) {
        return None;
    }

    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    Action::from_index(best)
}

/// Rough judgement of a cell's value for background tinting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTint {
    /// Best action value above `1`, on a path toward a goal
    Promising,
    /// Best action value below `-1`
    Dangerous,
    Neutral,
}

impl ValueTint {
    pub fn of(values: &ActionValues) -> Self {
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        if max > 1.0 {
            ValueTint::Promising
        } else if max < -1.0 {
            ValueTint::Dangerous
        } else {
            ValueTint::Neutral
        }
    }
}
