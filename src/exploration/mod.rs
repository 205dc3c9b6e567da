use rand::Rng;

/// Exploration policy result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Explore,
    Exploit,
}

mod epsilon_greedy;

pub use epsilon_greedy::EpsilonGreedy;

/// Index of the largest value, breaking ties uniformly at random
///
/// Always picking the first maximizer would bias an untrained agent toward a
/// single direction. NaN entries are never selected unless every entry is NaN,
/// in which case all indices tie.
///
/// **Panics** if `values` is empty
pub fn greedy<R: Rng>(values: &[f32], rng: &mut R) -> usize {
    assert!(!values.is_empty(), "Cannot choose from an empty slice.");

    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let best = values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v == max)
        .map(|(i, _)| i)
        .collect::<Vec<_>>();

    if best.is_empty() {
        rng.gen_range(0..values.len())
    } else {
        best[rng.gen_range(0..best.len())]
    }
}
