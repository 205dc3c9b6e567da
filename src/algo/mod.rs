/// Algorithms that store one value per state-action pair
pub mod tabular;
