//! Ports for the generative-text collaborators
//!
//! The engine never talks to a text-generation provider. Map generation and
//! performance commentary go through the [`MapSource`] and [`Analyst`] traits,
//! and the [`generative`] adapters implement both on top of any
//! [`TextGenerator`].

use log::warn;

use crate::{error::Result, gym::Grid, history::EpisodeRecord, params::HyperParameters};

pub mod generative;

pub use generative::{
    analysis_prompt, decode_map, map_prompt, GenerativeAnalyst, GenerativeMapSource, MapResponse,
    Request, TextGenerator,
};

/// Shown in place of commentary when the analyst fails
pub const FALLBACK_ANALYSIS: &str =
    "Link to the analysis core was interrupted. Unable to analyze the data.";

/// Default number of recent episodes a session hands to an [`Analyst`]
pub const ANALYSIS_WINDOW: usize = 20;

/// Produces a grid from a free-text description
///
/// Generated grids are 10x10 with exactly one start and at least one goal.
/// Nothing guarantees the goal is reachable.
pub trait MapSource {
    fn generate_grid(&mut self, description: &str) -> Result<Grid>;
}

/// Produces advisory commentary on recent training progress
pub trait Analyst {
    fn summarize(&mut self, history: &[EpisodeRecord], params: &HyperParameters) -> Result<String>;
}

/// Ask `analyst` for commentary, degrading to [`FALLBACK_ANALYSIS`] on failure
pub fn summarize_or_fallback<A: Analyst + ?Sized>(
    analyst: &mut A,
    history: &[EpisodeRecord],
    params: &HyperParameters,
) -> String {
    analyst.summarize(history, params).unwrap_or_else(|e| {
        warn!("analysis failed: {e}");
        FALLBACK_ANALYSIS.to_string()
    })
}
