use thiserror::Error;

/// Errors produced outside the engine proper: layout parsing, map decoding,
/// hyperparameter validation, and generative-text collaborators
///
/// The engine operations themselves are infallible.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("layout has no rows")]
    EmptyLayout,

    #[error("layout row {row} has {got} cells, expected {expected}")]
    RaggedLayout {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("expected a {expected_width}x{expected_height} grid, got {width}x{height}")]
    InvalidDimensions {
        expected_width: usize,
        expected_height: usize,
        width: usize,
        height: usize,
    },

    #[error("grid must have exactly one start cell, found {count}")]
    StartCount { count: usize },

    #[error("grid has no goal cell")]
    MissingGoal,

    #[error("malformed map response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("text generation failed: {message}")]
    Service { message: String },

    #[error("invalid value for `{name}`: {value} is outside [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

impl Error {
    /// Wrap a collaborator failure message
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service {
            message: message.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
