/// Implemented RL algorithms
pub mod algo;

/// Per-episode decay of hyperparameters
pub mod decay;

/// The agent/environment engine
pub mod engine;

/// Environment
pub mod env;

/// Error types
pub mod error;

/// Exploration policies
pub mod exploration;

/// Grid-world environment
pub mod gym;

/// Finished-episode log
pub mod history;

/// Hyperparameter configuration
pub mod params;

/// Display views of learned values
pub mod policy;

/// Generative map and analysis collaborators
pub mod services;

/// Training loop driver
pub mod session;

pub use engine::{Engine, StepResult};
pub use error::{Error, Result};
pub use gym::{Action, Cell, Grid, Pos};
pub use params::{HyperParameterUpdate, HyperParameters};
pub use session::{Session, SessionConfig};
