use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Learning and exploration settings for the [engine](crate::engine::Engine)
///
/// Ranges are documented per field but not enforced by the engine; call
/// [`HyperParameters::validate`] when accepting values from outside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperParameters {
    /// α, in `(0, 1]`
    pub learning_rate: f32,
    /// γ, in `[0, 1]`
    pub discount_factor: f32,
    /// ε, in `[0, 1]`
    pub exploration_rate: f32,
    /// Per-episode multiplier for ε, in `(0, 1]`
    pub exploration_decay: f32,
    /// ε stops decaying once it is at or below this value, in `[0, 1]`
    pub min_exploration: f32,
}

impl Default for HyperParameters {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.9,
            exploration_rate: 1.0,
            exploration_decay: 0.995,
            min_exploration: 0.01,
        }
    }
}

impl HyperParameters {
    /// Overwrite every field that is set in `update`
    pub fn merge(&mut self, update: &HyperParameterUpdate) {
        let HyperParameterUpdate {
            learning_rate,
            discount_factor,
            exploration_rate,
            exploration_decay,
            min_exploration,
        } = *update;

        if let Some(v) = learning_rate {
            self.learning_rate = v;
        }
        if let Some(v) = discount_factor {
            self.discount_factor = v;
        }
        if let Some(v) = exploration_rate {
            self.exploration_rate = v;
        }
        if let Some(v) = exploration_decay {
            self.exploration_decay = v;
        }
        if let Some(v) = min_exploration {
            self.min_exploration = v;
        }
    }

    /// Check every field against its documented range
    pub fn validate(&self) -> Result<()> {
        fn check(name: &'static str, value: f32, min: f32, max: f32, open_min: bool) -> Result<()> {
            let above_min = if open_min { value > min } else { value >= min };
            if above_min && value <= max {
                Ok(())
            } else {
                Err(Error::OutOfRange {
                    name,
                    value,
                    min,
                    max,
                })
            }
        }

        check("learning_rate", self.learning_rate, 0.0, 1.0, true)?;
        check("discount_factor", self.discount_factor, 0.0, 1.0, false)?;
        check("exploration_rate", self.exploration_rate, 0.0, 1.0, false)?;
        check("exploration_decay", self.exploration_decay, 0.0, 1.0, true)?;
        check("min_exploration", self.min_exploration, 0.0, 1.0, false)
    }
}

/// A partial set of [`HyperParameters`], applied with [`HyperParameters::merge`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HyperParameterUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_rate: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_factor: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exploration_rate: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exploration_decay: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_exploration: Option<f32>,
}

impl HyperParameterUpdate {
    pub fn with_learning_rate(mut self, v: f32) -> Self {
        self.learning_rate = Some(v);
        self
    }

    pub fn with_discount_factor(mut self, v: f32) -> Self {
        self.discount_factor = Some(v);
        self
    }

    pub fn with_exploration_rate(mut self, v: f32) -> Self {
        self.exploration_rate = Some(v);
        self
    }

    pub fn with_exploration_decay(mut self, v: f32) -> Self {
        self.exploration_decay = Some(v);
        self
    }

    pub fn with_min_exploration(mut self, v: f32) -> Self {
        self.min_exploration = Some(v);
        self
    }
}

impl From<HyperParameters> for HyperParameterUpdate {
    fn from(params: HyperParameters) -> Self {
        Self {
            learning_rate: Some(params.learning_rate),
            discount_factor: Some(params.discount_factor),
            exploration_rate: Some(params.exploration_rate),
            exploration_decay: Some(params.exploration_decay),
            min_exploration: Some(params.min_exploration),
        }
    }
}
