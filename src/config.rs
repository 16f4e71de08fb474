//! Engine and classifier configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! [engine]
//! step_budget_factor = 4
//! invalid_action_penalty = 10.0
//! deterministic = true
//! seed = 7
//!
//! [classifier]
//! fallback_confidence = 0.4
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Decision engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Step budget = factor × orders × machines (at least one step).
    pub step_budget_factor: usize,
    /// Penalty carried by an invalid action outcome.
    pub invalid_action_penalty: f64,
    /// Reward weight on setup hours.
    pub setup_weight: f64,
    /// Changeover minutes when neither a rule nor a family applies.
    pub default_setup_minutes: i64,
    /// Whether `run` asks the policy for its deterministic decision.
    pub deterministic: bool,
    /// Seed for stochastic policies.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step_budget_factor: 4,
            invalid_action_penalty: 10.0,
            setup_weight: 0.1,
            default_setup_minutes: 0,
            deterministic: true,
            seed: 0,
        }
    }
}

impl EngineConfig {
    /// Step budget for a scenario of the given size.
    pub fn step_budget(&self, orders: usize, machines: usize) -> usize {
        self.step_budget_factor
            .saturating_mul(orders)
            .saturating_mul(machines)
            .max(1)
    }

    /// Sets determinism for `run`.
    pub fn with_deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the step budget factor.
    pub fn with_step_budget_factor(mut self, factor: usize) -> Self {
        self.step_budget_factor = factor;
        self
    }
}

/// Root-cause classifier settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Confidence attached when no specific cause matched.
    pub fallback_confidence: f64,
    /// Delay above which an order is HIGH risk.
    pub high_risk_hours: f64,
    /// Delay above which an order is MEDIUM risk.
    pub medium_risk_hours: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            fallback_confidence: 0.4,
            high_risk_hours: 24.0,
            medium_risk_hours: 8.0,
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApsConfig {
    pub engine: EngineConfig,
    pub classifier: ClassifierConfig,
}

impl ApsConfig {
    /// Loads and validates a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ApsConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.step_budget_factor == 0 {
            return Err(ConfigError::Invalid {
                field: "engine.step_budget_factor",
                message: "must be at least 1".into(),
            });
        }
        if self.engine.invalid_action_penalty < 0.0 {
            return Err(ConfigError::Invalid {
                field: "engine.invalid_action_penalty",
                message: "must be non-negative".into(),
            });
        }
        if self.engine.default_setup_minutes < 0 {
            return Err(ConfigError::Invalid {
                field: "engine.default_setup_minutes",
                message: "must be non-negative".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.classifier.fallback_confidence) {
            return Err(ConfigError::Invalid {
                field: "classifier.fallback_confidence",
                message: format!("{} is outside [0, 1]", self.classifier.fallback_confidence),
            });
        }
        if self.classifier.medium_risk_hours > self.classifier.high_risk_hours {
            return Err(ConfigError::Invalid {
                field: "classifier.medium_risk_hours",
                message: "must not exceed high_risk_hours".into(),
            });
        }
        Ok(())
    }
}
