//! Error types.
//!
//! Each concern has its own enum; [`EngineError`] wraps the ones that can
//! abort a run. Invalid actions are not errors: they are a regular step
//! outcome (see [`crate::engine::StepOutcome`]).

use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors from the cost model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CostError {
    #[error(
        "invalid batch size {size} for item '{item}' on machine '{machine}' \
         (min={min}, max={max}, optimal={optimal}, partial={allow_partial})"
    )]
    InvalidBatchSize {
        machine: String,
        item: String,
        size: u32,
        min: u32,
        max: u32,
        optimal: u32,
        allow_partial: bool,
    },
}

/// Errors from dispatch policies.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("failed to read policy artifact {path}: {source}")]
    ArtifactIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse policy artifact {path}: {source}")]
    ArtifactParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed policy artifact: {0}")]
    Malformed(String),

    #[error("no valid action available")]
    NoValidAction,
}

/// Errors that abort engine construction or a run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("scenario has no machines")]
    NoMachines,

    #[error(
        "invalid scenario input: {}",
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    )]
    InvalidInput(Vec<ValidationError>),

    #[error("action {action} out of range for {orders} orders x {machines} machines")]
    ActionOutOfRange {
        action: usize,
        orders: usize,
        machines: usize,
    },

    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),
}

/// Errors while writing schedule artifacts.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv serialization failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_batch_message() {
        let err = CostError::InvalidBatchSize {
            machine: "M1".into(),
            item: "A".into(),
            size: 11,
            min: 1,
            max: 10,
            optimal: 5,
            allow_partial: false,
        };
        let msg = err.to_string();
        assert!(msg.contains("invalid batch size 11"));
        assert!(msg.contains("max=10"));
    }

    #[test]
    fn test_policy_error_converts() {
        let err: EngineError = PolicyError::NoValidAction.into();
        assert!(matches!(err, EngineError::Policy(PolicyError::NoValidAction)));
        assert_eq!(err.to_string(), "policy error: no valid action available");
    }
}
