//! Learned dispatch policy.
//!
//! A linear scoring model over the observation features. Each action
//! `(order, machine)` scores
//!
//! ```text
//! score = order_weights · order_features[order]
//!       + machine_weights · machine_features[machine]
//!       + bias
//! ```
//!
//! Deterministic decisions take the arg-max (lowest action index on ties);
//! stochastic decisions sample from `softmax(score / temperature)` with a
//! seeded generator, so a fixed seed reproduces the same run.
//!
//! The artifact is a JSON document:
//!
//! ```json
//! {
//!   "name": "tardiness-v3",
//!   "version": 3,
//!   "order_weights": [-0.5, -2.0, 0.8, 0.0],
//!   "machine_weights": [-1.0],
//!   "bias": 0.0,
//!   "temperature": 0.5
//! }
//! ```

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{DispatchPolicy, Observation, MACHINE_FEATURES, ORDER_FEATURES};
use crate::engine::{encode_action, Action};
use crate::error::PolicyError;

fn default_temperature() -> f64 {
    1.0
}

fn default_mask_invalid() -> bool {
    true
}

/// Serialized linear policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyArtifact {
    pub name: String,
    #[serde(default)]
    pub version: u32,
    pub order_weights: Vec<f64>,
    pub machine_weights: Vec<f64>,
    #[serde(default)]
    pub bias: f64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Restrict choices to the observation's action mask.
    #[serde(default = "default_mask_invalid")]
    pub mask_invalid: bool,
}

impl PolicyArtifact {
    /// Checks dimensions and parameter ranges.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.order_weights.len() != ORDER_FEATURES {
            return Err(PolicyError::Malformed(format!(
                "expected {ORDER_FEATURES} order weights, got {}",
                self.order_weights.len()
            )));
        }
        if self.machine_weights.len() != MACHINE_FEATURES {
            return Err(PolicyError::Malformed(format!(
                "expected {MACHINE_FEATURES} machine weights, got {}",
                self.machine_weights.len()
            )));
        }
        let all_finite = self
            .order_weights
            .iter()
            .chain(&self.machine_weights)
            .chain(std::iter::once(&self.bias))
            .all(|w| w.is_finite());
        if !all_finite {
            return Err(PolicyError::Malformed("non-finite weight".into()));
        }
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(PolicyError::Malformed(format!(
                "temperature must be positive, got {}",
                self.temperature
            )));
        }
        Ok(())
    }
}

/// Dispatch policy backed by a [`PolicyArtifact`].
#[derive(Debug, Clone)]
pub struct LearnedPolicy {
    artifact: PolicyArtifact,
    rng: StdRng,
}

impl LearnedPolicy {
    /// Loads an artifact from disk.
    ///
    /// # Errors
    /// IO, parse or validation failure; all are fatal for a run.
    pub fn load(path: &Path, seed: u64) -> Result<Self, PolicyError> {
        let content = std::fs::read_to_string(path).map_err(|source| PolicyError::ArtifactIo {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: PolicyArtifact =
            serde_json::from_str(&content).map_err(|source| PolicyError::ArtifactParse {
                path: path.to_path_buf(),
                source,
            })?;
        let policy = Self::from_artifact(artifact, seed)?;
        info!(
            path = %path.display(),
            name = %policy.artifact.name,
            version = policy.artifact.version,
            "policy artifact loaded"
        );
        Ok(policy)
    }

    /// Wraps an in-memory artifact.
    pub fn from_artifact(artifact: PolicyArtifact, seed: u64) -> Result<Self, PolicyError> {
        artifact.validate()?;
        Ok(Self {
            artifact,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// The loaded artifact.
    pub fn artifact(&self) -> &PolicyArtifact {
        &self.artifact
    }

    /// Score of every action, in action order.
    pub fn scores(&self, observation: &Observation) -> Vec<f64> {
        let machines = observation.machine_count();
        let machine_terms: Vec<f64> = observation
            .machine_features
            .iter()
            .map(|f| dot(&self.artifact.machine_weights, f))
            .collect();

        let mut scores = Vec::with_capacity(observation.action_count());
        for (o, features) in observation.order_features.iter().enumerate() {
            let order_term = dot(&self.artifact.order_weights, features) + self.artifact.bias;
            for (m, machine_term) in machine_terms.iter().enumerate() {
                debug_assert_eq!(scores.len(), encode_action(o, m, machines));
                scores.push(order_term + machine_term);
            }
        }
        scores
    }

    fn candidates(&self, observation: &Observation) -> Vec<Action> {
        if self.artifact.mask_invalid {
            observation.valid_actions().collect()
        } else {
            (0..observation.action_count()).collect()
        }
    }

    fn sample(&mut self, candidates: &[Action], scores: &[f64]) -> Action {
        let max = candidates
            .iter()
            .map(|&a| scores[a])
            .fold(f64::NEG_INFINITY, f64::max);
        let weights: Vec<f64> = candidates
            .iter()
            .map(|&a| ((scores[a] - max) / self.artifact.temperature).exp())
            .collect();
        let total: f64 = weights.iter().sum();

        let mut threshold = self.rng.random::<f64>() * total;
        for (&action, w) in candidates.iter().zip(&weights) {
            if threshold < *w {
                return action;
            }
            threshold -= w;
        }
        // rounding left a sliver past the last bucket
        candidates[candidates.len() - 1]
    }
}

impl DispatchPolicy for LearnedPolicy {
    fn name(&self) -> &str {
        &self.artifact.name
    }

    fn decide(
        &mut self,
        observation: &Observation,
        deterministic: bool,
    ) -> Result<Action, PolicyError> {
        let candidates = self.candidates(observation);
        if candidates.is_empty() {
            return Err(PolicyError::NoValidAction);
        }
        let scores = self.scores(observation);

        if deterministic {
            let mut best = candidates[0];
            for &a in &candidates[1..] {
                if scores[a] > scores[best] {
                    best = a;
                }
            }
            Ok(best)
        } else {
            Ok(self.sample(&candidates, &scores))
        }
    }
}

fn dot(weights: &[f64], features: &[f64]) -> f64 {
    weights.iter().zip(features).map(|(w, x)| w * x).sum()
}
