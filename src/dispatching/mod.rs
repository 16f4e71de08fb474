//! Dispatch policies.
//!
//! A [`DispatchPolicy`] maps an engine [`Observation`] to an action. Two
//! families are provided:
//!
//! - [`RulePolicy`]: priority dispatching rules (EDD, SPT, WSPT, ...)
//!   composed by a rule engine; pure functions of the observation.
//! - [`LearnedPolicy`]: a linear scoring model loaded from a JSON artifact,
//!   arg-max in deterministic mode, softmax sampling otherwise.
//!
//! # Usage
//!
//! ```
//! use u_aps::dispatching::{rules, RulePolicy};
//!
//! let policy = RulePolicy::new()
//!     .with_rule(rules::Edd)
//!     .with_tie_breaker(rules::Spt);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod learned;
mod observation;
mod rule_policy;
pub mod rules;

pub use learned::{LearnedPolicy, PolicyArtifact};
pub use observation::{MachineView, Observation, OrderView, MACHINE_FEATURES, ORDER_FEATURES};
pub use rule_policy::{EvaluationMode, RulePolicy, TieBreaker};

use std::fmt::Debug;

use crate::engine::Action;
use crate::error::PolicyError;

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority (dispatched first).
pub type RuleScore = f64;

/// A dispatching rule that evaluates order priority.
///
/// # Score Convention
/// **Lower score = higher priority.** Rules should return smaller values
/// for orders that should be dispatched first.
///
/// # Reference
/// Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "SPT", "EDD").
    fn name(&self) -> &'static str;

    /// Evaluates the priority of an order in the current state.
    ///
    /// Returns a score where lower = higher priority.
    fn evaluate(&self, order: &OrderView, observation: &Observation) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

/// Chooses the next action for the decision engine.
///
/// The engine owns its policy for the duration of a run. `deterministic`
/// is always supplied by the caller; policies without randomness ignore it.
pub trait DispatchPolicy: Send + Debug {
    /// Policy name for logs and reports.
    fn name(&self) -> &str;

    /// Picks an action.
    ///
    /// # Errors
    /// [`PolicyError::NoValidAction`] when the observation admits no action
    /// the policy can choose.
    fn decide(&mut self, observation: &Observation, deterministic: bool)
        -> Result<Action, PolicyError>;
}
