//! Rule-based dispatch policy.
//!
//! Composes dispatching rules with configurable evaluation modes and
//! tie-breaking strategies, picks the best dispatchable order and places it
//! on the valid machine that frees up first.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::cmp::Ordering;
use std::sync::Arc;

use super::{rules, DispatchPolicy, DispatchingRule, Observation, OrderView, RuleScore};
use crate::engine::{encode_action, Action};
use crate::error::PolicyError;

/// How multiple rules are combined.
#[derive(Debug, Clone, Default)]
pub enum EvaluationMode {
    /// Apply rules in sequence; use next rule only on ties.
    #[default]
    Sequential,
    /// Compute weighted sum of all rule scores.
    Weighted,
}

/// How ties are broken after all rules are exhausted.
#[derive(Debug, Clone, Default)]
pub enum TieBreaker {
    /// Keep input order (default).
    #[default]
    InputOrder,
    /// Deterministic by order ID (lexicographic).
    ById,
}

#[derive(Clone)]
struct WeightedRule {
    rule: Arc<dyn DispatchingRule>,
    weight: f64,
}

/// A composable rule-based dispatch policy.
///
/// Supports sequential multi-layer evaluation (primary rule → tie-breaker)
/// and weighted combination modes. Rules are pure, so the determinism
/// flag passed to [`DispatchPolicy::decide`] has no effect.
///
/// # Example
/// ```
/// use u_aps::dispatching::{rules, RulePolicy, TieBreaker};
///
/// let policy = RulePolicy::new()
///     .with_rule(rules::Edd)
///     .with_tie_breaker(rules::Spt)
///     .with_final_tie_breaker(TieBreaker::ById);
/// ```
#[derive(Clone)]
pub struct RulePolicy {
    name: String,
    rules: Vec<WeightedRule>,
    mode: EvaluationMode,
    tie_breaker: TieBreaker,
    epsilon: f64,
}

impl RulePolicy {
    /// Creates an empty policy (input order among dispatchable orders).
    pub fn new() -> Self {
        Self {
            name: String::new(),
            rules: Vec::new(),
            mode: EvaluationMode::Sequential,
            tie_breaker: TieBreaker::InputOrder,
            epsilon: 1e-9,
        }
    }

    /// Earliest Due Date, ties by SPT.
    pub fn edd() -> Self {
        Self::new()
            .with_rule(rules::Edd)
            .with_tie_breaker(rules::Spt)
    }

    /// Shortest Processing Time, ties by EDD.
    pub fn spt() -> Self {
        Self::new()
            .with_rule(rules::Spt)
            .with_tie_breaker(rules::Edd)
    }

    /// Weighted Shortest Processing Time, ties by EDD.
    pub fn wspt() -> Self {
        Self::new()
            .with_rule(rules::Wspt)
            .with_tie_breaker(rules::Edd)
    }

    /// Highest priority first, ties by EDD.
    pub fn priority() -> Self {
        Self::new()
            .with_rule(rules::Priority)
            .with_tie_breaker(rules::Edd)
    }

    /// Adds a primary rule (weight 1.0).
    pub fn with_rule<R: DispatchingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight: 1.0,
        });
        self
    }

    /// Adds a weighted rule.
    pub fn with_weighted_rule<R: DispatchingRule + 'static>(
        mut self,
        rule: R,
        weight: f64,
    ) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight,
        });
        self
    }

    /// Adds a tie-breaking rule (weight 0.0, used only in Sequential mode).
    pub fn with_tie_breaker<R: DispatchingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight: 0.0,
        });
        self
    }

    /// Sets the evaluation mode.
    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the final tie-breaking strategy.
    pub fn with_final_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Overrides the generated name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sorts dispatchable orders by priority (highest priority first).
    ///
    /// Returns indices into `observation.orders`.
    pub fn sort_indices(&self, observation: &Observation) -> Vec<usize> {
        let mut indices: Vec<usize> = observation
            .orders
            .iter()
            .enumerate()
            .filter(|(_, o)| o.dispatchable)
            .map(|(i, _)| i)
            .collect();

        match &self.mode {
            EvaluationMode::Sequential => {
                indices.sort_by(|&a, &b| {
                    self.compare_sequential(
                        &observation.orders[a],
                        &observation.orders[b],
                        observation,
                    )
                });
            }
            EvaluationMode::Weighted => {
                let scores: Vec<f64> = observation
                    .orders
                    .iter()
                    .map(|o| self.weighted_score(o, observation))
                    .collect();
                let orders = &observation.orders;
                indices.sort_by(|&a, &b| {
                    scores[a]
                        .partial_cmp(&scores[b])
                        .unwrap_or(Ordering::Equal)
                        .then_with(|| self.final_tie(&orders[a], &orders[b]))
                });
            }
        }

        indices
    }

    /// Returns the index of the highest-priority dispatchable order.
    pub fn select_best(&self, observation: &Observation) -> Option<usize> {
        self.sort_indices(observation).first().copied()
    }

    /// Evaluates a single order and returns scores from each rule.
    pub fn evaluate(&self, order: &OrderView, observation: &Observation) -> Vec<RuleScore> {
        self.rules
            .iter()
            .map(|wr| wr.rule.evaluate(order, observation) * wr.weight)
            .collect()
    }

    fn compare_sequential(
        &self,
        a: &OrderView,
        b: &OrderView,
        observation: &Observation,
    ) -> Ordering {
        for wr in &self.rules {
            let score_a = wr.rule.evaluate(a, observation);
            let score_b = wr.rule.evaluate(b, observation);

            if (score_a - score_b).abs() > self.epsilon {
                return score_a.partial_cmp(&score_b).unwrap_or(Ordering::Equal);
            }
        }

        self.final_tie(a, b)
    }

    fn final_tie(&self, a: &OrderView, b: &OrderView) -> Ordering {
        match &self.tie_breaker {
            TieBreaker::InputOrder => Ordering::Equal,
            TieBreaker::ById => a.id.cmp(&b.id),
        }
    }

    fn weighted_score(&self, order: &OrderView, observation: &Observation) -> f64 {
        self.rules
            .iter()
            .map(|wr| wr.rule.evaluate(order, observation) * wr.weight)
            .sum()
    }
}

impl Default for RulePolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchPolicy for RulePolicy {
    fn name(&self) -> &str {
        if self.name.is_empty() {
            self.rules.first().map(|wr| wr.rule.name()).unwrap_or("INPUT")
        } else {
            &self.name
        }
    }

    fn decide(
        &mut self,
        observation: &Observation,
        _deterministic: bool,
    ) -> Result<Action, PolicyError> {
        let order = self.select_best(observation).ok_or(PolicyError::NoValidAction)?;
        // earliest-available valid machine, lowest index on ties
        let machine = observation
            .valid_machines(order)
            .min_by_key(|&m| (observation.machines[m].available_minutes, m))
            .ok_or(PolicyError::NoValidAction)?;
        Ok(encode_action(order, machine, observation.machine_count()))
    }
}

impl std::fmt::Debug for RulePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RulePolicy")
            .field(
                "rules",
                &self
                    .rules
                    .iter()
                    .map(|r| format!("{}(w={})", r.rule.name(), r.weight))
                    .collect::<Vec<_>>(),
            )
            .field("mode", &self.mode)
            .finish()
    }
}
