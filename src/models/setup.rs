//! Setup and batch rule tables.
//!
//! These are the read-only inputs of the cost model:
//! - [`SetupRule`]: explicit changeover time between two items on a machine
//! - [`ItemFamily`]: fallback changeover times for items grouped by family
//! - [`BatchRule`]: batch size bounds and batch duration on a machine
//!
//! # Reference
//! Allahverdi et al. (2008), "A survey of scheduling problems with
//! setup times or costs"

use serde::{Deserialize, Serialize};

/// Explicit sequence-dependent changeover on one machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupRule {
    /// Machine the rule applies to.
    pub machine_id: String,
    /// Item last run on the machine.
    pub from_item: String,
    /// Item about to run.
    pub to_item: String,
    /// Changeover time (minutes).
    pub setup_minutes: i64,
    /// Changeover cost (currency units).
    #[serde(default)]
    pub setup_cost: f64,
    /// Free-form classification (e.g. "tooling", "cleaning").
    #[serde(default)]
    pub setup_type: String,
}

impl SetupRule {
    /// Creates a rule with zero cost and no type tag.
    pub fn new(
        machine_id: impl Into<String>,
        from_item: impl Into<String>,
        to_item: impl Into<String>,
        setup_minutes: i64,
    ) -> Self {
        Self {
            machine_id: machine_id.into(),
            from_item: from_item.into(),
            to_item: to_item.into(),
            setup_minutes,
            setup_cost: 0.0,
            setup_type: String::new(),
        }
    }

    /// Sets the changeover cost.
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.setup_cost = cost;
        self
    }

    /// Sets the setup type tag.
    pub fn with_type(mut self, setup_type: impl Into<String>) -> Self {
        self.setup_type = setup_type.into();
        self
    }
}

/// A group of items sharing changeover characteristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFamily {
    /// Family identifier.
    pub id: String,
    /// Member item IDs.
    pub items: Vec<String>,
    /// Changeover between two members of this family (minutes).
    pub intra_family_setup_minutes: i64,
    /// Changeover into this family from another family (minutes).
    pub inter_family_setup_minutes: i64,
}

impl ItemFamily {
    /// Creates a family with the given changeover times.
    pub fn new(id: impl Into<String>, intra_minutes: i64, inter_minutes: i64) -> Self {
        Self {
            id: id.into(),
            items: Vec::new(),
            intra_family_setup_minutes: intra_minutes,
            inter_family_setup_minutes: inter_minutes,
        }
    }

    /// Adds a member item.
    pub fn with_item(mut self, item_id: impl Into<String>) -> Self {
        self.items.push(item_id.into());
        self
    }
}

/// Batch bounds and duration for an item on a machine.
///
/// Batch duration is `batch_setup_minutes + unit_minutes × size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRule {
    /// Machine the rule applies to.
    pub machine_id: String,
    /// Item the rule applies to.
    pub item_id: String,
    /// Smallest permitted batch.
    pub min_batch_size: u32,
    /// Largest permitted batch.
    pub max_batch_size: u32,
    /// Preferred batch size; the only size accepted without partial batches.
    pub optimal_batch_size: u32,
    /// Fixed time per batch (minutes).
    pub batch_setup_minutes: i64,
    /// Time per unit (minutes).
    pub unit_minutes: i64,
    /// Whether sizes other than the optimum are accepted.
    #[serde(default)]
    pub allow_partial_batch: bool,
}

impl BatchRule {
    /// Creates a rule that accepts only `size` units.
    pub fn new(machine_id: impl Into<String>, item_id: impl Into<String>, size: u32) -> Self {
        Self {
            machine_id: machine_id.into(),
            item_id: item_id.into(),
            min_batch_size: size,
            max_batch_size: size,
            optimal_batch_size: size,
            batch_setup_minutes: 0,
            unit_minutes: 0,
            allow_partial_batch: false,
        }
    }

    /// Sets the size bounds and optimum.
    pub fn with_sizes(mut self, min: u32, max: u32, optimal: u32) -> Self {
        self.min_batch_size = min;
        self.max_batch_size = max;
        self.optimal_batch_size = optimal;
        self
    }

    /// Sets the per-batch and per-unit times.
    pub fn with_times(mut self, batch_setup_minutes: i64, unit_minutes: i64) -> Self {
        self.batch_setup_minutes = batch_setup_minutes;
        self.unit_minutes = unit_minutes;
        self
    }

    /// Allows sizes other than the optimum.
    pub fn with_partial(mut self, allow: bool) -> Self {
        self.allow_partial_batch = allow;
        self
    }

    /// Whether `size` is an acceptable batch under this rule.
    pub fn accepts(&self, size: u32) -> bool {
        if size < self.min_batch_size || size > self.max_batch_size {
            return false;
        }
        self.allow_partial_batch || size == self.optimal_batch_size
    }

    /// Batch duration for `size` units, ignoring the bounds.
    #[inline]
    pub fn duration_for(&self, size: u32) -> i64 {
        self.batch_setup_minutes + self.unit_minutes * i64::from(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_rule_builder() {
        let rule = SetupRule::new("M1", "A", "B", 45)
            .with_cost(12.5)
            .with_type("tooling");
        assert_eq!(rule.setup_minutes, 45);
        assert!((rule.setup_cost - 12.5).abs() < 1e-10);
        assert_eq!(rule.setup_type, "tooling");
    }

    #[test]
    fn test_family_builder() {
        let fam = ItemFamily::new("bolts", 10, 40).with_item("M8").with_item("M10");
        assert_eq!(fam.items, vec!["M8", "M10"]);
        assert_eq!(fam.intra_family_setup_minutes, 10);
        assert_eq!(fam.inter_family_setup_minutes, 40);
    }

    #[test]
    fn test_batch_rule_accepts() {
        let strict = BatchRule::new("M1", "A", 5).with_sizes(1, 10, 5);
        assert!(strict.accepts(5));
        assert!(!strict.accepts(3));
        assert!(!strict.accepts(11));

        let partial = strict.clone().with_partial(true);
        assert!(partial.accepts(3));
        assert!(partial.accepts(10));
        assert!(!partial.accepts(0));
        assert!(!partial.accepts(11));
    }

    #[test]
    fn test_batch_duration() {
        let rule = BatchRule::new("M1", "A", 5)
            .with_sizes(1, 10, 5)
            .with_times(30, 10);
        assert_eq!(rule.duration_for(5), 80);
        assert_eq!(rule.duration_for(1), 40);
    }
}
