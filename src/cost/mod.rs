//! Setup and batch cost model.
//!
//! Makes processing time assignment-dependent: the duration of an order on
//! a machine depends on the item last run there (changeover) and on the
//! batch rule for the item (batch amortisation).
//!
//! # Changeover resolution
//!
//! 1. Explicit [`SetupRule`](crate::models::SetupRule) for (machine, previous, next)
//! 2. No previous item, or same item → 0
//! 3. Both items in the same family → family intra-family minutes
//! 4. Otherwise → inter-family minutes of the next item's family, then of
//!    the previous item's family, then the configured default
//!
//! # Batch duration
//!
//! `batch_setup_minutes + unit_minutes × size`, accepted only when
//! `min ≤ size ≤ max` and, without partial batches, `size == optimal`.
//!
//! # Reference
//! Allahverdi et al. (2008), "A survey of scheduling problems with
//! setup times or costs"

mod tables;

pub use tables::CostTables;

use serde::Serialize;

use crate::error::CostError;
use crate::models::Machine;

/// Where a changeover time came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupSource {
    /// First order on the machine in this run.
    FirstRun,
    /// Same item as the previous order.
    SameItem,
    /// Explicit setup rule.
    Rule,
    /// Both items in one family.
    IntraFamily,
    /// Items in different families.
    InterFamily,
    /// No rule and no family information.
    Default,
}

/// A resolved changeover.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Changeover {
    pub minutes: i64,
    pub cost: f64,
    pub setup_type: String,
    pub source: SetupSource,
}

impl Changeover {
    fn free(source: SetupSource) -> Self {
        Self {
            minutes: 0,
            cost: 0.0,
            setup_type: String::new(),
            source,
        }
    }

    fn timed(minutes: i64, source: SetupSource) -> Self {
        Self {
            minutes,
            cost: 0.0,
            setup_type: String::new(),
            source,
        }
    }
}

/// Duration and cost of placing one order on one machine.
///
/// `total_minutes == setup_minutes + unit_minutes`: setup is counted once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    /// Changeover time (minutes).
    pub setup_minutes: i64,
    /// Processing time of the batch / order (minutes).
    pub unit_minutes: i64,
    /// Time the machine is occupied (minutes).
    pub total_minutes: i64,
    /// Changeover cost plus machine running cost.
    pub cost: f64,
    /// Origin of the changeover time.
    pub setup_source: SetupSource,
}

/// Stateless cost function over a read-only [`CostTables`].
#[derive(Debug, Clone, Default)]
pub struct CostModel {
    tables: CostTables,
    default_setup_minutes: i64,
}

impl CostModel {
    /// Creates a model over the given tables.
    pub fn new(tables: CostTables) -> Self {
        Self {
            tables,
            default_setup_minutes: 0,
        }
    }

    /// Sets the changeover used when no rule or family applies.
    pub fn with_default_setup(mut self, minutes: i64) -> Self {
        self.default_setup_minutes = minutes;
        self
    }

    /// The underlying lookup tables.
    pub fn tables(&self) -> &CostTables {
        &self.tables
    }

    /// Resolves the changeover from `previous` to `next` on a machine.
    pub fn changeover(&self, machine_id: &str, previous: Option<&str>, next: &str) -> Changeover {
        let Some(previous) = previous else {
            return Changeover::free(SetupSource::FirstRun);
        };

        if let Some(rule) = self.tables.setup_rule(machine_id, previous, next) {
            return Changeover {
                minutes: rule.setup_minutes,
                cost: rule.setup_cost,
                setup_type: rule.setup_type.clone(),
                source: SetupSource::Rule,
            };
        }

        if previous == next {
            return Changeover::free(SetupSource::SameItem);
        }

        let from_family = self.tables.family(previous);
        let to_family = self.tables.family(next);

        match (from_family, to_family) {
            (Some(from), Some(to)) if from.id == to.id => {
                Changeover::timed(to.intra_family_setup_minutes, SetupSource::IntraFamily)
            }
            (_, Some(to)) => {
                Changeover::timed(to.inter_family_setup_minutes, SetupSource::InterFamily)
            }
            (Some(from), None) => {
                Changeover::timed(from.inter_family_setup_minutes, SetupSource::InterFamily)
            }
            (None, None) => Changeover::timed(self.default_setup_minutes, SetupSource::Default),
        }
    }

    /// Batch duration for `size` units of `item` on a machine.
    ///
    /// Returns `Ok(None)` when no batch rule exists for the pair.
    pub fn batch_minutes(
        &self,
        machine_id: &str,
        item_id: &str,
        size: u32,
    ) -> Result<Option<i64>, CostError> {
        let Some(rule) = self.tables.batch_rule(machine_id, item_id) else {
            return Ok(None);
        };

        if !rule.accepts(size) {
            return Err(CostError::InvalidBatchSize {
                machine: machine_id.to_string(),
                item: item_id.to_string(),
                size,
                min: rule.min_batch_size,
                max: rule.max_batch_size,
                optimal: rule.optimal_batch_size,
                allow_partial: rule.allow_partial_batch,
            });
        }

        Ok(Some(rule.duration_for(size)))
    }

    /// Full cost of running `batch_size` units of `next` after `previous`.
    ///
    /// `base_minutes` is the processing time used when no batch rule
    /// exists for (machine, next).
    pub fn cost(
        &self,
        machine: &Machine,
        previous: Option<&str>,
        next: &str,
        batch_size: u32,
        base_minutes: i64,
    ) -> Result<CostBreakdown, CostError> {
        let changeover = self.changeover(&machine.id, previous, next);
        let unit_minutes = self
            .batch_minutes(&machine.id, next, batch_size)?
            .unwrap_or(base_minutes);
        let total_minutes = changeover.minutes + unit_minutes;
        let running_cost = machine
            .cost_per_hour
            .map(|rate| rate * total_minutes as f64 / 60.0)
            .unwrap_or(0.0);

        Ok(CostBreakdown {
            setup_minutes: changeover.minutes,
            unit_minutes,
            total_minutes,
            cost: changeover.cost + running_cost,
            setup_source: changeover.source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BatchRule, ItemFamily, SetupRule};

    fn model() -> CostModel {
        let tables = CostTables::build(
            &[SetupRule::new("M1", "A", "B", 25)
                .with_cost(7.5)
                .with_type("tooling")],
            &[
                ItemFamily::new("bolts", 10, 40).with_item("A").with_item("B").with_item("C"),
                ItemFamily::new("nuts", 5, 60).with_item("N1").with_item("N2"),
            ],
            &[
                BatchRule::new("M1", "A", 5)
                    .with_sizes(1, 10, 5)
                    .with_times(30, 10),
                BatchRule::new("M1", "C", 5)
                    .with_sizes(1, 10, 5)
                    .with_times(30, 10)
                    .with_partial(true),
            ],
        );
        CostModel::new(tables).with_default_setup(15)
    }

    #[test]
    fn test_batch_of_optimal_size() {
        assert_eq!(model().batch_minutes("M1", "A", 5).unwrap(), Some(80));
    }

    #[test]
    fn test_batch_above_max_is_error() {
        let err = model().batch_minutes("M1", "A", 11).unwrap_err();
        assert!(matches!(
            err,
            CostError::InvalidBatchSize { size: 11, max: 10, .. }
        ));
    }

    #[test]
    fn test_partial_batch_requires_flag() {
        let m = model();
        assert!(m.batch_minutes("M1", "A", 3).is_err());
        assert_eq!(m.batch_minutes("M1", "C", 3).unwrap(), Some(60));
    }

    #[test]
    fn test_no_batch_rule() {
        assert_eq!(model().batch_minutes("M2", "A", 99).unwrap(), None);
    }

    #[test]
    fn test_changeover_precedence() {
        let m = model();
        let first = m.changeover("M1", None, "A");
        assert_eq!((first.minutes, first.source), (0, SetupSource::FirstRun));

        let rule = m.changeover("M1", Some("A"), "B");
        assert_eq!((rule.minutes, rule.source), (25, SetupSource::Rule));
        assert_eq!(rule.setup_type, "tooling");

        let same = m.changeover("M1", Some("B"), "B");
        assert_eq!((same.minutes, same.source), (0, SetupSource::SameItem));

        let intra = m.changeover("M2", Some("A"), "B");
        assert_eq!((intra.minutes, intra.source), (10, SetupSource::IntraFamily));

        let inter = m.changeover("M1", Some("A"), "N1");
        assert_eq!((inter.minutes, inter.source), (60, SetupSource::InterFamily));

        let from_only = m.changeover("M1", Some("N1"), "X");
        assert_eq!(from_only.minutes, 60);

        let unknown = m.changeover("M1", Some("X"), "Y");
        assert_eq!((unknown.minutes, unknown.source), (15, SetupSource::Default));
    }

    #[test]
    fn test_cost_counts_setup_once() {
        let machine = Machine::new("M1").with_cost(60.0);
        let c = model().cost(&machine, Some("B"), "A", 5, 999).unwrap();
        // intra-family B→A = 10, batch(5) = 80
        assert_eq!(c.setup_minutes, 10);
        assert_eq!(c.unit_minutes, 80);
        assert_eq!(c.total_minutes, 90);
        assert!((c.cost - 90.0).abs() < 1e-10);
    }

    #[test]
    fn test_cost_uses_base_without_batch_rule() {
        let machine = Machine::new("M2");
        let c = model().cost(&machine, None, "A", 1, 45).unwrap();
        assert_eq!(c.unit_minutes, 45);
        assert_eq!(c.total_minutes, 45);
        assert!((c.cost - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_cost_includes_rule_cost() {
        let machine = Machine::new("M1");
        let c = model().cost(&machine, Some("A"), "B", 1, 20).unwrap();
        assert_eq!(c.total_minutes, 45);
        assert!((c.cost - 7.5).abs() < 1e-10);
    }

    #[test]
    fn test_cost_propagates_batch_error() {
        let machine = Machine::new("M1");
        assert!(model().cost(&machine, None, "A", 11, 10).is_err());
    }
}
