//! Run outcomes.
//!
//! A [`ScheduleResult`] packages what a decision engine run produced: the
//! placed entries, the orders left unplaced, KPIs and step counters. It can
//! be written to disk as a JSON record plus a flat CSV of entries (see
//! [`export`]).

mod export;
mod kpi;

pub use export::{export, ExportPaths};
pub use kpi::ScheduleKpi;

use serde::{Serialize, Serializer};

use crate::models::{Schedule, ScheduleEntry};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// No placeable order remained.
    Completed,
    /// The step budget ran out; the schedule is partial.
    Stalled,
}

/// Result of one scheduling run.
///
/// Serializes with entries sorted by machine, then start time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleResult {
    pub scenario_id: String,
    pub status: RunStatus,
    #[serde(rename = "entries", serialize_with = "serialize_sorted")]
    pub schedule: Schedule,
    /// IDs of orders not placed, in input order.
    pub unplanned: Vec<String>,
    pub kpi: ScheduleKpi,
    pub steps: usize,
    pub invalid_actions: usize,
    pub total_reward: f64,
}

impl ScheduleResult {
    /// Entries sorted by machine, then start time.
    pub fn entries(&self) -> Vec<&ScheduleEntry> {
        self.schedule.sorted_entries()
    }

    /// Whether every order was placed.
    pub fn is_complete(&self) -> bool {
        self.status == RunStatus::Completed && self.unplanned.is_empty()
    }
}

fn serialize_sorted<S: Serializer>(schedule: &Schedule, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(schedule.sorted_entries())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Machine;

    #[test]
    fn test_json_entries_sorted() {
        let mut schedule = Schedule::new();
        schedule.push(ScheduleEntry::new("O2", "M2", "A", 0, 0, 10, 100, 0));
        schedule.push(ScheduleEntry::new("O1", "M1", "A", 0, 0, 10, 100, 1));
        let machines = vec![Machine::new("M1"), Machine::new("M2")];
        let result = ScheduleResult {
            scenario_id: "s".into(),
            status: RunStatus::Completed,
            kpi: ScheduleKpi::calculate(&schedule, &machines, 2),
            schedule,
            unplanned: vec![],
            steps: 2,
            invalid_actions: 0,
            total_reward: 0.0,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["entries"][0]["order_id"], "O1");
        assert_eq!(json["entries"][1]["order_id"], "O2");
        assert!(result.is_complete());
    }
}
