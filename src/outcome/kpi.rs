//! Schedule quality metrics (KPIs).
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest completion time |
//! | Total Tardiness | Sum of max(0, end - due) |
//! | Maximum Tardiness | Largest single delay |
//! | On-Time Rate | Fraction of placed orders meeting their due date |
//! | Utilization | Mean over machines of busy time / makespan |
//! | Avg Completion | Mean end time of placed orders |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Machine, Schedule};

/// Schedule performance indicators.
///
/// All time values are in minutes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleKpi {
    /// Sum of tardiness across placed orders.
    pub total_tardiness: i64,
    /// Maximum tardiness of any single order.
    pub max_tardiness: i64,
    /// Latest completion time.
    pub makespan: i64,
    /// Mean machine utilization (0.0..1.0), idle machines included.
    pub utilization: f64,
    pub utilization_by_machine: BTreeMap<String, f64>,
    pub scheduled_count: usize,
    pub unplanned_count: usize,
    /// Fraction of placed orders completing on time (0.0..1.0).
    pub on_time_rate: f64,
    pub avg_completion: f64,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule.
    ///
    /// # Arguments
    /// * `schedule` - Placed entries.
    /// * `machines` - Every machine of the scenario, used or not.
    /// * `total_orders` - Size of the order list the run started with.
    pub fn calculate(schedule: &Schedule, machines: &[Machine], total_orders: usize) -> Self {
        let makespan = schedule.makespan();
        let scheduled_count = schedule.len();

        let busy = schedule.busy_by_machine();
        let utilization_by_machine: BTreeMap<String, f64> = machines
            .iter()
            .map(|m| {
                let busy = busy.get(&m.id).copied().unwrap_or(0);
                let util = if makespan > 0 {
                    busy as f64 / makespan as f64
                } else {
                    0.0
                };
                (m.id.clone(), util)
            })
            .collect();
        let utilization = if utilization_by_machine.is_empty() {
            0.0
        } else {
            utilization_by_machine.values().sum::<f64>() / utilization_by_machine.len() as f64
        };

        let on_time = schedule.entries().iter().filter(|e| !e.is_late()).count();
        let on_time_rate = if scheduled_count == 0 {
            1.0
        } else {
            on_time as f64 / scheduled_count as f64
        };
        let avg_completion = if scheduled_count == 0 {
            0.0
        } else {
            schedule.entries().iter().map(|e| e.end() as f64).sum::<f64>()
                / scheduled_count as f64
        };

        Self {
            total_tardiness: schedule.total_tardiness(),
            max_tardiness: schedule
                .entries()
                .iter()
                .map(|e| e.tardiness())
                .max()
                .unwrap_or(0),
            makespan,
            utilization,
            utilization_by_machine,
            scheduled_count,
            unplanned_count: total_orders.saturating_sub(scheduled_count),
            on_time_rate,
            avg_completion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduleEntry;

    fn machines() -> Vec<Machine> {
        vec![Machine::new("M1"), Machine::new("M2")]
    }

    #[test]
    fn test_kpi_basic() {
        let mut schedule = Schedule::new();
        schedule.push(ScheduleEntry::new("O1", "M1", "A", 0, 0, 100, 500, 0));
        schedule.push(ScheduleEntry::new("O2", "M1", "A", 100, 0, 100, 150, 1));

        let kpi = ScheduleKpi::calculate(&schedule, &machines(), 3);
        assert_eq!(kpi.makespan, 200);
        assert_eq!(kpi.total_tardiness, 50);
        assert_eq!(kpi.max_tardiness, 50);
        assert_eq!(kpi.scheduled_count, 2);
        assert_eq!(kpi.unplanned_count, 1);
        assert!((kpi.on_time_rate - 0.5).abs() < 1e-10);
        assert!((kpi.avg_completion - 150.0).abs() < 1e-10);
    }

    #[test]
    fn test_utilization_includes_idle_machines() {
        let mut schedule = Schedule::new();
        schedule.push(ScheduleEntry::new("O1", "M1", "A", 0, 20, 80, 500, 0));

        let kpi = ScheduleKpi::calculate(&schedule, &machines(), 1);
        assert!((kpi.utilization_by_machine["M1"] - 1.0).abs() < 1e-10);
        assert!((kpi.utilization_by_machine["M2"] - 0.0).abs() < 1e-10);
        assert!((kpi.utilization - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_empty_schedule() {
        let kpi = ScheduleKpi::calculate(&Schedule::new(), &machines(), 2);
        assert_eq!(kpi.makespan, 0);
        assert_eq!(kpi.unplanned_count, 2);
        assert!((kpi.on_time_rate - 1.0).abs() < 1e-10);
        assert!((kpi.utilization - 0.0).abs() < 1e-10);
    }
}
