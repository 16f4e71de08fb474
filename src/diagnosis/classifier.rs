//! Root-cause classifier.
//!
//! # Rules (first match wins)
//!
//! 1. **DATA_MISSING**: processing time, due date, item or eligible
//!    machines missing; no eligible machine known to the scenario; or the
//!    batch size rejected by every eligible machine.
//! 2. **CAPACITY_SHORTAGE**: the order alone is longer than the largest
//!    single-machine window before its due date; or the orders due no
//!    later that can only run on this order's machines need more raw time
//!    than those machines have; or, adding competitors that can also run
//!    elsewhere, the pooled demand exceeds the union of all their machines.
//! 3. **CALENDAR_CONFLICT**: the same demand fits the raw window but not the
//!    calendar-adjusted one.
//! 4. **PRIORITY_LOSS**: a strictly higher-priority order started on an
//!    eligible machine before this order's due date.
//! 5. Otherwise CAPACITY_SHORTAGE at the configured fallback confidence.
//!
//! A late entry that crosses blocked or non-working time is reported in the
//! `calendar_violation` field of the analysis, whatever the cause.

use std::collections::{BTreeSet, HashMap};

use serde_json::json;
use tracing::debug;

use super::{PlanStatus, ReasonCode, RiskLevel, UnplannedReason};
use crate::config::ClassifierConfig;
use crate::cost::{CostModel, CostTables};
use crate::models::{Machine, Schedule, ScheduleEntry, WorkOrder};
use crate::scenario::Scenario;

/// A cause with its confidence, explanation and evidence.
struct Finding {
    code: ReasonCode,
    confidence: f64,
    explanation: String,
    analysis: serde_json::Value,
}

/// Classifies why orders were not planned on time.
#[derive(Debug, Clone, Default)]
pub struct RootCauseClassifier {
    config: ClassifierConfig,
}

/// Read-only view of a scenario prepared for classification.
struct Context<'a> {
    scenario: &'a Scenario,
    schedule: &'a Schedule,
    machines: HashMap<&'a str, &'a Machine>,
    cost: CostModel,
}

impl<'a> Context<'a> {
    fn new(scenario: &'a Scenario, schedule: &'a Schedule) -> Self {
        let tables = CostTables::build(
            &scenario.setup_rules,
            &scenario.families,
            &scenario.batch_rules,
        );
        Self {
            scenario,
            schedule,
            machines: scenario.machines.iter().map(|m| (m.id.as_str(), m)).collect(),
            cost: CostModel::new(tables),
        }
    }

    /// Eligible machines that exist in the scenario, in id order.
    fn known_eligible(&self, order: &WorkOrder) -> Vec<&'a Machine> {
        order
            .eligible_machines
            .iter()
            .filter_map(|id| self.machines.get(id.as_str()).copied())
            .collect()
    }

    /// Eligible machines whose batch rule accepts the order's quantity,
    /// paired with the run time there.
    fn runnable(&self, order: &WorkOrder) -> Vec<(&'a Machine, i64)> {
        let (Some(processing), Some(item)) = (order.processing_minutes, order.item_id.as_deref())
        else {
            return Vec::new();
        };
        self.known_eligible(order)
            .into_iter()
            .filter_map(|m| {
                self.cost
                    .batch_minutes(&m.id, item, order.quantity)
                    .ok()
                    .map(|batch| (m, batch.unwrap_or(processing)))
            })
            .collect()
    }

    /// Shortest run time of an order over its runnable machines.
    fn demand(&self, order: &WorkOrder) -> Option<i64> {
        self.runnable(order).into_iter().map(|(_, minutes)| minutes).min()
    }
}

/// Demand competing with one order for machine time before its due date.
struct Competition<'a> {
    /// Orders that can only run on this order's machines.
    dedicated_ids: Vec<&'a str>,
    dedicated_demand: i64,
    /// Every order sharing at least one machine.
    pooled_ids: Vec<&'a str>,
    pooled_demand: i64,
    own_machines: BTreeSet<&'a str>,
    /// This order's machines plus those of the flexible competitors.
    pool_machines: BTreeSet<&'a str>,
}

impl<'a> Competition<'a> {
    /// The first demand that exceeds `capacity` over its machine set, as
    /// `(demand, capacity, machines, orders)`.
    fn exceeding(
        &self,
        capacity: impl Fn(&BTreeSet<&'a str>) -> i64,
    ) -> Option<(i64, i64, &BTreeSet<&'a str>, &[&'a str])> {
        let own = capacity(&self.own_machines);
        if self.dedicated_demand > own {
            return Some((
                self.dedicated_demand,
                own,
                &self.own_machines,
                self.dedicated_ids.as_slice(),
            ));
        }
        let pooled = capacity(&self.pool_machines);
        if self.pooled_demand > pooled {
            return Some((
                self.pooled_demand,
                pooled,
                &self.pool_machines,
                self.pooled_ids.as_slice(),
            ));
        }
        None
    }
}

fn window_start(machine: &Machine, order: &WorkOrder) -> i64 {
    machine.available_minutes.max(order.release_minutes)
}

impl RootCauseClassifier {
    /// Creates a classifier.
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// The thresholds in use.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Diagnoses every unplanned or late order, sorted by order id.
    pub fn classify(&self, scenario: &Scenario, schedule: &Schedule) -> Vec<UnplannedReason> {
        let ctx = Context::new(scenario, schedule);
        let mut reasons: Vec<UnplannedReason> = scenario
            .orders
            .iter()
            .filter_map(|order| self.diagnose(&ctx, order))
            .collect();
        reasons.sort_by(|a, b| a.order_id().cmp(b.order_id()));
        debug!(
            scenario = %scenario.id,
            diagnosed = reasons.len(),
            "root-cause classification finished"
        );
        reasons
    }

    fn diagnose(&self, ctx: &Context<'_>, order: &WorkOrder) -> Option<UnplannedReason> {
        let entry = ctx.schedule.entry_for_order(&order.id);
        let (status, delay_hours) = match entry {
            None => (PlanStatus::Unplanned, 0.0),
            Some(e) if e.is_late() => (PlanStatus::Delayed, e.tardiness() as f64 / 60.0),
            Some(_) => return None,
        };

        let mut finding = self
            .data_missing(ctx, order)
            .or_else(|| self.capacity_shortage(ctx, order))
            .or_else(|| self.calendar_conflict(ctx, order))
            .or_else(|| self.priority_loss(ctx, order))
            .unwrap_or_else(|| self.fallback(status));
        if let Some(violation) = entry.and_then(|e| self.calendar_violation(ctx, e)) {
            if let Some(analysis) = finding.analysis.as_object_mut() {
                analysis.insert("calendar_violation".to_string(), violation);
            }
        }

        let risk = RiskLevel::assess(
            status,
            delay_hours,
            self.config.high_risk_hours,
            self.config.medium_risk_hours,
        );
        Some(UnplannedReason::new(
            order.id.clone(),
            ctx.scenario.id.clone(),
            finding.code,
            status,
            delay_hours,
            finding.confidence,
            finding.explanation,
            finding.analysis,
            risk,
        ))
    }

    fn data_missing(&self, ctx: &Context<'_>, order: &WorkOrder) -> Option<Finding> {
        let missing: Vec<&str> = order.missing_fields().iter().map(|f| f.as_str()).collect();
        if !missing.is_empty() {
            return Some(Finding {
                code: ReasonCode::DataMissing,
                confidence: 1.0,
                explanation: format!("Order {} is missing {}", order.id, missing.join(", ")),
                analysis: json!({ "missing_fields": missing }),
            });
        }

        let known = ctx.known_eligible(order);
        if known.is_empty() {
            let unknown: Vec<&str> = order.eligible_machines.iter().map(String::as_str).collect();
            return Some(Finding {
                code: ReasonCode::DataMissing,
                confidence: 0.95,
                explanation: format!(
                    "Order {} lists only machines unknown to the scenario",
                    order.id
                ),
                analysis: json!({ "unknown_machines": unknown }),
            });
        }

        if ctx.runnable(order).is_empty() {
            let machines: Vec<&str> = known.iter().map(|m| m.id.as_str()).collect();
            return Some(Finding {
                code: ReasonCode::DataMissing,
                confidence: 0.9,
                explanation: format!(
                    "No batch rule accepts {} units of order {} on its eligible machines",
                    order.quantity, order.id
                ),
                analysis: json!({
                    "batch_rejected_on": machines,
                    "quantity": order.quantity,
                }),
            });
        }

        None
    }

    fn capacity_shortage(&self, ctx: &Context<'_>, order: &WorkOrder) -> Option<Finding> {
        let due = order.due_minutes?;
        let own = ctx.demand(order)?;
        let runnable = ctx.runnable(order);
        let eligible: BTreeSet<&str> = runnable.iter().map(|(m, _)| m.id.as_str()).collect();

        let largest_window = runnable
            .iter()
            .map(|(m, _)| (due - window_start(m, order)).max(0))
            .max()
            .unwrap_or(0);
        if own > largest_window {
            let excess = own - largest_window;
            return Some(Finding {
                code: ReasonCode::CapacityShortage,
                confidence: 0.6 + 0.35 * (excess as f64 / own as f64).min(1.0),
                explanation: format!(
                    "Order {} needs {} min but the largest window before its due date is {} min",
                    order.id, own, largest_window
                ),
                analysis: json!({
                    "demand_minutes": own,
                    "largest_window_minutes": largest_window,
                    "excess_minutes": excess,
                    "single_order": true,
                }),
            });
        }

        let competition = self.competing_demand(ctx, order, due, &eligible);
        let (demand, capacity, machines, competitors) = competition.exceeding(|machines| {
            machines
                .iter()
                .filter_map(|id| ctx.machines.get(*id))
                .map(|m| (due - window_start(m, order)).max(0))
                .sum()
        })?;
        let excess = demand - capacity;
        Some(Finding {
            code: ReasonCode::CapacityShortage,
            confidence: 0.6 + 0.35 * (excess as f64 / demand as f64).min(1.0),
            explanation: format!(
                "Demand of {} min from {} orders due by {} exceeds {} min of machine time",
                demand,
                competitors.len(),
                due,
                capacity
            ),
            analysis: json!({
                "demand_minutes": demand,
                "capacity_minutes": capacity,
                "excess_minutes": excess,
                "competing_orders": competitors,
                "machines": machines,
                "single_order": false,
            }),
        })
    }

    /// Orders (this one included) due no later than `due` that share a
    /// runnable machine with this order.
    ///
    /// A competitor whose runnable machines all lie inside this order's set
    /// must spend its time there and counts towards the dedicated demand.
    /// One that can also run elsewhere only counts towards a pooled demand
    /// over the union of both machine sets.
    fn competing_demand<'a>(
        &self,
        ctx: &Context<'a>,
        order: &WorkOrder,
        due: i64,
        eligible: &BTreeSet<&'a str>,
    ) -> Competition<'a> {
        let mut competition = Competition {
            dedicated_ids: Vec::new(),
            dedicated_demand: 0,
            pooled_ids: Vec::new(),
            pooled_demand: 0,
            own_machines: eligible.clone(),
            pool_machines: eligible.clone(),
        };
        for other in &ctx.scenario.orders {
            if !other.is_schedulable() || other.due_minutes.is_none_or(|d| d > due) {
                continue;
            }
            let Some(minutes) = ctx.demand(other) else {
                continue;
            };
            let machines: BTreeSet<&'a str> = if other.id == order.id {
                eligible.clone()
            } else {
                ctx.runnable(other)
                    .iter()
                    .map(|(m, _)| m.id.as_str())
                    .collect()
            };
            if machines.is_disjoint(eligible) {
                continue;
            }

            competition.pooled_ids.push(other.id.as_str());
            competition.pooled_demand += minutes;
            if machines.is_subset(eligible) {
                competition.dedicated_ids.push(other.id.as_str());
                competition.dedicated_demand += minutes;
            } else {
                competition.pool_machines.extend(machines);
            }
        }
        competition
    }

    fn calendar_conflict(&self, ctx: &Context<'_>, order: &WorkOrder) -> Option<Finding> {
        let due = order.due_minutes?;
        let runnable = ctx.runnable(order);
        if !runnable.iter().any(|(m, _)| m.calendar.is_some()) {
            return None;
        }
        let eligible: BTreeSet<&str> = runnable.iter().map(|(m, _)| m.id.as_str()).collect();

        let competition = self.competing_demand(ctx, order, due, &eligible);
        let (demand, working, machines, competitors) = competition.exceeding(|machines| {
            machines
                .iter()
                .filter_map(|id| ctx.machines.get(*id))
                .map(|m| m.working_minutes(window_start(m, order), due))
                .sum()
        })?;
        Some(Finding {
            code: ReasonCode::CalendarConflict,
            confidence: 0.8,
            explanation: format!(
                "Demand of {} min leaves only {} working min before {}",
                demand, working, due
            ),
            analysis: json!({
                "demand_minutes": demand,
                "working_minutes": working,
                "competing_orders": competitors,
                "machines": machines,
            }),
        })
    }

    /// Blocked or non-working time crossed by a scheduled entry.
    ///
    /// The engine places orders without consulting calendars, so this is
    /// evidence that the schedule breaks a calendar, not a cause of lateness.
    fn calendar_violation(
        &self,
        ctx: &Context<'_>,
        entry: &ScheduleEntry,
    ) -> Option<serde_json::Value> {
        let machine = ctx.machines.get(entry.machine_id())?;
        let calendar = machine.calendar.as_ref()?;
        let blocked = calendar.blocked_overlapping(entry.start(), entry.end());
        let working = machine.working_minutes(entry.start(), entry.end());
        if blocked.is_empty() && working >= entry.duration() {
            return None;
        }
        let blocked: Vec<[i64; 2]> = blocked.iter().map(|w| [w.start, w.end]).collect();
        Some(json!({
            "machine": machine.id,
            "start": entry.start(),
            "end": entry.end(),
            "blocked_periods": blocked,
            "non_working_minutes": entry.duration() - working,
        }))
    }

    fn priority_loss(&self, ctx: &Context<'_>, order: &WorkOrder) -> Option<Finding> {
        let due = order.due_minutes?;
        let priorities: HashMap<&str, i32> = ctx
            .scenario
            .orders
            .iter()
            .map(|o| (o.id.as_str(), o.priority))
            .collect();

        let winners: Vec<&str> = ctx
            .schedule
            .entries()
            .iter()
            .filter(|e| e.order_id() != order.id)
            .filter(|e| order.is_eligible(e.machine_id()) && e.start() < due)
            .filter(|e| {
                priorities
                    .get(e.order_id())
                    .is_some_and(|&p| p > order.priority)
            })
            .map(|e| e.order_id())
            .collect();
        if winners.is_empty() {
            return None;
        }

        Some(Finding {
            code: ReasonCode::PriorityLoss,
            confidence: 0.5 + 0.1 * winners.len().min(4) as f64,
            explanation: format!(
                "{} higher-priority orders took machine time before order {} was due",
                winners.len(),
                order.id
            ),
            analysis: json!({
                "priority": order.priority,
                "higher_priority_orders": winners,
            }),
        })
    }

    fn fallback(&self, status: PlanStatus) -> Finding {
        Finding {
            code: ReasonCode::CapacityShortage,
            confidence: self.config.fallback_confidence,
            explanation: match status {
                PlanStatus::Unplanned => {
                    "Order was not placed although capacity and data checks pass".to_string()
                }
                PlanStatus::Delayed => {
                    "Order finished late through sequencing on shared machines".to_string()
                }
            },
            analysis: json!({ "fallback": true }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BatchRule, Calendar};

    fn order(id: &str, processing: i64, due: i64) -> WorkOrder {
        WorkOrder::new(id)
            .with_processing(processing)
            .with_due(due)
            .with_item("A")
    }

    fn classify(scenario: &Scenario, schedule: &Schedule) -> Vec<UnplannedReason> {
        RootCauseClassifier::default().classify(scenario, schedule)
    }

    #[test]
    fn test_on_time_orders_not_reported() {
        let s = Scenario::new("s")
            .with_machine(Machine::new("M1"))
            .with_order(order("O1", 60, 100).with_machine("M1"));
        let mut schedule = Schedule::new();
        schedule.push(ScheduleEntry::new("O1", "M1", "A", 0, 0, 60, 100, 1));
        assert!(classify(&s, &schedule).is_empty());
    }

    #[test]
    fn test_empty_eligibility_is_data_missing() {
        let s = Scenario::new("s")
            .with_machine(Machine::new("M1"))
            .with_order(order("O2", 60, 100));
        let reasons = classify(&s, &Schedule::new());
        assert_eq!(reasons.len(), 1);
        assert_eq!(reasons[0].reason_code(), ReasonCode::DataMissing);
        assert_eq!(reasons[0].status(), PlanStatus::Unplanned);
        assert_eq!(reasons[0].delay_hours(), 0.0);
        assert_eq!(reasons[0].analysis()["missing_fields"][0], "eligible_machines");
    }

    #[test]
    fn test_unknown_machines_is_data_missing() {
        let s = Scenario::new("s")
            .with_machine(Machine::new("M1"))
            .with_order(order("O1", 60, 100).with_machine("M9"));
        let reasons = classify(&s, &Schedule::new());
        assert_eq!(reasons[0].reason_code(), ReasonCode::DataMissing);
        assert_eq!(reasons[0].analysis()["unknown_machines"][0], "M9");
    }

    #[test]
    fn test_rejected_batch_is_data_missing() {
        let s = Scenario::new("s")
            .with_machine(Machine::new("M1"))
            .with_order(order("O1", 60, 100).with_machine("M1").with_quantity(11))
            .with_batch_rule(BatchRule::new("M1", "A", 5).with_sizes(1, 10, 5));
        let reasons = classify(&s, &Schedule::new());
        assert_eq!(reasons[0].reason_code(), ReasonCode::DataMissing);
    }

    #[test]
    fn test_late_entry_delay_hours() {
        let s = Scenario::new("s")
            .with_machine(Machine::new("M1"))
            .with_machine(Machine::new("M2"))
            .with_order(order("O3", 120, 60).with_machines(["M1", "M2"]));
        let mut schedule = Schedule::new();
        schedule.push(ScheduleEntry::new("O3", "M1", "A", 0, 0, 120, 60, 1));
        let reasons = classify(&s, &schedule);
        assert_eq!(reasons.len(), 1);
        let r = &reasons[0];
        assert_eq!(r.status(), PlanStatus::Delayed);
        assert!((r.delay_hours() - 1.0).abs() < 1e-10);
        assert_eq!(r.reason_code(), ReasonCode::CapacityShortage);
        assert_eq!(r.analysis()["single_order"], true);
        // excess 60 of 120
        assert!((r.confidence() - 0.775).abs() < 1e-10);
        assert_eq!(r.risk_level(), RiskLevel::Low);
    }

    #[test]
    fn test_competing_demand_is_capacity_shortage() {
        let s = Scenario::new("s")
            .with_machine(Machine::new("M1"))
            .with_order(order("O1", 60, 100).with_machine("M1"))
            .with_order(order("O2", 60, 100).with_machine("M1"));
        let mut schedule = Schedule::new();
        schedule.push(ScheduleEntry::new("O1", "M1", "A", 0, 0, 60, 100, 1));
        schedule.push(ScheduleEntry::new("O2", "M1", "A", 60, 0, 60, 100, 2));
        let reasons = classify(&s, &schedule);
        assert_eq!(reasons.len(), 1);
        assert_eq!(reasons[0].order_id(), "O2");
        assert_eq!(reasons[0].reason_code(), ReasonCode::CapacityShortage);
        assert_eq!(reasons[0].analysis()["demand_minutes"], 120);
        assert_eq!(reasons[0].analysis()["capacity_minutes"], 100);
    }

    #[test]
    fn test_blocked_window_is_calendar_conflict() {
        let calendar = Calendar::new("c").with_window(0, 1000).with_blocked(20, 80);
        let s = Scenario::new("s")
            .with_machine(Machine::new("M1").with_calendar(calendar))
            .with_order(order("O1", 60, 100).with_machine("M1"));
        let reasons = classify(&s, &Schedule::new());
        assert_eq!(reasons[0].reason_code(), ReasonCode::CalendarConflict);
        assert!((reasons[0].confidence() - 0.8).abs() < 1e-10);
        assert_eq!(reasons[0].analysis()["working_minutes"], 40);
    }

    #[test]
    fn test_entry_over_blocked_period_is_flagged_not_blamed() {
        let calendar = Calendar::new("c").with_window(0, 1000).with_blocked(300, 320);
        let s = Scenario::new("s")
            .with_machine(Machine::new("M1").with_calendar(calendar))
            .with_order(order("O1", 60, 400).with_machine("M1"));
        let mut schedule = Schedule::new();
        schedule.push(ScheduleEntry::new("O1", "M1", "A", 290, 0, 150, 400, 1));
        let reasons = classify(&s, &schedule);
        assert_eq!(reasons.len(), 1);
        assert_eq!(reasons[0].reason_code(), ReasonCode::CapacityShortage);
        assert_eq!(reasons[0].analysis()["fallback"], true);
        let violation = &reasons[0].analysis()["calendar_violation"];
        assert_eq!(violation["machine"], "M1");
        assert_eq!(violation["blocked_periods"][0][0], 300);
        assert_eq!(violation["non_working_minutes"], 20);
    }

    #[test]
    fn test_flexible_competitor_is_priority_loss() {
        let s = Scenario::new("s")
            .with_machine(Machine::new("M1"))
            .with_machine(Machine::new("M2"))
            .with_order(order("HI", 60, 100).with_machines(["M1", "M2"]).with_priority(5))
            .with_order(order("LO", 60, 100).with_machine("M1").with_priority(1));
        let mut schedule = Schedule::new();
        schedule.push(ScheduleEntry::new("HI", "M1", "A", 0, 0, 60, 100, 1));
        schedule.push(ScheduleEntry::new("LO", "M1", "A", 60, 0, 60, 100, 2));
        let reasons = classify(&s, &schedule);
        assert_eq!(reasons.len(), 1);
        assert_eq!(reasons[0].order_id(), "LO");
        assert_eq!(reasons[0].reason_code(), ReasonCode::PriorityLoss);
        assert_eq!(reasons[0].analysis()["higher_priority_orders"][0], "HI");
        assert!(reasons[0].analysis().get("calendar_violation").is_none());
    }

    #[test]
    fn test_pooled_demand_over_shared_machines_is_capacity_shortage() {
        let s = Scenario::new("s")
            .with_machine(Machine::new("M1"))
            .with_machine(Machine::new("M2"))
            .with_order(order("A", 60, 100).with_machine("M1"))
            .with_order(order("B", 150, 100).with_machines(["M1", "M2"]));
        let mut schedule = Schedule::new();
        schedule.push(ScheduleEntry::new("B", "M1", "A", 0, 0, 150, 100, 1));
        schedule.push(ScheduleEntry::new("A", "M1", "A", 150, 0, 60, 100, 2));
        let reasons = classify(&s, &schedule);
        let a = reasons.iter().find(|r| r.order_id() == "A").unwrap();
        assert_eq!(a.reason_code(), ReasonCode::CapacityShortage);
        // 60 + 150 min against M1 + M2 before 100
        assert_eq!(a.analysis()["demand_minutes"], 210);
        assert_eq!(a.analysis()["capacity_minutes"], 200);
        assert_eq!(a.analysis()["machines"][1], "M2");
    }

    #[test]
    fn test_priority_loss() {
        let s = Scenario::new("s")
            .with_machine(Machine::new("M1"))
            .with_order(order("HI", 60, 500).with_machine("M1").with_priority(5))
            .with_order(order("LO", 60, 100).with_machine("M1").with_priority(1));
        let mut schedule = Schedule::new();
        schedule.push(ScheduleEntry::new("HI", "M1", "A", 0, 0, 60, 500, 1));
        schedule.push(ScheduleEntry::new("LO", "M1", "A", 60, 0, 60, 100, 2));
        let reasons = classify(&s, &schedule);
        assert_eq!(reasons.len(), 1);
        assert_eq!(reasons[0].reason_code(), ReasonCode::PriorityLoss);
        assert!((reasons[0].confidence() - 0.6).abs() < 1e-10);
        assert_eq!(reasons[0].analysis()["higher_priority_orders"][0], "HI");
    }

    #[test]
    fn test_fallback() {
        let s = Scenario::new("s")
            .with_machine(Machine::new("M1"))
            .with_order(order("O1", 60, 500).with_machine("M1"));
        let reasons = classify(&s, &Schedule::new());
        assert_eq!(reasons[0].reason_code(), ReasonCode::CapacityShortage);
        assert!((reasons[0].confidence() - 0.4).abs() < 1e-10);
        assert_eq!(reasons[0].analysis()["fallback"], true);
    }

    #[test]
    fn test_output_sorted_by_order_id() {
        let s = Scenario::new("s")
            .with_machine(Machine::new("M1"))
            .with_order(WorkOrder::new("Z"))
            .with_order(WorkOrder::new("A"))
            .with_order(WorkOrder::new("M"));
        let ids: Vec<String> = classify(&s, &Schedule::new())
            .iter()
            .map(|r| r.order_id().to_string())
            .collect();
        assert_eq!(ids, vec!["A", "M", "Z"]);
    }
}
