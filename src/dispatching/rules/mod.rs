//! Built-in dispatching rules.
//!
//! # Categories
//!
//! - **Time-based**: SPT, WSPT
//! - **Due-date**: EDD
//! - **Priority**: PRIORITY
//!
//! Orders lacking the data a rule needs get `f64::MAX` (dispatched last).
//!
//! # Score Convention
//! All rules return lower scores for higher priority orders.
//!
//! # References
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4

use super::{DispatchingRule, Observation, OrderView, RuleScore};

/// WSPT weight: priorities below zero count as zero.
fn weight(order: &OrderView) -> f64 {
    f64::from(order.priority.max(0)) + 1.0
}

// ======================== Time-based rules ========================

/// Shortest Processing Time.
///
/// Minimizes mean flow time and WIP.
///
/// # Reference
/// Smith (1956), optimal for minimizing mean flow time on single machine.
#[derive(Debug, Clone, Copy)]
pub struct Spt;

impl DispatchingRule for Spt {
    fn name(&self) -> &'static str {
        "SPT"
    }

    fn evaluate(&self, order: &OrderView, _observation: &Observation) -> RuleScore {
        order
            .processing_minutes
            .map(|p| p as f64)
            .unwrap_or(f64::MAX)
    }

    fn description(&self) -> &'static str {
        "Shortest Processing Time"
    }
}

/// Weighted Shortest Processing Time.
///
/// Prioritizes by the ratio of weight to processing time, with
/// `weight = max(priority, 0) + 1`.
///
/// # Reference
/// Smith (1956), optimal for minimizing weighted mean flow time.
#[derive(Debug, Clone, Copy)]
pub struct Wspt;

impl DispatchingRule for Wspt {
    fn name(&self) -> &'static str {
        "WSPT"
    }

    fn evaluate(&self, order: &OrderView, _observation: &Observation) -> RuleScore {
        match order.processing_minutes {
            Some(p) if p > 0 => -(weight(order) / p as f64),
            // zero-length work goes first
            Some(_) => f64::MIN,
            None => f64::MAX,
        }
    }

    fn description(&self) -> &'static str {
        "Weighted Shortest Processing Time"
    }
}

// ======================== Due-date rules ========================

/// Earliest Due Date.
///
/// # Reference
/// Jackson (1955), optimal for minimizing maximum lateness on single machine.
#[derive(Debug, Clone, Copy)]
pub struct Edd;

impl DispatchingRule for Edd {
    fn name(&self) -> &'static str {
        "EDD"
    }

    fn evaluate(&self, order: &OrderView, _observation: &Observation) -> RuleScore {
        order.due_minutes.map(|d| d as f64).unwrap_or(f64::MAX)
    }

    fn description(&self) -> &'static str {
        "Earliest Due Date"
    }
}

// ======================== Priority-based rule ========================

/// Simple priority rule.
///
/// Higher `priority` is dispatched first (negated score).
#[derive(Debug, Clone, Copy)]
pub struct Priority;

impl DispatchingRule for Priority {
    fn name(&self) -> &'static str {
        "PRIORITY"
    }

    fn evaluate(&self, order: &OrderView, _observation: &Observation) -> RuleScore {
        -f64::from(order.priority)
    }

    fn description(&self) -> &'static str {
        "Order Priority"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::observation::tests::{machine, order};

    fn ctx_at(time: i64, orders: Vec<OrderView>) -> Observation {
        let mask = vec![true; orders.len()];
        Observation::new(orders, vec![machine("M1", time)], mask, 0)
    }

    fn eval<R: DispatchingRule>(rule: &R, o: &OrderView, obs: &Observation) -> f64 {
        rule.evaluate(o, obs)
    }

    #[test]
    fn test_spt() {
        let short = order("short", 10, 100, 0);
        let long = order("long", 50, 100, 0);
        let ctx = ctx_at(0, vec![short.clone(), long.clone()]);
        assert!(eval(&Spt, &short, &ctx) < eval(&Spt, &long, &ctx));
    }

    #[test]
    fn test_wspt() {
        // important + short beats unimportant + long
        let important_short = order("is", 10, 100, 5);
        let unimportant_long = order("ul", 50, 100, 0);
        let ctx = ctx_at(0, vec![important_short.clone(), unimportant_long.clone()]);
        assert!(eval(&Wspt, &important_short, &ctx) < eval(&Wspt, &unimportant_long, &ctx));
    }

    #[test]
    fn test_wspt_negative_priority_clamped() {
        let a = order("a", 10, 100, -5);
        let b = order("b", 10, 100, 0);
        let ctx = ctx_at(0, vec![a.clone(), b.clone()]);
        assert!((eval(&Wspt, &a, &ctx) - eval(&Wspt, &b, &ctx)).abs() < 1e-10);
    }

    #[test]
    fn test_edd() {
        let early = order("early", 10, 100, 0);
        let late = order("late", 10, 500, 0);
        let mut none = order("none", 10, 0, 0);
        none.due_minutes = None;
        let ctx = ctx_at(0, vec![early.clone(), late.clone(), none.clone()]);
        assert!(eval(&Edd, &early, &ctx) < eval(&Edd, &late, &ctx));
        assert!(eval(&Edd, &late, &ctx) < eval(&Edd, &none, &ctx));
    }

    #[test]
    fn test_priority() {
        let high = order("high", 10, 100, 100);
        let low = order("low", 10, 100, 1);
        let ctx = ctx_at(0, vec![high.clone(), low.clone()]);
        assert!(eval(&Priority, &high, &ctx) < eval(&Priority, &low, &ctx));
    }

    #[test]
    fn test_missing_processing_goes_last() {
        let mut missing = order("missing", 10, 100, 0);
        missing.processing_minutes = None;
        let ctx = ctx_at(0, vec![missing.clone()]);
        assert_eq!(eval(&Spt, &missing, &ctx), f64::MAX);
        assert_eq!(eval(&Wspt, &missing, &ctx), f64::MAX);
    }
}
