//! Post-hoc diagnosis of unplanned and late orders.
//!
//! After a run, [`RootCauseClassifier`] explains every order that was not
//! placed or finished after its due date. Each explanation is an immutable
//! [`UnplannedReason`] carrying a reason code, a confidence, a structured
//! analysis payload, a risk level and a recommended action.
//!
//! # Reason precedence
//!
//! `DATA_MISSING > CAPACITY_SHORTAGE > CALENDAR_CONFLICT > PRIORITY_LOSS`:
//! the first cause that matches wins.

mod classifier;

pub use classifier::RootCauseClassifier;

use std::collections::BTreeMap;

use serde::Serialize;

/// Root cause of an unplanned or late order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    /// Not enough machine time before the due date.
    CapacityShortage,
    /// Enough raw time, but calendars block it.
    CalendarConflict,
    /// Higher-priority orders took the capacity.
    PriorityLoss,
    /// The order lacks scheduling data.
    DataMissing,
}

impl ReasonCode {
    /// Code as it appears in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CapacityShortage => "CAPACITY_SHORTAGE",
            Self::CalendarConflict => "CALENDAR_CONFLICT",
            Self::PriorityLoss => "PRIORITY_LOSS",
            Self::DataMissing => "DATA_MISSING",
        }
    }

    /// Fixed remediation for this cause.
    pub fn recommended_action(&self) -> &'static str {
        match self {
            Self::CapacityShortage => {
                "Add capacity (overtime or extra shift) or outsource the order"
            }
            Self::CalendarConflict => {
                "Reschedule maintenance or add working time before the due date"
            }
            Self::PriorityLoss => "Review order priorities or split the order across machines",
            Self::DataMissing => "Complete routing, item and resource data for the order",
        }
    }
}

/// Plan state of a diagnosed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanStatus {
    /// Not in the schedule.
    Unplanned,
    /// Scheduled, but finishing after its due date.
    Delayed,
}

/// Delivery risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// `HIGH` above `high_hours` of delay; `MEDIUM` above `medium_hours` or
    /// when unplanned; otherwise `LOW`.
    pub fn assess(
        status: PlanStatus,
        delay_hours: f64,
        high_hours: f64,
        medium_hours: f64,
    ) -> Self {
        if delay_hours > high_hours {
            Self::High
        } else if delay_hours > medium_hours || status == PlanStatus::Unplanned {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Diagnosis of one order. Fields are read-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnplannedReason {
    order_id: String,
    scenario_id: String,
    reason_code: ReasonCode,
    status: PlanStatus,
    delay_hours: f64,
    confidence: f64,
    explanation: String,
    analysis: serde_json::Value,
    risk_level: RiskLevel,
    recommended_action: &'static str,
}

impl UnplannedReason {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        order_id: impl Into<String>,
        scenario_id: impl Into<String>,
        reason_code: ReasonCode,
        status: PlanStatus,
        delay_hours: f64,
        confidence: f64,
        explanation: impl Into<String>,
        analysis: serde_json::Value,
        risk_level: RiskLevel,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            scenario_id: scenario_id.into(),
            reason_code,
            status,
            delay_hours: delay_hours.max(0.0),
            confidence: confidence.clamp(0.0, 1.0),
            explanation: explanation.into(),
            analysis,
            risk_level,
            recommended_action: reason_code.recommended_action(),
        }
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn scenario_id(&self) -> &str {
        &self.scenario_id
    }

    pub fn reason_code(&self) -> ReasonCode {
        self.reason_code
    }

    pub fn status(&self) -> PlanStatus {
        self.status
    }

    /// Hours past due (0 when unplanned).
    pub fn delay_hours(&self) -> f64 {
        self.delay_hours
    }

    /// Confidence in the assigned cause (0.0..=1.0).
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Structured evidence behind the classification.
    pub fn analysis(&self) -> &serde_json::Value {
        &self.analysis
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    pub fn recommended_action(&self) -> &'static str {
        self.recommended_action
    }
}

/// Counts over a set of diagnoses.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiagnosisSummary {
    pub total: usize,
    pub unplanned: usize,
    pub delayed: usize,
    pub by_reason: BTreeMap<ReasonCode, usize>,
    pub by_risk: BTreeMap<RiskLevel, usize>,
    pub total_delay_hours: f64,
}

impl DiagnosisSummary {
    /// Aggregates a classifier output.
    pub fn from_reasons(reasons: &[UnplannedReason]) -> Self {
        let mut summary = Self {
            total: reasons.len(),
            ..Self::default()
        };
        for r in reasons {
            match r.status {
                PlanStatus::Unplanned => summary.unplanned += 1,
                PlanStatus::Delayed => summary.delayed += 1,
            }
            *summary.by_reason.entry(r.reason_code).or_insert(0) += 1;
            *summary.by_risk.entry(r.risk_level).or_insert(0) += 1;
            summary.total_delay_hours += r.delay_hours;
        }
        summary
    }

    /// Number of diagnoses with the given code.
    pub fn count(&self, code: ReasonCode) -> usize {
        self.by_reason.get(&code).copied().unwrap_or(0)
    }
}
