//! Work order model.
//!
//! A work order is the unit of production work the engine places on a
//! machine. Orders are supplied per run and never mutated by the engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A work order to be scheduled.
///
/// Scheduling inputs that may be absent in upstream data (processing time,
/// due date, item) are `Option`s. An order missing any of them, or with an
/// empty eligibility set, is never selectable by the engine and is reported
/// as `DATA_MISSING` by the classifier.
///
/// # Time Representation
/// All times are in minutes relative to the planning epoch (t=0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    /// Unique order identifier.
    pub id: String,
    /// Required processing time (minutes) when no batch rule applies.
    pub processing_minutes: Option<i64>,
    /// Due date (minutes since epoch).
    pub due_minutes: Option<i64>,
    /// Scheduling priority (higher = more urgent).
    pub priority: i32,
    /// Item produced by this order.
    pub item_id: Option<String>,
    /// Machines allowed to process this order.
    pub eligible_machines: BTreeSet<String>,
    /// Requested batch size (units).
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Earliest start time (minutes).
    #[serde(default)]
    pub release_minutes: i64,
}

fn default_quantity() -> u32 {
    1
}

/// A scheduling input an order can lack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingField {
    ProcessingTime,
    DueDate,
    ItemId,
    EligibleMachines,
}

impl MissingField {
    /// Field name as it appears in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProcessingTime => "processing_minutes",
            Self::DueDate => "due_minutes",
            Self::ItemId => "item_id",
            Self::EligibleMachines => "eligible_machines",
        }
    }
}

impl WorkOrder {
    /// Creates an order with no scheduling data attached.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            processing_minutes: None,
            due_minutes: None,
            priority: 0,
            item_id: None,
            eligible_machines: BTreeSet::new(),
            quantity: 1,
            release_minutes: 0,
        }
    }

    /// Sets the processing time.
    pub fn with_processing(mut self, minutes: i64) -> Self {
        self.processing_minutes = Some(minutes);
        self
    }

    /// Sets the due date.
    pub fn with_due(mut self, minutes: i64) -> Self {
        self.due_minutes = Some(minutes);
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the item.
    pub fn with_item(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = Some(item_id.into());
        self
    }

    /// Adds an eligible machine.
    pub fn with_machine(mut self, machine_id: impl Into<String>) -> Self {
        self.eligible_machines.insert(machine_id.into());
        self
    }

    /// Replaces the eligibility set.
    pub fn with_machines<I, S>(mut self, machines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.eligible_machines = machines.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the requested batch size.
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Sets the release time.
    pub fn with_release(mut self, minutes: i64) -> Self {
        self.release_minutes = minutes;
        self
    }

    /// Whether the given machine may process this order.
    #[inline]
    pub fn is_eligible(&self, machine_id: &str) -> bool {
        self.eligible_machines.contains(machine_id)
    }

    /// Scheduling inputs this order lacks, in a stable order.
    pub fn missing_fields(&self) -> Vec<MissingField> {
        let mut missing = Vec::new();
        if self.processing_minutes.is_none() {
            missing.push(MissingField::ProcessingTime);
        }
        if self.due_minutes.is_none() {
            missing.push(MissingField::DueDate);
        }
        if self.item_id.as_deref().is_none_or(str::is_empty) {
            missing.push(MissingField::ItemId);
        }
        if self.eligible_machines.is_empty() {
            missing.push(MissingField::EligibleMachines);
        }
        missing
    }

    /// Whether every scheduling input is present.
    pub fn is_schedulable(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_builder() {
        let order = WorkOrder::new("O1")
            .with_processing(90)
            .with_due(480)
            .with_priority(3)
            .with_item("BOLT-M8")
            .with_machines(["M1", "M2"])
            .with_quantity(5)
            .with_release(30);

        assert_eq!(order.id, "O1");
        assert_eq!(order.processing_minutes, Some(90));
        assert_eq!(order.due_minutes, Some(480));
        assert_eq!(order.priority, 3);
        assert_eq!(order.item_id.as_deref(), Some("BOLT-M8"));
        assert!(order.is_eligible("M1"));
        assert!(!order.is_eligible("M3"));
        assert_eq!(order.quantity, 5);
        assert_eq!(order.release_minutes, 30);
        assert!(order.is_schedulable());
    }

    #[test]
    fn test_missing_fields() {
        let order = WorkOrder::new("O2").with_processing(10);
        assert_eq!(
            order.missing_fields(),
            vec![
                MissingField::DueDate,
                MissingField::ItemId,
                MissingField::EligibleMachines
            ]
        );
        assert!(!order.is_schedulable());
    }

    #[test]
    fn test_empty_item_is_missing() {
        let order = WorkOrder::new("O3")
            .with_processing(10)
            .with_due(100)
            .with_item("")
            .with_machine("M1");
        assert_eq!(order.missing_fields(), vec![MissingField::ItemId]);
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{
            "id": "O9",
            "processing_minutes": 60,
            "due_minutes": 120,
            "priority": 1,
            "item_id": "A",
            "eligible_machines": ["M1"]
        }"#;
        let order: WorkOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.quantity, 1);
        assert_eq!(order.release_minutes, 0);
        assert!(order.is_schedulable());
    }
}
