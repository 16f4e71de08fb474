//! Input validation for scheduling scenarios.
//!
//! Checks structural integrity of a scenario before the engine is built.
//! Detects:
//! - Duplicate order / machine IDs
//! - An empty machine set
//! - Eligibility references to machines that don't exist
//! - Negative durations in orders and rule tables
//! - Zero-quantity orders
//!
//! Missing order data (no due date, no item, ...) is *not* a validation
//! error: such orders are excluded from dispatching and diagnosed later.

use std::collections::HashSet;
use std::fmt;

use crate::models::{BatchRule, ItemFamily, Machine, SetupRule, WorkOrder};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// No machine was supplied.
    NoMachines,
    /// An order lists a machine that doesn't exist.
    UnknownMachineReference,
    /// A processing, setup or batch time is negative.
    NegativeDuration,
    /// An order requests zero units.
    ZeroQuantity,
}

impl ValidationErrorKind {
    /// Whether the engine refuses to start on this kind of error.
    ///
    /// Unknown machine references only shrink an order's eligibility set.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::UnknownMachineReference)
    }
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Validates orders and machines.
///
/// Checks:
/// 1. At least one machine
/// 2. No duplicate machine IDs
/// 3. No duplicate order IDs
/// 4. Eligibility references point to existing machines
/// 5. Processing times are non-negative
/// 6. Quantities are positive
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(orders: &[WorkOrder], machines: &[Machine]) -> ValidationResult {
    let mut errors = Vec::new();

    if machines.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoMachines,
            "Scenario has no machines",
        ));
    }

    let mut machine_ids = HashSet::new();
    for m in machines {
        if !machine_ids.insert(m.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate machine ID: {}", m.id),
            ));
        }
    }

    let mut order_ids = HashSet::new();
    for order in orders {
        if !order_ids.insert(order.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate order ID: {}", order.id),
            ));
        }

        for machine in &order.eligible_machines {
            if !machine_ids.contains(machine.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownMachineReference,
                    format!("Order '{}' references unknown machine '{}'", order.id, machine),
                ));
            }
        }

        if order.processing_minutes.is_some_and(|p| p < 0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeDuration,
                format!("Order '{}' has a negative processing time", order.id),
            ));
        }

        if order.quantity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroQuantity,
                format!("Order '{}' requests zero units", order.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates the setup, family and batch tables.
pub fn validate_tables(
    setup_rules: &[SetupRule],
    families: &[ItemFamily],
    batch_rules: &[BatchRule],
) -> ValidationResult {
    let mut errors = Vec::new();

    for rule in setup_rules {
        if rule.setup_minutes < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeDuration,
                format!(
                    "Setup rule {}: {} -> {} has negative minutes",
                    rule.machine_id, rule.from_item, rule.to_item
                ),
            ));
        }
    }

    for family in families {
        if family.intra_family_setup_minutes < 0 || family.inter_family_setup_minutes < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeDuration,
                format!("Item family '{}' has negative setup minutes", family.id),
            ));
        }
    }

    for rule in batch_rules {
        if rule.batch_setup_minutes < 0 || rule.unit_minutes < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeDuration,
                format!(
                    "Batch rule {}/{} has negative minutes",
                    rule.machine_id, rule.item_id
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_machines() -> Vec<Machine> {
        vec![Machine::new("M1"), Machine::new("M2")]
    }

    fn sample_orders() -> Vec<WorkOrder> {
        vec![
            WorkOrder::new("O1")
                .with_processing(60)
                .with_due(480)
                .with_item("A")
                .with_machines(["M1", "M2"]),
            WorkOrder::new("O2")
                .with_processing(30)
                .with_due(240)
                .with_item("B")
                .with_machine("M2"),
        ]
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&sample_orders(), &sample_machines()).is_ok());
    }

    #[test]
    fn test_missing_order_data_is_not_an_error() {
        let orders = vec![WorkOrder::new("O1")];
        assert!(validate_input(&orders, &sample_machines()).is_ok());
    }

    #[test]
    fn test_duplicate_order_id() {
        let mut orders = sample_orders();
        orders.push(WorkOrder::new("O1"));

        let errors = validate_input(&orders, &sample_machines()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("order")));
    }

    #[test]
    fn test_duplicate_machine_id() {
        let machines = vec![Machine::new("M1"), Machine::new("M1")];
        let errors = validate_input(&[], &machines).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("machine")));
    }

    #[test]
    fn test_no_machines() {
        let errors = validate_input(&sample_orders(), &[]).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::NoMachines));
    }

    #[test]
    fn test_unknown_machine_is_not_fatal() {
        let orders = vec![WorkOrder::new("O1").with_machine("M9")];
        let errors = validate_input(&orders, &sample_machines()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::UnknownMachineReference);
        assert!(!errors[0].kind.is_fatal());
    }

    #[test]
    fn test_negative_processing_and_zero_quantity() {
        let orders = vec![WorkOrder::new("O1").with_processing(-5).with_quantity(0)];
        let errors = validate_input(&orders, &sample_machines()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::NegativeDuration));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::ZeroQuantity));
    }

    #[test]
    fn test_negative_table_durations() {
        let errors = validate_tables(
            &[SetupRule::new("M1", "A", "B", -1)],
            &[ItemFamily::new("F", 0, -3)],
            &[BatchRule::new("M1", "A", 5).with_times(-10, 2)],
        )
        .unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| e.kind.is_fatal()));
    }
}
