//! Engine state snapshot passed to dispatch policies.

use serde::Serialize;

use crate::engine::{encode_action, Action};

/// Features per order: processing, due, priority, scheduled flag.
pub const ORDER_FEATURES: usize = 4;
/// Features per machine: available time.
pub const MACHINE_FEATURES: usize = 1;

/// Raw view of one order.
///
/// Missing processing time / due date are reported as `None`; such orders
/// are never `dispatchable`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderView {
    pub id: String,
    pub processing_minutes: Option<i64>,
    pub due_minutes: Option<i64>,
    pub priority: i32,
    pub release_minutes: i64,
    pub scheduled: bool,
    /// Pending and placeable on at least one machine.
    pub dispatchable: bool,
}

/// Raw view of one machine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineView {
    pub id: String,
    pub available_minutes: i64,
}

/// Snapshot of the engine state, refreshed every step.
///
/// Normalised features:
/// - order: `[processing / max_processing, due / max_due, priority / max |priority|, scheduled]`
/// - machine: `[available / horizon]`, horizon = max(max_due, latest available, 1)
///
/// Missing values contribute 0. `action_mask[a]` is true iff action `a`
/// would currently be applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub order_features: Vec<[f64; ORDER_FEATURES]>,
    pub machine_features: Vec<[f64; MACHINE_FEATURES]>,
    pub action_mask: Vec<bool>,
    pub orders: Vec<OrderView>,
    pub machines: Vec<MachineView>,
    /// Steps taken so far.
    pub step: usize,
}

impl Observation {
    /// Builds features and mask from raw views.
    ///
    /// `action_mask` must have `orders.len() * machines.len()` entries.
    pub fn new(
        orders: Vec<OrderView>,
        machines: Vec<MachineView>,
        action_mask: Vec<bool>,
        step: usize,
    ) -> Self {
        debug_assert_eq!(action_mask.len(), orders.len() * machines.len());

        let max_processing = orders
            .iter()
            .filter_map(|o| o.processing_minutes)
            .max()
            .unwrap_or(0)
            .max(1) as f64;
        let max_due = orders
            .iter()
            .filter_map(|o| o.due_minutes)
            .max()
            .unwrap_or(0)
            .max(1) as f64;
        let max_priority = orders
            .iter()
            .map(|o| o.priority.unsigned_abs())
            .max()
            .unwrap_or(0)
            .max(1) as f64;
        let horizon = machines
            .iter()
            .map(|m| m.available_minutes)
            .max()
            .unwrap_or(0)
            .max(max_due as i64)
            .max(1) as f64;

        let order_features = orders
            .iter()
            .map(|o| {
                [
                    o.processing_minutes.unwrap_or(0) as f64 / max_processing,
                    o.due_minutes.unwrap_or(0) as f64 / max_due,
                    f64::from(o.priority) / max_priority,
                    if o.scheduled { 1.0 } else { 0.0 },
                ]
            })
            .collect();
        let machine_features = machines
            .iter()
            .map(|m| [m.available_minutes as f64 / horizon])
            .collect();

        Self {
            order_features,
            machine_features,
            action_mask,
            orders,
            machines,
            step,
        }
    }

    /// Number of orders.
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Number of machines.
    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }

    /// Size of the flattened action space.
    pub fn action_count(&self) -> usize {
        self.action_mask.len()
    }

    /// Whether `action` is currently valid.
    pub fn is_valid(&self, action: Action) -> bool {
        self.action_mask.get(action).copied().unwrap_or(false)
    }

    /// Currently valid actions, ascending.
    pub fn valid_actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.action_mask
            .iter()
            .enumerate()
            .filter_map(|(a, &ok)| ok.then_some(a))
    }

    /// Valid machine indices for an order, ascending.
    pub fn valid_machines(&self, order_index: usize) -> impl Iterator<Item = usize> + '_ {
        let machines = self.machine_count();
        (0..machines).filter(move |&m| self.is_valid(encode_action(order_index, m, machines)))
    }
}
