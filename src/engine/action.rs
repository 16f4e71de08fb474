//! Flat action encoding.
//!
//! The action space is the Cartesian product orders × machines, flattened
//! row-major by order: action `a` selects order `a / machine_count` on
//! machine `a % machine_count`. The mapping is a bijection between
//! `0..orders * machines` and the (order, machine) index pairs.

use crate::error::{EngineError, EngineResult};

/// Index into the flattened orders × machines action space.
pub type Action = usize;

/// Decodes an action into `(order_index, machine_index)`.
///
/// # Errors
/// - [`EngineError::NoMachines`] if `machine_count == 0`
/// - [`EngineError::ActionOutOfRange`] if `action >= order_count * machine_count`
pub fn decode_action(
    action: Action,
    order_count: usize,
    machine_count: usize,
) -> EngineResult<(usize, usize)> {
    if machine_count == 0 {
        return Err(EngineError::NoMachines);
    }
    if action >= order_count.saturating_mul(machine_count) {
        return Err(EngineError::ActionOutOfRange {
            action,
            orders: order_count,
            machines: machine_count,
        });
    }
    Ok((action / machine_count, action % machine_count))
}

/// Encodes `(order_index, machine_index)` as an action.
#[inline]
pub fn encode_action(order_index: usize, machine_index: usize, machine_count: usize) -> Action {
    order_index * machine_count + machine_index
}
