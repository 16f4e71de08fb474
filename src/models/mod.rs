//! Scheduling domain models.
//!
//! Provides the data types exchanged with the engine: the per-run inputs
//! (orders, machines, calendars, setup and batch tables) and the schedule
//! it produces.
//!
//! # Domain Mappings
//!
//! | u-aps | Shop floor |
//! |-------|------------|
//! | WorkOrder | Production order / job |
//! | Machine | Work center / line |
//! | SetupRule, ItemFamily | Changeover matrix |
//! | BatchRule | Lot sizing rule |
//! | Schedule | Dispatch list |

mod calendar;
mod machine;
mod order;
mod schedule;
mod setup;

pub use calendar::{Calendar, TimeWindow};
pub use machine::Machine;
pub use order::{MissingField, WorkOrder};
pub use schedule::{Schedule, ScheduleEntry};
pub use setup::{BatchRule, ItemFamily, SetupRule};
