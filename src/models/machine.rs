//! Machine model.
//!
//! Machines perform work orders one at a time. The engine tracks each
//! machine's available-time cursor; the calendar is consulted only when
//! diagnosing why an order missed its due date.

use serde::{Deserialize, Serialize};

use super::Calendar;

/// A machine that can be assigned work orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    /// Unique machine identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Time (minutes) at which the machine is first free in this run.
    #[serde(default)]
    pub available_minutes: i64,
    /// Working windows and blocked periods (maintenance, holidays).
    #[serde(default)]
    pub calendar: Option<Calendar>,
    /// Economic cost per running hour.
    #[serde(default)]
    pub cost_per_hour: Option<f64>,
}

impl Machine {
    /// Creates a machine free from t=0 with no calendar.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            available_minutes: 0,
            calendar: None,
            cost_per_hour: None,
        }
    }

    /// Sets the machine name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the initial available time.
    pub fn with_available(mut self, minutes: i64) -> Self {
        self.available_minutes = minutes;
        self
    }

    /// Sets the availability calendar.
    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = Some(calendar);
        self
    }

    /// Sets the hourly cost.
    pub fn with_cost(mut self, cost_per_hour: f64) -> Self {
        self.cost_per_hour = Some(cost_per_hour);
        self
    }

    /// Working minutes in `[start, end)` after calendar exclusions.
    pub fn working_minutes(&self, start: i64, end: i64) -> i64 {
        match &self.calendar {
            None => (end - start).max(0),
            Some(cal) => cal.available_time_in_range(start, end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_builder() {
        let m = Machine::new("M1")
            .with_name("Press 1")
            .with_available(120)
            .with_cost(60.0);

        assert_eq!(m.id, "M1");
        assert_eq!(m.name, "Press 1");
        assert_eq!(m.available_minutes, 120);
        assert_eq!(m.cost_per_hour, Some(60.0));
    }

    #[test]
    fn test_availability_no_calendar() {
        let m = Machine::new("M1");
        assert_eq!(m.working_minutes(0, 480), 480);
        assert_eq!(m.working_minutes(480, 0), 0);
    }

    #[test]
    fn test_working_minutes_with_maintenance() {
        let m = Machine::new("M1")
            .with_calendar(Calendar::new("cal").with_blocked(100, 160));
        assert_eq!(m.working_minutes(0, 480), 420);
    }
}
