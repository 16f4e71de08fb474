//! Calendar and time window models.
//!
//! Defines machine availability patterns: shifts and blocked periods
//! (maintenance, holidays). The engine itself ignores calendars; the
//! classifier uses them to separate calendar conflicts from plain
//! capacity shortages.
//!
//! # Time Model
//! All times are in minutes relative to the planning epoch.
//!
//! # Precedence
//! Blocked periods override time windows. A timestamp is available iff:
//! - It falls within at least one `time_windows` entry (or none are defined), AND
//! - It does NOT fall within any `blocked_periods` entry.

use serde::{Deserialize, Serialize};

/// A time interval [start, end).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    /// Interval start (minutes, inclusive).
    pub start: i64,
    /// Interval end (minutes, exclusive).
    pub end: i64,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Duration of this window (minutes).
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Length of the intersection with `other` (0 if disjoint).
    pub fn overlap_with(&self, other: &Self) -> i64 {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (end - start).max(0)
    }
}

/// Machine availability calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calendar {
    /// Calendar identifier.
    pub id: String,
    /// Periods when the machine is available. Empty = always available.
    #[serde(default)]
    pub time_windows: Vec<TimeWindow>,
    /// Periods when the machine is unavailable (overrides time_windows).
    #[serde(default)]
    pub blocked_periods: Vec<TimeWindow>,
}

impl Calendar {
    /// Creates an empty calendar (no constraints = always available).
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            time_windows: Vec::new(),
            blocked_periods: Vec::new(),
        }
    }

    /// Adds an availability window.
    pub fn with_window(mut self, start: i64, end: i64) -> Self {
        self.time_windows.push(TimeWindow::new(start, end));
        self
    }

    /// Adds a blocked period.
    pub fn with_blocked(mut self, start: i64, end: i64) -> Self {
        self.blocked_periods.push(TimeWindow::new(start, end));
        self
    }

    /// Blocked periods intersecting `[start, end)`.
    pub fn blocked_overlapping(&self, start: i64, end: i64) -> Vec<TimeWindow> {
        let range = TimeWindow::new(start, end);
        self.blocked_periods
            .iter()
            .filter(|bp| bp.overlaps(&range))
            .copied()
            .collect()
    }

    /// Computes total available time within a range [start, end).
    ///
    /// Blocked periods are assumed not to overlap each other.
    pub fn available_time_in_range(&self, start: i64, end: i64) -> i64 {
        if end <= start {
            return 0;
        }

        let range = TimeWindow::new(start, end);

        let blocked: i64 = self
            .blocked_periods
            .iter()
            .map(|bp| range.overlap_with(bp))
            .sum();

        if self.time_windows.is_empty() {
            return range.duration() - blocked;
        }

        // Blocked time outside every window was never available to begin with
        let available: i64 = self.time_windows.iter().map(|w| range.overlap_with(w)).sum();
        let blocked_in_windows: i64 = self
            .blocked_periods
            .iter()
            .flat_map(|bp| {
                self.time_windows.iter().map(move |w| {
                    let clipped = TimeWindow::new(w.start.max(start), w.end.min(end));
                    if clipped.duration() > 0 {
                        clipped.overlap_with(bp)
                    } else {
                        0
                    }
                })
            })
            .sum();

        (available - blocked_in_windows).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window() {
        let w = TimeWindow::new(100, 200);
        assert_eq!(w.duration(), 100);
    }

    #[test]
    fn test_time_window_overlap() {
        let a = TimeWindow::new(0, 100);
        let b = TimeWindow::new(50, 150);
        assert!(a.overlaps(&b));
        assert_eq!(a.overlap_with(&b), 50);

        let c = TimeWindow::new(100, 200);
        assert!(!a.overlaps(&c));
        assert_eq!(a.overlap_with(&c), 0);
    }

    #[test]
    fn test_calendar_with_shifts() {
        let cal = Calendar::new("shifts")
            .with_window(0, 480)
            .with_window(960, 1440);

        assert_eq!(cal.available_time_in_range(200, 300), 100);
        assert_eq!(cal.available_time_in_range(500, 900), 0);
        assert_eq!(cal.available_time_in_range(400, 1000), 120);
    }

    #[test]
    fn test_blocked_overrides_window() {
        let cal = Calendar::new("cal")
            .with_window(0, 1000)
            .with_blocked(500, 600);

        assert_eq!(cal.available_time_in_range(400, 500), 100);
        assert_eq!(cal.available_time_in_range(520, 580), 0);
        assert_eq!(cal.available_time_in_range(450, 700), 150);
    }

    #[test]
    fn test_available_time_in_range() {
        let cal = Calendar::new("cal")
            .with_window(0, 1000)
            .with_blocked(400, 600);

        assert_eq!(cal.available_time_in_range(0, 1000), 800);
        assert_eq!(cal.available_time_in_range(500, 700), 100);
    }

    #[test]
    fn test_blocked_outside_window_not_double_counted() {
        let cal = Calendar::new("cal")
            .with_window(0, 480)
            .with_blocked(600, 700);

        assert_eq!(cal.available_time_in_range(0, 1000), 480);
    }

    #[test]
    fn test_available_time_no_windows() {
        let cal = Calendar::new("cal").with_blocked(200, 300);
        assert_eq!(cal.available_time_in_range(0, 500), 400);
        assert_eq!(cal.blocked_overlapping(0, 250).len(), 1);
        assert!(cal.blocked_overlapping(300, 500).is_empty());
    }
}
