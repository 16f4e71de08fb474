//! Schedule (solution) model.
//!
//! A schedule is the list of order-to-machine placements produced by the
//! decision engine. Entries are read-only outside this crate: they can be
//! inspected and serialized, but only the engine creates them.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::Serialize;
use std::collections::BTreeMap;

/// One placed work order.
///
/// The interval `[start, end)` includes the changeover: the first
/// `setup_minutes` of it are setup, the rest is processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    order_id: String,
    machine_id: String,
    item_id: String,
    start: i64,
    end: i64,
    setup_minutes: i64,
    process_minutes: i64,
    due: i64,
    tardiness: i64,
    sequence: u64,
}

impl ScheduleEntry {
    /// Creates an entry; tardiness is derived from `end` and `due`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        order_id: impl Into<String>,
        machine_id: impl Into<String>,
        item_id: impl Into<String>,
        start: i64,
        setup_minutes: i64,
        process_minutes: i64,
        due: i64,
        sequence: u64,
    ) -> Self {
        let end = start + setup_minutes + process_minutes;
        Self {
            order_id: order_id.into(),
            machine_id: machine_id.into(),
            item_id: item_id.into(),
            start,
            end,
            setup_minutes,
            process_minutes,
            due,
            tardiness: (end - due).max(0),
            sequence,
        }
    }

    /// Scheduled order.
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// Assigned machine.
    pub fn machine_id(&self) -> &str {
        &self.machine_id
    }

    /// Item produced.
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// Start time (minutes).
    pub fn start(&self) -> i64 {
        self.start
    }

    /// End time (minutes).
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Changeover portion at the start of the entry (minutes).
    pub fn setup_minutes(&self) -> i64 {
        self.setup_minutes
    }

    /// Processing time excluding setup (minutes).
    pub fn process_minutes(&self) -> i64 {
        self.process_minutes
    }

    /// Due date of the order (minutes).
    pub fn due(&self) -> i64 {
        self.due
    }

    /// `max(0, end − due)` in minutes.
    pub fn tardiness(&self) -> i64 {
        self.tardiness
    }

    /// Engine step at which the entry was applied.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Total occupied time (end − start).
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }

    /// Whether the order finished after its due date.
    #[inline]
    pub fn is_late(&self) -> bool {
        self.tardiness > 0
    }
}

/// A complete or partial schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: ScheduleEntry) {
        self.entries.push(entry);
    }

    /// Entries in the order they were applied.
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Number of placed orders.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was placed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Makespan: latest end time across all entries (minutes).
    pub fn makespan(&self) -> i64 {
        self.entries.iter().map(|e| e.end).max().unwrap_or(0)
    }

    /// Sum of tardiness across all entries (minutes).
    pub fn total_tardiness(&self) -> i64 {
        self.entries.iter().map(|e| e.tardiness).sum()
    }

    /// Finds the entry for a given order.
    pub fn entry_for_order(&self, order_id: &str) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.order_id == order_id)
    }

    /// Entries on one machine, ordered by start time.
    pub fn entries_for_machine(&self, machine_id: &str) -> Vec<&ScheduleEntry> {
        let mut entries: Vec<&ScheduleEntry> = self
            .entries
            .iter()
            .filter(|e| e.machine_id == machine_id)
            .collect();
        entries.sort_by_key(|e| (e.start, e.sequence));
        entries
    }

    /// Entries grouped per machine and sorted by start: the export order.
    pub fn sorted_entries(&self) -> Vec<&ScheduleEntry> {
        let mut entries: Vec<&ScheduleEntry> = self.entries.iter().collect();
        entries.sort_by(|a, b| {
            a.machine_id
                .cmp(&b.machine_id)
                .then(a.start.cmp(&b.start))
                .then(a.sequence.cmp(&b.sequence))
        });
        entries
    }

    /// Busy time per machine (minutes), for machines with entries.
    pub fn busy_by_machine(&self) -> BTreeMap<String, i64> {
        let mut busy: BTreeMap<String, i64> = BTreeMap::new();
        for e in &self.entries {
            *busy.entry(e.machine_id.clone()).or_insert(0) += e.duration();
        }
        busy
    }

    /// Whether entries on every machine are pairwise non-overlapping.
    pub fn is_overlap_free(&self) -> bool {
        self.busy_by_machine().keys().all(|machine| {
            self.entries_for_machine(machine)
                .windows(2)
                .all(|pair| pair[0].end <= pair[1].start)
        })
    }
}
