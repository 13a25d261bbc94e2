//! Entry identity: timestamp generation, display order and selection.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};

use crate::models::{DiaryEntry, EntryTimestamp};

/// Issues entry timestamps from the wall clock at nanosecond resolution.
///
/// Timestamps issued by one clock are strictly increasing, so two entries
/// created within the clock's resolution window still get distinct keys.
#[derive(Debug, Default)]
pub struct TimestampClock {
    last: AtomicI64,
}

impl TimestampClock {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    /// Next timestamp: the current time, or one past the previous issue.
    pub fn next(&self) -> EntryTimestamp {
        let now = chrono::Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);
        let mut previous = self.last.load(Ordering::Acquire);
        loop {
            let candidate = now.max(previous.saturating_add(1));
            match self.last.compare_exchange_weak(
                previous,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return EntryTimestamp::from_nanos(candidate),
                Err(actual) => previous = actual,
            }
        }
    }
}

/// Entries in display order (newest first), indexed by timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryList {
    entries: Vec<DiaryEntry>,
    index: HashMap<EntryTimestamp, usize>,
}

impl EntryList {
    /// Build a list from whatever the store returned.
    ///
    /// When the store returns the same timestamp twice, the first occurrence
    /// wins and later ones are dropped.
    pub fn from_entries(entries: impl IntoIterator<Item = DiaryEntry>) -> Self {
        let mut unique: Vec<DiaryEntry> = Vec::new();
        let mut seen = HashSet::new();

        for entry in entries {
            if !seen.insert(entry.timestamp) {
                tracing::warn!(
                    timestamp = %entry.timestamp,
                    "Dropping duplicate entry returned by store"
                );
                continue;
            }
            unique.push(entry);
        }

        unique.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let index = unique
            .iter()
            .enumerate()
            .map(|(position, entry)| (entry.timestamp, position))
            .collect();

        Self {
            entries: unique,
            index,
        }
    }

    #[must_use]
    pub fn get(&self, timestamp: EntryTimestamp) -> Option<&DiaryEntry> {
        self.index
            .get(&timestamp)
            .and_then(|&position| self.entries.get(position))
    }

    #[must_use]
    pub fn contains(&self, timestamp: EntryTimestamp) -> bool {
        self.index.contains_key(&timestamp)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiaryEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[DiaryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a EntryList {
    type Item = &'a DiaryEntry;
    type IntoIter = std::slice::Iter<'a, DiaryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// The entry a view points at, held by timestamp rather than by reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection(Option<EntryTimestamp>);

impl Selection {
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }

    #[must_use]
    pub const fn of(timestamp: EntryTimestamp) -> Self {
        Self(Some(timestamp))
    }

    #[must_use]
    pub const fn timestamp(self) -> Option<EntryTimestamp> {
        self.0
    }

    #[must_use]
    pub fn is_selected(self, timestamp: EntryTimestamp) -> bool {
        self.0 == Some(timestamp)
    }

    /// Resolve against a (possibly refreshed) list. An entry that is no
    /// longer listed resolves to `None`.
    #[must_use]
    pub fn resolve(self, entries: &EntryList) -> Option<&DiaryEntry> {
        self.0.and_then(|timestamp| entries.get(timestamp))
    }
}
