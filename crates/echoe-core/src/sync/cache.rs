//! Process-wide query cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::auth::Identity;
use crate::identity::EntryList;
use crate::models::ProfileState;

/// What a cached query holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Entries,
    Profile,
}

/// Cache key: whose data, and which query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub principal: String,
    pub kind: QueryKind,
}

impl QueryKey {
    #[must_use]
    pub fn new(identity: &Identity, kind: QueryKind) -> Self {
        Self {
            principal: identity.principal().to_string(),
            kind,
        }
    }

    #[must_use]
    pub fn entries(identity: &Identity) -> Self {
        Self::new(identity, QueryKind::Entries)
    }

    #[must_use]
    pub fn profile(identity: &Identity) -> Self {
        Self::new(identity, QueryKind::Profile)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedValue {
    Entries(Arc<EntryList>),
    Profile(ProfileState),
}

#[derive(Debug, Default)]
struct Slot {
    value: Option<CachedValue>,
    error: Option<String>,
    stale: bool,
    in_flight: usize,
    generation: u64,
}

/// Proof that a fetch was started, tied to the generation it started in.
#[derive(Debug)]
#[must_use = "a fetch must be completed with QueryCache::complete_fetch"]
pub struct FetchTicket {
    key: QueryKey,
    generation: u64,
}

/// Snapshot of one query for presentation code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuerySnapshot {
    pub value: Option<CachedValue>,
    pub error: Option<String>,
    pub stale: bool,
    pub fetching: bool,
}

/// Read-through cache shared by every consumer of a query.
///
/// Writes happen only through fetch completion, invalidation and clearing.
/// Each invalidation bumps the slot generation; a fetch that started before
/// the latest invalidation is not written back, so a slow response can never
/// overwrite fresher data.
#[derive(Debug, Default)]
pub struct QueryCache {
    slots: Mutex<HashMap<QueryKey, Slot>>,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value if present and not invalidated since it was fetched.
    #[must_use]
    pub fn fresh(&self, key: &QueryKey) -> Option<CachedValue> {
        self.slots()
            .get(key)
            .filter(|slot| !slot.stale)
            .and_then(|slot| slot.value.clone())
    }

    #[must_use]
    pub fn snapshot(&self, key: &QueryKey) -> QuerySnapshot {
        self.slots()
            .get(key)
            .map(|slot| QuerySnapshot {
                value: slot.value.clone(),
                error: slot.error.clone(),
                stale: slot.stale,
                fetching: slot.in_flight > 0,
            })
            .unwrap_or_default()
    }

    pub fn begin_fetch(&self, key: &QueryKey) -> FetchTicket {
        let mut slots = self.slots();
        let slot = slots.entry(key.clone()).or_default();
        slot.in_flight += 1;
        FetchTicket {
            key: key.clone(),
            generation: slot.generation,
        }
    }

    /// Record a fetch result. Returns whether the result was written back.
    pub fn complete_fetch(
        &self,
        ticket: FetchTicket,
        result: Result<CachedValue, String>,
    ) -> bool {
        let mut slots = self.slots();
        let slot = slots.entry(ticket.key).or_default();
        slot.in_flight = slot.in_flight.saturating_sub(1);

        if slot.generation != ticket.generation {
            return false;
        }

        match result {
            Ok(value) => {
                slot.value = Some(value);
                slot.error = None;
                slot.stale = false;
            }
            Err(message) => {
                slot.error = Some(message);
            }
        }
        true
    }

    /// Mark a query stale so the next read refetches it.
    pub fn invalidate(&self, key: &QueryKey) {
        tracing::debug!(principal = %key.principal, kind = ?key.kind, "Invalidating query");
        let mut slots = self.slots();
        let slot = slots.entry(key.clone()).or_default();
        slot.generation += 1;
        slot.stale = true;
    }

    /// Drop every cached query, e.g. on sign-out.
    pub fn clear(&self) {
        let mut slots = self.slots();
        for slot in slots.values_mut() {
            slot.value = None;
            slot.error = None;
            slot.stale = true;
            slot.generation += 1;
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<QueryKey, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColorTag, DiaryEntry, EntryTimestamp};

    fn key() -> QueryKey {
        QueryKey::entries(&Identity::new("alex").unwrap())
    }

    fn list(texts: &[&str]) -> CachedValue {
        let entries = texts.iter().enumerate().map(|(i, text)| {
            DiaryEntry::new(
                *text,
                ColorTag::default(),
                EntryTimestamp::from_nanos(i64::try_from(i).unwrap() + 1),
                None,
            )
        });
        CachedValue::Entries(Arc::new(EntryList::from_entries(entries)))
    }

    #[test]
    fn completed_fetch_is_fresh_until_invalidated() {
        let cache = QueryCache::new();
        let ticket = cache.begin_fetch(&key());
        assert!(cache.snapshot(&key()).fetching);
        assert!(cache.complete_fetch(ticket, Ok(list(&["a"]))));

        assert_eq!(cache.fresh(&key()), Some(list(&["a"])));
        cache.invalidate(&key());
        assert_eq!(cache.fresh(&key()), None);

        let snapshot = cache.snapshot(&key());
        assert!(snapshot.stale);
        assert_eq!(snapshot.value, Some(list(&["a"])));
    }

    #[test]
    fn fetch_started_before_invalidation_is_discarded() {
        let cache = QueryCache::new();
        let slow = cache.begin_fetch(&key());
        cache.invalidate(&key());
        let fast = cache.begin_fetch(&key());

        assert!(cache.complete_fetch(fast, Ok(list(&["a", "b"]))));
        assert!(!cache.complete_fetch(slow, Ok(list(&["a"]))));

        assert_eq!(cache.fresh(&key()), Some(list(&["a", "b"])));
        assert!(!cache.snapshot(&key()).fetching);
    }

    #[test]
    fn failed_fetch_keeps_previous_value() {
        let cache = QueryCache::new();
        let ticket = cache.begin_fetch(&key());
        cache.complete_fetch(ticket, Ok(list(&["a"])));
        cache.invalidate(&key());

        let ticket = cache.begin_fetch(&key());
        cache.complete_fetch(ticket, Err("offline".to_string()));

        let snapshot = cache.snapshot(&key());
        assert_eq!(snapshot.error.as_deref(), Some("offline"));
        assert_eq!(snapshot.value, Some(list(&["a"])));
    }

    #[test]
    fn keys_are_scoped_per_identity() {
        let cache = QueryCache::new();
        let other = QueryKey::entries(&Identity::new("sam").unwrap());
        let ticket = cache.begin_fetch(&key());
        cache.complete_fetch(ticket, Ok(list(&["a"])));

        assert!(cache.fresh(&other).is_none());
    }

    #[test]
    fn clear_drops_all_values() {
        let cache = QueryCache::new();
        let ticket = cache.begin_fetch(&key());
        cache.complete_fetch(ticket, Ok(list(&["a"])));

        cache.clear();

        assert_eq!(cache.snapshot(&key()).value, None);
        assert!(cache.fresh(&key()).is_none());
    }
}
