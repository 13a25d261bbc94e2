//! Diary client: the list/add/delete operations behind every view.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::{CachedValue, EntryStore, QueryCache, QueryKey};
use crate::auth::Identity;
use crate::error::{Error, Result};
use crate::identity::{EntryList, TimestampClock};
use crate::models::{EntryTimestamp, NewEntry, ProfileState, UserProfile, EMPTY_ENTRY_MESSAGE};

const DEFAULT_RETRY_DELAY_MS: u64 = 120;

/// What the entry list looks like to a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Error(String),
    Success(Arc<EntryList>),
}

/// Retries applied to read queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure
    pub retries: usize,
    /// Delay before the first retry; later retries wait proportionally longer
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 1,
            delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

/// Client for the signed-in user's diary.
///
/// Reads are served from the shared [`QueryCache`]. Mutations call the store
/// and, once it has answered successfully, invalidate the affected query so
/// the next read refetches. Without a store or identity every operation
/// fails with [`Error::NotReady`].
#[derive(Debug)]
pub struct DiaryClient<S> {
    store: Option<Arc<S>>,
    identity: Option<Identity>,
    cache: Arc<QueryCache>,
    clock: Arc<TimestampClock>,
    retry: RetryPolicy,
}

impl<S> DiaryClient<S> {
    pub fn new(store: Option<Arc<S>>, identity: Option<Identity>, cache: Arc<QueryCache>) -> Self {
        Self {
            store,
            identity,
            cache,
            clock: Arc::new(TimestampClock::new()),
            retry: RetryPolicy::default(),
        }
    }

    pub fn connected(store: Arc<S>, identity: Identity, cache: Arc<QueryCache>) -> Self {
        Self::new(Some(store), Some(identity), cache)
    }

    #[must_use]
    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<TimestampClock>) -> Self {
        self.clock = clock;
        self
    }

    pub const fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub const fn is_ready(&self) -> bool {
        self.store.is_some() && self.identity.is_some()
    }

    /// Current list state without triggering a fetch.
    pub fn list_state(&self) -> ListState {
        let Some(identity) = &self.identity else {
            return ListState::Loading;
        };
        let snapshot = self.cache.snapshot(&QueryKey::entries(identity));
        if let Some(error) = snapshot.error {
            return ListState::Error(error);
        }
        match snapshot.value {
            Some(CachedValue::Entries(entries)) => ListState::Success(entries),
            _ => ListState::Loading,
        }
    }

    fn ready(&self) -> Result<(&S, &Identity)> {
        match (self.store.as_deref(), self.identity.as_ref()) {
            (Some(store), Some(identity)) => Ok((store, identity)),
            _ => Err(Error::not_ready("Entry store not available")),
        }
    }

    async fn with_retry<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0usize;

        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt >= self.retry.retries {
                        return Err(error);
                    }

                    attempt += 1;
                    let delay = self.retry.delay * u32::try_from(attempt).unwrap_or(1);
                    tracing::warn!(
                        operation,
                        attempt,
                        "Query failed, retrying in {}ms: {}",
                        delay.as_millis(),
                        error
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    async fn fetch<T, F, Fut>(
        &self,
        key: &QueryKey,
        load: F,
        cached: impl FnOnce(&T) -> CachedValue,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let ticket = self.cache.begin_fetch(key);
        let result = self.with_retry("fetch query", load).await;

        let outcome = match &result {
            Ok(value) => Ok(cached(value)),
            Err(error) => Err(error.to_string()),
        };
        if !self.cache.complete_fetch(ticket, outcome) {
            tracing::debug!(kind = ?key.kind, "Discarded result fetched before the latest invalidation");
        }
        result
    }
}

impl<S: EntryStore> DiaryClient<S> {
    /// Entries of the signed-in user, newest first.
    pub async fn list(&self) -> Result<Arc<EntryList>> {
        let (_, identity) = self.ready()?;
        let key = QueryKey::entries(identity);
        if let Some(CachedValue::Entries(entries)) = self.cache.fresh(&key) {
            return Ok(entries);
        }
        self.refetch().await
    }

    /// Fetch entries from the store regardless of cache freshness.
    pub async fn refetch(&self) -> Result<Arc<EntryList>> {
        let (store, identity) = self.ready()?;
        let key = QueryKey::entries(identity);
        tracing::debug!("Fetching diary entries");
        self.fetch(
            &key,
            move || async move {
                let entries = store.list_entries().await?;
                Ok(Arc::new(EntryList::from_entries(entries)))
            },
            |entries| CachedValue::Entries(Arc::clone(entries)),
        )
        .await
    }

    /// Add an entry, returning the timestamp it was stored under.
    ///
    /// The timestamp is generated here, at call time.
    pub async fn add(&self, entry: NewEntry) -> Result<EntryTimestamp> {
        let (store, identity) = self.ready()?;
        if entry.text.trim().is_empty() {
            return Err(Error::validation(EMPTY_ENTRY_MESSAGE));
        }

        let timestamp = self.clock.next();
        match &entry.photo {
            Some(photo) => {
                store
                    .add_entry_with_photo(&entry.text, timestamp, photo, &entry.color_tag)
                    .await?;
            }
            None => {
                store
                    .add_entry(&entry.text, timestamp, &entry.color_tag)
                    .await?;
            }
        }
        tracing::debug!(%timestamp, with_photo = entry.photo.is_some(), "Added diary entry");

        self.cache.invalidate(&QueryKey::entries(identity));
        Ok(timestamp)
    }

    pub async fn delete(&self, timestamp: EntryTimestamp) -> Result<()> {
        let (store, identity) = self.ready()?;
        store.delete_entry(timestamp).await?;
        tracing::debug!(%timestamp, "Deleted diary entry");

        self.cache.invalidate(&QueryKey::entries(identity));
        Ok(())
    }

    pub async fn profile(&self) -> Result<ProfileState> {
        let (store, identity) = self.ready()?;
        let key = QueryKey::profile(identity);
        if let Some(CachedValue::Profile(profile)) = self.cache.fresh(&key) {
            return Ok(profile);
        }
        self.fetch(
            &key,
            move || store.get_profile(),
            |profile| CachedValue::Profile(profile.clone()),
        )
        .await
    }

    pub async fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        let (store, identity) = self.ready()?;
        store.save_profile(profile).await?;
        self.cache.invalidate(&QueryKey::profile(identity));
        Ok(())
    }
}
