//! In-process entry store.

use tokio::sync::Mutex;

use super::EntryStore;
use crate::error::{Error, Result};
use crate::models::{ColorTag, DiaryEntry, EntryTimestamp, Photo, ProfileState, UserProfile};

#[derive(Debug, Default)]
struct MemoryState {
    entries: Vec<DiaryEntry>,
    profile: Option<UserProfile>,
}

/// Entry store held in memory, for local sessions and tests.
///
/// Like the remote store it keeps timestamps unique and lists entries in
/// insertion order.
#[derive(Debug, Default)]
pub struct MemoryEntryStore {
    state: Mutex<MemoryState>,
}

impl MemoryEntryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing entries, as returned verbatim by `list_entries`.
    #[must_use]
    pub fn with_entries(entries: Vec<DiaryEntry>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                entries,
                profile: None,
            }),
        }
    }

    async fn insert(&self, entry: DiaryEntry) -> Result<()> {
        let mut state = self.state.lock().await;
        if state
            .entries
            .iter()
            .any(|existing| existing.timestamp == entry.timestamp)
        {
            return Err(Error::remote(format!(
                "An entry with timestamp {} already exists",
                entry.timestamp
            )));
        }
        state.entries.push(entry);
        Ok(())
    }
}

impl EntryStore for MemoryEntryStore {
    async fn list_entries(&self) -> Result<Vec<DiaryEntry>> {
        Ok(self.state.lock().await.entries.clone())
    }

    async fn add_entry(
        &self,
        text: &str,
        timestamp: EntryTimestamp,
        color_tag: &ColorTag,
    ) -> Result<()> {
        self.insert(DiaryEntry::new(text, color_tag.clone(), timestamp, None))
            .await
    }

    async fn add_entry_with_photo(
        &self,
        text: &str,
        timestamp: EntryTimestamp,
        photo: &Photo,
        color_tag: &ColorTag,
    ) -> Result<()> {
        self.insert(DiaryEntry::new(
            text,
            color_tag.clone(),
            timestamp,
            Some(photo.clone()),
        ))
        .await
    }

    async fn delete_entry(&self, timestamp: EntryTimestamp) -> Result<()> {
        self.state
            .lock()
            .await
            .entries
            .retain(|entry| entry.timestamp != timestamp);
        Ok(())
    }

    async fn get_profile(&self) -> Result<ProfileState> {
        Ok(self.state.lock().await.profile.clone().into())
    }

    async fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        self.state.lock().await.profile = Some(profile.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_rejects_duplicate_timestamp() {
        let store = MemoryEntryStore::new();
        let ts = EntryTimestamp::from_nanos(1);
        store.add_entry("a", ts, &ColorTag::default()).await.unwrap();

        let error = store
            .add_entry("b", ts, &ColorTag::default())
            .await
            .unwrap_err();
        assert!(error.to_string().contains("already exists"));
        assert_eq!(store.list_entries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_unknown_timestamp_is_noop() {
        let store = MemoryEntryStore::new();
        store.delete_entry(EntryTimestamp::from_nanos(9)).await.unwrap();
        assert!(store.list_entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn profile_starts_absent() {
        let store = MemoryEntryStore::new();
        assert_eq!(store.get_profile().await.unwrap(), ProfileState::Absent);

        let alex = UserProfile::new("Alex").unwrap();
        store.save_profile(&alex).await.unwrap();
        assert_eq!(
            store.get_profile().await.unwrap(),
            ProfileState::Present(alex)
        );
    }
}
