//! Entry store kept in a JSON file per identity.

use std::io;
use std::path::{Path, PathBuf};

use echoe_core::auth::Identity;
use echoe_core::models::{ColorTag, DiaryEntry, EntryTimestamp, Photo, ProfileState, UserProfile};
use echoe_core::sync::EntryStore;
use echoe_core::util::sanitize_token;
use echoe_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

#[derive(Debug, Default, Serialize, Deserialize)]
struct DiaryFile {
    #[serde(default)]
    profile: Option<UserProfile>,
    #[serde(default)]
    entries: Vec<DiaryEntry>,
}

#[derive(Debug)]
pub struct FileEntryStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileEntryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store for `identity` inside `data_dir`.
    pub fn for_identity(data_dir: &Path, identity: &Identity) -> Self {
        let mut name = sanitize_token(identity.principal());
        if name.is_empty() {
            name = "default".to_string();
        }
        Self::new(data_dir.join(format!("{name}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<DiaryFile> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(DiaryFile::default()),
            Err(error) => Err(error.into()),
        }
    }

    async fn write(&self, file: &DiaryFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let serialized = serde_json::to_string_pretty(file)?;
        tokio::fs::write(&self.path, serialized).await?;
        Ok(())
    }

    async fn insert(&self, entry: DiaryEntry) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut file = self.read().await?;
        if file
            .entries
            .iter()
            .any(|existing| existing.timestamp == entry.timestamp)
        {
            return Err(Error::remote(format!(
                "An entry with timestamp {} already exists",
                entry.timestamp
            )));
        }
        file.entries.push(entry);
        self.write(&file).await
    }
}

impl EntryStore for FileEntryStore {
    async fn list_entries(&self) -> Result<Vec<DiaryEntry>> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.entries)
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
        let _guard = self.lock.lock().await;
        let mut file = self.read().await?;
        let before = file.entries.len();
        file.entries.retain(|entry| entry.timestamp != timestamp);
        if file.entries.len() == before {
            return Err(Error::remote(format!("No entry with timestamp {timestamp}")));
        }
        self.write(&file).await
    }

    async fn get_profile(&self) -> Result<ProfileState> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.profile.into())
    }

    async fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut file = self.read().await?;
        file.profile = Some(profile.clone());
        self.write(&file).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileEntryStore {
        FileEntryStore::for_identity(dir.path(), &Identity::new("Alex Doe").unwrap())
    }

    #[test]
    fn file_name_comes_from_principal() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(store_in(&dir).path(), dir.path().join("alex-doe.json"));

        let store = FileEntryStore::for_identity(dir.path(), &Identity::new("***").unwrap());
        assert_eq!(store.path(), dir.path().join("default.json"));
    }

    #[tokio::test]
    async fn missing_file_is_an_empty_diary() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.list_entries().await.unwrap().is_empty());
        assert_eq!(store.get_profile().await.unwrap(), ProfileState::Absent);
    }

    #[tokio::test]
    async fn entries_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let timestamp = EntryTimestamp::from_nanos(1_000);
        store_in(&dir)
            .add_entry("Hello", timestamp, &ColorTag::new("#ef4444"))
            .await
            .unwrap();

        let entries = store_in(&dir).list_entries().await.unwrap();

        assert_eq!(
            entries,
            vec![DiaryEntry::new(
                "Hello",
                ColorTag::new("#ef4444"),
                timestamp,
                None
            )]
        );
    }

    #[tokio::test]
    async fn duplicate_timestamp_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let timestamp = EntryTimestamp::from_nanos(5);
        store
            .add_entry("one", timestamp, &ColorTag::default())
            .await
            .unwrap();

        assert!(store
            .add_entry("two", timestamp, &ColorTag::default())
            .await
            .is_err());
        assert_eq!(store.list_entries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_unknown_entry_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let error = store
            .delete_entry(EntryTimestamp::from_nanos(9))
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "No entry with timestamp 9");
    }

    #[tokio::test]
    async fn photo_and_profile_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let photo = Photo {
            bytes: vec![1, 2, 3, 4],
            mime_type: "image/jpeg".to_string(),
            width: 2,
            height: 2,
        };
        let timestamp = EntryTimestamp::from_nanos(77);
        store
            .add_entry_with_photo("pic", timestamp, &photo, &ColorTag::default())
            .await
            .unwrap();
        store
            .save_profile(&UserProfile::new("Alex").unwrap())
            .await
            .unwrap();

        let reopened = store_in(&dir);
        assert_eq!(
            reopened.list_entries().await.unwrap()[0].photo,
            Some(photo)
        );
        assert_eq!(
            reopened.get_profile().await.unwrap(),
            ProfileState::Present(UserProfile::new("Alex").unwrap())
        );
    }
}
