//! The store a CLI session talks to.

use std::path::Path;

use echoe_core::auth::Identity;
use echoe_core::config::ClientConfig;
use echoe_core::models::{ColorTag, DiaryEntry, EntryTimestamp, Photo, ProfileState, UserProfile};
use echoe_core::sync::{EntryStore, HttpEntryStore};
use echoe_core::Result;

use crate::local_store::FileEntryStore;

#[derive(Debug)]
pub enum CliStore {
    Remote(HttpEntryStore),
    Local(FileEntryStore),
}

impl CliStore {
    /// Remote store when an API base URL is configured, local file otherwise.
    pub fn open(config: &ClientConfig, identity: &Identity, data_dir: &Path) -> Result<Self> {
        match config.api_base_url.as_deref() {
            Some(base_url) => {
                tracing::debug!(%base_url, "Using remote entry store");
                Ok(Self::Remote(HttpEntryStore::new(base_url, identity)?))
            }
            None => {
                let store = FileEntryStore::for_identity(data_dir, identity);
                tracing::debug!(path = %store.path().display(), "Using local entry store");
                Ok(Self::Local(store))
            }
        }
    }
}

impl EntryStore for CliStore {
    async fn list_entries(&self) -> Result<Vec<DiaryEntry>> {
        match self {
            Self::Remote(store) => store.list_entries().await,
            Self::Local(store) => store.list_entries().await,
        }
    }

    async fn add_entry(
        &self,
        text: &str,
        timestamp: EntryTimestamp,
        color_tag: &ColorTag,
    ) -> Result<()> {
        match self {
            Self::Remote(store) => store.add_entry(text, timestamp, color_tag).await,
            Self::Local(store) => store.add_entry(text, timestamp, color_tag).await,
        }
    }

    async fn add_entry_with_photo(
        &self,
        text: &str,
        timestamp: EntryTimestamp,
        photo: &Photo,
        color_tag: &ColorTag,
    ) -> Result<()> {
        match self {
            Self::Remote(store) => {
                store
                    .add_entry_with_photo(text, timestamp, photo, color_tag)
                    .await
            }
            Self::Local(store) => {
                store
                    .add_entry_with_photo(text, timestamp, photo, color_tag)
                    .await
            }
        }
    }

    async fn delete_entry(&self, timestamp: EntryTimestamp) -> Result<()> {
        match self {
            Self::Remote(store) => store.delete_entry(timestamp).await,
            Self::Local(store) => store.delete_entry(timestamp).await,
        }
    }

    async fn get_profile(&self) -> Result<ProfileState> {
        match self {
            Self::Remote(store) => store.get_profile().await,
            Self::Local(store) => store.get_profile().await,
        }
    }

    async fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        match self {
            Self::Remote(store) => store.save_profile(profile).await,
            Self::Local(store) => store.save_profile(profile).await,
        }
    }
}
