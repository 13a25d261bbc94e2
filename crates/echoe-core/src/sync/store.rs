//! Remote store contract.

use std::future::Future;

use crate::error::Result;
use crate::models::{ColorTag, DiaryEntry, EntryTimestamp, Photo, ProfileState, UserProfile};

/// Operations offered by the remote profile/entry store.
///
/// Every call acts on behalf of the identity the store was opened for.
pub trait EntryStore: Send + Sync {
    /// All entries of the caller, in no particular order.
    fn list_entries(&self) -> impl Future<Output = Result<Vec<DiaryEntry>>> + Send;

    /// Add a text-only entry.
    fn add_entry(
        &self,
        text: &str,
        timestamp: EntryTimestamp,
        color_tag: &ColorTag,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Add an entry carrying a photo.
    fn add_entry_with_photo(
        &self,
        text: &str,
        timestamp: EntryTimestamp,
        photo: &Photo,
        color_tag: &ColorTag,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Delete by identity. Unknown timestamps may succeed or fail.
    fn delete_entry(&self, timestamp: EntryTimestamp) -> impl Future<Output = Result<()>> + Send;

    fn get_profile(&self) -> impl Future<Output = Result<ProfileState>> + Send;

    fn save_profile(&self, profile: &UserProfile) -> impl Future<Output = Result<()>> + Send;
}
