//! Payload → display: transient handles over in-memory image objects.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use base64::prelude::{Engine as _, BASE64_STANDARD};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{EntryTimestamp, Photo};

/// Scheme and authority of every handle URI.
pub const HANDLE_URI_PREFIX: &str = "blob:echoe/";

const MAX_INLINE_PREVIEW_BYTES: usize = 8 * 1024 * 1024;

/// Binary object tagged with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    bytes: Arc<[u8]>,
    mime_type: String,
}

impl Blob {
    #[must_use]
    pub fn new(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            bytes: Arc::from(bytes),
            mime_type: mime_type.into(),
        }
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Inline `data:` URI for renderers that cannot resolve handle URIs.
    pub fn data_uri(&self) -> Result<String> {
        if self.bytes.len() > MAX_INLINE_PREVIEW_BYTES {
            return Err(Error::validation("Attachment is too large for in-app preview."));
        }
        let encoded = BASE64_STANDARD.encode(&self.bytes);
        Ok(format!("data:{};base64,{encoded}", self.mime_type))
    }
}

/// In-memory object store behind handle URIs. Cheap to clone; clones share objects.
#[derive(Debug, Clone, Default)]
pub struct PhotoHandleRegistry {
    objects: Arc<Mutex<HashMap<Uuid, Blob>>>,
}

impl PhotoHandleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the photo's bytes and return the handle that owns them.
    pub fn create(&self, photo: &Photo) -> PhotoHandle {
        let id = Uuid::now_v7();
        let blob = Blob::new(&photo.bytes, photo.mime_type.as_str());
        self.objects().insert(id, blob);
        tracing::trace!(%id, mime_type = %photo.mime_type, "Created photo handle");
        PhotoHandle {
            id,
            uri: format!("{HANDLE_URI_PREFIX}{id}"),
            registry: self.clone(),
        }
    }

    /// Look up the object behind a handle URI while the handle is alive.
    #[must_use]
    pub fn resolve(&self, uri: &str) -> Option<Blob> {
        let id = uri.strip_prefix(HANDLE_URI_PREFIX)?.parse::<Uuid>().ok()?;
        self.objects().get(&id).cloned()
    }

    /// Number of handles that have not been released yet.
    #[must_use]
    pub fn live_handles(&self) -> usize {
        self.objects().len()
    }

    fn revoke(&self, id: Uuid) {
        if self.objects().remove(&id).is_some() {
            tracing::trace!(%id, "Released photo handle");
        }
    }

    fn objects(&self) -> MutexGuard<'_, HashMap<Uuid, Blob>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Exclusively owned display handle. Dropping it releases the object.
#[derive(Debug)]
pub struct PhotoHandle {
    id: Uuid,
    uri: String,
    registry: PhotoHandleRegistry,
}

impl PhotoHandle {
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    #[must_use]
    pub fn blob(&self) -> Option<Blob> {
        self.registry.resolve(&self.uri)
    }
}

impl Drop for PhotoHandle {
    fn drop(&mut self) {
        self.registry.revoke(self.id);
    }
}

/// The photo slot of one view.
///
/// Holds at most one live handle, keyed by the entry it was created for.
/// Showing a different entry replaces the handle and releases the old one;
/// dropping the view releases whatever it still holds.
#[derive(Debug)]
pub struct PhotoView {
    registry: PhotoHandleRegistry,
    current: Option<(EntryTimestamp, PhotoHandle)>,
}

impl PhotoView {
    #[must_use]
    pub const fn new(registry: PhotoHandleRegistry) -> Self {
        Self {
            registry,
            current: None,
        }
    }

    /// Show the photo of entry `key`. Entries without a photo get no handle.
    pub fn show(&mut self, key: EntryTimestamp, photo: Option<&Photo>) -> Option<&str> {
        let unchanged = photo.is_some()
            && self
                .current
                .as_ref()
                .is_some_and(|(current_key, _)| *current_key == key);

        if !unchanged {
            let next = photo.map(|photo| (key, self.registry.create(photo)));
            let previous = std::mem::replace(&mut self.current, next);
            drop(previous);
        }

        self.uri()
    }

    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        self.current.as_ref().map(|(_, handle)| handle.uri())
    }

    /// URI for `key` only, so a view never renders another entry's photo.
    #[must_use]
    pub fn uri_for(&self, key: EntryTimestamp) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|(current_key, _)| *current_key == key)
            .map(|(_, handle)| handle.uri())
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(bytes: &[u8]) -> Photo {
        Photo {
            bytes: bytes.to_vec(),
            mime_type: "image/png".to_string(),
            width: 1,
            height: 1,
        }
    }

    #[test]
    fn handle_resolves_until_dropped() {
        let registry = PhotoHandleRegistry::new();
        let handle = registry.create(&photo(b"abc"));
        let uri = handle.uri().to_string();

        assert!(uri.starts_with(HANDLE_URI_PREFIX));
        let blob = registry.resolve(&uri).unwrap();
        assert_eq!(blob.bytes(), b"abc");
        assert_eq!(blob.mime_type(), "image/png");
        assert_eq!(registry.live_handles(), 1);

        drop(handle);
        assert!(registry.resolve(&uri).is_none());
        assert_eq!(registry.live_handles(), 0);
    }

    #[test]
    fn handles_are_distinct_per_creation() {
        let registry = PhotoHandleRegistry::new();
        let photo = photo(b"abc");
        let first = registry.create(&photo);
        let second = registry.create(&photo);
        assert_ne!(first.uri(), second.uri());
        assert_eq!(registry.live_handles(), 2);
    }

    #[test]
    fn view_replaces_and_releases_previous_handle() {
        let registry = PhotoHandleRegistry::new();
        let mut view = PhotoView::new(registry.clone());

        let first = view
            .show(EntryTimestamp::from_nanos(1), Some(&photo(b"one")))
            .unwrap()
            .to_string();
        let second = view
            .show(EntryTimestamp::from_nanos(2), Some(&photo(b"two")))
            .unwrap()
            .to_string();

        assert_ne!(first, second);
        assert!(registry.resolve(&first).is_none());
        assert_eq!(registry.resolve(&second).unwrap().bytes(), b"two");
        assert_eq!(registry.live_handles(), 1);
    }

    #[test]
    fn view_keeps_handle_for_same_entry() {
        let registry = PhotoHandleRegistry::new();
        let mut view = PhotoView::new(registry.clone());
        let key = EntryTimestamp::from_nanos(1);

        let first = view.show(key, Some(&photo(b"one"))).unwrap().to_string();
        let again = view.show(key, Some(&photo(b"one"))).unwrap().to_string();

        assert_eq!(first, again);
        assert_eq!(registry.live_handles(), 1);
    }

    #[test]
    fn entry_without_photo_gets_no_handle() {
        let registry = PhotoHandleRegistry::new();
        let mut view = PhotoView::new(registry.clone());
        view.show(EntryTimestamp::from_nanos(1), Some(&photo(b"one")));

        assert!(view.show(EntryTimestamp::from_nanos(2), None).is_none());
        assert_eq!(registry.live_handles(), 0);
    }

    #[test]
    fn dropping_view_releases_handle() {
        let registry = PhotoHandleRegistry::new();
        {
            let mut view = PhotoView::new(registry.clone());
            view.show(EntryTimestamp::from_nanos(1), Some(&photo(b"one")));
            assert_eq!(registry.live_handles(), 1);
        }
        assert_eq!(registry.live_handles(), 0);
    }

    #[test]
    fn uri_for_other_entry_is_none() {
        let registry = PhotoHandleRegistry::new();
        let mut view = PhotoView::new(registry);
        view.show(EntryTimestamp::from_nanos(1), Some(&photo(b"one")));
        assert!(view.uri_for(EntryTimestamp::from_nanos(1)).is_some());
        assert!(view.uri_for(EntryTimestamp::from_nanos(2)).is_none());
    }

    #[test]
    fn data_uri_embeds_base64_payload() {
        let blob = Blob::new(b"abc", "image/webp");
        assert_eq!(blob.data_uri().unwrap(), "data:image/webp;base64,YWJj");
    }
}
