//! Photo attachment pipeline.
//!
//! Encoding turns a user-selected file into a [`Photo`](crate::models::Photo)
//! payload (validated type, raw bytes, decoded dimensions). Decoding turns a
//! stored payload back into a short-lived display handle that is released as
//! soon as its owner lets go of it.

mod encode;
mod handle;

pub use encode::{decode_dimensions, encode_photo, probe_dimensions, PhotoSource, SelectedFile};
pub use handle::{Blob, PhotoHandle, PhotoHandleRegistry, PhotoView, HANDLE_URI_PREFIX};

use crate::error::{Error, Result};

/// MIME types accepted for photo attachments.
pub const ALLOWED_PHOTO_MIME_TYPES: [&str; 4] =
    ["image/png", "image/jpeg", "image/jpg", "image/webp"];

/// Message shown when a selected file is not an accepted image type.
pub const INVALID_PHOTO_MESSAGE: &str = "Please select a valid image file (PNG, JPEG, or WebP)";

/// Resolve the MIME type of a selected file.
///
/// A declared type wins unless it is empty or the generic
/// `application/octet-stream`; otherwise the type is guessed from the file name.
pub fn infer_photo_mime_type(declared: Option<&str>, file_name: &str) -> Option<String> {
    if let Some(declared) = declared {
        let trimmed = declared.trim();
        if !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("application/octet-stream") {
            return Some(trimmed.to_string());
        }
    }

    mime_guess::from_path(file_name)
        .first_raw()
        .map(str::to_string)
}

/// Check a MIME type against [`ALLOWED_PHOTO_MIME_TYPES`].
///
/// Comparison ignores case and parameters; the normalized essence is returned.
pub fn validate_photo_mime_type(mime_type: Option<&str>) -> Result<String> {
    let essence = mime_type
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if ALLOWED_PHOTO_MIME_TYPES.contains(&essence.as_str()) {
        Ok(essence)
    } else {
        tracing::debug!(mime_type = ?mime_type, "Rejected photo attachment type");
        Err(Error::validation(INVALID_PHOTO_MESSAGE))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use image::{ImageBuffer, ImageFormat, Rgba};

    use super::PhotoSource;
    use crate::error::Result;

    /// In-memory file that counts how often its bytes were read.
    #[derive(Debug, Clone)]
    pub struct MemoryFile {
        pub name: String,
        pub mime_type: Option<String>,
        pub bytes: Vec<u8>,
        pub reads: Arc<AtomicUsize>,
    }

    impl MemoryFile {
        pub fn new(name: &str, mime_type: Option<&str>, bytes: Vec<u8>) -> Self {
            Self {
                name: name.to_string(),
                mime_type: mime_type.map(str::to_string),
                bytes,
                reads: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn png(name: &str, width: u32, height: u32) -> Self {
            Self::new(name, Some("image/png"), png_bytes(width, height))
        }

        pub fn read_count(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl PartialEq for MemoryFile {
        fn eq(&self, other: &Self) -> bool {
            self.name == other.name && self.mime_type == other.mime_type && self.bytes == other.bytes
        }
    }

    impl Eq for MemoryFile {}

    impl PhotoSource for MemoryFile {
        fn file_name(&self) -> &str {
            &self.name
        }

        fn declared_mime_type(&self) -> Option<&str> {
            self.mime_type.as_deref()
        }

        fn size_bytes(&self) -> Option<u64> {
            u64::try_from(self.bytes.len()).ok()
        }

        async fn read_bytes(&self) -> Result<Vec<u8>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.bytes.clone())
        }
    }

    pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_fn(width, height, |_x, _y| {
            Rgba([59, 130, 246, 255])
        });

        let mut cursor = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut cursor, ImageFormat::Png)
            .unwrap();
        cursor.into_inner()
    }
}
