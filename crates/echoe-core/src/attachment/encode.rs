//! Selection → payload: read a chosen image file and capture its dimensions.

use std::future::Future;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::ImageReader;

use super::{infer_photo_mime_type, validate_photo_mime_type};
use crate::error::{Error, Result};
use crate::models::Photo;

/// A user-chosen file that may become a photo attachment.
pub trait PhotoSource {
    /// File name as shown to the user.
    fn file_name(&self) -> &str;

    /// MIME type reported by the picker, if any.
    fn declared_mime_type(&self) -> Option<&str>;

    /// File size, when known without reading the content.
    fn size_bytes(&self) -> Option<u64>;

    /// Read the full file content.
    fn read_bytes(&self) -> impl Future<Output = Result<Vec<u8>>> + Send;

    /// Effective MIME type: declared, or guessed from the file name.
    fn mime_type(&self) -> Option<String> {
        infer_photo_mime_type(self.declared_mime_type(), self.file_name())
    }
}

/// A file on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    path: PathBuf,
    file_name: String,
    mime_type: Option<String>,
    size_bytes: Option<u64>,
}

impl SelectedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            path,
            file_name,
            mime_type: None,
            size_bytes: None,
        }
    }

    /// Build a selection from file metadata without reading the content.
    pub async fn inspect(path: impl Into<PathBuf>) -> Result<Self> {
        let mut file = Self::new(path);
        let metadata = tokio::fs::metadata(&file.path).await?;
        file.size_bytes = Some(metadata.len());
        Ok(file)
    }

    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PhotoSource for SelectedFile {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn declared_mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    fn size_bytes(&self) -> Option<u64> {
        self.size_bytes
    }

    async fn read_bytes(&self) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(&self.path).await?)
    }
}

/// Turn a selected file into a photo payload.
///
/// The type is checked before anything is read. The bytes are kept exactly as
/// read; the image is only decoded far enough to learn its dimensions, and a
/// decode failure fails the whole operation.
pub async fn encode_photo<S: PhotoSource>(source: &S) -> Result<Photo> {
    let mime_type = validate_photo_mime_type(source.mime_type().as_deref())?;
    let bytes = source.read_bytes().await?;
    let (bytes, (width, height)) = decode_dimensions(bytes).await?;

    tracing::debug!(
        file_name = source.file_name(),
        mime_type = %mime_type,
        width,
        height,
        size_bytes = bytes.len(),
        "Encoded photo attachment"
    );

    Ok(Photo {
        bytes,
        mime_type,
        width,
        height,
    })
}

/// Decode image dimensions on the blocking pool, handing the buffer back.
pub async fn decode_dimensions(bytes: Vec<u8>) -> Result<(Vec<u8>, (u32, u32))> {
    let (bytes, dimensions) = tokio::task::spawn_blocking(move || {
        let dimensions = probe_dimensions(&bytes);
        (bytes, dimensions)
    })
    .await
    .map_err(|error| Error::Decode(format!("decode task failed: {error}")))?;

    Ok((bytes, dimensions?))
}

/// Read pixel dimensions from an encoded image.
pub fn probe_dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    if bytes.is_empty() {
        return Err(Error::Decode("image data is empty".to_string()));
    }

    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|error| Error::Decode(error.to_string()))?
        .into_dimensions()
        .map_err(|error| Error::Decode(error.to_string()))
}
