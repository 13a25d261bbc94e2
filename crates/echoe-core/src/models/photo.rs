//! Photo attachment model

use std::fmt;

use serde::{Deserialize, Serialize};

/// An image attached to an entry.
///
/// `bytes` holds the file exactly as selected; it is never re-encoded on the
/// client. `width`/`height` are informational, captured by decoding the image
/// before upload.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    #[serde(with = "base64_bytes")]
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
}

impl Photo {
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

impl fmt::Debug for Photo {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Photo")
            .field("bytes", &format_args!("[{} bytes]", self.bytes.len()))
            .field("mime_type", &self.mime_type)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

mod base64_bytes {
    use base64::prelude::{Engine as _, BASE64_STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64_STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64_STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Photo {
        Photo {
            bytes: vec![0x89, b'P', b'N', b'G'],
            mime_type: "image/png".to_string(),
            width: 4,
            height: 3,
        }
    }

    #[test]
    fn photo_bytes_travel_as_base64() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["bytes"], "iVBORw==");
        assert_eq!(json["mimeType"], "image/png");

        let parsed: Photo = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn photo_rejects_malformed_base64() {
        let result = serde_json::from_str::<Photo>(
            r#"{"bytes":"***","mimeType":"image/png","width":1,"height":1}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn debug_does_not_dump_payload() {
        let debug = format!("{:?}", sample());
        assert!(debug.contains("[4 bytes]"));
    }
}
