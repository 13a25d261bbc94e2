//! JSON-over-HTTP adapter for a remote entry store.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};

use super::EntryStore;
use crate::auth::Identity;
use crate::error::{Error, Result};
use crate::models::{ColorTag, DiaryEntry, EntryTimestamp, Photo, ProfileState, UserProfile};
use crate::util::{compact_text, is_http_url};

const ENTRIES_ROUTE: &str = "/v1/entries";
const PROFILE_ROUTE: &str = "/v1/profile";

/// Entry store reached over HTTP on behalf of one identity.
#[derive(Debug, Clone)]
pub struct HttpEntryStore {
    base_url: String,
    access_token: String,
    client: reqwest::Client,
}

impl HttpEntryStore {
    /// Builds a store client for an explicit API base URL.
    pub fn new(base_url: impl Into<String>, identity: &Identity) -> Result<Self> {
        let base_url = normalize_base_url(base_url.into().as_str())?;
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            base_url,
            access_token: identity.principal().to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, route: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{route}", self.base_url))
            .bearer_auth(&self.access_token)
            .header("Accept", "application/json")
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> Result<reqwest::Response> {
        let response = request.send().await?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), action, "Entry store request failed");
        Err(Error::remote(format!(
            "{action} failed: {}",
            parse_api_error(status, &body)
        )))
    }

    async fn post_entry(&self, body: &AddEntryRequest<'_>) -> Result<()> {
        let request = self.request(Method::POST, ENTRIES_ROUTE).json(body);
        self.send(request, "Add entry").await?;
        Ok(())
    }
}

impl EntryStore for HttpEntryStore {
    async fn list_entries(&self) -> Result<Vec<DiaryEntry>> {
        let response = self
            .send(self.request(Method::GET, ENTRIES_ROUTE), "List entries")
            .await?;
        let payload = response.json::<EntriesResponse>().await?;
        Ok(payload.entries)
    }

    async fn add_entry(
        &self,
        text: &str,
        timestamp: EntryTimestamp,
        color_tag: &ColorTag,
    ) -> Result<()> {
        self.post_entry(&AddEntryRequest {
            text,
            timestamp,
            color_tag,
            photo: None,
        })
        .await
    }

    async fn add_entry_with_photo(
        &self,
        text: &str,
        timestamp: EntryTimestamp,
        photo: &Photo,
        color_tag: &ColorTag,
    ) -> Result<()> {
        self.post_entry(&AddEntryRequest {
            text,
            timestamp,
            color_tag,
            photo: Some(photo),
        })
        .await
    }

    async fn delete_entry(&self, timestamp: EntryTimestamp) -> Result<()> {
        let route = entry_route(timestamp);
        self.send(self.request(Method::DELETE, &route), "Delete entry")
            .await?;
        Ok(())
    }

    async fn get_profile(&self) -> Result<ProfileState> {
        let response = self
            .send(self.request(Method::GET, PROFILE_ROUTE), "Load profile")
            .await?;
        let payload = response.json::<ProfileResponse>().await?;
        Ok(payload.profile.into())
    }

    async fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        let request = self.request(Method::PUT, PROFILE_ROUTE).json(profile);
        self.send(request, "Save profile").await?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddEntryRequest<'a> {
    text: &'a str,
    timestamp: EntryTimestamp,
    color_tag: &'a ColorTag,
    #[serde(skip_serializing_if = "Option::is_none")]
    photo: Option<&'a Photo>,
}

#[derive(Debug, Deserialize)]
struct EntriesResponse {
    #[serde(default)]
    entries: Vec<DiaryEntry>,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    #[serde(default)]
    profile: Option<UserProfile>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    message: Option<String>,
    error: Option<String>,
}

fn entry_route(timestamp: EntryTimestamp) -> String {
    format!("{ENTRIES_ROUTE}/{timestamp}")
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let base = raw.trim().trim_end_matches('/').to_string();
    if base.is_empty() {
        return Err(Error::validation("API base URL must not be empty"));
    }
    if !is_http_url(&base) {
        return Err(Error::validation(
            "API base URL must include http:// or https://",
        ));
    }
    Ok(base)
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorResponse>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", compact_text(&message), status.as_u16());
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalize_base_url_rejects_invalid_values() {
        assert!(normalize_base_url("").is_err());
        assert!(normalize_base_url("  ").is_err());
        assert!(normalize_base_url("diary.example.com").is_err());
    }

    #[test]
    fn normalize_base_url_trims_trailing_slash() {
        assert_eq!(
            normalize_base_url(" https://diary.example.com/ ").unwrap(),
            "https://diary.example.com"
        );
    }

    #[test]
    fn new_store_uses_identity_as_token() {
        let identity = Identity::new("alex").unwrap();
        let store = HttpEntryStore::new("http://localhost:8080/", &identity).unwrap();
        assert_eq!(store.base_url(), "http://localhost:8080");
        assert_eq!(store.access_token, "alex");
    }

    #[test]
    fn entry_route_uses_nanosecond_timestamp() {
        assert_eq!(
            entry_route(EntryTimestamp::from_nanos(1_767_625_620_000_000_000)),
            "/v1/entries/1767625620000000000"
        );
    }

    #[test]
    fn parse_api_error_prefers_message_field() {
        assert_eq!(
            parse_api_error(StatusCode::CONFLICT, r#"{"message":"Duplicate timestamp"}"#),
            "Duplicate timestamp (409)"
        );
        assert_eq!(
            parse_api_error(StatusCode::UNAUTHORIZED, r#"{"error":"unauthorized"}"#),
            "unauthorized (401)"
        );
    }

    #[test]
    fn parse_api_error_falls_back_to_body_or_status() {
        assert_eq!(
            parse_api_error(StatusCode::BAD_GATEWAY, "upstream down"),
            "upstream down (502)"
        );
        assert_eq!(parse_api_error(StatusCode::BAD_GATEWAY, "   "), "HTTP 502");
    }

    #[test]
    fn add_request_uses_camel_case_and_base64_photo() {
        let photo = Photo {
            bytes: vec![0x89, 0x50, 0x4E, 0x47],
            mime_type: "image/png".to_string(),
            width: 1,
            height: 1,
        };
        let color_tag = ColorTag::new("#22c55e");
        let body = AddEntryRequest {
            text: "Hi",
            timestamp: EntryTimestamp::from_nanos(42),
            color_tag: &color_tag,
            photo: Some(&photo),
        };

        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "text": "Hi",
                "timestamp": 42,
                "colorTag": "#22c55e",
                "photo": {
                    "bytes": "iVBORw==",
                    "mimeType": "image/png",
                    "width": 1,
                    "height": 1,
                },
            })
        );
    }

    #[test]
    fn text_only_request_omits_photo() {
        let color_tag = ColorTag::default();
        let body = AddEntryRequest {
            text: "Hi",
            timestamp: EntryTimestamp::from_nanos(1),
            color_tag: &color_tag,
            photo: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("photo").is_none());
    }

    #[test]
    fn profile_response_without_profile_is_absent() {
        let payload: ProfileResponse = serde_json::from_str(r#"{"profile":null}"#).unwrap();
        assert_eq!(ProfileState::from(payload.profile), ProfileState::Absent);
        let payload: ProfileResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(ProfileState::from(payload.profile), ProfileState::Absent);
    }
}
