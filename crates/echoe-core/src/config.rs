//! Client configuration.
//!
//! `ClientConfig` is loaded from a JSON file by the front end and then
//! overridden from the environment. Values are normalized before use.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::ColorTag;
use crate::sync::RetryPolicy;
use crate::util::{is_http_url, normalize_text_option};

/// Environment variable overriding [`ClientConfig::api_base_url`].
pub const API_BASE_URL_ENV: &str = "ECHOE_API_BASE_URL";
/// Environment variable overriding [`ClientConfig::retry_delay_ms`].
pub const RETRY_DELAY_ENV: &str = "ECHOE_RETRY_DELAY_MS";

const DEFAULT_LIST_RETRY_ATTEMPTS: usize = 1;
const DEFAULT_RETRY_DELAY_MS: u64 = 120;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct ClientConfig {
    /// Remote entry store; a local store is used when unset.
    pub api_base_url: Option<String>,
    /// Extra attempts for a failed list query.
    pub list_retry_attempts: usize,
    pub retry_delay_ms: u64,
    /// Color applied to new entries when none is chosen.
    pub default_color_tag: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            list_retry_attempts: DEFAULT_LIST_RETRY_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            default_color_tag: None,
        }
    }
}

impl ClientConfig {
    /// Parse and normalize a JSON config payload.
    pub fn parse(payload: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(payload)?;
        config.normalized()
    }

    /// Trim optional values, validate the API URL and resolve palette names.
    pub fn normalized(mut self) -> Result<Self> {
        self.api_base_url = match normalize_text_option(self.api_base_url) {
            Some(url) if is_http_url(&url) => Some(url.trim_end_matches('/').to_string()),
            Some(_) => {
                return Err(Error::validation(
                    "api_base_url must include http:// or https://",
                ))
            }
            None => None,
        };

        self.default_color_tag = normalize_text_option(self.default_color_tag)
            .map(|choice| ColorTag::parse_choice(&choice).map(|tag| tag.as_str().to_string()))
            .transpose()?;

        Ok(self)
    }

    /// Apply environment overrides read through `lookup`.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = normalize_text_option(lookup(API_BASE_URL_ENV)) {
            self.api_base_url = Some(url);
        }

        if let Some(raw) = normalize_text_option(lookup(RETRY_DELAY_ENV)) {
            self.retry_delay_ms = raw.parse().map_err(|_| {
                Error::validation(format!(
                    "{RETRY_DELAY_ENV} must be a whole number of milliseconds"
                ))
            })?;
        }

        self.normalized()
    }

    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.list_retry_attempts,
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    pub fn default_color(&self) -> ColorTag {
        self.default_color_tag
            .as_deref()
            .map(ColorTag::new)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
        }
    }

    #[test]
    fn empty_payload_uses_defaults() {
        let config = ClientConfig::parse("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.retry_policy(), RetryPolicy::default());
        assert_eq!(config.default_color().as_str(), "#3b82f6");
    }

    #[test]
    fn parse_rejects_unknown_fields() {
        assert!(ClientConfig::parse(r#"{"api_url":"https://x"}"#).is_err());
    }

    #[test]
    fn parse_normalizes_values() {
        let config = ClientConfig::parse(
            r#"{
                "api_base_url": "  https://diary.example.com/  ",
                "retry_delay_ms": 0,
                "default_color_tag": "purple"
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.api_base_url.as_deref(),
            Some("https://diary.example.com")
        );
        assert_eq!(config.retry_policy().delay, Duration::ZERO);
        assert_eq!(config.default_color().as_str(), "#a855f7");
    }

    #[test]
    fn blank_values_are_dropped() {
        let config =
            ClientConfig::parse(r#"{"api_base_url":"  ","default_color_tag":""}"#).unwrap();
        assert_eq!(config.api_base_url, None);
        assert_eq!(config.default_color_tag, None);
    }

    #[test]
    fn parse_rejects_non_http_url() {
        let error = ClientConfig::parse(r#"{"api_base_url":"diary.example.com"}"#).unwrap_err();
        assert_eq!(
            error.to_string(),
            "api_base_url must include http:// or https://"
        );
    }

    #[test]
    fn env_overrides_file_values() {
        let config = ClientConfig::parse(r#"{"api_base_url":"https://file.example.com"}"#)
            .unwrap()
            .with_env_overrides(env(&[
                (API_BASE_URL_ENV, "https://env.example.com/"),
                (RETRY_DELAY_ENV, "500"),
            ]))
            .unwrap();

        assert_eq!(
            config.api_base_url.as_deref(),
            Some("https://env.example.com")
        );
        assert_eq!(config.retry_delay_ms, 500);
    }

    #[test]
    fn env_rejects_bad_retry_delay() {
        let error = ClientConfig::default()
            .with_env_overrides(env(&[(RETRY_DELAY_ENV, "soon")]))
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "ECHOE_RETRY_DELAY_MS must be a whole number of milliseconds"
        );
    }

    #[test]
    fn missing_env_keeps_config() {
        let config = ClientConfig::default()
            .with_env_overrides(env(&[]))
            .unwrap();
        assert_eq!(config, ClientConfig::default());
    }
}
