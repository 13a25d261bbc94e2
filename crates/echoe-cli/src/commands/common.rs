use std::io::{self, IsTerminal, Read, Write};
use std::sync::Arc;

use echoe_core::attachment::PhotoHandleRegistry;
use echoe_core::auth::{AuthGate, Identity};
use echoe_core::config::ClientConfig;
use echoe_core::editor::{DiaryEditor, Notice, NoticeLevel};
use echoe_core::models::{DateStyle, DiaryEntry, UserProfile};
use echoe_core::route::{resolve_route, AppRoute};
use echoe_core::sync::{DiaryClient, EntryStore, QueryCache, QueryKey};
use echoe_core::{EntryTimestamp, Error};
use serde::Serialize;

use crate::auth::KeyringIdentityProvider;
use crate::config::data_dir;
use crate::error::CliError;
use crate::store::CliStore;

/// A signed-in client ready to talk to its store.
pub struct Session<S> {
    pub identity: Identity,
    pub client: Arc<DiaryClient<S>>,
    pub config: ClientConfig,
}

impl<S: EntryStore> Session<S> {
    pub fn new(identity: Identity, store: S, config: ClientConfig) -> Self {
        let cache = Arc::new(QueryCache::new());
        let client = DiaryClient::connected(Arc::new(store), identity.clone(), cache)
            .with_retry_policy(config.retry_policy());
        Self {
            identity,
            client: Arc::new(client),
            config,
        }
    }

    pub fn editor(&self) -> DiaryEditor<S> {
        DiaryEditor::new(Arc::clone(&self.client), PhotoHandleRegistry::new())
            .with_default_color(self.config.default_color())
    }

    /// Route through the profile gate; only a user with a profile reaches the diary.
    pub async fn require_profile(&self) -> Result<UserProfile, CliError> {
        self.client.profile().await?;
        let snapshot = self
            .client
            .cache()
            .snapshot(&QueryKey::profile(&self.identity));

        match resolve_route(false, Some(&self.identity), &snapshot) {
            AppRoute::Diary(profile) => Ok(profile),
            AppRoute::ProfileSetup => Err(CliError::ProfileMissing),
            AppRoute::Locked => Err(CliError::NotSignedIn),
            AppRoute::Initializing | AppRoute::LoadingProfile => {
                Err(Error::not_ready("Profile could not be loaded").into())
            }
        }
    }
}

pub fn auth_gate() -> AuthGate<KeyringIdentityProvider> {
    AuthGate::new(
        KeyringIdentityProvider::default(),
        Arc::new(QueryCache::new()),
    )
}

pub async fn open_session(config: ClientConfig) -> Result<Session<CliStore>, CliError> {
    let mut gate = auth_gate();
    let identity = gate.restore().await?.cloned().ok_or(CliError::NotSignedIn)?;
    let store = CliStore::open(&config, &identity, &data_dir())?;
    Ok(Session::new(identity, store, config))
}

pub fn parse_timestamp(raw: &str) -> Result<EntryTimestamp, CliError> {
    raw.trim()
        .parse::<EntryTimestamp>()
        .map_err(|_| CliError::InvalidTimestamp(raw.to_string()))
}

/// Entry text from arguments, falling back to piped stdin.
pub fn resolve_entry_text(parts: &[String]) -> Result<String, CliError> {
    let text = parts.join(" ");
    if !text.trim().is_empty() {
        return Ok(text);
    }
    Ok(read_piped_stdin()?.unwrap_or_default())
}

fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut input = String::new();
    stdin.lock().read_to_string(&mut input)?;
    Ok(Some(input.trim_end().to_string()))
}

/// Ask a yes/no question on the terminal; anything but `y`/`yes` declines.
pub fn prompt_confirm(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    is_affirmative(&answer)
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Success notices go to stderr; errors are reported through the returned error.
pub fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        if notice.level == NoticeLevel::Success {
            eprintln!("{}", notice.message);
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EntryListItem {
    pub timestamp: EntryTimestamp,
    pub date: String,
    pub color_tag: String,
    pub preview: String,
    pub text: String,
    pub has_photo: bool,
}

pub fn entry_to_list_item(entry: &DiaryEntry) -> EntryListItem {
    EntryListItem {
        timestamp: entry.timestamp,
        date: entry.timestamp.format_date(DateStyle::Short),
        color_tag: entry.color_tag.as_str().to_string(),
        preview: entry.preview().to_string(),
        text: entry.text.clone(),
        has_photo: entry.has_photo(),
    }
}

pub fn format_entry_line(entry: &DiaryEntry) -> String {
    let color = match entry.color_tag.palette_name() {
        Some(name) => name,
        None => entry.color_tag.as_str(),
    };
    let photo = if entry.has_photo() { " [photo]" } else { "" };
    format!(
        "{}  {}  [{}] {}{}",
        entry.timestamp,
        entry.timestamp.format_date(DateStyle::Short),
        color,
        entry_preview(entry, 48),
        photo
    )
}

pub fn entry_preview(entry: &DiaryEntry, max_chars: usize) -> String {
    let preview = entry.preview();
    if preview.chars().count() <= max_chars {
        return preview.to_string();
    }
    let truncated: String = preview.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", truncated.trim_end())
}
