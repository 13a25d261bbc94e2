use std::io;

use echoe_core::EntryTimestamp;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] echoe_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Not signed in. Run `echoe login <principal>` first.")]
    NotSignedIn,
    #[error("No profile yet. Run `echoe profile set <name>` first.")]
    ProfileMissing,
    #[error("Invalid entry timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("No entry with timestamp {0}")]
    EntryNotFound(EntryTimestamp),
}
