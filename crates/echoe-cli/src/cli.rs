use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "echoe")]
#[command(about = "A private diary for the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a new entry
    #[command(alias = "new")]
    Add {
        /// Entry text (read from stdin when omitted)
        text: Vec<String>,
        /// Color tag: a palette name or a hex value
        #[arg(short, long, value_name = "COLOR")]
        color: Option<String>,
        /// Attach a PNG, JPEG or WebP photo
        #[arg(short, long, value_name = "PATH")]
        photo: Option<PathBuf>,
    },
    /// List entries, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one entry
    Show {
        /// Entry timestamp as printed by `list`
        timestamp: String,
    },
    /// Delete an entry
    Delete {
        /// Entry timestamp as printed by `list`
        timestamp: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or set the profile name
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Sign in as a principal
    Login {
        principal: String,
    },
    /// Sign out and forget the stored identity
    Logout,
    /// List the color palette
    Palette,
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Print the current profile
    Show,
    /// Set the display name
    Set {
        /// Display name
        name: Vec<String>,
    },
}
