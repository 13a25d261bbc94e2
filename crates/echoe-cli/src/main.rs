//! Echoe CLI - a private diary from the command line

mod auth;
mod cli;
mod commands;
mod config;
mod error;
mod local_store;
mod store;


use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::auth_cmd::{run_login, run_logout};
use crate::commands::delete::run_delete;
use crate::commands::list::run_list;
use crate::commands::palette::run_palette;
use crate::commands::profile::run_profile;
use crate::commands::show::run_show;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("echoe=info".parse().map_err(|error| {
                    CliError::Config(format!("Invalid log directive: {error}"))
                })?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Add { text, color, photo } => {
            run_add(&text, color.as_deref(), photo.as_deref()).await?;
        }
        Commands::List { json } => run_list(json).await?,
        Commands::Show { timestamp } => run_show(&timestamp).await?,
        Commands::Delete { timestamp, yes } => run_delete(&timestamp, yes).await?,
        Commands::Profile { command } => run_profile(command).await?,
        Commands::Login { principal } => run_login(&principal).await?,
        Commands::Logout => run_logout().await?,
        Commands::Palette => run_palette(),
    }

    Ok(())
}
