use echoe_core::models::{ProfileState, UserProfile};
use echoe_core::sync::EntryStore;

use crate::cli::ProfileCommands;
use crate::commands::common::{open_session, Session};
use crate::config::load_config;
use crate::error::CliError;

pub async fn run_profile(command: ProfileCommands) -> Result<(), CliError> {
    let session = open_session(load_config()?).await?;
    match command {
        ProfileCommands::Show => match session.client.profile().await? {
            ProfileState::Present(profile) => println!("{}", profile.name),
            ProfileState::Absent => eprintln!("No profile yet"),
        },
        ProfileCommands::Set { name } => {
            let profile = set_profile(&session, &name.join(" ")).await?;
            println!("Profile saved: {}", profile.name);
        }
    }
    Ok(())
}

pub async fn set_profile<S: EntryStore>(
    session: &Session<S>,
    name: &str,
) -> Result<UserProfile, CliError> {
    let profile = UserProfile::new(name)?;
    session.client.save_profile(&profile).await?;
    Ok(profile)
}
