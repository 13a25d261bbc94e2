use crate::commands::common::auth_gate;
use crate::error::CliError;

pub async fn run_login(principal: &str) -> Result<(), CliError> {
    let mut gate = auth_gate();
    let identity = gate.sign_in(principal).await?;
    println!("Signed in as {}", identity.principal());
    Ok(())
}

pub async fn run_logout() -> Result<(), CliError> {
    let mut gate = auth_gate();
    if gate.restore().await?.is_none() {
        println!("Not signed in");
        return Ok(());
    }
    gate.sign_out().await?;
    println!("Signed out");
    Ok(())
}
