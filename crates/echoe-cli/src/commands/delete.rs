use echoe_core::editor::{Confirm, DeleteOutcome};
use echoe_core::sync::EntryStore;
use echoe_core::EntryTimestamp;

use crate::commands::common::{open_session, parse_timestamp, print_notices, prompt_confirm, Session};
use crate::config::load_config;
use crate::error::CliError;

pub async fn run_delete(raw_timestamp: &str, skip_confirm: bool) -> Result<(), CliError> {
    let timestamp = parse_timestamp(raw_timestamp)?;
    let session = open_session(load_config()?).await?;
    let confirm: fn(&str) -> bool = if skip_confirm { |_| true } else { prompt_confirm };

    match delete_entry(&session, timestamp, &confirm).await? {
        DeleteOutcome::Deleted => println!("{timestamp}"),
        DeleteOutcome::Declined => eprintln!("Cancelled"),
    }
    Ok(())
}

pub async fn delete_entry<S: EntryStore>(
    session: &Session<S>,
    timestamp: EntryTimestamp,
    confirm: &impl Confirm,
) -> Result<DeleteOutcome, CliError> {
    session.require_profile().await?;
    let entries = session.client.list().await?;

    let mut editor = session.editor();
    editor.select(timestamp);
    editor.reconcile(&entries);
    if !editor.selection().is_selected(timestamp) {
        return Err(CliError::EntryNotFound(timestamp));
    }

    let result = editor.delete(confirm).await;
    print_notices(editor.take_notices());
    Ok(result?)
}
