use echoe_core::sync::EntryStore;

use crate::commands::common::{
    entry_to_list_item, format_entry_line, open_session, EntryListItem, Session,
};
use crate::config::load_config;
use crate::error::CliError;

const EMPTY_DIARY_MESSAGE: &str = "No entries yet. Start writing your first entry!";

pub async fn run_list(as_json: bool) -> Result<(), CliError> {
    let session = open_session(load_config()?).await?;
    for line in list_output(&session, as_json).await? {
        println!("{line}");
    }
    Ok(())
}

pub async fn list_output<S: EntryStore>(
    session: &Session<S>,
    as_json: bool,
) -> Result<Vec<String>, CliError> {
    session.require_profile().await?;
    let entries = session.client.list().await?;

    if as_json {
        let items = entries
            .iter()
            .map(entry_to_list_item)
            .collect::<Vec<EntryListItem>>();
        return Ok(vec![serde_json::to_string_pretty(&items)?]);
    }

    if entries.is_empty() {
        return Ok(vec![EMPTY_DIARY_MESSAGE.to_string()]);
    }
    Ok(entries.iter().map(format_entry_line).collect())
}
