use echoe_core::editor::EditorView;
use echoe_core::models::DateStyle;
use echoe_core::sync::EntryStore;
use echoe_core::util::format_file_size;
use echoe_core::EntryTimestamp;

use crate::commands::common::{open_session, parse_timestamp, Session};
use crate::config::load_config;
use crate::error::CliError;

pub async fn run_show(raw_timestamp: &str) -> Result<(), CliError> {
    let timestamp = parse_timestamp(raw_timestamp)?;
    let session = open_session(load_config()?).await?;
    println!("{}", render_entry(&session, timestamp).await?);
    Ok(())
}

pub async fn render_entry<S: EntryStore>(
    session: &Session<S>,
    timestamp: EntryTimestamp,
) -> Result<String, CliError> {
    session.require_profile().await?;
    let entries = session.client.list().await?;

    let mut editor = session.editor();
    editor.select(timestamp);
    editor.reconcile(&entries);

    let EditorView::Viewing { entry, .. } = editor.view(&entries) else {
        return Err(CliError::EntryNotFound(timestamp));
    };

    let color = entry
        .color_tag
        .palette_name()
        .map_or_else(|| entry.color_tag.as_str().to_string(), str::to_string);
    let mut lines = vec![
        entry.timestamp.format_date(DateStyle::Long),
        format!("Color: {color}"),
        String::new(),
        entry.text.clone(),
    ];
    if let Some(photo) = &entry.photo {
        lines.push(String::new());
        lines.push(format!(
            "Photo: {}, {}x{}, {}",
            photo.mime_type,
            photo.width,
            photo.height,
            format_file_size(u64::try_from(photo.size_bytes()).unwrap_or(u64::MAX))
        ));
    }
    Ok(lines.join("\n"))
}
