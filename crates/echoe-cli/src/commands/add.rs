use std::path::Path;

use echoe_core::attachment::SelectedFile;
use echoe_core::models::ColorTag;
use echoe_core::sync::EntryStore;
use echoe_core::EntryTimestamp;

use crate::commands::common::{open_session, print_notices, resolve_entry_text, Session};
use crate::config::load_config;
use crate::error::CliError;

pub async fn run_add(
    text_parts: &[String],
    color: Option<&str>,
    photo: Option<&Path>,
) -> Result<(), CliError> {
    let session = open_session(load_config()?).await?;
    let text = resolve_entry_text(text_parts)?;
    let photo = match photo {
        Some(path) => Some(SelectedFile::inspect(path).await?),
        None => None,
    };

    let timestamp = add_entry(&session, text, color, photo).await?;
    println!("{timestamp}");
    Ok(())
}

pub async fn add_entry<S: EntryStore>(
    session: &Session<S>,
    text: String,
    color: Option<&str>,
    photo: Option<SelectedFile>,
) -> Result<EntryTimestamp, CliError> {
    session.require_profile().await?;

    let mut editor = session.editor();
    editor.new_entry();
    editor.set_text(text);
    if let Some(color) = color {
        editor.set_color_tag(ColorTag::parse_choice(color)?);
    }
    if let Some(photo) = photo {
        editor.attach_photo(photo)?;
    }

    let result = editor.save().await;
    print_notices(editor.take_notices());
    Ok(result?)
}
