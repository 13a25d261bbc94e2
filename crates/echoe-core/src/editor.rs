//! Editor state machine for the diary screen.
//!
//! The editor is either empty (welcome screen), creating a new entry, or
//! viewing an existing one. Viewing never becomes editable. Save and delete
//! are split into prepare, execute and finish steps so a front end can keep
//! handling events while the remote call runs; a completion that arrives
//! after the editor moved on only queues its notice.

use std::sync::Arc;

use crate::attachment::{
    encode_photo, validate_photo_mime_type, PhotoHandleRegistry, PhotoSource, PhotoView,
    SelectedFile, INVALID_PHOTO_MESSAGE,
};
use crate::error::{Error, Result};
use crate::identity::{EntryList, Selection};
use crate::models::{ColorTag, DiaryEntry, EntryTimestamp, NewEntry, EMPTY_ENTRY_MESSAGE};
use crate::sync::{DiaryClient, EntryStore, Mutation, MutationState};

pub const ENTRY_SAVED_MESSAGE: &str = "Entry saved successfully";
pub const ENTRY_DELETED_MESSAGE: &str = "Entry deleted successfully";
pub const DELETE_PROMPT: &str =
    "Are you sure you want to delete this entry? This action cannot be undone.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient message for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Unsaved input of the entry being created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft<P> {
    pub text: String,
    pub color_tag: ColorTag,
    pub photo: Option<P>,
}

impl<P> Draft<P> {
    const fn new(color_tag: ColorTag) -> Self {
        Self {
            text: String::new(),
            color_tag,
            photo: None,
        }
    }

    /// Whether the save control should be enabled.
    pub fn can_save(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState<P> {
    Empty,
    Creating(Draft<P>),
    Viewing(EntryTimestamp),
}

/// Blocking yes/no question asked before a delete.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Declined,
    Deleted,
}

/// What the editor pane should render.
#[derive(Debug)]
pub enum EditorView<'a, P> {
    Welcome,
    Creating {
        draft: &'a Draft<P>,
        saving: bool,
    },
    Viewing {
        entry: &'a DiaryEntry,
        photo_uri: Option<&'a str>,
        deleting: bool,
    },
}

/// A save that has been validated and marked pending.
#[derive(Debug)]
#[must_use = "a prepared save does nothing until executed"]
pub struct PendingSave<S, P> {
    client: Arc<DiaryClient<S>>,
    mutation: Mutation,
    generation: u64,
    text: String,
    color_tag: ColorTag,
    photo: Option<P>,
}

impl<S: EntryStore, P: PhotoSource> PendingSave<S, P> {
    /// Encode the photo, if any, and add the entry.
    pub async fn execute(self) -> SaveCompletion {
        let Self {
            client,
            mutation,
            generation,
            text,
            color_tag,
            photo,
        } = self;

        let result = async {
            let mut entry = NewEntry::new(text, color_tag);
            if let Some(source) = &photo {
                entry = entry.with_photo(encode_photo(source).await?);
            }
            client.add(entry).await
        }
        .await;

        mutation.finish(&result);
        SaveCompletion { generation, result }
    }
}

#[derive(Debug)]
pub struct SaveCompletion {
    generation: u64,
    result: Result<EntryTimestamp>,
}

/// A confirmed delete that has been marked pending.
#[derive(Debug)]
#[must_use = "a prepared delete does nothing until executed"]
pub struct PendingDelete<S> {
    client: Arc<DiaryClient<S>>,
    mutation: Mutation,
    generation: u64,
    timestamp: EntryTimestamp,
}

impl<S: EntryStore> PendingDelete<S> {
    pub async fn execute(self) -> DeleteCompletion {
        let result = self.client.delete(self.timestamp).await;
        self.mutation.finish(&result);
        DeleteCompletion {
            generation: self.generation,
            timestamp: self.timestamp,
            result,
        }
    }
}

#[derive(Debug)]
pub struct DeleteCompletion {
    generation: u64,
    timestamp: EntryTimestamp,
    result: Result<()>,
}

/// Create/view/delete flow over one [`DiaryClient`].
///
/// Call [`DiaryEditor::reconcile`] whenever the entry list changes or a new
/// entry was selected; it drops a selection whose entry is gone and keeps the
/// displayed photo handle in sync.
#[derive(Debug)]
pub struct DiaryEditor<S, P = SelectedFile> {
    client: Arc<DiaryClient<S>>,
    state: EditorState<P>,
    generation: u64,
    default_color: ColorTag,
    photos: PhotoView,
    notices: Vec<Notice>,
    save: Mutation,
    delete: Mutation,
}

impl<S: EntryStore, P: PhotoSource + Clone> DiaryEditor<S, P> {
    pub fn new(client: Arc<DiaryClient<S>>, registry: PhotoHandleRegistry) -> Self {
        Self {
            client,
            state: EditorState::Empty,
            generation: 0,
            default_color: ColorTag::default(),
            photos: PhotoView::new(registry),
            notices: Vec::new(),
            save: Mutation::new("Save"),
            delete: Mutation::new("Delete"),
        }
    }

    #[must_use]
    pub fn with_default_color(mut self, color_tag: ColorTag) -> Self {
        self.default_color = color_tag;
        self
    }

    pub const fn state(&self) -> &EditorState<P> {
        &self.state
    }

    pub fn selection(&self) -> Selection {
        match self.state {
            EditorState::Viewing(timestamp) => Selection::of(timestamp),
            _ => Selection::none(),
        }
    }

    pub const fn save_mutation(&self) -> &Mutation {
        &self.save
    }

    pub const fn delete_mutation(&self) -> &Mutation {
        &self.delete
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn transition(&mut self, next: EditorState<P>) {
        self.generation += 1;
        self.state = next;
        self.photos.clear();
    }

    fn draft_mut(&mut self) -> Option<&mut Draft<P>> {
        match &mut self.state {
            EditorState::Creating(draft) => Some(draft),
            _ => None,
        }
    }

    /// Start a fresh draft, clearing any selection.
    pub fn new_entry(&mut self) {
        let draft = Draft::new(self.default_color.clone());
        self.transition(EditorState::Creating(draft));
    }

    /// View an entry, abandoning any draft.
    pub fn select(&mut self, timestamp: EntryTimestamp) {
        self.transition(EditorState::Viewing(timestamp));
    }

    /// Abandon the draft. Refused while its save is in flight.
    pub fn cancel(&mut self) -> bool {
        if !matches!(self.state, EditorState::Creating(_)) || self.save.is_pending() {
            return false;
        }
        self.transition(EditorState::Empty);
        true
    }

    pub fn close(&mut self) {
        self.transition(EditorState::Empty);
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let Some(draft) = self.draft_mut() else {
            return false;
        };
        draft.text = text.into();
        true
    }

    pub fn set_color_tag(&mut self, color_tag: ColorTag) -> bool {
        let Some(draft) = self.draft_mut() else {
            return false;
        };
        draft.color_tag = color_tag;
        true
    }

    /// Attach a photo to the draft, replacing any previous one.
    ///
    /// Files that are not PNG, JPEG or WebP are rejected here, before their
    /// content is read.
    pub fn attach_photo(&mut self, source: P) -> Result<()> {
        if !matches!(self.state, EditorState::Creating(_)) {
            return Err(Error::not_ready("No entry is being created"));
        }
        if validate_photo_mime_type(source.mime_type().as_deref()).is_err() {
            self.notices.push(Notice::error(INVALID_PHOTO_MESSAGE));
            return Err(Error::validation(INVALID_PHOTO_MESSAGE));
        }
        if let Some(draft) = self.draft_mut() {
            draft.photo = Some(source);
        }
        Ok(())
    }

    pub fn remove_photo(&mut self) -> Option<P> {
        self.draft_mut().and_then(|draft| draft.photo.take())
    }

    /// Validate the draft and mark the save pending.
    ///
    /// Blank text queues an error notice and never reaches the store.
    pub fn prepare_save(&mut self) -> Result<PendingSave<S, P>> {
        let EditorState::Creating(draft) = &self.state else {
            return Err(Error::not_ready("No entry is being created"));
        };
        if !draft.can_save() {
            self.notices.push(Notice::error(EMPTY_ENTRY_MESSAGE));
            return Err(Error::validation(EMPTY_ENTRY_MESSAGE));
        }

        let pending = PendingSave {
            client: Arc::clone(&self.client),
            mutation: self.save.clone(),
            generation: self.generation,
            text: draft.text.clone(),
            color_tag: draft.color_tag.clone(),
            photo: draft.photo.clone(),
        };
        self.save.start()?;
        Ok(pending)
    }

    /// Apply a save outcome. On success the editor closes, unless it has
    /// moved on since the save was prepared.
    pub fn finish_save(&mut self, completion: SaveCompletion) -> Result<EntryTimestamp> {
        match &completion.result {
            Ok(timestamp) => {
                self.notices.push(Notice::success(ENTRY_SAVED_MESSAGE));
                if completion.generation == self.generation {
                    self.transition(EditorState::Empty);
                } else {
                    tracing::debug!(%timestamp, "Save completed after the editor moved on");
                }
            }
            Err(error) => {
                tracing::error!("Failed to save entry: {error}");
                self.notices.push(Notice::error(error.to_string()));
            }
        }
        completion.result
    }

    pub async fn save(&mut self) -> Result<EntryTimestamp> {
        let pending = self.prepare_save()?;
        let completion = pending.execute().await;
        self.finish_save(completion)
    }

    /// Ask for confirmation and mark the delete pending.
    ///
    /// Returns `None` when the user declines; nothing else happens then.
    pub fn prepare_delete(&mut self, confirm: &impl Confirm) -> Result<Option<PendingDelete<S>>> {
        let EditorState::Viewing(timestamp) = self.state else {
            return Err(Error::not_ready("No entry is selected"));
        };
        if self.delete.is_pending() {
            return Err(Error::not_ready("Delete is already in progress"));
        }
        if !confirm.confirm(DELETE_PROMPT) {
            return Ok(None);
        }

        self.delete.start()?;
        Ok(Some(PendingDelete {
            client: Arc::clone(&self.client),
            mutation: self.delete.clone(),
            generation: self.generation,
            timestamp,
        }))
    }

    pub fn finish_delete(&mut self, completion: DeleteCompletion) -> Result<()> {
        match &completion.result {
            Ok(()) => {
                self.notices.push(Notice::success(ENTRY_DELETED_MESSAGE));
                let still_viewing = matches!(
                    self.state,
                    EditorState::Viewing(timestamp) if timestamp == completion.timestamp
                );
                if completion.generation == self.generation && still_viewing {
                    self.transition(EditorState::Empty);
                }
            }
            Err(error) => {
                tracing::error!(timestamp = %completion.timestamp, "Failed to delete entry: {error}");
                self.notices.push(Notice::error(error.to_string()));
            }
        }
        completion.result
    }

    pub async fn delete(&mut self, confirm: &impl Confirm) -> Result<DeleteOutcome> {
        let Some(pending) = self.prepare_delete(confirm)? else {
            return Ok(DeleteOutcome::Declined);
        };
        let completion = pending.execute().await;
        self.finish_delete(completion)?;
        Ok(DeleteOutcome::Deleted)
    }

    /// Re-resolve the selection against a refreshed list.
    pub fn reconcile(&mut self, entries: &EntryList) {
        let EditorState::Viewing(timestamp) = self.state else {
            return;
        };
        match entries.get(timestamp) {
            Some(entry) => {
                self.photos.show(timestamp, entry.photo.as_ref());
            }
            None => {
                tracing::debug!(%timestamp, "Selected entry no longer listed");
                self.transition(EditorState::Empty);
            }
        }
    }

    pub fn view<'a>(&'a self, entries: &'a EntryList) -> EditorView<'a, P> {
        match &self.state {
            EditorState::Empty => EditorView::Welcome,
            EditorState::Creating(draft) => EditorView::Creating {
                draft,
                saving: self.save.state() == MutationState::Pending,
            },
            EditorState::Viewing(timestamp) => match entries.get(*timestamp) {
                Some(entry) => EditorView::Viewing {
                    entry,
                    photo_uri: self.photos.uri_for(*timestamp),
                    deleting: self.delete.is_pending(),
                },
                None => EditorView::Welcome,
            },
        }
    }
}
