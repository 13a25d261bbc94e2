//! Data models for Echoe

mod color;
mod entry;
mod photo;
mod profile;

pub use color::{ColorTag, PaletteColor, COLOR_PALETTE, DEFAULT_COLOR_TAG};
pub use entry::{DateStyle, DiaryEntry, EntryTimestamp, NewEntry, EMPTY_ENTRY_MESSAGE};
pub use photo::Photo;
pub use profile::{ProfileState, UserProfile};
