//! echoe-core - Core library for Echoe
//!
//! This crate contains the entry models, the photo attachment pipeline, the
//! synchronization layer over a remote entry store, and the editor state
//! machine shared by all Echoe interfaces.

pub mod attachment;
pub mod auth;
pub mod config;
pub mod editor;
pub mod error;
pub mod identity;
pub mod models;
pub mod route;
pub mod sync;
pub mod util;

pub use error::{Error, ErrorCategory, Result};
pub use models::{DiaryEntry, EntryTimestamp, Photo};
