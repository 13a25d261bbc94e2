//! Synchronization layer between clients and the remote entry store.
//!
//! Reads go through a shared [`QueryCache`]; mutations call the store and
//! then invalidate the affected query. The cache is never patched by hand, so
//! a failed mutation leaves previously fetched data untouched.

mod cache;
mod client;
mod http;
mod memory;
mod mutation;
mod store;

pub use cache::{CachedValue, FetchTicket, QueryCache, QueryKey, QueryKind, QuerySnapshot};
pub use client::{DiaryClient, ListState, RetryPolicy};
pub use http::HttpEntryStore;
pub use memory::MemoryEntryStore;
pub use mutation::{Mutation, MutationState};
pub use store::EntryStore;
