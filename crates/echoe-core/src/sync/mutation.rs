//! Observable state of a single mutation.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::{Error, Result};

/// Lifecycle of one mutation as seen by the control that triggers it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MutationState {
    #[default]
    Idle,
    Pending,
    Error(String),
    Success,
}

/// A named mutation whose state is broadcast to subscribers.
///
/// Only one run may be pending at a time; a second start while pending is
/// refused, which is what keeps a trigger disabled while its own operation
/// is in flight. Clones share state.
#[derive(Debug, Clone)]
pub struct Mutation {
    name: &'static str,
    state: Arc<watch::Sender<MutationState>>,
}

impl Mutation {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        let (sender, _receiver) = watch::channel(MutationState::Idle);
        Self {
            name,
            state: Arc::new(sender),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn state(&self) -> MutationState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        *self.state.borrow() == MutationState::Pending
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<MutationState> {
        self.state.subscribe()
    }

    /// Move to `Pending`, or fail if a run is already pending.
    pub fn start(&self) -> Result<()> {
        let started = self.state.send_if_modified(|state| {
            if *state == MutationState::Pending {
                false
            } else {
                *state = MutationState::Pending;
                true
            }
        });

        if started {
            Ok(())
        } else {
            Err(Error::not_ready(format!("{} is already in progress", self.name)))
        }
    }

    /// Record the outcome of the pending run.
    pub fn finish<T>(&self, result: &Result<T>) {
        let next = match result {
            Ok(_) => MutationState::Success,
            Err(error) => MutationState::Error(error.to_string()),
        };
        self.state.send_replace(next);
    }

    pub fn reset(&self) {
        self.state.send_replace(MutationState::Idle);
    }

    /// Start, await `operation`, and record its outcome.
    pub async fn run<T, F>(&self, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.start()?;
        let result = operation.await;
        self.finish(&result);
        result
    }
}
