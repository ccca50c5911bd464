//! In-memory feedback store.
//!
//! The store owns the locally cached collection of feedback records and is
//! the only component that mutates it. Every change arrives as a
//! [`FeedbackEvent`] raised by the synchronization client, and a single
//! reduction function maps events onto state. That keeps all cache rules in
//! one place, testable without any network involved.

use std::sync::{Mutex, PoisonError};

use crate::models::Feedback;

/// Locally cached view of the remote feedback collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackState {
    /// Cached records; newest first after any fetch or create.
    pub records: Vec<Feedback>,
    /// True while a fetch or create is awaiting the remote service.
    pub loading: bool,
    /// Most recent failure message; cleared when a fetch or create starts.
    pub error: Option<String>,
}

/// Lifecycle events raised by the synchronization client.
///
/// Each remote operation emits exactly one `*Started`, then exactly one of
/// `*Succeeded` or `*Failed`. Events from different operations may
/// interleave freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackEvent {
    FetchStarted,
    FetchSucceeded(Vec<Feedback>),
    FetchFailed(String),
    CreateStarted,
    CreateSucceeded(Feedback),
    CreateFailed(String),
    UpvoteStarted { id: String },
    UpvoteSucceeded(Feedback),
    UpvoteFailed { id: String, message: String },
    DeleteStarted { id: String },
    DeleteSucceeded { id: String },
    DeleteFailed { id: String, message: String },
}

/// Apply one lifecycle event to the cached state.
///
/// Upvotes and deletes are optimistic: they take effect on `*Started` and
/// are deliberately NOT rolled back on `*Failed` — the failure only surfaces
/// through `error`, and the user recovers by retrying or re-fetching.
/// Fetches and creates are the opposite: the collection only changes on
/// `*Succeeded`, so their failures leave nothing to undo.
pub fn reduce(state: &mut FeedbackState, event: FeedbackEvent) {
    match event {
        FeedbackEvent::FetchStarted | FeedbackEvent::CreateStarted => {
            state.loading = true;
            state.error = None;
        }
        FeedbackEvent::FetchSucceeded(mut records) => {
            sort_newest_first(&mut records);
            state.records = records;
            state.loading = false;
        }
        FeedbackEvent::FetchFailed(message) | FeedbackEvent::CreateFailed(message) => {
            state.loading = false;
            state.error = Some(message);
        }
        FeedbackEvent::CreateSucceeded(record) => {
            if let Some(id) = record.id.clone() {
                // A retried create can hand us an id we already hold.
                remove_by_id(state, &id);
            }
            state.records.insert(0, record);
            state.loading = false;
        }
        FeedbackEvent::UpvoteStarted { id } => {
            if let Some(record) = find_by_id(state, &id) {
                record.upvotes = record.upvotes.saturating_add(1);
            }
        }
        FeedbackEvent::UpvoteSucceeded(confirmed) => {
            if let Some(id) = confirmed.id.as_deref() {
                if let Some(record) = find_by_id(state, id) {
                    // Server count is authoritative; heals drift from
                    // concurrent voters without waiting for a fetch.
                    record.upvotes = confirmed.upvotes;
                }
            }
        }
        FeedbackEvent::DeleteStarted { id } | FeedbackEvent::DeleteSucceeded { id } => {
            // Started removes optimistically; Succeeded re-removes in case
            // an interleaved fetch resurrected the record.
            remove_by_id(state, &id);
        }
        FeedbackEvent::UpvoteFailed { message, .. }
        | FeedbackEvent::DeleteFailed { message, .. } => {
            state.error = Some(message);
        }
    }
}

/// Stable descending sort by creation time; records without a usable
/// timestamp end up last (oldest).
fn sort_newest_first(records: &mut [Feedback]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

fn find_by_id<'a>(state: &'a mut FeedbackState, id: &str) -> Option<&'a mut Feedback> {
    state
        .records
        .iter_mut()
        .find(|record| record.id.as_deref() == Some(id))
}

fn remove_by_id(state: &mut FeedbackState, id: &str) {
    state
        .records
        .retain(|record| record.id.as_deref() != Some(id));
}

/// Shared owner of [`FeedbackState`] for the lifetime of the client.
///
/// Consumers hold it by `Arc` and read snapshots; only the synchronization
/// client applies events. `apply` never suspends while holding the lock, so
/// every mutation is atomic with respect to concurrent operations.
#[derive(Debug, Default)]
pub struct FeedbackStore {
    state: Mutex<FeedbackState>,
}

impl FeedbackStore {
    /// Create an empty store: no records, not loading, no error.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a lifecycle event to the owned state.
    pub fn apply(&self, event: FeedbackEvent) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        reduce(&mut state, event);
    }

    /// Immutable snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> FeedbackState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
