//! Synchronization between the local feedback cache and the remote service.
//!
//! Each operation is one asynchronous unit of work with a three-phase
//! lifecycle: it applies `*Started` to the store before touching the
//! network, awaits the gateway, then applies exactly one of `*Succeeded` or
//! `*Failed`. The store only ever sees normalized failure messages; the
//! typed error goes back to the caller untouched.
//!
//! Operations carry no cancellation, no timeout, and no deduplication:
//! invoking the same operation twice produces two independent tasks, each
//! applying its own optimistic step and its own confirmation.

use std::sync::Arc;

use crate::error::Result;
use crate::gateway::FeedbackGateway;
use crate::models::{Feedback, FeedbackDraft};
use crate::store::{FeedbackEvent, FeedbackState, FeedbackStore};

/// Client that keeps a [`FeedbackStore`] consistent with the remote
/// service.
///
/// Cloning is cheap (the store is shared through an `Arc`), so concurrent
/// tasks can hold their own handle and operate independently; the store
/// serializes their mutations.
#[derive(Debug, Clone)]
pub struct FeedbackClient {
    store: Arc<FeedbackStore>,
    gateway: FeedbackGateway,
}

impl FeedbackClient {
    /// Create a client with a fresh, empty store.
    #[must_use]
    pub fn new(gateway: FeedbackGateway) -> Self {
        Self {
            store: Arc::new(FeedbackStore::new()),
            gateway,
        }
    }

    /// Handle to the shared store, for consumers that want to observe
    /// state independently of this client.
    #[must_use]
    pub fn store(&self) -> Arc<FeedbackStore> {
        Arc::clone(&self.store)
    }

    /// Snapshot of the current cached state.
    #[must_use]
    pub fn state(&self) -> FeedbackState {
        self.store.snapshot()
    }

    /// Replace the cached collection with the server's, sorted newest
    /// first.
    pub async fn fetch_all(&self) -> Result<Vec<Feedback>> {
        self.store.apply(FeedbackEvent::FetchStarted);
        match self.gateway.list().await {
            Ok(records) => {
                tracing::debug!(count = records.len(), "fetched feedback");
                self.store
                    .apply(FeedbackEvent::FetchSucceeded(records.clone()));
                Ok(records)
            }
            Err(error) => {
                tracing::warn!(%error, "fetch failed");
                self.store
                    .apply(FeedbackEvent::FetchFailed(error.to_string()));
                Err(error)
            }
        }
    }

    /// Submit a draft. Nothing is cached speculatively: the record appears
    /// only once the service confirms it, id and all.
    pub async fn create(&self, draft: FeedbackDraft) -> Result<Feedback> {
        self.store.apply(FeedbackEvent::CreateStarted);
        match self.gateway.create(&draft).await {
            Ok(record) => {
                self.store
                    .apply(FeedbackEvent::CreateSucceeded(record.clone()));
                Ok(record)
            }
            Err(error) => {
                tracing::warn!(%error, "create failed");
                self.store
                    .apply(FeedbackEvent::CreateFailed(error.to_string()));
                Err(error)
            }
        }
    }

    /// Upvote a record, optimistically: the local count goes up
    /// immediately and stays up even if the service rejects the vote (the
    /// failure is surfaced through the state's `error` instead).
    pub async fn upvote(&self, id: &str) -> Result<Feedback> {
        self.store.apply(FeedbackEvent::UpvoteStarted { id: id.to_string() });
        match self.gateway.upvote(id).await {
            Ok(record) => {
                self.store
                    .apply(FeedbackEvent::UpvoteSucceeded(record.clone()));
                Ok(record)
            }
            Err(error) => {
                tracing::warn!(id, %error, "upvote failed");
                self.store.apply(FeedbackEvent::UpvoteFailed {
                    id: id.to_string(),
                    message: error.to_string(),
                });
                Err(error)
            }
        }
    }

    /// Delete a record, optimistically: it disappears locally immediately
    /// and is not restored if the service refuses (the failure is surfaced
    /// through the state's `error` instead).
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.store.apply(FeedbackEvent::DeleteStarted { id: id.to_string() });
        match self.gateway.delete(id).await {
            Ok(()) => {
                self.store
                    .apply(FeedbackEvent::DeleteSucceeded { id: id.to_string() });
                Ok(())
            }
            Err(error) => {
                tracing::warn!(id, %error, "delete failed");
                self.store.apply(FeedbackEvent::DeleteFailed {
                    id: id.to_string(),
                    message: error.to_string(),
                });
                Err(error)
            }
        }
    }
}
