//! feedforward-core - Core library for FeedForward
//!
//! This crate contains the shared models, the locally cached feedback store,
//! and the synchronization client that keeps the cache consistent with the
//! remote feedback service. Frontends (today the CLI) only ever talk to
//! [`FeedbackClient`] and read [`FeedbackState`] snapshots.

pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod store;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use gateway::FeedbackGateway;
pub use models::{Category, Feedback, FeedbackDraft};
pub use store::{FeedbackEvent, FeedbackState, FeedbackStore};
pub use sync::FeedbackClient;
