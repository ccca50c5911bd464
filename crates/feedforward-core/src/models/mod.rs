//! Data models for FeedForward

mod feedback;

pub use feedback::{Category, Feedback, FeedbackDraft, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN};
