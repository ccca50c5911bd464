//! Runtime configuration for FeedForward clients.
//!
//! The service exposes exactly one knob: where the remote feedback service
//! lives. It is resolved once at startup and handed to the gateway.

use std::env;

use crate::error::Result;
use crate::util::{normalize_base_url, normalize_text_option};

/// Environment variable that overrides the feedback service base URL.
pub const API_URL_ENV: &str = "FEEDFORWARD_API_URL";

/// Deployed backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "https://feedforward-backend-rdd3.onrender.com";

/// Resolve the feedback service base URL.
///
/// Precedence: explicit override (a CLI flag), then [`API_URL_ENV`], then
/// the deployment fallback. Blank values count as unset; the winner is
/// validated and normalized.
pub fn resolve_api_url(override_url: Option<String>) -> Result<String> {
    resolve_from(override_url, env::var(API_URL_ENV).ok())
}

/// Pure resolution step, separated from the process environment so tests
/// can exercise the precedence rules directly.
pub fn resolve_from(override_url: Option<String>, env_url: Option<String>) -> Result<String> {
    let raw = normalize_text_option(override_url)
        .or_else(|| normalize_text_option(env_url))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    normalize_base_url(&raw)
}
