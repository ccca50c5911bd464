//! HTTP gateway to the remote feedback service.
//!
//! Thin request/response wrapper around the service's four endpoints. All
//! failures are mapped onto the crate error taxonomy here: transport
//! problems become [`Error::Network`], non-success statuses become
//! [`Error::Server`] with the message extracted from the body, and
//! undecodable success bodies become [`Error::MalformedResponse`].

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::{Feedback, FeedbackDraft};
use crate::util::{compact_text, normalize_base_url};

/// HTTP client for the remote feedback service.
#[derive(Debug, Clone)]
pub struct FeedbackGateway {
    base_url: String,
    client: reqwest::Client,
}

impl FeedbackGateway {
    /// Build a gateway for an explicit service base URL.
    ///
    /// No request timeout is configured: operations have no cancellation
    /// semantics, callers wait for the service or a transport failure.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = normalize_base_url(&base_url.into())?;
        let client = reqwest::Client::builder().build()?;
        Ok(Self { base_url, client })
    }

    /// The base URL this gateway was configured with.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every feedback record the service knows about.
    pub async fn list(&self) -> Result<Vec<Feedback>> {
        let response = self
            .client
            .get(format!("{}/feedback", self.base_url))
            .header("Accept", "application/json")
            .send()
            .await?;
        decode(reject_failure(response).await?).await
    }

    /// Submit a draft; returns the record as stored, including the
    /// server-assigned id and creation time.
    pub async fn create(&self, draft: &FeedbackDraft) -> Result<Feedback> {
        let response = self
            .client
            .post(format!("{}/feedback", self.base_url))
            .header("Accept", "application/json")
            .json(draft)
            .send()
            .await?;
        decode(reject_failure(response).await?).await
    }

    /// Increment a record's vote count; returns the updated record.
    pub async fn upvote(&self, id: &str) -> Result<Feedback> {
        let response = self
            .client
            .patch(format!(
                "{}/feedback/{}/upvote",
                self.base_url,
                urlencoding::encode(id)
            ))
            .header("Accept", "application/json")
            .send()
            .await?;
        decode(reject_failure(response).await?).await
    }

    /// Delete a record. Success is signaled by status alone; any body is
    /// ignored.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(format!(
                "{}/feedback/{}",
                self.base_url,
                urlencoding::encode(id)
            ))
            .send()
            .await?;
        reject_failure(response).await?;
        Ok(())
    }
}

/// Pass successful responses through; turn everything else into
/// [`Error::Server`] with the best message the body offers.
async fn reject_failure(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(Error::Server {
        status: status.as_u16(),
        message: parse_error_message(status, &body),
    })
}

/// Decode a success body, reporting undecodable payloads with a compact
/// excerpt for diagnosis.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|error| Error::MalformedResponse(format!("{error} (body: {})", compact_text(&body))))
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Extract a human-readable message from an error response body.
///
/// Services in front of this client answer with `{"message": ...}` or
/// `{"error": ...}` JSON; plain-text bodies are compacted, empty ones fall
/// back to the bare status.
fn parse_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            let message = message.trim();
            if !message.is_empty() {
                return message.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        compact_text(trimmed)
    }
}
