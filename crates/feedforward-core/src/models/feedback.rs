//! Feedback record model

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum accepted title length in characters.
pub const MAX_TITLE_LEN: usize = 100;
/// Maximum accepted description length in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Category a feedback record is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Bug,
    Feature,
    Improvement,
}

impl Category {
    /// All categories, in the order listings group them.
    pub const ALL: [Self; 3] = [Self::Bug, Self::Feature, Self::Improvement];

    /// Wire and display name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bug => "Bug",
            Self::Feature => "Feature",
            Self::Improvement => "Improvement",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A feedback record as known to the remote service.
///
/// `id` and `created_at` are server-assigned: both are absent on anything
/// that has not been confirmed by the service yet. Once assigned, `id` is
/// immutable and unique within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    /// Server-assigned identifier
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Short summary
    pub title: String,
    /// Longer description
    pub description: String,
    /// Category the record is filed under
    pub category: Category,
    /// Server-assigned creation time; malformed wire values load as `None`
    #[serde(
        rename = "createdAt",
        default,
        with = "lenient_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    /// Vote count, never negative
    #[serde(default)]
    pub upvotes: u32,
}

/// A validated draft for a new feedback record.
///
/// Construction is the validation boundary: both text fields are trimmed,
/// must be non-empty, and are capped in length. A draft that exists is a
/// draft the service will accept, so validation failures never turn into
/// requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackDraft {
    title: String,
    description: String,
    category: Category,
}

impl FeedbackDraft {
    /// Validate and normalize user input into a draft.
    pub fn new(title: &str, description: &str, category: Category) -> Result<Self> {
        let title = title.trim();
        let description = description.trim();

        if title.is_empty() {
            return Err(Error::Validation("title must not be empty".to_string()));
        }
        if description.is_empty() {
            return Err(Error::Validation(
                "description must not be empty".to_string(),
            ));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(Error::Validation(format!(
                "title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(Error::Validation(format!(
                "description must be at most {MAX_DESCRIPTION_LEN} characters"
            )));
        }

        Ok(Self {
            title: title.to_string(),
            description: description.to_string(),
            category,
        })
    }

    /// Trimmed title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Trimmed description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Chosen category.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }
}

/// Parse a wire timestamp the way the service's clients always have:
/// RFC 3339 first, then a timezone-less datetime (assumed UTC), then a
/// plain date. Anything else is treated as absent so the record still
/// loads and simply sorts as oldest.
fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return parsed.and_hms_opt(0, 0, 0).map(|datetime| datetime.and_utc());
    }
    None
}

mod lenient_datetime {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use super::parse_created_at;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(timestamp) => {
                serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_created_at))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn category_uses_exact_wire_strings() {
        assert_eq!(serde_json::to_string(&Category::Bug).unwrap(), "\"Bug\"");
        assert_eq!(
            serde_json::to_string(&Category::Improvement).unwrap(),
            "\"Improvement\""
        );
        let parsed: Category = serde_json::from_str("\"Feature\"").unwrap();
        assert_eq!(parsed, Category::Feature);
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!(serde_json::from_str::<Category>("\"Suggestion\"").is_err());
    }

    #[test]
    fn feedback_deserializes_wire_shape() {
        let record: Feedback = serde_json::from_str(
            r#"{
                "_id": "64f1c0ffee",
                "title": "Dark mode resets",
                "description": "Theme falls back to light on reload",
                "category": "Bug",
                "createdAt": "2024-03-05T12:30:00Z",
                "upvotes": 7
            }"#,
        )
        .unwrap();

        assert_eq!(record.id.as_deref(), Some("64f1c0ffee"));
        assert_eq!(record.title, "Dark mode resets");
        assert_eq!(record.category, Category::Bug);
        assert_eq!(
            record.created_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 12, 30, 0).unwrap())
        );
        assert_eq!(record.upvotes, 7);
    }

    #[test]
    fn absent_server_fields_default() {
        let record: Feedback = serde_json::from_str(
            r#"{"title": "T", "description": "D", "category": "Feature"}"#,
        )
        .unwrap();

        assert_eq!(record.id, None);
        assert_eq!(record.created_at, None);
        assert_eq!(record.upvotes, 0);
    }

    #[test]
    fn unparseable_created_at_loads_as_absent() {
        let record: Feedback = serde_json::from_str(
            r#"{
                "title": "T",
                "description": "D",
                "category": "Bug",
                "createdAt": "not a date"
            }"#,
        )
        .unwrap();

        assert_eq!(record.created_at, None);
    }

    #[test]
    fn serialized_feedback_omits_absent_fields() {
        let record = Feedback {
            id: None,
            title: "T".to_string(),
            description: "D".to_string(),
            category: Category::Bug,
            created_at: None,
            upvotes: 0,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("_id").is_none());
        assert!(value.get("createdAt").is_none());
    }

    #[test]
    fn parse_created_at_accepts_known_formats() {
        assert_eq!(
            parse_created_at("2024-01-02T03:04:05+02:00"),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 1, 4, 5).unwrap())
        );
        assert_eq!(
            parse_created_at("2024-01-02T03:04:05.250"),
            Some(
                Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
                    + chrono::Duration::milliseconds(250)
            )
        );
        assert_eq!(
            parse_created_at("2024-01-01"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn parse_created_at_rejects_garbage() {
        assert_eq!(parse_created_at(""), None);
        assert_eq!(parse_created_at("   "), None);
        assert_eq!(parse_created_at("yesterday"), None);
        assert_eq!(parse_created_at("2024-13-40"), None);
    }

    #[test]
    fn draft_trims_input() {
        let draft = FeedbackDraft::new("  Title  ", "  Description  ", Category::Bug).unwrap();
        assert_eq!(draft.title(), "Title");
        assert_eq!(draft.description(), "Description");
        assert_eq!(draft.category(), Category::Bug);
    }

    #[test]
    fn draft_rejects_blank_fields() {
        assert!(FeedbackDraft::new("   ", "body", Category::Bug).is_err());
        assert!(FeedbackDraft::new("title", " \n\t ", Category::Bug).is_err());
    }

    #[test]
    fn draft_enforces_length_caps() {
        let long_title = "x".repeat(MAX_TITLE_LEN + 1);
        let long_description = "y".repeat(MAX_DESCRIPTION_LEN + 1);

        assert!(FeedbackDraft::new(&long_title, "body", Category::Feature).is_err());
        assert!(FeedbackDraft::new("title", &long_description, Category::Feature).is_err());

        let max_title = "x".repeat(MAX_TITLE_LEN);
        let max_description = "y".repeat(MAX_DESCRIPTION_LEN);
        assert!(FeedbackDraft::new(&max_title, &max_description, Category::Feature).is_ok());
    }

    #[test]
    fn draft_serializes_create_body() {
        let draft = FeedbackDraft::new("Offline mode", "Cache submissions", Category::Improvement)
            .unwrap();
        let value = serde_json::to_value(&draft).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "title": "Offline mode",
                "description": "Cache submissions",
                "category": "Improvement"
            })
        );
    }
}
