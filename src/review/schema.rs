//! Response shapes for the review collaborator. Reviewer output arrives as
//! free text with a JSON object somewhere inside it; every field is optional
//! so a partially conforming response still lands instead of failing the
//! whole comparison.

use serde::{Deserialize, Serialize};

use crate::review::service::ServiceError;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSeverity {
    Low,
    Medium,
    High,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ReviewIssue {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub severity: ReviewSeverity,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft_snippet: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct SectionReview {
    #[serde(default)]
    pub severity_overall: ReviewSeverity,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<ReviewIssue>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub suggested_revision: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes_for_legal_review: Vec<String>,
}

impl SectionReview {
    /// Stand-in when the reviewer fails for one section: low severity, no
    /// issues. The failure itself goes to the log; the comparison for that
    /// section still ships.
    #[must_use]
    pub fn neutral() -> Self {
        SectionReview {
            severity_overall: ReviewSeverity::Low,
            ..SectionReview::default()
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Complete,
    Degraded,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct DocumentReview {
    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(default)]
    pub scope_change: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_change: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

impl DocumentReview {
    /// Degraded-but-present summary; the reason names the failure class.
    #[must_use]
    pub fn degraded(reason: &str) -> Self {
        DocumentReview {
            status: ReviewStatus::Degraded,
            summary: format!("document review unavailable: {reason}"),
            ..DocumentReview::default()
        }
    }
}

/// Pulls the first JSON object out of a raw reviewer response. Prose before
/// the object and trailing text after it are both tolerated.
pub fn extract_json_obj(text: &str) -> Result<serde_json::Value, ServiceError> {
    let start = text
        .find('{')
        .ok_or_else(|| ServiceError::Malformed("no JSON object in response".to_string()))?;
    let mut de = serde_json::Deserializer::from_str(&text[start..]);
    serde_json::Value::deserialize(&mut de)
        .map_err(|e| ServiceError::Malformed(format!("JSON parse failed: {e}")))
}

pub fn parse_section_review(raw: &str) -> Result<SectionReview, ServiceError> {
    let value = extract_json_obj(raw)?;
    serde_json::from_value(value)
        .map_err(|e| ServiceError::Malformed(format!("section review shape: {e}")))
}

pub fn parse_document_review(raw: &str) -> Result<DocumentReview, ServiceError> {
    let value = extract_json_obj(raw)?;
    serde_json::from_value(value)
        .map_err(|e| ServiceError::Malformed(format!("document review shape: {e}")))
}
