//! Final output shape. One report per comparison run, JSON all the way
//! through, draft sections in document order followed by whatever the
//! template lost.

use serde::{Deserialize, Serialize};

use crate::docx::ParsedDocument;
use crate::error::Result;
use crate::format::diff::{FormattingDifference, SeverityCounts};
use crate::ir::DocumentMetadata;
use crate::review::schema::{DocumentReview, SectionReview};
use crate::section::align::{AlignProfile, ScoreSignal};
use crate::section::SectionSummary;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub label: String,
    pub section_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DocumentMetadata>,
    /// Non-fatal parse degradations, styles or core properties that would
    /// not read.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl DocumentSummary {
    pub fn from_parsed(doc: &ParsedDocument, section_count: usize) -> Self {
        let metadata = if doc.metadata == DocumentMetadata::default() {
            None
        } else {
            Some(doc.metadata.clone())
        };
        DocumentSummary {
            label: doc.label.clone(),
            section_count,
            metadata,
            warnings: doc.warnings.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    New,
}

/// One draft section's full comparison record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SectionComparison {
    pub draft_section: SectionSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_section: Option<SectionSummary>,
    pub status: MatchStatus,
    pub score: f32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signals: Vec<ScoreSignal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formatting: Vec<FormattingDifference>,
    pub findings: SeverityCounts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<SectionReview>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct ReportTotals {
    pub matched: usize,
    pub new: usize,
    pub removed: usize,
    pub findings: SeverityCounts,
}

impl ReportTotals {
    pub fn from_sections(sections: &[SectionComparison], removed: usize) -> Self {
        let mut totals = ReportTotals {
            removed,
            ..ReportTotals::default()
        };
        for s in sections {
            match s.status {
                MatchStatus::Matched => totals.matched += 1,
                MatchStatus::New => totals.new += 1,
            }
            totals.findings.merge(&s.findings);
        }
        totals
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub tool_version: String,
    pub profile: AlignProfile,
    pub template: DocumentSummary,
    pub draft: DocumentSummary,
    pub sections: Vec<SectionComparison>,
    /// Template sections no draft section claimed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed_sections: Vec<SectionSummary>,
    pub totals: ReportTotals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_review: Option<DocumentReview>,
}

impl ComparisonReport {
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
