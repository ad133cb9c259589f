pub mod align;
pub mod patterns;
pub mod segment;
pub mod similarity;

pub use align::{align, AlignConfig, AlignProfile, AlignmentEdge, AlignmentMap};
pub use segment::{segment_blocks, SegmenterConfig};

use serde::{Deserialize, Serialize};

use crate::ir::{Paragraph, Table};

/// One comparison unit. Built in a single segmentation pass and immutable
/// afterwards; `paragraphs` starts with the header paragraph when one exists,
/// `body` joins only the non-header text.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub level: u32,
    pub body: String,
    pub paragraphs: Vec<Paragraph>,
    pub tables: Vec<Table>,
    pub position: usize,
}

impl Section {
    pub fn summary(&self) -> SectionSummary {
        SectionSummary {
            id: self.id.clone(),
            number: self.number.clone(),
            title: self.title.clone(),
            level: self.level,
            position: self.position,
        }
    }

    /// Human-readable label for logs: number and/or title, falling back to
    /// the id.
    pub fn label(&self) -> String {
        match (self.number.as_deref(), self.title.as_deref()) {
            (Some(n), Some(t)) => format!("{n} {t}"),
            (Some(n), None) => n.to_string(),
            (None, Some(t)) => t.to_string(),
            (None, None) => self.id.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SectionSummary {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub level: u32,
    pub position: usize,
}
