use thiserror::Error;

use crate::format::diff::{FormattingDifference, Severity, SeverityCounts};
use crate::review::schema::{DocumentReview, ReviewIssue, ReviewSeverity, SectionReview};
use crate::section::Section;
use crate::textutil::truncate_chars;

/// Cap on the section body text shipped to a reviewer, in characters.
pub const DEFAULT_EXCERPT_LIMIT: usize = 3000;

/// Failure modes a review backend can surface. The pipeline treats every
/// variant the same way, degrade and continue, but callers embedding their
/// own backend get to distinguish retryable from fatal.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("review service rate limited")]
    RateLimited,
    #[error("review service timed out after {0}s")]
    Timeout(u64),
    #[error("review service authentication failed: {0}")]
    Auth(String),
    #[error("review service transport error: {0}")]
    Transport(String),
    #[error("review response malformed: {0}")]
    Malformed(String),
}

pub struct SectionReviewInput<'a> {
    /// `None` for draft sections with no template counterpart.
    pub template: Option<&'a Section>,
    pub draft: &'a Section,
    pub differences: &'a [FormattingDifference],
    /// Bodies ship truncated to this many characters.
    pub excerpt_limit: usize,
}

impl<'a> SectionReviewInput<'a> {
    pub fn draft_excerpt(&self) -> &'a str {
        truncate_chars(&self.draft.body, self.excerpt_limit)
    }

    pub fn template_excerpt(&self) -> Option<&'a str> {
        self.template
            .map(|s| truncate_chars(&s.body, self.excerpt_limit))
    }
}

pub struct DocumentReviewInput<'a> {
    pub template_label: &'a str,
    pub draft_label: &'a str,
    pub template_sections: &'a [Section],
    pub draft_sections: &'a [Section],
    pub matched: usize,
    pub added: usize,
    pub removed: usize,
    pub findings: SeverityCounts,
}

impl DocumentReviewInput<'_> {
    /// One-line-per-section outline, what a remote backend sees instead of
    /// full bodies.
    pub fn outline(sections: &[Section]) -> String {
        sections
            .iter()
            .map(Section::label)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The seam for the review collaborator. The comparison pipeline never knows
/// what sits behind it; wire in a remote model, a rules engine, or the
/// offline stand-in below.
pub trait ReviewService {
    fn name(&self) -> &'static str;

    fn review_section(&self, input: &SectionReviewInput<'_>)
        -> Result<SectionReview, ServiceError>;

    fn review_document(
        &self,
        input: &DocumentReviewInput<'_>,
    ) -> Result<DocumentReview, ServiceError>;
}

/// Deterministic reviewer derived from the formatting findings alone. Keeps
/// the full pipeline runnable with no credentials and the report shape
/// identical to what a remote backend would produce.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineReviewService;

impl ReviewService for OfflineReviewService {
    fn name(&self) -> &'static str {
        "offline"
    }

    fn review_section(
        &self,
        input: &SectionReviewInput<'_>,
    ) -> Result<SectionReview, ServiceError> {
        let counts = SeverityCounts::tally(input.differences);

        let severity_overall = if input.template.is_none() {
            // Nothing vetted this text.
            ReviewSeverity::Medium
        } else if counts.high > 0 {
            ReviewSeverity::High
        } else if counts.medium > 0 {
            ReviewSeverity::Medium
        } else {
            ReviewSeverity::Low
        };

        let issues: Vec<ReviewIssue> = input
            .differences
            .iter()
            .filter(|d| d.severity == Severity::High)
            .take(3)
            .map(|d| ReviewIssue {
                kind: "formatting".to_string(),
                severity: ReviewSeverity::High,
                description: d.detail.clone(),
                category: "formatting".to_string(),
                template_snippet: None,
                draft_snippet: None,
            })
            .collect();

        let mut notes = Vec::new();
        match input.template {
            None => notes.push(format!(
                "section {} has no counterpart in the template",
                input.draft.label()
            )),
            Some(t) if counts.total() > 0 => notes.push(format!(
                "section {} deviates from template section {} in {} place(s)",
                input.draft.label(),
                t.label(),
                counts.total()
            )),
            Some(_) => {}
        }

        Ok(SectionReview {
            severity_overall,
            issues,
            suggested_revision: String::new(),
            notes_for_legal_review: notes,
        })
    }

    fn review_document(
        &self,
        input: &DocumentReviewInput<'_>,
    ) -> Result<DocumentReview, ServiceError> {
        let scope_change = input.added > 0 || input.removed > 0;

        let mut red_flags = Vec::new();
        if input.removed > 0 {
            red_flags.push(format!(
                "{} template section(s) have no counterpart in the draft",
                input.removed
            ));
        }
        if input.added > 0 {
            red_flags.push(format!(
                "{} draft section(s) are new against the template",
                input.added
            ));
        }
        if input.findings.high > 0 {
            red_flags.push(format!(
                "{} high severity formatting finding(s)",
                input.findings.high
            ));
        }

        Ok(DocumentReview {
            scope_change,
            red_flags,
            summary: format!(
                "compared {} against {}: {} matched, {} new, {} removed section(s), {} formatting finding(s)",
                input.draft_label,
                input.template_label,
                input.matched,
                input.added,
                input.removed,
                input.findings.total()
            ),
            ..DocumentReview::default()
        })
    }
}
