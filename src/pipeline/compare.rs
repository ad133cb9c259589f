use std::fs;
use std::path::Path;

use crate::docx::{parse_document, ParsedDocument};
use crate::error::Result;
use crate::format::diff::{diff_sections, SeverityCounts};
use crate::progress::ConsoleProgress;
use crate::report::{
    ComparisonReport, DocumentSummary, MatchStatus, ReportTotals, SectionComparison,
};
use crate::review::schema::{DocumentReview, SectionReview};
use crate::review::service::{
    DocumentReviewInput, ReviewService, SectionReviewInput, DEFAULT_EXCERPT_LIMIT,
};
use crate::section::align::{align, AlignConfig};
use crate::section::segment::{segment_blocks, SegmenterConfig};
use crate::section::SectionSummary;

pub struct CompareOptions {
    pub align: AlignConfig,
    pub segmenter: SegmenterConfig,
    pub review_enabled: bool,
    /// Character cap on section bodies handed to the reviewer.
    pub review_excerpt: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        CompareOptions {
            align: AlignConfig::default(),
            segmenter: SegmenterConfig::default(),
            review_enabled: true,
            review_excerpt: DEFAULT_EXCERPT_LIMIT,
        }
    }
}

pub struct ComparePipeline {
    options: CompareOptions,
    review: Box<dyn ReviewService>,
    progress: ConsoleProgress,
}

impl ComparePipeline {
    pub fn new(
        options: CompareOptions,
        review: Box<dyn ReviewService>,
        progress: ConsoleProgress,
    ) -> Self {
        Self {
            options,
            review,
            progress,
        }
    }

    pub fn compare_files(&self, template: &Path, draft: &Path) -> Result<ComparisonReport> {
        self.progress.reading("template", template);
        let template_bytes = fs::read(template)?;
        let template_doc = parse_document(&file_label(template), &template_bytes)?;

        self.progress.reading("draft", draft);
        let draft_bytes = fs::read(draft)?;
        let draft_doc = parse_document(&file_label(draft), &draft_bytes)?;

        Ok(self.compare_parsed(&template_doc, &draft_doc))
    }

    /// Segmentation, alignment, formatting diff and review over two already
    /// parsed documents. Review failures degrade into placeholders; nothing
    /// past parsing aborts the run.
    pub fn compare_parsed(
        &self,
        template: &ParsedDocument,
        draft: &ParsedDocument,
    ) -> ComparisonReport {
        for w in &template.warnings {
            log::warn!("{}: {}", template.label, w);
        }
        for w in &draft.warnings {
            log::warn!("{}: {}", draft.label, w);
        }

        let template_sections = segment_blocks(&template.blocks, &self.options.segmenter);
        let draft_sections = segment_blocks(&draft.blocks, &self.options.segmenter);
        self.progress
            .segmented(template_sections.len(), draft_sections.len());

        let map = align(&template_sections, &draft_sections, &self.options.align);

        let total = map.edges.len();
        let mut sections: Vec<SectionComparison> = Vec::with_capacity(total);
        for edge in &map.edges {
            let draft_sec = &draft_sections[edge.draft_index];
            let template_sec = edge.template_index.map(|i| &template_sections[i]);

            let formatting = match template_sec {
                Some(t) => diff_sections(t, draft_sec),
                None => Vec::new(),
            };
            let findings = SeverityCounts::tally(&formatting);

            let review = if self.options.review_enabled {
                let input = SectionReviewInput {
                    template: template_sec,
                    draft: draft_sec,
                    differences: &formatting,
                    excerpt_limit: self.options.review_excerpt,
                };
                let r = match self.review.review_section(&input) {
                    Ok(r) => r,
                    Err(e) => {
                        log::warn!("section review failed for {}: {e}", draft_sec.label());
                        SectionReview::neutral()
                    }
                };
                self.progress.review_step(edge.draft_index + 1, total);
                Some(r)
            } else {
                None
            };

            sections.push(SectionComparison {
                draft_section: draft_sec.summary(),
                template_section: template_sec.map(|s| s.summary()),
                status: if edge.template_index.is_some() {
                    MatchStatus::Matched
                } else {
                    MatchStatus::New
                },
                score: edge.score,
                signals: edge.signals.clone(),
                formatting,
                findings,
                review,
            });
        }

        let removed_sections: Vec<SectionSummary> = map
            .unclaimed_template_indices(template_sections.len())
            .into_iter()
            .map(|i| template_sections[i].summary())
            .collect();

        let totals = ReportTotals::from_sections(&sections, removed_sections.len());
        self.progress
            .aligned(totals.matched, totals.new, totals.removed);

        let document_review = if self.options.review_enabled {
            let input = DocumentReviewInput {
                template_label: &template.label,
                draft_label: &draft.label,
                template_sections: &template_sections,
                draft_sections: &draft_sections,
                matched: totals.matched,
                added: totals.new,
                removed: totals.removed,
                findings: totals.findings,
            };
            Some(match self.review.review_document(&input) {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("document review failed: {e}");
                    DocumentReview::degraded(&e.to_string())
                }
            })
        } else {
            None
        };

        ComparisonReport {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            profile: self.options.align.profile,
            template: DocumentSummary::from_parsed(template, template_sections.len()),
            draft: DocumentSummary::from_parsed(draft, draft_sections.len()),
            sections,
            removed_sections,
            totals,
            document_review,
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::test_support::{wrap_body, zip_bytes};
    use crate::format::diff::DiffKind;
    use crate::review::schema::{ReviewSeverity, ReviewStatus};
    use crate::review::service::{OfflineReviewService, ServiceError};

    const TEMPLATE_BODY: &str = "\
<w:p><w:pPr><w:rPr><w:b/></w:rPr></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t>1. Definitions</w:t></w:r></w:p>\
<w:p><w:r><w:t>Capitalized terms have the meanings given below.</w:t></w:r></w:p>\
<w:p><w:pPr><w:rPr><w:b/></w:rPr></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t>2. Payment Terms</w:t></w:r></w:p>\
<w:p><w:r><w:t>Invoices are due within thirty days of receipt.</w:t></w:r></w:p>";

    const DRAFT_BODY: &str = "\
<w:p><w:r><w:t>1. Definitions</w:t></w:r></w:p>\
<w:p><w:r><w:t>Capitalized terms have the meanings given below.</w:t></w:r></w:p>\
<w:p><w:r><w:t>2. Payment Terms</w:t></w:r></w:p>\
<w:p><w:r><w:t>Invoices are due within thirty days of receipt.</w:t></w:r></w:p>\
<w:p><w:r><w:t>9. Escrow</w:t></w:r></w:p>\
<w:p><w:r><w:t>Deposits are held by a third party agent.</w:t></w:r></w:p>";

    fn parsed(label: &str, body: &str) -> ParsedDocument {
        let doc_xml = wrap_body(body);
        let bytes = zip_bytes(&[("word/document.xml", doc_xml.as_str())]);
        parse_document(label, &bytes).expect("parse fixture")
    }

    fn pipeline(review_enabled: bool) -> ComparePipeline {
        ComparePipeline::new(
            CompareOptions {
                review_enabled,
                ..CompareOptions::default()
            },
            Box::new(OfflineReviewService),
            ConsoleProgress::quiet(),
        )
    }

    #[test]
    fn end_to_end_report_over_in_memory_documents() {
        let template = parsed("template.docx", TEMPLATE_BODY);
        let draft = parsed("draft.docx", DRAFT_BODY);

        let report = pipeline(true).compare_parsed(&template, &draft);

        assert_eq!(report.totals.matched, 2);
        assert_eq!(report.totals.new, 1);
        assert_eq!(report.totals.removed, 0);
        assert_eq!(report.sections.len(), 3);

        // Matched sections lost their bolded headers.
        let first = &report.sections[0];
        assert_eq!(first.status, MatchStatus::Matched);
        assert!(first
            .formatting
            .iter()
            .any(|d| d.kind == DiffKind::Font && d.run_index == Some(0)));
        assert!(first.review.is_some());

        // The escrow section is new and carries no formatting findings.
        let last = &report.sections[2];
        assert_eq!(last.status, MatchStatus::New);
        assert!(last.template_section.is_none());
        assert!(last.formatting.is_empty());

        assert!(report.document_review.is_some());
        let json = report.to_json(false).expect("serialize");
        assert!(json.contains("\"tool_version\""));
    }

    #[test]
    fn disabled_review_leaves_fields_out() {
        let template = parsed("template.docx", TEMPLATE_BODY);
        let draft = parsed("draft.docx", DRAFT_BODY);

        let report = pipeline(false).compare_parsed(&template, &draft);
        assert!(report.sections.iter().all(|s| s.review.is_none()));
        assert!(report.document_review.is_none());
    }

    struct FailingReview;

    impl ReviewService for FailingReview {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn review_section(
            &self,
            _input: &SectionReviewInput<'_>,
        ) -> std::result::Result<SectionReview, ServiceError> {
            Err(ServiceError::RateLimited)
        }

        fn review_document(
            &self,
            _input: &DocumentReviewInput<'_>,
        ) -> std::result::Result<DocumentReview, ServiceError> {
            Err(ServiceError::Timeout(30))
        }
    }

    #[test]
    fn review_failures_degrade_without_aborting() {
        let template = parsed("template.docx", TEMPLATE_BODY);
        let draft = parsed("draft.docx", DRAFT_BODY);

        let pipeline = ComparePipeline::new(
            CompareOptions::default(),
            Box::new(FailingReview),
            ConsoleProgress::quiet(),
        );
        let report = pipeline.compare_parsed(&template, &draft);

        for s in &report.sections {
            // Failed section reviews land as neutral, not missing.
            let review = s.review.as_ref().expect("placeholder review");
            assert_eq!(review.severity_overall, ReviewSeverity::Low);
            assert!(review.issues.is_empty());
        }
        let doc_review = report.document_review.expect("degraded review");
        assert_eq!(doc_review.status, ReviewStatus::Degraded);
        assert!(doc_review.summary.contains("timed out"));
    }

    #[test]
    fn same_document_compares_clean() {
        let template = parsed("template.docx", TEMPLATE_BODY);
        let draft = parsed("draft.docx", TEMPLATE_BODY);

        let report = pipeline(true).compare_parsed(&template, &draft);
        assert_eq!(report.totals.new, 0);
        assert_eq!(report.totals.removed, 0);
        assert_eq!(report.totals.findings.total(), 0);
        assert!(report.removed_sections.is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = pipeline(false)
            .compare_files(
                Path::new("/nonexistent/template.docx"),
                Path::new("/nonexistent/draft.docx"),
            )
            .unwrap_err();
        assert!(err.to_string().contains("I/O error"));
    }
}
