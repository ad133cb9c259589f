//! Paragraph-by-paragraph formatting comparison between an aligned template
//! and draft section pair. Rules fire only when the template states a value
//! worth enforcing; the draft drifting on properties the template leaves
//! unset is not a finding.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::ir::{Alignment, Paragraph, Run};
use crate::section::Section;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    Alignment,
    Style,
    Spacing,
    Indent,
    /// Reserved for list-numbering comparisons; no rule emits it.
    List,
    Heading,
    Font,
    Table,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Machine-applicable corrected value, tagged by field: `{"bold": true}`,
/// `{"alignment": "center"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixValue {
    Alignment(Alignment),
    StyleId(String),
    SpacingAfter(i32),
    IndentLeft(i32),
    HeadingLevel(u32),
    Bold(bool),
    Italic(bool),
    FontSize(f32),
    FontFamily(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormattingDifference {
    pub kind: DiffKind,
    pub severity: Severity,
    /// Paragraph position within the section; `None` for section-wide
    /// findings such as table count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_index: Option<usize>,
    /// Stringified compared values; "none" when the draft leaves the
    /// property unset.
    pub template_value: String,
    pub draft_value: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<FixValue>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl SeverityCounts {
    pub fn tally(diffs: &[FormattingDifference]) -> Self {
        let mut counts = SeverityCounts::default();
        for d in diffs {
            counts.add(d.severity);
        }
        counts
    }

    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Low => self.low += 1,
            Severity::Medium => self.medium += 1,
            Severity::High => self.high += 1,
        }
    }

    pub fn merge(&mut self, other: &SeverityCounts) {
        self.low += other.low;
        self.medium += other.medium;
        self.high += other.high;
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }
}

fn show<T: Display>(value: Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "none".to_string(),
    }
}

/// Compares two aligned sections paragraph by paragraph, position for
/// position, up to the shorter length. Content insertions shift everything
/// after them, so findings past an insertion point get noisy; that is
/// accepted, the alignment layer already reports the content-level story.
pub fn diff_sections(template: &Section, draft: &Section) -> Vec<FormattingDifference> {
    let mut out = Vec::new();

    let pairs = template.paragraphs.len().min(draft.paragraphs.len());
    for idx in 0..pairs {
        diff_paragraph(&template.paragraphs[idx], &draft.paragraphs[idx], idx, &mut out);
    }

    if template.tables.len() != draft.tables.len() {
        out.push(FormattingDifference {
            kind: DiffKind::Table,
            severity: Severity::High,
            paragraph_index: None,
            run_index: None,
            template_value: template.tables.len().to_string(),
            draft_value: draft.tables.len().to_string(),
            detail: format!(
                "section has {} table(s) but the template has {}",
                draft.tables.len(),
                template.tables.len()
            ),
            fix: None,
        });
    }

    out
}

fn diff_paragraph(
    template: &Paragraph,
    draft: &Paragraph,
    idx: usize,
    out: &mut Vec<FormattingDifference>,
) {
    let tf = &template.formatting;
    let df = &draft.formatting;

    // Absent alignment renders as left; compare effective values.
    let t_align = tf.alignment.unwrap_or(Alignment::Left);
    let d_align = df.alignment.unwrap_or(Alignment::Left);
    if t_align != d_align {
        out.push(FormattingDifference {
            kind: DiffKind::Alignment,
            severity: Severity::Medium,
            paragraph_index: Some(idx),
            run_index: None,
            template_value: t_align.as_str().to_string(),
            draft_value: d_align.as_str().to_string(),
            detail: format!(
                "paragraph is {} but the template aligns it {}",
                d_align.as_str(),
                t_align.as_str()
            ),
            fix: Some(FixValue::Alignment(t_align)),
        });
    }

    if let Some(t_style) = tf.style_id.as_deref().filter(|s| !s.is_empty()) {
        if df.style_id.as_deref() != Some(t_style) {
            out.push(FormattingDifference {
                kind: DiffKind::Style,
                severity: Severity::High,
                paragraph_index: Some(idx),
                run_index: None,
                template_value: t_style.to_string(),
                draft_value: show(df.style_id.as_deref()),
                detail: format!(
                    "paragraph style is {} but the template uses {}",
                    show(df.style_id.as_deref()),
                    t_style
                ),
                fix: Some(FixValue::StyleId(t_style.to_string())),
            });
        }
    }

    if let Some(t_after) = tf.spacing_after.filter(|v| *v != 0) {
        if df.spacing_after != Some(t_after) {
            out.push(FormattingDifference {
                kind: DiffKind::Spacing,
                severity: Severity::Low,
                paragraph_index: Some(idx),
                run_index: None,
                template_value: t_after.to_string(),
                draft_value: show(df.spacing_after),
                detail: format!(
                    "spacing after is {} but the template uses {}",
                    show(df.spacing_after),
                    t_after
                ),
                fix: Some(FixValue::SpacingAfter(t_after)),
            });
        }
    }

    if let Some(t_left) = tf.indent_left.filter(|v| *v != 0) {
        if df.indent_left != Some(t_left) {
            out.push(FormattingDifference {
                kind: DiffKind::Indent,
                severity: Severity::Low,
                paragraph_index: Some(idx),
                run_index: None,
                template_value: t_left.to_string(),
                draft_value: show(df.indent_left),
                detail: format!(
                    "left indent is {} but the template uses {}",
                    show(df.indent_left),
                    t_left
                ),
                fix: Some(FixValue::IndentLeft(t_left)),
            });
        }
    }

    if let Some(t_head) = tf.heading_level {
        if df.heading_level != Some(t_head) {
            out.push(FormattingDifference {
                kind: DiffKind::Heading,
                severity: Severity::High,
                paragraph_index: Some(idx),
                run_index: None,
                template_value: t_head.to_string(),
                draft_value: show(df.heading_level),
                detail: format!(
                    "heading level is {} but the template uses {}",
                    show(df.heading_level),
                    t_head
                ),
                fix: Some(FixValue::HeadingLevel(t_head)),
            });
        }
    }

    let runs = template.runs.len().min(draft.runs.len());
    for ri in 0..runs {
        diff_run(&template.runs[ri], &draft.runs[ri], idx, ri, out);
    }
}

fn diff_run(template: &Run, draft: &Run, p_idx: usize, r_idx: usize, out: &mut Vec<FormattingDifference>) {
    let tf = &template.formatting;
    let df = &draft.formatting;

    let t_bold = tf.bold.unwrap_or(false);
    let d_bold = df.bold.unwrap_or(false);
    if t_bold != d_bold {
        out.push(FormattingDifference {
            kind: DiffKind::Font,
            severity: Severity::Medium,
            paragraph_index: Some(p_idx),
            run_index: Some(r_idx),
            template_value: t_bold.to_string(),
            draft_value: d_bold.to_string(),
            detail: if t_bold {
                "run is not bold but the template bolds it".to_string()
            } else {
                "run is bold but the template does not bold it".to_string()
            },
            fix: Some(FixValue::Bold(t_bold)),
        });
    }

    let t_italic = tf.italic.unwrap_or(false);
    let d_italic = df.italic.unwrap_or(false);
    if t_italic != d_italic {
        out.push(FormattingDifference {
            kind: DiffKind::Font,
            severity: Severity::Medium,
            paragraph_index: Some(p_idx),
            run_index: Some(r_idx),
            template_value: t_italic.to_string(),
            draft_value: d_italic.to_string(),
            detail: if t_italic {
                "run is not italic but the template italicizes it".to_string()
            } else {
                "run is italic but the template does not italicize it".to_string()
            },
            fix: Some(FixValue::Italic(t_italic)),
        });
    }

    if let Some(t_size) = tf.font_size {
        if df.font_size != Some(t_size) {
            out.push(FormattingDifference {
                kind: DiffKind::Font,
                severity: Severity::High,
                paragraph_index: Some(p_idx),
                run_index: Some(r_idx),
                template_value: t_size.to_string(),
                draft_value: show(df.font_size),
                detail: format!(
                    "font size is {} but the template uses {}",
                    show(df.font_size),
                    t_size
                ),
                fix: Some(FixValue::FontSize(t_size)),
            });
        }
    }

    if let Some(t_family) = tf.font_family.as_deref().filter(|f| !f.is_empty()) {
        if df.font_family.as_deref() != Some(t_family) {
            out.push(FormattingDifference {
                kind: DiffKind::Font,
                severity: Severity::High,
                paragraph_index: Some(p_idx),
                run_index: Some(r_idx),
                template_value: t_family.to_string(),
                draft_value: show(df.font_family.as_deref()),
                detail: format!(
                    "font family is {} but the template uses {}",
                    show(df.font_family.as_deref()),
                    t_family
                ),
                fix: Some(FixValue::FontFamily(t_family.to_string())),
            });
        }
    }
}
