use crate::ir::{Block, Paragraph, Table};
use crate::section::patterns;
use crate::section::Section;

#[derive(Clone, Debug)]
pub struct SegmenterConfig {
    /// Additional full-line titles accepted on top of the built-in contract
    /// vocabulary.
    pub extra_title_vocabulary: Vec<String>,
    /// Vocabulary and all-caps candidates longer than this are body text.
    pub header_len_ceiling: usize,
    /// A non-header line longer than this ends table-of-contents suppression.
    pub toc_exit_len: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            extra_title_vocabulary: Vec::new(),
            header_len_ceiling: 150,
            toc_exit_len: 60,
        }
    }
}

#[derive(Clone, Debug)]
struct HeaderInfo {
    number: Option<String>,
    title: Option<String>,
    level: u32,
}

type Strategy = fn(&Paragraph, &SegmenterConfig) -> Option<HeaderInfo>;

/// Ordered candidate cascade; the first strategy that accepts a paragraph
/// decides its header shape.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("numbering", numbering_strategy),
    ("heading_style", heading_style_strategy),
    ("title_vocabulary", vocabulary_strategy),
    ("all_caps", all_caps_strategy),
];

fn numbering_strategy(p: &Paragraph, _cfg: &SegmenterConfig) -> Option<HeaderInfo> {
    patterns::match_numbered(p.text.trim()).map(|h| HeaderInfo {
        number: Some(h.number),
        title: h.title,
        level: h.level,
    })
}

fn heading_style_strategy(p: &Paragraph, _cfg: &SegmenterConfig) -> Option<HeaderInfo> {
    p.formatting.heading_level?;
    Some(HeaderInfo {
        number: None,
        title: Some(p.text.trim().to_string()),
        level: 1,
    })
}

fn vocabulary_strategy(p: &Paragraph, cfg: &SegmenterConfig) -> Option<HeaderInfo> {
    let text = p.text.trim();
    if text.chars().count() > cfg.header_len_ceiling {
        return None;
    }
    if !patterns::is_title_vocabulary(text, &cfg.extra_title_vocabulary) {
        return None;
    }
    Some(HeaderInfo {
        number: None,
        title: Some(text.to_string()),
        level: 1,
    })
}

fn all_caps_strategy(p: &Paragraph, cfg: &SegmenterConfig) -> Option<HeaderInfo> {
    let text = p.text.trim();
    if text.chars().count() > cfg.header_len_ceiling {
        return None;
    }
    if !patterns::is_all_caps(text) {
        return None;
    }
    Some(HeaderInfo {
        number: None,
        title: Some(text.to_string()),
        level: 1,
    })
}

fn detect_header(p: &Paragraph, cfg: &SegmenterConfig) -> Option<HeaderInfo> {
    for (name, strategy) in STRATEGIES {
        if let Some(info) = strategy(p, cfg) {
            log::trace!("header via {name}: {}", p.text.trim());
            return Some(info);
        }
    }
    None
}

struct OpenSection {
    number: Option<String>,
    title: Option<String>,
    level: u32,
    header: Option<Paragraph>,
    body: Vec<Paragraph>,
    tables: Vec<Table>,
}

impl OpenSection {
    fn implicit() -> Self {
        OpenSection {
            number: None,
            title: Some("Introduction".to_string()),
            level: 1,
            header: None,
            body: Vec::new(),
            tables: Vec::new(),
        }
    }

    fn from_header(info: HeaderInfo, header: &Paragraph) -> Self {
        OpenSection {
            number: info.number,
            title: info.title,
            level: info.level,
            header: Some(header.clone()),
            body: Vec::new(),
            tables: Vec::new(),
        }
    }

    fn close(self, position: usize) -> Section {
        let body = self
            .body
            .iter()
            .map(|p| p.text.trim())
            .collect::<Vec<_>>()
            .join("\n\n");
        let mut paragraphs = Vec::with_capacity(self.body.len() + 1);
        if let Some(h) = self.header {
            paragraphs.push(h);
        }
        paragraphs.extend(self.body);
        Section {
            id: format!("sec-{position}"),
            number: self.number,
            title: self.title,
            level: self.level,
            body,
            paragraphs,
            tables: self.tables,
            position,
        }
    }
}

fn ensure_open(open: &mut Option<OpenSection>) -> &mut OpenSection {
    open.get_or_insert_with(OpenSection::implicit)
}

/// Single pass over the block stream. Every non-empty paragraph lands in
/// exactly one section, except table-of-contents listing lines, which are
/// dropped while suppression is active.
pub fn segment_blocks(blocks: &[Block], cfg: &SegmenterConfig) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut open: Option<OpenSection> = None;
    let mut in_toc = false;

    let close_and_start =
        |sections: &mut Vec<Section>, open: &mut Option<OpenSection>, next: OpenSection| {
            if let Some(done) = open.take() {
                sections.push(done.close(sections.len()));
            }
            *open = Some(next);
        };

    for block in blocks {
        match block {
            Block::Table(t) => {
                ensure_open(&mut open).tables.push(t.clone());
            }
            Block::Paragraph(p) => {
                let text = p.text.trim();
                if text.is_empty() {
                    continue;
                }

                if in_toc {
                    if patterns::is_toc_line(text) {
                        continue;
                    }
                    if let Some(info) = detect_header(p, cfg) {
                        in_toc = header_is_toc(text, &info);
                        close_and_start(&mut sections, &mut open, OpenSection::from_header(info, p));
                    } else if text.chars().count() > cfg.toc_exit_len {
                        in_toc = false;
                        ensure_open(&mut open).body.push(p.clone());
                    }
                    // Short stray lines inside the listing go with it.
                    continue;
                }

                if patterns::is_toc_line(text) {
                    // Outside suppression a TOC-shaped line is never a
                    // header, only body.
                    ensure_open(&mut open).body.push(p.clone());
                    continue;
                }

                match detect_header(p, cfg) {
                    Some(info) => {
                        in_toc = header_is_toc(text, &info);
                        close_and_start(&mut sections, &mut open, OpenSection::from_header(info, p));
                    }
                    None => ensure_open(&mut open).body.push(p.clone()),
                }
            }
        }
    }

    if let Some(done) = open.take() {
        sections.push(done.close(sections.len()));
    }
    sections
}

fn header_is_toc(text: &str, info: &HeaderInfo) -> bool {
    patterns::is_toc_title(text)
        || info
            .title
            .as_deref()
            .is_some_and(patterns::is_toc_title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ParagraphFormatting, RunFormatting};

    fn para(text: &str) -> Block {
        Block::Paragraph(Paragraph {
            text: text.to_string(),
            runs: vec![crate::ir::Run {
                text: text.to_string(),
                formatting: RunFormatting::default(),
            }],
            formatting: ParagraphFormatting::default(),
        })
    }

    fn styled_para(text: &str, heading_level: u32) -> Block {
        let mut p = match para(text) {
            Block::Paragraph(p) => p,
            _ => unreachable!(),
        };
        p.formatting.heading_level = Some(heading_level);
        p.formatting.style_id = Some(format!("Heading{heading_level}"));
        Block::Paragraph(p)
    }

    fn empty_table() -> Block {
        Block::Table(Table { rows: vec![] })
    }

    #[test]
    fn partitions_every_paragraph_exactly_once() {
        let blocks = vec![
            para("This Agreement is made between the parties."),
            para("1. Definitions"),
            para("Capitalized terms have the meanings set out below."),
            para("2. Term"),
            para("This Agreement starts on the Effective Date."),
            para("It continues for two years."),
        ];
        let sections = segment_blocks(&blocks, &SegmenterConfig::default());

        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].title.as_deref(), Some("Introduction"));
        assert_eq!(sections[0].number, None);
        assert_eq!(sections[1].number.as_deref(), Some("1"));
        assert_eq!(sections[2].number.as_deref(), Some("2"));

        let total: usize = sections.iter().map(|s| s.paragraphs.len()).sum();
        assert_eq!(total, blocks.len());

        // Header text stays out of the body.
        assert_eq!(
            sections[2].body,
            "This Agreement starts on the Effective Date.\n\nIt continues for two years."
        );
        assert_eq!(sections[2].paragraphs[0].text, "2. Term");
    }

    #[test]
    fn no_implicit_section_when_document_opens_with_header() {
        let blocks = vec![para("1. Definitions"), para("Body text.")];
        let sections = segment_blocks(&blocks, &SegmenterConfig::default());
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].number.as_deref(), Some("1"));
        assert_eq!(sections[0].id, "sec-0");
    }

    #[test]
    fn style_vocabulary_and_caps_headers() {
        let blocks = vec![
            styled_para("Scope of Services", 2),
            para("The supplier will provide the services."),
            para("Confidentiality"),
            para("Each party shall protect the other's information."),
            para("GOVERNING LAW AND VENUE"),
            para("The laws of Delaware govern this Agreement."),
        ];
        let sections = segment_blocks(&blocks, &SegmenterConfig::default());
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].title.as_deref(), Some("Scope of Services"));
        // Unnumbered headers sit at the top level regardless of style depth.
        assert_eq!(sections[0].level, 1);
        assert_eq!(sections[1].title.as_deref(), Some("Confidentiality"));
        assert_eq!(sections[2].title.as_deref(), Some("GOVERNING LAW AND VENUE"));
    }

    #[test]
    fn long_all_caps_line_is_body_not_header() {
        let shouting = "THE PARTIES ACKNOWLEDGE AND AGREE THAT ".repeat(5);
        let blocks = vec![para("1. Liability"), para(&shouting)];
        let sections = segment_blocks(&blocks, &SegmenterConfig::default());
        assert_eq!(sections.len(), 1);
        assert!(sections[0].body.starts_with("THE PARTIES"));
    }

    #[test]
    fn toc_listing_is_dropped_entirely() {
        let blocks = vec![
            para("Table of Contents"),
            para("1. Definitions........3"),
            para("2. Term........5"),
            para("3. Payment........8"),
            para("1. Definitions"),
            para("Terms used in this Agreement."),
        ];
        let sections = segment_blocks(&blocks, &SegmenterConfig::default());

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title.as_deref(), Some("Table of Contents"));
        assert!(sections[0].body.is_empty());
        assert_eq!(sections[0].paragraphs.len(), 1);
        assert_eq!(sections[1].number.as_deref(), Some("1"));
        assert_eq!(sections[1].body, "Terms used in this Agreement.");
    }

    #[test]
    fn long_paragraph_ends_toc_suppression() {
        let blocks = vec![
            para("CONTENTS"),
            para("Exhibit A\t12"),
            para("This paragraph is comfortably longer than sixty characters and is real content."),
            para("More content here."),
        ];
        let sections = segment_blocks(&blocks, &SegmenterConfig::default());
        assert_eq!(sections.len(), 1);
        assert!(sections[0].body.contains("real content"));
        assert!(sections[0].body.contains("More content here."));
        assert!(!sections[0].body.contains("Exhibit A"));
    }

    #[test]
    fn toc_shaped_line_outside_suppression_is_body() {
        let blocks = vec![
            para("1. Fees"),
            para("See the schedule....4"),
        ];
        let sections = segment_blocks(&blocks, &SegmenterConfig::default());
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].body, "See the schedule....4");
    }

    #[test]
    fn tables_attach_to_the_open_section_including_the_implicit_one() {
        let blocks = vec![
            empty_table(),
            para("1. Fees"),
            empty_table(),
            empty_table(),
        ];
        let sections = segment_blocks(&blocks, &SegmenterConfig::default());
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title.as_deref(), Some("Introduction"));
        assert_eq!(sections[0].tables.len(), 1);
        assert_eq!(sections[1].tables.len(), 2);
    }

    #[test]
    fn blank_paragraphs_are_skipped() {
        let blocks = vec![para("1. Term"), para("   "), para("Kept.")];
        let sections = segment_blocks(&blocks, &SegmenterConfig::default());
        assert_eq!(sections[0].paragraphs.len(), 2);
        assert_eq!(sections[0].body, "Kept.");
    }

    #[test]
    fn ids_and_positions_are_stable() {
        let blocks = vec![
            para("1. One"),
            para("2. Two"),
            para("3. Three"),
        ];
        let sections = segment_blocks(&blocks, &SegmenterConfig::default());
        for (i, s) in sections.iter().enumerate() {
            assert_eq!(s.position, i);
            assert_eq!(s.id, format!("sec-{i}"));
        }
    }
}
