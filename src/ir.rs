use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
    Distribute,
}

impl Alignment {
    /// Maps a `w:jc` value onto the canonical set. Unknown values are treated
    /// as unset rather than invented.
    pub fn from_jc(val: &str) -> Option<Alignment> {
        match val.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            "both" | "justify" => Some(Alignment::Justify),
            "distribute" => Some(Alignment::Distribute),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
            Alignment::Distribute => "distribute",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunFormatting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strike: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
    /// Points, converted from half-point `w:sz`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphFormatting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    /// Twips.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_left: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_right: Option<i32>,
    /// Twips. `w:hanging` lands here negated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_first_line: Option<i32>,
    /// Twentieths of a point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing_before: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing_after: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_spacing: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline_lvl: Option<i32>,
    /// Resolved from the outline level or a heading/title style.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_level: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    #[serde(default)]
    pub formatting: RunFormatting,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
    pub runs: Vec<Run>,
    #[serde(default)]
    pub formatting: ParagraphFormatting,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TableCell {
    pub paragraphs: Vec<Paragraph>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_span: Option<i32>,
    #[serde(default)]
    pub vmerge: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shading: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn cell_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        for row in &self.rows {
            for cell in &row.cells {
                for p in &cell.paragraphs {
                    if !p.text.trim().is_empty() {
                        parts.push(p.text.clone());
                    }
                }
            }
        }
        parts.join("\n")
    }
}

/// One body-order primitive. Produced once per document, never mutated.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_from_jc() {
        assert_eq!(Alignment::from_jc("center"), Some(Alignment::Center));
        assert_eq!(Alignment::from_jc("start"), Some(Alignment::Left));
        assert_eq!(Alignment::from_jc("end"), Some(Alignment::Right));
        assert_eq!(Alignment::from_jc("both"), Some(Alignment::Justify));
        assert_eq!(Alignment::from_jc("mediumKashida"), None);
    }

    #[test]
    fn test_alignment_serializes_lowercase() {
        let v = serde_json::to_value(Alignment::Justify).unwrap();
        assert_eq!(v, serde_json::json!("justify"));
    }

    #[test]
    fn test_table_cell_text_skips_blank_paragraphs() {
        let table = Table {
            rows: vec![TableRow {
                cells: vec![
                    TableCell {
                        paragraphs: vec![Paragraph {
                            text: "Fee".into(),
                            runs: vec![],
                            formatting: ParagraphFormatting::default(),
                        }],
                        grid_span: None,
                        vmerge: false,
                        shading: None,
                    },
                    TableCell {
                        paragraphs: vec![Paragraph {
                            text: "   ".into(),
                            runs: vec![],
                            formatting: ParagraphFormatting::default(),
                        }],
                        grid_span: None,
                        vmerge: false,
                        shading: None,
                    },
                ],
            }],
        };
        assert_eq!(table.cell_text(), "Fee");
    }
}
