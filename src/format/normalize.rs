//! Raw WordprocessingML property bags become comparable values here.
//! Everything downstream (alignment scoring, the formatting differ, the
//! report) sees points, twips and resolved style names, never `w:` attrs.

use crate::docx::extract::{RawParaProps, RawRunProps};
use crate::docx::styles::StyleCatalog;
use crate::ir::{Alignment, ParagraphFormatting, RunFormatting};

pub fn run_formatting(raw: &RawRunProps) -> RunFormatting {
    RunFormatting {
        bold: raw.b,
        italic: raw.i,
        // An explicit "none" just restates the default.
        underline: raw
            .u
            .as_deref()
            .filter(|v| !v.eq_ignore_ascii_case("none"))
            .map(str::to_string),
        strike: raw.strike,
        color: raw
            .color
            .as_deref()
            .filter(|v| !v.eq_ignore_ascii_case("auto"))
            .map(str::to_string),
        highlight: raw.highlight.clone(),
        font_size: raw
            .sz
            .as_deref()
            .and_then(|v| v.trim().parse::<f32>().ok())
            .map(|half_points| half_points / 2.0),
        font_family: raw.fonts_ascii.clone().or_else(|| raw.fonts_hansi.clone()),
    }
}

pub fn paragraph_formatting(raw: &RawParaProps, catalog: &StyleCatalog) -> ParagraphFormatting {
    let style_name = raw
        .p_style
        .as_deref()
        .and_then(|id| catalog.style_name(id))
        .map(str::to_string);

    // A direct outline level beats whatever the style implies.
    let heading_level = match raw.outline_lvl {
        Some(l) if l >= 0 => Some(l as u32 + 1),
        _ => raw
            .p_style
            .as_deref()
            .and_then(|id| catalog.heading_level_of(id)),
    };

    ParagraphFormatting {
        alignment: raw.jc.as_deref().and_then(Alignment::from_jc),
        indent_left: raw.ind_left,
        indent_right: raw.ind_right,
        // `w:hanging` supersedes `w:firstLine` when both appear.
        indent_first_line: raw.ind_hanging.map(|h| -h).or(raw.ind_first_line),
        spacing_before: raw.spacing_before,
        spacing_after: raw.spacing_after,
        line_spacing: raw.spacing_line,
        style_id: raw.p_style.clone(),
        style_name,
        outline_lvl: raw.outline_lvl,
        heading_level,
    }
}
