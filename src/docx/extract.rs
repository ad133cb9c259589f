use crate::docx::metadata;
use crate::docx::package::DocxPackage;
use crate::docx::styles::{self, StyleCatalog};
use crate::docx::xml::{find_attr, parse_xml_part, XmlEvent, XmlPart};
use crate::error::Result;
use crate::format::normalize;
use crate::ir::{Block, DocumentMetadata, Paragraph, Run, Table, TableCell, TableRow};

/// Everything downstream stages consume from one container: the body-order
/// block stream plus the optional parts, with their degradations recorded
/// instead of propagated.
#[derive(Debug)]
pub struct ParsedDocument {
    pub label: String,
    pub blocks: Vec<Block>,
    pub metadata: DocumentMetadata,
    pub styles: StyleCatalog,
    pub warnings: Vec<String>,
}

pub fn parse_document(label: &str, bytes: &[u8]) -> Result<ParsedDocument> {
    let pkg = DocxPackage::from_bytes(label, bytes)?;
    let mut warnings: Vec<String> = Vec::new();

    let styles = match pkg.part("word/styles.xml") {
        Some(data) => match styles::parse_styles(data) {
            Ok(catalog) => catalog,
            Err(e) => {
                warnings.push(format!("word/styles.xml unreadable: {e}"));
                StyleCatalog::default()
            }
        },
        None => StyleCatalog::default(),
    };

    let metadata = match metadata::core_properties(&pkg) {
        Ok(Some(m)) => m,
        Ok(None) => DocumentMetadata::default(),
        Err(e) => {
            warnings.push(format!("docProps/core.xml unreadable: {e}"));
            DocumentMetadata::default()
        }
    };

    let doc_bytes = pkg.document_part()?;
    let doc = parse_xml_part("word/document.xml", doc_bytes)?;
    let blocks = extract_blocks(&doc, &styles);
    log::debug!(
        "{label}: {} blocks, {} styles, {} warning(s)",
        blocks.len(),
        styles.len(),
        warnings.len()
    );

    Ok(ParsedDocument {
        label: label.to_string(),
        blocks,
        metadata,
        styles,
        warnings,
    })
}

#[derive(Default, Clone)]
pub struct RawRunProps {
    pub b: Option<bool>,
    pub i: Option<bool>,
    pub u: Option<String>,
    pub strike: Option<bool>,
    pub color: Option<String>,
    pub highlight: Option<String>,
    pub sz: Option<String>,
    pub fonts_ascii: Option<String>,
    pub fonts_hansi: Option<String>,
}

#[derive(Default, Clone)]
pub struct RawParaProps {
    pub p_style: Option<String>,
    pub jc: Option<String>,
    pub ind_left: Option<i32>,
    pub ind_right: Option<i32>,
    pub ind_first_line: Option<i32>,
    pub ind_hanging: Option<i32>,
    pub spacing_before: Option<i32>,
    pub spacing_after: Option<i32>,
    pub spacing_line: Option<i32>,
    pub outline_lvl: Option<i32>,
}

fn parse_i32_attr(attrs: &[(String, String)], key: &str) -> Option<i32> {
    find_attr(attrs, key).and_then(|v| v.trim().parse::<i32>().ok())
}

fn control_append(buf: &mut String, name: &str, attrs: &[(String, String)]) {
    match name {
        "w:tab" | "w:ptab" => buf.push('\t'),
        "w:cr" => buf.push('\n'),
        "w:br" => {
            let br_type = find_attr(attrs, "w:type");
            if br_type.unwrap_or("textWrapping") == "textWrapping" {
                buf.push('\n');
            }
        }
        "w:noBreakHyphen" => buf.push('-'),
        "w:softHyphen" => {}
        _ => {}
    }
}

fn parse_run_property(props: &mut RawRunProps, name: &str, attrs: &[(String, String)]) {
    match name {
        "w:b" => props.b = Some(parse_w_bool(attrs)),
        "w:i" => props.i = Some(parse_w_bool(attrs)),
        "w:strike" => props.strike = Some(parse_w_bool(attrs)),
        "w:u" => props.u = find_attr(attrs, "w:val").map(|v| v.to_string()),
        "w:color" => props.color = find_attr(attrs, "w:val").map(|v| v.to_string()),
        "w:highlight" => props.highlight = find_attr(attrs, "w:val").map(|v| v.to_string()),
        "w:sz" => props.sz = find_attr(attrs, "w:val").map(|v| v.to_string()),
        "w:rFonts" => {
            props.fonts_ascii = find_attr(attrs, "w:ascii").map(|v| v.to_string());
            props.fonts_hansi = find_attr(attrs, "w:hAnsi").map(|v| v.to_string());
        }
        _ => {}
    }
}

fn parse_para_property(props: &mut RawParaProps, name: &str, attrs: &[(String, String)]) {
    match name {
        "w:pStyle" => {
            if let Some(v) = find_attr(attrs, "w:val") {
                let v = v.trim();
                if !v.is_empty() {
                    props.p_style = Some(v.to_string());
                }
            }
        }
        "w:jc" => props.jc = find_attr(attrs, "w:val").map(|v| v.to_string()),
        "w:ind" => {
            props.ind_left = parse_i32_attr(attrs, "w:left").or(parse_i32_attr(attrs, "w:start"));
            props.ind_right = parse_i32_attr(attrs, "w:right").or(parse_i32_attr(attrs, "w:end"));
            props.ind_first_line = parse_i32_attr(attrs, "w:firstLine");
            props.ind_hanging = parse_i32_attr(attrs, "w:hanging");
        }
        "w:spacing" => {
            props.spacing_before = parse_i32_attr(attrs, "w:before");
            props.spacing_after = parse_i32_attr(attrs, "w:after");
            props.spacing_line = parse_i32_attr(attrs, "w:line");
        }
        "w:outlineLvl" => {
            if props.outline_lvl.is_none() {
                props.outline_lvl = parse_i32_attr(attrs, "w:val");
            }
        }
        _ => {}
    }
}

pub(crate) fn parse_w_bool(attrs: &[(String, String)]) -> bool {
    if let Some(v) = find_attr(attrs, "w:val") {
        let s = v.trim().to_ascii_lowercase();
        return !(s == "0" || s == "false" || s == "off" || s == "none");
    }
    true
}

#[derive(Default, Clone)]
struct RunCapture {
    text: String,
    props: RawRunProps,
    rpr_stack_len: Option<usize>,
}

#[derive(Default, Clone)]
struct ParaCapture {
    p_stack_len: usize,
    text: String,
    runs: Vec<Run>,
    props: RawParaProps,
    direct_ppr_stack_len: Option<usize>,
    direct_r_stack_len: Option<usize>,
    hyperlink_stack_len: Option<usize>,
    hyperlink_r_stack_len: Option<usize>,
    w_t_stack_len: Option<usize>,
    run: Option<RunCapture>,
}

impl ParaCapture {
    fn in_direct_run(&self, stack_len: usize) -> bool {
        self.direct_r_stack_len == Some(stack_len) || self.hyperlink_r_stack_len == Some(stack_len)
    }

    fn close_run(&mut self) {
        if let Some(run) = self.run.take() {
            if !run.text.is_empty() {
                self.runs.push(Run {
                    text: run.text,
                    formatting: normalize::run_formatting(&run.props),
                });
            }
        }
    }

    fn finish(mut self, catalog: &StyleCatalog) -> Option<Paragraph> {
        self.close_run();
        if self.text.trim().is_empty() {
            return None;
        }
        Some(Paragraph {
            text: self.text,
            runs: self.runs,
            formatting: normalize::paragraph_formatting(&self.props, catalog),
        })
    }
}

#[derive(Default)]
struct CellCapture {
    paragraphs: Vec<Paragraph>,
    grid_span: Option<i32>,
    vmerge: bool,
    shading: Option<String>,
}

#[derive(Default)]
struct TableCapture {
    rows: Vec<TableRow>,
    row: Option<Vec<TableCell>>,
    cell: Option<CellCapture>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ParaSink {
    Body,
    Cell,
}

/// Walks `word/document.xml` and yields body-order blocks. Only depth-1
/// tables become blocks; paragraphs inside nested tables are not captured.
pub fn extract_blocks(part: &XmlPart, catalog: &StyleCatalog) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut stack: Vec<String> = Vec::new();

    let mut tbl_depth = 0usize;
    let mut table: Option<TableCapture> = None;
    let mut in_tcpr = false;

    let mut capturing: Option<(ParaCapture, ParaSink)> = None;

    for ev in &part.events {
        match ev {
            XmlEvent::Start { name, attrs } => {
                let parent = stack.last().map(|s| s.as_str()).unwrap_or("");

                match name.as_str() {
                    "w:tbl" => {
                        if parent == "w:body" && tbl_depth == 0 {
                            table = Some(TableCapture::default());
                        }
                        tbl_depth += 1;
                    }
                    "w:tr" => {
                        if tbl_depth == 1 && parent == "w:tbl" {
                            if let Some(t) = table.as_mut() {
                                t.row = Some(Vec::new());
                            }
                        }
                    }
                    "w:tc" => {
                        if tbl_depth == 1 && parent == "w:tr" {
                            if let Some(t) = table.as_mut() {
                                t.cell = Some(CellCapture::default());
                            }
                        }
                    }
                    "w:tcPr" => {
                        if tbl_depth == 1 && parent == "w:tc" {
                            in_tcpr = true;
                        }
                    }
                    "w:p" => {
                        if parent == "w:body" && tbl_depth == 0 {
                            capturing = Some((
                                ParaCapture {
                                    p_stack_len: stack.len() + 1,
                                    ..Default::default()
                                },
                                ParaSink::Body,
                            ));
                        } else if parent == "w:tc" && tbl_depth == 1 {
                            capturing = Some((
                                ParaCapture {
                                    p_stack_len: stack.len() + 1,
                                    ..Default::default()
                                },
                                ParaSink::Cell,
                            ));
                        }
                    }
                    _ => {}
                }

                if in_tcpr {
                    if let Some(cell) = table.as_mut().and_then(|t| t.cell.as_mut()) {
                        parse_cell_property(cell, name, attrs);
                    }
                }

                if let Some((ref mut cap, _)) = capturing {
                    on_para_container_start(cap, name, &stack, parent);
                    on_para_leaf(cap, name, attrs, &stack, parent);
                }

                stack.push(name.clone());
            }
            XmlEvent::Empty { name, attrs } => {
                let parent = stack.last().map(|s| s.as_str()).unwrap_or("");

                if in_tcpr {
                    if let Some(cell) = table.as_mut().and_then(|t| t.cell.as_mut()) {
                        parse_cell_property(cell, name, attrs);
                    }
                }

                // Containers never open from an empty element; only leaves
                // matter here.
                if let Some((ref mut cap, _)) = capturing {
                    on_para_leaf(cap, name, attrs, &stack, parent);
                }
            }
            XmlEvent::Text { text } => {
                if let Some((ref mut cap, _)) = capturing {
                    if cap.w_t_stack_len.is_some() {
                        cap.text.push_str(text);
                        if let Some(run) = cap.run.as_mut() {
                            run.text.push_str(text);
                        }
                    }
                }
            }
            XmlEvent::End { name } => {
                if let Some((ref mut cap, _)) = capturing {
                    if name == "w:t" {
                        if cap.w_t_stack_len == Some(stack.len()) {
                            cap.w_t_stack_len = None;
                        }
                    } else if name == "w:pPr" {
                        if cap.direct_ppr_stack_len == Some(stack.len()) {
                            cap.direct_ppr_stack_len = None;
                        }
                    } else if name == "w:rPr" {
                        if let Some(run) = cap.run.as_mut() {
                            if run.rpr_stack_len == Some(stack.len()) {
                                run.rpr_stack_len = None;
                            }
                        }
                    } else if name == "w:r" {
                        if cap.direct_r_stack_len == Some(stack.len()) {
                            cap.direct_r_stack_len = None;
                            cap.close_run();
                        }
                        if cap.hyperlink_r_stack_len == Some(stack.len()) {
                            cap.hyperlink_r_stack_len = None;
                            cap.close_run();
                        }
                    } else if name == "w:hyperlink" {
                        if cap.hyperlink_stack_len == Some(stack.len()) {
                            cap.hyperlink_stack_len = None;
                            cap.hyperlink_r_stack_len = None;
                        }
                    }
                }

                match name.as_str() {
                    "w:p" => {
                        if let Some((cap, sink)) = capturing.take() {
                            let para = cap.finish(catalog);
                            match sink {
                                ParaSink::Body => {
                                    if let Some(p) = para {
                                        blocks.push(Block::Paragraph(p));
                                    }
                                }
                                ParaSink::Cell => {
                                    if let (Some(p), Some(cell)) =
                                        (para, table.as_mut().and_then(|t| t.cell.as_mut()))
                                    {
                                        cell.paragraphs.push(p);
                                    }
                                }
                            }
                        }
                    }
                    "w:tcPr" => in_tcpr = false,
                    "w:tc" => {
                        if tbl_depth == 1 {
                            if let Some(t) = table.as_mut() {
                                if let (Some(cell), Some(row)) = (t.cell.take(), t.row.as_mut()) {
                                    row.push(TableCell {
                                        paragraphs: cell.paragraphs,
                                        grid_span: cell.grid_span,
                                        vmerge: cell.vmerge,
                                        shading: cell.shading,
                                    });
                                }
                            }
                        }
                    }
                    "w:tr" => {
                        if tbl_depth == 1 {
                            if let Some(t) = table.as_mut() {
                                if let Some(cells) = t.row.take() {
                                    t.rows.push(TableRow { cells });
                                }
                            }
                        }
                    }
                    "w:tbl" => {
                        if tbl_depth > 0 {
                            tbl_depth -= 1;
                        }
                        if tbl_depth == 0 {
                            if let Some(t) = table.take() {
                                blocks.push(Block::Table(Table { rows: t.rows }));
                            }
                        }
                    }
                    _ => {}
                }

                let _ = stack.pop();
            }
            _ => {}
        }
    }

    blocks
}

fn on_para_container_start(cap: &mut ParaCapture, name: &str, stack: &[String], parent: &str) {
    match name {
        "w:pPr" => {
            if parent == "w:p" && stack.len() == cap.p_stack_len {
                cap.direct_ppr_stack_len = Some(stack.len() + 1);
            }
        }
        "w:hyperlink" => {
            if parent == "w:p" && stack.len() == cap.p_stack_len {
                cap.hyperlink_stack_len = Some(stack.len() + 1);
            }
        }
        "w:r" => {
            if parent == "w:p" && stack.len() == cap.p_stack_len {
                cap.direct_r_stack_len = Some(stack.len() + 1);
                cap.run = Some(RunCapture::default());
            } else if parent == "w:hyperlink" && cap.hyperlink_stack_len == Some(stack.len()) {
                cap.hyperlink_r_stack_len = Some(stack.len() + 1);
                cap.run = Some(RunCapture::default());
            }
        }
        "w:rPr" => {
            if parent == "w:r" && cap.in_direct_run(stack.len()) {
                if let Some(run) = cap.run.as_mut() {
                    run.rpr_stack_len = Some(stack.len() + 1);
                }
            }
        }
        "w:t" => {
            if parent == "w:r" && cap.in_direct_run(stack.len()) {
                cap.w_t_stack_len = Some(stack.len() + 1);
            }
        }
        _ => {}
    }
}

fn on_para_leaf(
    cap: &mut ParaCapture,
    name: &str,
    attrs: &[(String, String)],
    stack: &[String],
    parent: &str,
) {
    if let "w:tab" | "w:ptab" | "w:cr" | "w:br" | "w:noBreakHyphen" | "w:softHyphen" = name {
        if parent == "w:r" && cap.in_direct_run(stack.len()) {
            control_append(&mut cap.text, name, attrs);
            if let Some(run) = cap.run.as_mut() {
                control_append(&mut run.text, name, attrs);
            }
        }
        return;
    }

    if cap.direct_ppr_stack_len.is_some() && parent == "w:pPr" {
        parse_para_property(&mut cap.props, name, attrs);
    }

    if let Some(run) = cap.run.as_mut() {
        if run.rpr_stack_len.is_some() && parent == "w:rPr" {
            parse_run_property(&mut run.props, name, attrs);
        }
    }
}

fn parse_cell_property(cell: &mut CellCapture, name: &str, attrs: &[(String, String)]) {
    match name {
        "w:gridSpan" => cell.grid_span = parse_i32_attr(attrs, "w:val"),
        "w:vMerge" => {
            // Absent val means "continue": the cell is merged away.
            cell.vmerge = find_attr(attrs, "w:val").map(|v| v.trim()) != Some("restart");
        }
        "w:shd" => cell.shading = find_attr(attrs, "w:fill").map(|v| v.to_string()),
        _ => {}
    }
}
