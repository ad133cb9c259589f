use once_cell::sync::Lazy;
use regex::Regex;

/// `Section 4: Confidentiality`, `ARTICLE IV - Scope`. The token after the
/// word is the section number; a `.` `)` `:` or dash separator is tolerated.
static WORD_NUM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:section|article)\s+(\d+(?:\.\d+)*|[ivxlcdm]{1,8}|[a-z])\b\s*[:.)\-–—]?\s*(.*)$")
        .expect("word numbering re")
});

/// `3.2.1 Payment` - multi-component number with no trailing separator.
static MULTI_DOT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)+)\s+(.+)$").expect("multi dot re"));

/// `3. Term`, `3)` - dotted numerics with an explicit separator.
static DOTTED_NUM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)*)[.)]\s*(.*)$").expect("dotted numbering re"));

/// Upper-case roman only; lower-case single letters fall through to the
/// letter rule so `i.` lists do not read as top-level articles.
static ROMAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([IVXLCDM]{1,8})[.)]\s*(.*)$").expect("roman numbering re"));

static LETTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z])[.)]\s*(.*)$").expect("letter numbering re"));

static PAREN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(([A-Za-z0-9]{1,4})\)\s*(.*)$").expect("paren numbering re"));

/// A leader run of dots/middle-dots/ellipses or a tab, then a page number.
static TOC_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\S\s*(?:(?:\.\s*){2,}|[·…]{2,}|\t)\s*\d{1,4}\s*$").expect("toc line re")
});

const TITLE_VOCAB: &[&str] = &[
    "definitions",
    "interpretation",
    "recitals",
    "background",
    "introduction",
    "term",
    "term and termination",
    "termination",
    "payment terms",
    "fees",
    "fees and payment",
    "confidentiality",
    "intellectual property",
    "indemnification",
    "indemnity",
    "limitation of liability",
    "warranties",
    "representations and warranties",
    "governing law",
    "dispute resolution",
    "force majeure",
    "assignment",
    "notices",
    "severability",
    "entire agreement",
    "amendments",
    "waiver",
    "survival",
    "insurance",
    "compliance with laws",
    "counterparts",
    "miscellaneous",
    "exhibits",
    "table of contents",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberedHeading {
    pub number: String,
    pub title: Option<String>,
    pub level: u32,
}

fn heading(number: &str, title: &str) -> NumberedHeading {
    let title = title.trim();
    NumberedHeading {
        number: number.to_string(),
        title: if title.is_empty() {
            None
        } else {
            Some(title.to_string())
        },
        level: number_level(number),
    }
}

/// Tries each numbering form in order and returns the first hit.
pub fn match_numbered(text: &str) -> Option<NumberedHeading> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Some(c) = WORD_NUM_RE.captures(text) {
        return Some(heading(&c[1], &c[2]));
    }
    if let Some(c) = PAREN_RE.captures(text) {
        return Some(heading(&format!("({})", &c[1]), &c[2]));
    }
    if let Some(c) = MULTI_DOT_RE.captures(text) {
        return Some(heading(&c[1], &c[2]));
    }
    if let Some(c) = DOTTED_NUM_RE.captures(text) {
        return Some(heading(&c[1], &c[2]));
    }
    if let Some(c) = ROMAN_RE.captures(text) {
        return Some(heading(&c[1], &c[2]));
    }
    if let Some(c) = LETTER_RE.captures(text) {
        return Some(heading(&c[1], &c[2]));
    }
    None
}

/// Level rules: dotted numerics count components, romans are top level,
/// single letters second, parenthesized third, everything else first.
pub fn number_level(number: &str) -> u32 {
    let n = number.trim();
    if n.starts_with('(') {
        return 3;
    }
    if !n.is_empty() && n.chars().all(|c| "IVXLCDM".contains(c)) {
        return 1;
    }
    if n.len() == 1 && n.chars().all(|c| c.is_ascii_alphabetic()) {
        return 2;
    }
    if !n.is_empty() && n.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return n.matches('.').count() as u32 + 1;
    }
    1
}

pub fn is_title_vocabulary(text: &str, extra: &[String]) -> bool {
    let t = text
        .trim()
        .trim_end_matches([':', '.'])
        .trim()
        .to_lowercase();
    if t.is_empty() {
        return false;
    }
    TITLE_VOCAB.iter().any(|v| *v == t) || extra.iter().any(|v| v.to_lowercase() == t)
}

pub fn is_all_caps(text: &str) -> bool {
    let t = text.trim();
    let mut saw_alpha = false;
    for c in t.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_alphabetic() {
            saw_alpha = true;
        }
    }
    saw_alpha
}

pub fn is_toc_line(text: &str) -> bool {
    TOC_LINE_RE.is_match(text.trim_end())
}

pub fn is_toc_title(text: &str) -> bool {
    let t = text
        .trim()
        .trim_end_matches([':', '.'])
        .trim()
        .to_lowercase();
    t == "table of contents" || t == "contents"
}
