use std::collections::HashMap;

use crate::docx::xml::{find_attr, parse_xml_part, XmlEvent};
use crate::error::Result;

#[derive(Clone, Debug)]
pub struct StyleDefinition {
    pub id: String,
    pub name: Option<String>,
    pub heading_level: Option<u32>,
}

/// Named styles from `word/styles.xml`, keyed by style id. An absent or
/// unreadable part degrades to an empty catalog; segmentation then leans on
/// raw style ids and outline levels alone.
#[derive(Clone, Debug, Default)]
pub struct StyleCatalog {
    styles: HashMap<String, StyleDefinition>,
}

impl StyleCatalog {
    pub fn get(&self, id: &str) -> Option<&StyleDefinition> {
        self.styles.get(id)
    }

    pub fn style_name(&self, id: &str) -> Option<&str> {
        self.styles.get(id).and_then(|s| s.name.as_deref())
    }

    /// Heading level carried by a style, via either its id (`Heading2`) or
    /// its display name (`heading 2`, `Title`).
    pub fn heading_level_of(&self, id: &str) -> Option<u32> {
        match self.styles.get(id) {
            Some(def) => def.heading_level,
            // Unknown ids still get the token treatment so documents with a
            // stripped styles part keep their headings.
            None => heading_from_token(id),
        }
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// `heading 1` / `Heading1` / `Title` style tokens carry an implicit level.
pub fn heading_from_token(token: &str) -> Option<u32> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    let lower = token.to_ascii_lowercase();
    if lower.starts_with("heading") {
        let digits: String = token.chars().skip_while(|c| !c.is_ascii_digit()).collect();
        if let Ok(n) = digits.parse::<u32>() {
            if n > 0 {
                return Some(n);
            }
        }
    }
    if lower == "title" {
        return Some(1);
    }
    None
}

pub fn parse_styles(bytes: &[u8]) -> Result<StyleCatalog> {
    let part = parse_xml_part("word/styles.xml", bytes)?;

    let mut styles: HashMap<String, StyleDefinition> = HashMap::new();
    let mut stack: Vec<String> = Vec::new();
    let mut current: Option<(String, Option<String>)> = None;

    for ev in &part.events {
        match ev {
            XmlEvent::Start { name, attrs } => {
                if name == "w:style" {
                    if let Some(id) = find_attr(attrs, "w:styleId") {
                        let id = id.trim();
                        if !id.is_empty() {
                            current = Some((id.to_string(), None));
                        }
                    }
                }
                if name == "w:name" && stack.last().map(|s| s.as_str()) == Some("w:style") {
                    if let (Some(cur), Some(val)) = (current.as_mut(), find_attr(attrs, "w:val")) {
                        cur.1 = Some(val.to_string());
                    }
                }
                stack.push(name.clone());
            }
            XmlEvent::Empty { name, attrs } => {
                if name == "w:name" && stack.last().map(|s| s.as_str()) == Some("w:style") {
                    if let (Some(cur), Some(val)) = (current.as_mut(), find_attr(attrs, "w:val")) {
                        cur.1 = Some(val.to_string());
                    }
                }
            }
            XmlEvent::End { name } => {
                if name == "w:style" {
                    if let Some((id, style_name)) = current.take() {
                        let heading_level = heading_from_token(&id)
                            .or_else(|| style_name.as_deref().and_then(heading_from_token));
                        styles.insert(
                            id.clone(),
                            StyleDefinition {
                                id,
                                name: style_name,
                                heading_level,
                            },
                        );
                    }
                }
                let _ = stack.pop();
            }
            _ => {}
        }
    }

    Ok(StyleCatalog { styles })
}
