use crate::docx::package::DocxPackage;
use crate::docx::xml::{parse_xml_part, XmlEvent};
use crate::error::Result;
use crate::ir::DocumentMetadata;

const CORE_PART: &str = "docProps/core.xml";

/// Reads `docProps/core.xml`. `Ok(None)` means the part is absent, which is
/// normal; `Err` means it exists but cannot be parsed, and callers are
/// expected to degrade rather than abort.
pub fn core_properties(pkg: &DocxPackage) -> Result<Option<DocumentMetadata>> {
    let Some(bytes) = pkg.part(CORE_PART) else {
        return Ok(None);
    };
    let part = parse_xml_part(CORE_PART, bytes)?;

    let mut meta = DocumentMetadata::default();
    let mut current: Option<&'static str> = None;

    for ev in &part.events {
        match ev {
            XmlEvent::Start { name, .. } => {
                current = match name.as_str() {
                    "dc:title" => Some("title"),
                    "dc:creator" => Some("creator"),
                    "dcterms:created" => Some("created"),
                    _ => None,
                };
            }
            XmlEvent::Text { text } => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    continue;
                }
                match current {
                    Some("title") => meta.title = Some(trimmed.to_string()),
                    Some("creator") => meta.author = Some(trimmed.to_string()),
                    Some("created") => meta.created = Some(trimmed.to_string()),
                    _ => {}
                }
            }
            XmlEvent::End { .. } => {
                current = None;
            }
            _ => {}
        }
    }

    Ok(Some(meta))
}
