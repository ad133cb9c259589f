use std::io::{Cursor, Read};
use std::path::Path;

use zip::ZipArchive;

use crate::error::{Error, Result};

#[derive(Debug)]
pub struct DocxPackage {
    pub entries: Vec<DocxEntry>,
}

#[derive(Debug)]
pub struct DocxEntry {
    pub name: String,
    pub data: Vec<u8>,
}

impl DocxPackage {
    /// Opens an OOXML container from raw bytes. `label` names the document in
    /// errors (typically the original filename).
    pub fn from_bytes(label: &str, bytes: &[u8]) -> Result<Self> {
        let mut zip = ZipArchive::new(Cursor::new(bytes)).map_err(|e| Error::Container {
            name: label.to_string(),
            reason: e.to_string(),
        })?;
        let mut entries = Vec::new();
        for i in 0..zip.len() {
            let mut file = zip.by_index(i).map_err(|e| Error::Container {
                name: label.to_string(),
                reason: e.to_string(),
            })?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            entries.push(DocxEntry {
                name: file.name().to_string(),
                data,
            });
        }
        Ok(Self { entries })
    }

    pub fn read(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let label = path.to_string_lossy();
        Self::from_bytes(&label, &bytes)
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.data.as_slice())
    }

    /// The document part every well-formed package must carry.
    pub fn document_part(&self) -> Result<&[u8]> {
        self.part("word/document.xml")
            .ok_or_else(|| Error::MissingPart("word/document.xml".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::DocxPackage;
    use crate::error::Error;

    #[test]
    fn from_bytes_rejects_non_zip_input() {
        let err = DocxPackage::from_bytes("draft.docx", b"plainly not a zip").unwrap_err();
        match err {
            Error::Container { name, .. } => assert_eq!(name, "draft.docx"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_document_part_is_fatal() {
        let bytes = crate::docx::test_support::zip_bytes(&[("word/styles.xml", "<w:styles/>")]);
        let pkg = DocxPackage::from_bytes("t.docx", &bytes).expect("open");
        let err = pkg.document_part().unwrap_err();
        assert!(matches!(err, Error::MissingPart(_)));
    }

    #[test]
    fn part_lookup_finds_entry() {
        let bytes = crate::docx::test_support::zip_bytes(&[
            ("word/document.xml", "<w:document/>"),
            ("docProps/core.xml", "<cp:coreProperties/>"),
        ]);
        let pkg = DocxPackage::from_bytes("t.docx", &bytes).expect("open");
        assert!(pkg.document_part().is_ok());
        assert!(pkg.part("docProps/core.xml").is_some());
        assert!(pkg.part("word/footnotes.xml").is_none());
    }
}
