use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};

#[derive(Clone, Debug)]
pub enum XmlEvent {
    Decl {
        version: String,
        encoding: Option<String>,
        standalone: Option<String>,
    },
    Start {
        name: String,
        attrs: Vec<(String, String)>,
    },
    End {
        name: String,
    },
    Empty {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Text {
        text: String,
    },
    CData {
        text: String,
    },
    Comment {
        text: String,
    },
    PI {
        content: String,
    },
    DocType {
        text: String,
    },
}

#[derive(Clone, Debug)]
pub struct XmlPart {
    pub name: String,
    pub events: Vec<XmlEvent>,
}

pub fn parse_xml_part(name: &str, xml_bytes: &[u8]) -> Result<XmlPart> {
    let xml_err = |reason: String| Error::Xml {
        part: name.to_string(),
        reason,
    };

    let mut reader = Reader::from_reader(xml_bytes);
    reader.config_mut().trim_text(false);

    let mut events: Vec<XmlEvent> = Vec::new();
    // The reader validates end-tag names but accepts input that stops with
    // elements still open, so truncation is tracked here.
    let mut open: Vec<String> = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let ev = reader
            .read_event_into(&mut buf)
            .map_err(|e| xml_err(e.to_string()))?;
        match ev {
            Event::Eof => {
                if let Some(tag) = open.last() {
                    return Err(xml_err(format!("input ended inside <{tag}>")));
                }
                break;
            }
            Event::Decl(d) => {
                let version = d
                    .version()
                    .map(bytes_to_string)
                    .map_err(|e| xml_err(e.to_string()))?;
                let encoding = d
                    .encoding()
                    .map(|r| r.map(bytes_to_string))
                    .transpose()
                    .unwrap_or(None);
                let standalone = d
                    .standalone()
                    .map(|r| r.map(bytes_to_string))
                    .transpose()
                    .unwrap_or(None);
                events.push(XmlEvent::Decl {
                    version,
                    encoding,
                    standalone,
                });
            }
            Event::Start(s) => {
                let tag = bytes_to_string(s.name().as_ref());
                open.push(tag.clone());
                events.push(XmlEvent::Start {
                    name: tag,
                    attrs: collect_attrs(name, &s)?,
                });
            }
            Event::End(e) => {
                let _ = open.pop();
                events.push(XmlEvent::End {
                    name: bytes_to_string(e.name().as_ref()),
                });
            }
            Event::Empty(s) => {
                events.push(XmlEvent::Empty {
                    name: bytes_to_string(s.name().as_ref()),
                    attrs: collect_attrs(name, &s)?,
                });
            }
            Event::Text(t) => {
                let txt = t
                    .unescape()
                    .map_err(|e| xml_err(e.to_string()))?
                    .into_owned();
                events.push(XmlEvent::Text { text: txt });
            }
            Event::CData(t) => {
                let txt = bytes_to_string(t.into_inner());
                events.push(XmlEvent::CData { text: txt });
            }
            Event::Comment(t) => {
                let txt = bytes_to_string(t.into_inner());
                events.push(XmlEvent::Comment { text: txt });
            }
            Event::PI(t) => {
                let target = bytes_to_string(t.target());
                let content = bytes_to_string(t.content());
                events.push(XmlEvent::PI {
                    content: format!("{target}{content}"),
                });
            }
            Event::DocType(t) => {
                let txt = bytes_to_string(t.into_inner());
                events.push(XmlEvent::DocType { text: txt });
            }
        }
    }

    Ok(XmlPart {
        name: name.to_string(),
        events,
    })
}

fn collect_attrs(part: &str, s: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
    let mut attrs: Vec<(String, String)> = Vec::new();
    for a in s.attributes() {
        let a = a.map_err(|e| Error::Xml {
            part: part.to_string(),
            reason: e.to_string(),
        })?;
        let key = bytes_to_string(a.key.as_ref());
        let val = bytes_to_string(a.value.as_ref());
        attrs.push((key, val));
    }
    Ok(attrs)
}

fn bytes_to_string(bytes: impl AsRef<[u8]>) -> String {
    String::from_utf8_lossy(bytes.as_ref()).into_owned()
}

pub fn find_attr<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::{find_attr, parse_xml_part, XmlEvent};

    #[test]
    fn parse_collects_start_attrs_and_text() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?><w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t>Hello</w:t></w:r></w:p>"#;
        let part = parse_xml_part("word/document.xml", xml).expect("parse xml");

        let jc = part
            .events
            .iter()
            .find_map(|ev| match ev {
                XmlEvent::Empty { name, attrs } if name == "w:jc" => {
                    find_attr(attrs, "w:val").map(|v| v.to_string())
                }
                _ => None,
            })
            .expect("w:jc present");
        assert_eq!(jc, "center");

        let text = part
            .events
            .iter()
            .find_map(|ev| match ev {
                XmlEvent::Text { text } => Some(text.clone()),
                _ => None,
            })
            .expect("text event");
        assert_eq!(text, "Hello");
    }

    #[test]
    fn parse_reports_part_name_on_malformed_input() {
        let err = parse_xml_part("docProps/core.xml", b"<a><b></a>").unwrap_err();
        assert!(err.to_string().contains("docProps/core.xml"));
    }

    #[test]
    fn input_ending_inside_an_element_is_an_error() {
        let err = parse_xml_part("word/document.xml", b"<w:document><w:body><w:p>Payment")
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("word/document.xml"));
        assert!(msg.contains("w:p"));

        // A fully closed fragment of the same shape stays fine.
        assert!(parse_xml_part(
            "word/document.xml",
            b"<w:document><w:body><w:p>Payment</w:p></w:body></w:document>"
        )
        .is_ok());
    }
}
