//! libdoc XML specs
//!
//! Handles both the classic layout (`<kw>` directly under `<keywordspec>`,
//! plain-text `<arg>`) and the newer one (`<keywords>` wrapper, `<arg repr=..>`
//! with nested `<name>`/`<type>`/`<default>`).

use anyhow::{Context, Result, anyhow};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::{KeywordDoc, LibraryDoc, TYPE_LIBRARY};

#[derive(Default)]
struct PendingArg {
    repr: Option<String>,
    text: String,
}

#[derive(Default)]
struct PendingKeyword {
    name: String,
    doc: String,
    args: Vec<String>,
}

impl PendingKeyword {
    fn finish(self) -> KeywordDoc {
        KeywordDoc {
            name: self.name,
            doc: self.doc,
            args: self.args,
        }
    }
}

fn attr(element: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attribute in element.attributes() {
        let attribute = attribute.context("Malformed XML attribute")?;
        if attribute.key.as_ref() == key {
            return Ok(Some(attribute.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Parse a libdoc XML document into a [`LibraryDoc`]
pub fn parse_libdoc_xml(xml: &str) -> Result<LibraryDoc> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut library: Option<LibraryDoc> = None;
    let mut stack: Vec<String> = Vec::new();
    let mut keyword: Option<PendingKeyword> = None;
    let mut arg: Option<PendingArg> = None;

    loop {
        let event = reader
            .read_event()
            .with_context(|| format!("Invalid libdoc XML at byte {}", reader.buffer_position()))?;

        match event {
            Event::Start(element) => {
                let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
                open_element(&name, &element, &mut library, &mut keyword, &mut arg)?;
                stack.push(name);
            }
            Event::Empty(element) => {
                let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
                open_element(&name, &element, &mut library, &mut keyword, &mut arg)?;
                close_element(&name, &mut library, &mut keyword, &mut arg);
            }
            Event::End(_) => {
                if let Some(name) = stack.pop() {
                    close_element(&name, &mut library, &mut keyword, &mut arg);
                }
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                append_text(&stack, &text, &mut library, &mut keyword, &mut arg);
            }
            Event::CData(data) => {
                let bytes = data.into_inner();
                let text = String::from_utf8_lossy(&bytes);
                append_text(&stack, &text, &mut library, &mut keyword, &mut arg);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(anyhow!("Unexpected end of libdoc XML inside <{}>", open));
    }

    library.ok_or_else(|| anyhow!("No <keywordspec> element found"))
}

fn open_element(
    name: &str,
    element: &BytesStart<'_>,
    library: &mut Option<LibraryDoc>,
    keyword: &mut Option<PendingKeyword>,
    arg: &mut Option<PendingArg>,
) -> Result<()> {
    match name {
        "keywordspec" => {
            let lib_name = attr(element, b"name")?.unwrap_or_default();
            let doc_type = attr(element, b"type")?
                .map(|t| t.to_uppercase())
                .unwrap_or_else(|| TYPE_LIBRARY.to_string());
            let mut doc = LibraryDoc::new(lib_name, doc_type);
            if let Some(format) = attr(element, b"format")? {
                doc.doc_format = format.to_uppercase();
            }
            if let Some(scope) = attr(element, b"scope")? {
                doc.scope = scope;
            }
            if let Some(named_args) = attr(element, b"namedargs")? {
                doc.named_args = named_args;
            }
            *library = Some(doc);
        }
        "kw" if library.is_some() => {
            *keyword = Some(PendingKeyword {
                name: attr(element, b"name")?.unwrap_or_default(),
                ..Default::default()
            });
        }
        "arg" if keyword.is_some() => {
            *arg = Some(PendingArg {
                repr: attr(element, b"repr")?,
                text: String::new(),
            });
        }
        _ => {}
    }
    Ok(())
}

fn close_element(
    name: &str,
    library: &mut Option<LibraryDoc>,
    keyword: &mut Option<PendingKeyword>,
    arg: &mut Option<PendingArg>,
) {
    match name {
        "arg" => {
            if let (Some(done), Some(kw)) = (arg.take(), keyword.as_mut()) {
                let value = done.repr.unwrap_or(done.text);
                if !value.is_empty() {
                    kw.args.push(value);
                }
            }
        }
        "kw" => {
            if let (Some(done), Some(lib)) = (keyword.take(), library.as_mut()) {
                lib.keywords.push(done.finish());
            }
        }
        _ => {}
    }
}

fn append_text(
    stack: &[String],
    text: &str,
    library: &mut Option<LibraryDoc>,
    keyword: &mut Option<PendingKeyword>,
    arg: &mut Option<PendingArg>,
) {
    let Some(lib) = library.as_mut() else {
        return;
    };
    let (parent, current) = match stack {
        [.., parent, current] => (parent.as_str(), current.as_str()),
        _ => return,
    };

    match (parent, current) {
        ("keywordspec", "doc") => lib.doc.push_str(text),
        ("keywordspec", "version") => lib.version = text.to_string(),
        ("keywordspec", "scope") => lib.scope = text.to_string(),
        ("keywordspec", "namedargs") => lib.named_args = text.to_string(),
        ("kw", "doc") => {
            if let Some(kw) = keyword.as_mut() {
                kw.doc.push_str(text);
            }
        }
        ("arguments", "arg") => {
            if let Some(pending) = arg.as_mut() {
                pending.text.push_str(text);
            }
        }
        _ => {}
    }
}
