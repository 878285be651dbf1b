//! Span-preserving parser built on the `quick-xml` pull reader.
//!
//! The reader tokenizes; this module records the exact source span of every
//! event and assembles the [`Document`] tree from those spans. Markup events end
//! at the reader's buffer position; character data spans are measured by the raw
//! length of the event, so no byte of input is dropped or rewritten.

use super::{Document, Element, Node};
use crate::core::PomError;
use quick_xml::Reader;
use quick_xml::events::{BytesDecl, Event};

/// Encoding labels whose byte layout is not ASCII-compatible and therefore cannot
/// describe text that was decoded as UTF-8.
const UNSUPPORTED_ENCODINGS: &[&str] =
    &["utf-16", "utf-16le", "utf-16be", "utf-32", "ucs-2", "ucs-4"];

/// Parse descriptor text into a lossless [`Document`].
///
/// `label` names the source (usually its path) in error messages.
///
/// # Errors
///
/// Returns [`PomError::DescriptorParseError`] for unbalanced or mismatched tags,
/// content outside the root element, a missing root element, or an unusable
/// encoding declaration.
pub fn parse(source: &str, label: &str) -> Result<Document, PomError> {
    let (bom, body) = match source.strip_prefix('\u{feff}') {
        Some(rest) => (true, rest),
        None => (false, source),
    };

    let mut reader = Reader::from_str(body);
    let config = reader.config_mut();
    config.trim_text(false);
    config.expand_empty_elements = false;
    config.check_end_names = true;

    let mut top: Vec<Node> = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<usize> = None;
    let mut cursor = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| {
            PomError::parse(label, e.to_string(), usize::try_from(reader.buffer_position()).ok())
        })?;

        let end = match &event {
            Event::Text(text) => cursor + text.len(),
            Event::Eof => body.len(),
            _ => usize::try_from(reader.buffer_position()).unwrap_or(body.len()),
        };
        let raw = body
            .get(cursor..end)
            .ok_or_else(|| PomError::parse(label, "token boundary out of range", Some(cursor)))?
            .to_string();
        let offset = cursor;
        cursor = end;

        match event {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(PomError::parse(label, "multiple root elements", Some(offset)));
                }
                let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                let qname = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                stack.push(Element::from_tags(name, qname, raw, None));
            }
            Event::End(end_tag) => {
                let mut element = stack.pop().ok_or_else(|| {
                    PomError::parse(label, format!("unexpected closing tag {raw}"), Some(offset))
                })?;
                let closing = String::from_utf8_lossy(end_tag.name().as_ref()).into_owned();
                if closing != element.qname() {
                    return Err(PomError::parse(
                        label,
                        format!("expected </{}> but found </{closing}>", element.qname()),
                        Some(offset),
                    ));
                }
                element.close(raw);
                attach(&mut top, &mut stack, &mut root, Node::Element(element));
            }
            Event::Empty(empty) => {
                if stack.is_empty() && root.is_some() {
                    return Err(PomError::parse(label, "multiple root elements", Some(offset)));
                }
                let name = String::from_utf8_lossy(empty.local_name().as_ref()).into_owned();
                let qname = String::from_utf8_lossy(empty.name().as_ref()).into_owned();
                let element = Element::from_tags(name, qname, raw, None);
                attach(&mut top, &mut stack, &mut root, Node::Element(element));
            }
            Event::Text(_) => {
                if stack.is_empty() && !raw.trim().is_empty() {
                    return Err(PomError::parse(
                        label,
                        "character data outside the root element",
                        Some(offset),
                    ));
                }
                attach(&mut top, &mut stack, &mut root, Node::Text(raw));
            }
            Event::CData(_) => {
                if stack.is_empty() {
                    return Err(PomError::parse(
                        label,
                        "CDATA section outside the root element",
                        Some(offset),
                    ));
                }
                attach(&mut top, &mut stack, &mut root, Node::CData(raw));
            }
            Event::Comment(_) => attach(&mut top, &mut stack, &mut root, Node::Comment(raw)),
            Event::Decl(decl) => {
                check_declaration(&decl, label, offset)?;
                attach(&mut top, &mut stack, &mut root, Node::Markup(raw));
            }
            Event::PI(_) | Event::DocType(_) => {
                attach(&mut top, &mut stack, &mut root, Node::Markup(raw));
            }
            Event::Eof => {
                if !raw.is_empty() {
                    attach(&mut top, &mut stack, &mut root, Node::Text(raw));
                }
                break;
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(PomError::parse(
            label,
            format!("element <{}> is never closed", open.qname()),
            Some(body.len()),
        ));
    }

    let root = root.ok_or_else(|| PomError::parse(label, "no root element", None))?;
    Ok(Document::from_parts(bom, top, root))
}

fn attach(top: &mut Vec<Node>, stack: &mut [Element], root: &mut Option<usize>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if matches!(node, Node::Element(_)) {
                *root = Some(top.len());
            }
            top.push(node);
        }
    }
}

fn check_declaration(decl: &BytesDecl<'_>, label: &str, offset: usize) -> Result<(), PomError> {
    let Some(encoding) = decl.encoding() else {
        return Ok(());
    };
    let encoding = encoding.map_err(|e| {
        PomError::parse(label, format!("invalid encoding declaration: {e}"), Some(offset))
    })?;
    let encoding = String::from_utf8_lossy(&encoding).to_string();

    if !is_encoding_name(&encoding) {
        return Err(PomError::parse(
            label,
            format!("invalid encoding name '{encoding}'"),
            Some(offset),
        ));
    }
    if UNSUPPORTED_ENCODINGS.contains(&encoding.to_ascii_lowercase().as_str()) {
        return Err(PomError::parse(
            label,
            format!("unsupported encoding '{encoding}'; descriptors must be UTF-8 compatible"),
            Some(offset),
        ));
    }
    Ok(())
}

/// `EncName ::= [A-Za-z] ([A-Za-z0-9._] | '-')*`
fn is_encoding_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(first) if first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}
