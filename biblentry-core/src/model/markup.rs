//! Detached markup fragments and their XHTML form.
//!
//! A styled reference is stored as an XHTML fragment: text interleaved with
//! inline elements whose `class` attribute carries the TEI tags. Only element
//! names, classes and text survive a parse; other attributes are dropped.

use std::io::Cursor;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::MarkupError;

// Synthetic wrapper so fragments with several top-level nodes parse as one document
const FRAGMENT_ROOT: &str = "biblentry-fragment";

/// A node of markup not (yet) attached to a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    Text(String),
    Element {
        tag: String,
        classes: Vec<String>,
        children: Vec<Markup>,
    },
}

impl Markup {
    pub fn text(text: impl Into<String>) -> Self {
        Markup::Text(text.into())
    }

    /// A `<span>` carrying `classes` around `children`
    pub fn span<S: AsRef<str>>(classes: &[S], children: Vec<Markup>) -> Self {
        Markup::Element {
            tag: "span".to_string(),
            classes: classes.iter().map(|c| c.as_ref().to_string()).collect(),
            children,
        }
    }

    /// Visible text with all markup discarded
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Markup::Text(text) => out.push_str(text),
            Markup::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// Parse an XHTML fragment into top-level markup nodes
pub fn parse_fragment(input: &str) -> Result<Vec<Markup>, MarkupError> {
    let wrapped = format!("<{FRAGMENT_ROOT}>{input}</{FRAGMENT_ROOT}>");
    let mut reader = Reader::from_str(&wrapped);

    // (tag, classes, children) of every open element
    let mut stack: Vec<(String, Vec<String>, Vec<Markup>)> = Vec::new();
    let mut top = Vec::new();

    loop {
        let event = reader.read_event().map_err(|source| MarkupError::Malformed {
            position: reader.buffer_position(),
            source,
        })?;
        match event {
            Event::Start(ref e) => {
                let tag = String::from_utf8(e.name().as_ref().to_vec())?;
                let classes = class_list(e)?;
                stack.push((tag, classes, Vec::new()));
            }
            Event::Empty(ref e) => {
                let node = Markup::Element {
                    tag: String::from_utf8(e.name().as_ref().to_vec())?,
                    classes: class_list(e)?,
                    children: Vec::new(),
                };
                if let Some((_, _, children)) = stack.last_mut() {
                    children.push(node);
                }
            }
            Event::End(_) => {
                if let Some((tag, classes, children)) = stack.pop() {
                    match stack.last_mut() {
                        Some((_, _, parent)) => parent.push(Markup::Element {
                            tag,
                            classes,
                            children,
                        }),
                        None => top = children,
                    }
                }
            }
            Event::Text(ref e) => {
                let text = e.unescape()?.into_owned();
                push_text(&mut stack, text);
            }
            Event::CData(e) => {
                let text = String::from_utf8(e.into_inner().into_owned())?;
                push_text(&mut stack, text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some((tag, _, _)) = stack.pop() {
        return Err(MarkupError::Unclosed(tag));
    }
    Ok(top)
}

fn push_text(stack: &mut [(String, Vec<String>, Vec<Markup>)], text: String) {
    if text.is_empty() {
        return;
    }
    if let Some((_, _, children)) = stack.last_mut() {
        // Adjacent text and entity events arrive separately; keep one node
        if let Some(Markup::Text(prev)) = children.last_mut() {
            prev.push_str(&text);
        } else {
            children.push(Markup::Text(text));
        }
    }
}

fn class_list(e: &BytesStart) -> Result<Vec<String>, MarkupError> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == b"class" {
            let value = attr.unescape_value()?;
            return Ok(value.split_whitespace().map(String::from).collect());
        }
    }
    Ok(Vec::new())
}

/// Serialize markup nodes back to an XHTML fragment
pub fn write_fragment(nodes: &[Markup]) -> Result<String, MarkupError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    for node in nodes {
        write_node(&mut writer, node)?;
    }
    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8(bytes)?)
}

fn write_node<W: std::io::Write>(writer: &mut Writer<W>, node: &Markup) -> Result<(), MarkupError> {
    match node {
        Markup::Text(text) => {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        Markup::Element {
            tag,
            classes,
            children,
        } => {
            let mut start = BytesStart::new(tag.as_str());
            if !classes.is_empty() {
                start.push_attribute(("class", classes.join(" ").as_str()));
            }
            writer.write_event(Event::Start(start))?;
            for child in children {
                write_node(writer, child)?;
            }
            writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
        }
    }
    Ok(())
}
