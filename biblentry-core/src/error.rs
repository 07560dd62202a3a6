//! Error types for biblentry-core

use thiserror::Error;

/// Failure of an annotation command
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnnotateError {
    #[error("Cannot apply a tag to a collapsed selection")]
    InvalidRange,

    #[error("Unknown tag category: {0}")]
    UnknownCategory(String),
}

/// Failure to read or write a markup fragment
#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("Malformed markup at byte {position}: {source}")]
    Malformed {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },

    #[error("Unclosed element <{0}>")]
    Unclosed(String),

    #[error("Invalid UTF-8 in markup: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}
