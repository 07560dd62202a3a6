//! Biblentry Core - Selection-scoped TEI annotation of bibliographic references
//!
//! This crate holds the tag registry, the range and markup model, and the
//! annotation engine that wraps, unwraps and classifies TEI spans inside a
//! styled reference. Hosts plug in through the [`Surface`] trait; the
//! in-memory [`MarkupDocument`] is the surface the CLI uses.

pub mod config;
pub mod engine;
pub mod entry;
pub mod error;
pub mod export;
pub mod model;
pub mod surface;

pub use config::{ClassMatch, EngineConfig};
pub use engine::Annotator;
pub use entry::{BibliographicCategory, BibliographicEntry, Language};
pub use error::{AnnotateError, MarkupError};
pub use export::{to_json, ExportEntry};
pub use model::{
    Affinity, AnnotatedSpan, Markup, MarkupDocument, Selection, TagCategory, TextRange,
};
pub use surface::Surface;
