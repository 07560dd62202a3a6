pub mod category;
pub mod document;
pub mod markup;
pub mod span;
pub mod text_range;

pub use category::{is_tei_class, is_tei_node, TagCategory, TEI_PREFIX};
pub use document::{MarkupDocument, NodeId};
pub use markup::{parse_fragment, write_fragment, Markup};
pub use span::AnnotatedSpan;
pub use text_range::{Affinity, Bookmark, Edge, Selection, TextRange};
