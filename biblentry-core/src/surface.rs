//! Boundary between the annotation engine and the host editing surface.
//!
//! The engine never touches a document directly. Everything it needs from the
//! host (selection, bookmarks, range replacement, tree queries and node
//! removal) goes through [`Surface`], so a browser binding, a test fixture or
//! the in-memory [`MarkupDocument`](crate::model::MarkupDocument) can all host
//! it.

use crate::model::{Affinity, Bookmark, Markup, Selection, TextRange};

pub trait Surface {
    /// Handle to a node of the host document. Handles to elements stay valid
    /// across edits that do not remove the element itself.
    type Node: Copy + Eq + std::fmt::Debug;

    /// Visible text of the whole document
    fn text(&self) -> String;

    /// Length of the visible text in characters
    fn text_len(&self) -> usize {
        self.text().chars().count()
    }

    fn selection(&self) -> Selection;

    fn set_selection(&mut self, selection: Selection);

    /// Visible text inside `range`, markup discarded
    fn range_text(&self, range: TextRange) -> String {
        self.text()
            .chars()
            .skip(range.start_offset)
            .take(range.len())
            .collect()
    }

    /// Replace everything inside `range` with `content`
    fn set_range_content(&mut self, range: TextRange, content: Markup);

    fn create_bookmark(&self) -> Bookmark {
        Bookmark::new(self.selection(), self.text_len())
    }

    fn restore_bookmark(&mut self, bookmark: &Bookmark) {
        let len = self.text_len();
        if !bookmark.fits(len) {
            log::warn!(
                "Bookmark taken at {} chars restored into {} chars; clamping",
                bookmark.text_len,
                len
            );
        }
        self.set_selection(bookmark.selection().clamped(len));
    }

    /// Elements carrying a class token that starts with `prefix`, in document order
    fn find_nodes_matching_class_prefix(&self, prefix: &str) -> Vec<Self::Node>;

    /// Detach `node`; with `keep_children` its children take its place
    fn remove_node(&mut self, node: Self::Node, keep_children: bool);

    /// Containing elements of the position, innermost first, ending at the root
    fn ancestors(&self, offset: usize, affinity: Affinity) -> Vec<Self::Node>;

    /// Descendant elements of `node` in document order
    fn descendants(&self, node: Self::Node) -> Vec<Self::Node>;

    fn classes(&self, node: Self::Node) -> &[String];

    /// Element name, `None` for the document root
    fn tag(&self, node: Self::Node) -> Option<&str>;

    /// Block-level structure (paragraphs, the root) as opposed to inline markup
    fn is_container(&self, node: Self::Node) -> bool;

    /// Visible text covered by `node`
    fn node_range(&self, node: Self::Node) -> TextRange;
}
