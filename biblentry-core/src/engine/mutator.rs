use crate::model::Edge;
use crate::surface::Surface;

use super::Annotator;

impl<S: Surface> Annotator<S> {
    /// Run `edit` with the live selection collapsed to its end, then put the
    /// selection back where it was.
    pub fn with_preserved_selection<F, R>(&mut self, edit: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.preserving_selection(Edge::End, edit)
    }

    /// Like [`with_preserved_selection`](Self::with_preserved_selection),
    /// collapsing to `edge` first.
    ///
    /// Bookmarks form a stack, so `edit` may open nested scopes; each scope
    /// restores its own bookmark before returning.
    pub fn preserving_selection<F, R>(&mut self, edge: Edge, edit: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        let bookmark = self.surface.create_bookmark();
        self.bookmarks.push(bookmark);
        let collapsed = bookmark.selection().collapsed_to(edge);
        self.surface.set_selection(collapsed);

        let result = edit(self);

        if let Some(bookmark) = self.bookmarks.pop() {
            self.surface.restore_bookmark(&bookmark);
        }
        result
    }

    /// Number of selection scopes currently open
    pub fn preserved_depth(&self) -> usize {
        self.bookmarks.len()
    }
}
