use serde::{Deserialize, Serialize};

/// Represents a range of visible text by character offsets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct TextRange {
    pub start_offset: usize,
    pub end_offset: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start_offset: start.min(end),
            end_offset: start.max(end),
        }
    }

    pub fn caret(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    pub fn is_collapsed(&self) -> bool {
        self.start_offset == self.end_offset
    }

    /// Check if this range contains the given offset
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start_offset && offset < self.end_offset
    }

    /// Check if `other` lies entirely within this range
    pub fn encloses(&self, other: &TextRange) -> bool {
        other.start_offset >= self.start_offset && other.end_offset <= self.end_offset
    }

    pub fn overlaps(&self, other: &TextRange) -> bool {
        self.start_offset < other.end_offset && other.start_offset < self.end_offset
    }
}

/// Which side of a boundary a position belongs to.
///
/// An offset sitting between two text nodes is ambiguous: `Downstream`
/// resolves it to the node that starts there, `Upstream` to the node that
/// ends there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affinity {
    Upstream,
    Downstream,
}

/// Edge of a selection used when collapsing it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Start,
    End,
}

/// Live selection over document coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub anchor_offset: usize,
    pub focus_offset: usize,
}

impl Selection {
    pub fn new(anchor: usize, focus: usize) -> Self {
        Self {
            anchor_offset: anchor,
            focus_offset: focus,
        }
    }

    pub fn caret(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor_offset == self.focus_offset
    }

    pub fn range(&self) -> TextRange {
        TextRange::new(self.anchor_offset, self.focus_offset)
    }

    pub fn collapsed_to(&self, edge: Edge) -> Self {
        let range = self.range();
        match edge {
            Edge::Start => Self::caret(range.start_offset),
            Edge::End => Self::caret(range.end_offset),
        }
    }

    /// Clamp both ends into a document of `len` characters
    pub fn clamped(&self, len: usize) -> Self {
        Self::new(self.anchor_offset.min(len), self.focus_offset.min(len))
    }
}

impl From<TextRange> for Selection {
    fn from(range: TextRange) -> Self {
        Self::new(range.start_offset, range.end_offset)
    }
}

/// Restorable reference to a selection.
///
/// Stays valid across edits that only restructure markup. If the visible
/// text length changed in between, restoring clamps into the new document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bookmark {
    pub(crate) selection: Selection,
    pub(crate) text_len: usize,
}

impl Bookmark {
    pub(crate) fn new(selection: Selection, text_len: usize) -> Self {
        Self {
            selection,
            text_len,
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Whether a document of `text_len` characters can take this bookmark back unchanged
    pub fn fits(&self, text_len: usize) -> bool {
        self.text_len == text_len
    }
}
