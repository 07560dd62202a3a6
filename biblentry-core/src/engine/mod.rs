//! The annotation engine.
//!
//! [`Annotator`] owns a [`Surface`] and exposes the operations a toolbar or
//! any other chrome needs: apply a tag to the selection, unmark the tag
//! around the caret, and ask which tags surround the selection.
//!
//! Every structural edit runs inside a selection-preserving scope, so the
//! caller's selection survives the edits that replace range content.

mod apply;
mod classify;
mod mutator;
mod unmark;

use crate::config::EngineConfig;
use crate::error::AnnotateError;
use crate::model::{
    is_tei_node, Affinity, AnnotatedSpan, Bookmark, Selection, TagCategory, TEI_PREFIX,
};
use crate::surface::Surface;

pub struct Annotator<S: Surface> {
    surface: S,
    config: EngineConfig,
    // Open selection-preserving scopes, innermost last
    bookmarks: Vec<Bookmark>,
}

impl<S: Surface> Annotator<S> {
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, EngineConfig::default())
    }

    pub fn with_config(surface: S, config: EngineConfig) -> Self {
        Self {
            surface,
            config,
            bookmarks: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Apply the category named `id` to the live selection
    pub fn apply_tag(&mut self, id: &str) -> Result<(), AnnotateError> {
        let category =
            TagCategory::by_id(id).ok_or_else(|| AnnotateError::UnknownCategory(id.to_string()))?;
        self.apply_to_selection(category)
    }

    /// Remove the tagged element around the selection, if any
    pub fn unmark_ancestor(&mut self) {
        let span_only = self.config.unmark_span_only;
        let chain = self.selection_chain(self.surface.selection());
        self.with_preserved_selection(|engine| {
            engine.unmark_chain(chain, span_only);
        });
    }

    /// Categories whose markup surrounds the live selection
    pub fn classify_at_selection(&self) -> Vec<&'static TagCategory> {
        let chain = self.selection_chain(self.surface.selection());
        self.classify_chain(&chain)
    }

    pub fn is_selection_collapsed(&self) -> bool {
        self.surface.selection().is_collapsed()
    }

    /// Route a toolbar command: `unmark` or any registry category id
    pub fn run_command(&mut self, id: &str) -> Result<(), AnnotateError> {
        if id.eq_ignore_ascii_case(TagCategory::unmark().id) {
            self.unmark_ancestor();
            Ok(())
        } else {
            self.apply_tag(id)
        }
    }

    /// Every tagged element that carries a registry category, in document order
    pub fn spans(&self) -> Vec<AnnotatedSpan> {
        self.surface
            .find_nodes_matching_class_prefix(TEI_PREFIX)
            .into_iter()
            .filter_map(|node| {
                let classes = self.surface.classes(node);
                let category = TagCategory::all()
                    .iter()
                    .find(|c| c.matches_tokens(classes))?;
                let range = self.surface.node_range(node);
                Some(AnnotatedSpan::new(
                    category,
                    range,
                    self.surface.range_text(range),
                ))
            })
            .collect()
    }

    pub fn spans_of(&self, category: &TagCategory) -> Vec<AnnotatedSpan> {
        self.spans()
            .into_iter()
            .filter(|s| s.category == category)
            .collect()
    }

    /// Ancestor chain the selection sits in: the caret's for a collapsed
    /// selection, otherwise the elements enclosing both ends.
    fn selection_chain(&self, selection: Selection) -> Vec<S::Node> {
        let range = selection.range();
        if range.is_collapsed() {
            return self.surface.ancestors(range.start_offset, Affinity::Upstream);
        }
        let end_chain = self.surface.ancestors(range.end_offset, Affinity::Upstream);
        self.surface
            .ancestors(range.start_offset, Affinity::Downstream)
            .into_iter()
            .skip_while(|node| !end_chain.contains(node))
            .collect()
    }

    /// Whether `node` is engine-owned markup
    fn is_tagged(&self, node: S::Node) -> bool {
        is_tei_node(self.surface.classes(node))
    }
}
