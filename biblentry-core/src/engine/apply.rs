use crate::error::AnnotateError;
use crate::model::{Affinity, Edge, Markup, TagCategory, TextRange, TEI_PREFIX};
use crate::surface::Surface;

use super::Annotator;

impl<S: Surface> Annotator<S> {
    /// Select `range` and wrap it in a span of `category`.
    ///
    /// Afterwards the selection is `range` again.
    pub fn apply(
        &mut self,
        range: TextRange,
        category: &'static TagCategory,
    ) -> Result<(), AnnotateError> {
        if range.is_collapsed() {
            return Err(AnnotateError::InvalidRange);
        }
        self.surface.set_selection(range.into());
        self.apply_to_selection(category)
    }

    pub(super) fn apply_to_selection(
        &mut self,
        category: &'static TagCategory,
    ) -> Result<(), AnnotateError> {
        let range = self.surface.selection().range();
        if range.is_collapsed() {
            return Err(AnnotateError::InvalidRange);
        }
        if category.is_unmark() {
            return Err(AnnotateError::UnknownCategory(category.id.to_string()));
        }
        log::info!(
            "Applying {} to {}..{}",
            category.display_name,
            range.start_offset,
            range.end_offset
        );

        self.with_preserved_selection(|engine| {
            engine.strip_markup_through_boundaries(range);
            if category.unique {
                engine.remove_all_spans(category);
            }
            let text = engine.surface.range_text(range);
            engine.surface.set_range_content(
                range,
                Markup::span(category.class_names, vec![Markup::text(text)]),
            );
        });
        Ok(())
    }

    /// Leave `range` free of engine markup.
    ///
    /// The tagged element at each boundary is unwrapped whole, even where it
    /// reaches outside the range; whatever markup remains inside is then
    /// flattened to plain text. Boundary unwrapping never leaves inline
    /// markup, whatever `unmark_span_only` says.
    pub fn strip_markup_through_boundaries(&mut self, range: TextRange) {
        self.with_preserved_selection(|engine| {
            engine.surface.set_selection(range.into());

            engine.preserving_selection(Edge::End, |e| {
                let caret = e.surface.selection().focus_offset;
                e.unmark_nearest(caret, Affinity::Upstream, true);
            });
            engine.preserving_selection(Edge::Start, |e| {
                let caret = e.surface.selection().focus_offset;
                e.unmark_nearest(caret, Affinity::Downstream, true);
            });

            if !range.is_collapsed() {
                let plain = engine.surface.range_text(range);
                engine.surface.set_range_content(range, Markup::text(plain));
            }
        });
    }

    /// Unwrap every element of `category` in the whole document
    fn remove_all_spans(&mut self, category: &TagCategory) {
        let doomed: Vec<_> = self
            .surface
            .find_nodes_matching_class_prefix(TEI_PREFIX)
            .into_iter()
            .filter(|&node| category.matches_tokens(self.surface.classes(node)))
            .collect();
        for node in doomed {
            self.surface.remove_node(node, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;
    use crate::engine::Annotator;
    use crate::model::{MarkupDocument, Selection, TagCategory, TextRange};
    use crate::surface::Surface;
    use pretty_assertions::assert_eq;

    fn annotator(fragment: &str) -> Annotator<MarkupDocument> {
        Annotator::new(MarkupDocument::parse(fragment).unwrap())
    }

    #[test]
    fn test_apply_selects_range() {
        let mut engine = annotator("Doe 1999");
        let date = TagCategory::by_id("date").unwrap();

        engine.apply(TextRange::new(4, 8), date).unwrap();

        assert_eq!(
            engine.surface().to_markup().unwrap(),
            r#"Doe <span class="tei-date">1999</span>"#
        );
        assert_eq!(engine.surface().selection(), Selection::new(4, 8));
    }

    #[test]
    fn test_unmark_pseudo_category_is_not_applicable() {
        let mut engine = annotator("Doe");
        assert!(engine.apply(TextRange::new(0, 3), TagCategory::unmark()).is_err());
        assert_eq!(engine.surface().to_markup().unwrap(), "Doe");
    }

    #[test]
    fn test_strip_unwraps_both_boundaries_and_interior() {
        let mut engine = annotator(concat!(
            r#"<span class="tei-author">Smith</span>, "#,
            r#"<span class="tei-date">20</span>"#,
            r#"<span class="tei-editor">01</span>"#,
            r#" <span class="tei-title teia-level__a">Title</span>"#,
        ));

        // From inside the author span to inside the title span
        engine.strip_markup_through_boundaries(TextRange::new(2, 14));

        assert_eq!(engine.surface().to_markup().unwrap(), "Smith, 2001 Title");
    }

    #[test]
    fn test_strip_keeps_markup_outside_touched_spans() {
        let mut engine = annotator(concat!(
            r#"<span class="tei-author">Smith</span>, "#,
            r#"<span class="tei-date">2001</span>. "#,
            r#"<span class="tei-title teia-level__a">Title</span>"#,
        ));

        engine.strip_markup_through_boundaries(TextRange::new(7, 11));

        assert_eq!(
            engine.surface().to_markup().unwrap(),
            concat!(
                r#"<span class="tei-author">Smith</span>, 2001. "#,
                r#"<span class="tei-title teia-level__a">Title</span>"#,
            )
        );
    }

    #[test]
    fn test_strip_flattens_host_markup_inside_range() {
        let mut engine = annotator("<p>a <em>b</em> c</p>");

        engine.strip_markup_through_boundaries(TextRange::new(0, 5));

        assert_eq!(engine.surface().to_markup().unwrap(), "<p>a b c</p>");
    }

    #[test]
    fn test_apply_inside_existing_span_replaces_it() {
        let mut engine = annotator(r#"<span class="tei-editor">Doe and Roe</span>"#);
        let author = TagCategory::by_id("author").unwrap();

        engine.apply(TextRange::new(0, 3), author).unwrap();

        assert_eq!(
            engine.surface().to_markup().unwrap(),
            r#"<span class="tei-author">Doe</span> and Roe"#
        );
    }

    #[test]
    fn test_apply_keeps_block_wrappers_when_unmark_crosses_blocks() {
        let config = EngineConfig {
            unmark_span_only: false,
            ..EngineConfig::default()
        };
        let fragment = r#"<div class="tei-bibl"><p><span class="tei-author">Doe</span>, Smith 2001</p></div>"#;
        let mut engine = Annotator::with_config(MarkupDocument::parse(fragment).unwrap(), config);
        let date = TagCategory::by_id("date").unwrap();

        engine.apply(TextRange::new(12, 15), date).unwrap();

        assert_eq!(
            engine.surface().to_markup().unwrap(),
            concat!(
                r#"<div class="tei-bibl"><p><span class="tei-author">Doe</span>, "#,
                r#"Smith 2<span class="tei-date">001</span></p></div>"#,
            )
        );
    }

    #[test]
    fn test_apply_drops_empty_elements_inside_range() {
        let mut engine = annotator(r#"ab<span class="tei-date"></span>c<br/>d 1999"#);
        let author = TagCategory::by_id("author").unwrap();

        engine.apply(TextRange::new(0, 4), author).unwrap();

        assert_eq!(
            engine.surface().to_markup().unwrap(),
            r#"<span class="tei-author">abcd</span> 1999"#
        );
        let spans: Vec<_> = engine
            .spans()
            .into_iter()
            .map(|s| (s.category.id, s.range))
            .collect();
        assert_eq!(spans, [("author", TextRange::new(0, 4))]);
    }
}
