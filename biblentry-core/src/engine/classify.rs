use crate::config::ClassMatch;
use crate::model::{Affinity, TagCategory};
use crate::surface::Surface;

use super::Annotator;

impl<S: Surface> Annotator<S> {
    /// Categories whose markup encloses `position`
    pub fn classify(&self, position: usize) -> Vec<&'static TagCategory> {
        let chain = self.surface.ancestors(position, Affinity::Upstream);
        self.classify_chain(&chain)
    }

    pub(super) fn classify_chain(&self, chain: &[S::Node]) -> Vec<&'static TagCategory> {
        match self.config.class_match {
            ClassMatch::Token => TagCategory::all()
                .iter()
                .filter(|category| {
                    chain
                        .iter()
                        .any(|&node| category.matches_tokens(self.surface.classes(node)))
                })
                .collect(),
            ClassMatch::Substring => {
                let mut inherited = String::from("|");
                for &node in chain {
                    inherited.push_str(&self.surface.classes(node).join(" "));
                    inherited.push('|');
                }
                TagCategory::all()
                    .iter()
                    .filter(|category| inherited.contains(&category.class_attr()))
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ClassMatch, EngineConfig};
    use crate::engine::Annotator;
    use crate::model::MarkupDocument;
    use rstest::rstest;

    fn classify(fragment: &str, class_match: ClassMatch, position: usize) -> Vec<&'static str> {
        let config = EngineConfig {
            class_match,
            ..EngineConfig::default()
        };
        let engine = Annotator::with_config(MarkupDocument::parse(fragment).unwrap(), config);
        engine.classify(position).into_iter().map(|c| c.id).collect()
    }

    #[rstest]
    #[case::token(ClassMatch::Token)]
    #[case::substring(ClassMatch::Substring)]
    fn test_modes_agree_on_engine_markup(#[case] mode: ClassMatch) {
        let fragment = r#"<span class="tei-editor"><span class="tei-title teia-level__a">Art</span></span>"#;
        assert_eq!(classify(fragment, mode, 1), ["editor", "titlearticle"]);
    }

    #[test]
    fn test_token_mode_ignores_class_order() {
        let fragment = r#"<span class="teia-level__m tei-title">Book</span>"#;
        assert_eq!(classify(fragment, ClassMatch::Token, 1), ["titlemonograph"]);
        assert!(classify(fragment, ClassMatch::Substring, 1).is_empty());
    }

    #[test]
    fn test_substring_mode_matches_inside_foreign_classes() {
        let fragment = r#"<span class="x-tei-date-old">1999</span>"#;
        assert_eq!(classify(fragment, ClassMatch::Substring, 1), ["date"]);
        assert!(classify(fragment, ClassMatch::Token, 1).is_empty());
    }

    #[test]
    fn test_classify_is_repeatable() {
        let engine = Annotator::new(
            MarkupDocument::parse(r#"<span class="tei-date">1999</span>"#).unwrap(),
        );
        let first: Vec<_> = engine.classify(2).into_iter().map(|c| c.id).collect();
        let second: Vec<_> = engine.classify(2).into_iter().map(|c| c.id).collect();
        assert_eq!(first, second);
        assert_eq!(engine.surface().to_markup().unwrap(), r#"<span class="tei-date">1999</span>"#);
    }
}
