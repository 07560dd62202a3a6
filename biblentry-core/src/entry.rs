//! Bibliographic entries extracted from an annotated styled reference.

use std::fmt;
use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::Annotator;
use crate::error::MarkupError;
use crate::model::{AnnotatedSpan, MarkupDocument};

// Everything after the first family name in an author string such as
// "FAMILY, GIVEN; FAMILY, GIVEN"
static EXTRA_AUTHOR_NAMES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*,.*$").expect("valid regex"));

static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

const AUTHOR_SEPARATOR: &str = "; ";

/// Language a referenced work is written in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub name: String,
    /// Display colour such as `#336699`, empty when unset
    #[serde(default)]
    pub color: String,
}

impl Language {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: String::new(),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Subject grouping for entries; names are unique
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BibliographicCategory {
    pub name: String,
}

impl BibliographicCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for BibliographicCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A bibliographic entry: the styled reference plus the fields its markup names
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BibliographicEntry {
    pub id: Uuid,
    pub styled_reference: String,
    pub authors: String,
    pub title_article: String,
    pub title_monograph: String,
    pub publication_date: Option<i32>,
    pub created: NaiveDate,
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub categories: Vec<BibliographicCategory>,
}

impl BibliographicEntry {
    pub fn new(styled_reference: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            styled_reference,
            authors: String::new(),
            title_article: String::new(),
            title_monograph: String::new(),
            publication_date: None,
            created: Local::now().date_naive(),
            language: None,
            categories: Vec::new(),
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// File the entry under `category`; returns false if it already was
    pub fn add_category(&mut self, category: BibliographicCategory) -> bool {
        if self.categories.iter().any(|c| c.name == category.name) {
            return false;
        }
        self.categories.push(category);
        true
    }

    /// Fill the entry fields from the spans of a styled reference
    pub fn from_spans(styled_reference: String, spans: &[AnnotatedSpan]) -> Self {
        let mut entry = Self::new(styled_reference);
        let text_of = |id: &str| -> Vec<&str> {
            spans
                .iter()
                .filter(|s| s.category.id == id)
                .map(|s| s.text.trim())
                .collect()
        };

        entry.authors = text_of("author").join(AUTHOR_SEPARATOR);
        entry.title_article = text_of("titlearticle").join(" ");
        entry.title_monograph = text_of("titlemonograph").join(" ");
        entry.publication_date = text_of("date")
            .first()
            .and_then(|date| YEAR.find(date))
            .and_then(|m| m.as_str().parse().ok());
        entry
    }

    /// Build an entry from the document an annotator is editing
    pub fn from_document(annotator: &Annotator<MarkupDocument>) -> Result<Self, MarkupError> {
        let styled_reference = annotator.surface().to_markup()?;
        Ok(Self::from_spans(styled_reference, &annotator.spans()))
    }

    /// Short citation label such as `(Smith 2001)`.
    ///
    /// Name and year are separated by a space; a missing part is left out
    /// instead of being printed as `None`.
    pub fn reference_name(&self) -> String {
        let family = EXTRA_AUTHOR_NAMES.replace(&self.authors, "");
        let year = self
            .publication_date
            .map(|y| y.to_string())
            .unwrap_or_default();
        let label: Vec<&str> = [family.as_ref(), year.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect();
        format!("({})", label.join(" "))
    }
}

impl fmt::Display for BibliographicEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = format!("{} {}", self.title_article, self.reference_name());
        f.write_str(name.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Selection, TagCategory, TextRange};
    use crate::surface::Surface;
    use pretty_assertions::assert_eq;

    fn span(id: &str, text: &str) -> AnnotatedSpan {
        AnnotatedSpan::new(
            TagCategory::by_id(id).unwrap(),
            TextRange::new(0, text.chars().count()),
            text.to_string(),
        )
    }

    #[test]
    fn test_fields_from_spans() {
        let entry = BibliographicEntry::from_spans(
            String::new(),
            &[
                span("author", "Smith, J."),
                span("author", " Doe, K. "),
                span("titlearticle", "On Things"),
                span("titlemonograph", "Collected Essays"),
                span("date", "2001a"),
                span("editor", "Roe, P."),
            ],
        );

        assert_eq!(entry.authors, "Smith, J.; Doe, K.");
        assert_eq!(entry.title_article, "On Things");
        assert_eq!(entry.title_monograph, "Collected Essays");
        assert_eq!(entry.publication_date, Some(2001));
    }

    #[test]
    fn test_reference_name_keeps_first_family_name() {
        let mut entry = BibliographicEntry::new(String::new());
        entry.authors = "Smith, J.; Doe, K.".to_string();
        entry.publication_date = Some(2001);
        assert_eq!(entry.reference_name(), "(Smith 2001)");

        entry.publication_date = None;
        assert_eq!(entry.reference_name(), "(Smith)");

        entry.authors.clear();
        entry.publication_date = Some(1999);
        assert_eq!(entry.reference_name(), "(1999)");
    }

    #[test]
    fn test_display_joins_title_and_reference() {
        let mut entry = BibliographicEntry::new(String::new());
        entry.authors = "Smith, J.".to_string();
        entry.publication_date = Some(2001);
        assert_eq!(entry.to_string(), "(Smith 2001)");

        entry.title_article = "On Things".to_string();
        assert_eq!(entry.to_string(), "On Things (Smith 2001)");
    }

    #[test]
    fn test_date_without_digits() {
        let entry = BibliographicEntry::from_spans(String::new(), &[span("date", "n.d.")]);
        assert_eq!(entry.publication_date, None);
    }

    #[test]
    fn test_from_annotated_document() {
        let doc = MarkupDocument::parse("Smith, J. 2001. On Things.").unwrap();
        let mut engine = Annotator::new(doc);
        engine.surface_mut().set_selection(Selection::new(0, 9));
        engine.apply_tag("author").unwrap();
        engine.surface_mut().set_selection(Selection::new(10, 14));
        engine.apply_tag("date").unwrap();
        engine.surface_mut().set_selection(Selection::new(16, 25));
        engine.apply_tag("titlearticle").unwrap();

        let entry = BibliographicEntry::from_document(&engine).unwrap();

        assert_eq!(entry.to_string(), "On Things (Smith 2001)");
        assert!(entry
            .styled_reference
            .starts_with(r#"<span class="tei-author">Smith, J.</span> "#));
    }

    #[test]
    fn test_language_and_categories() {
        let mut entry = BibliographicEntry::new(String::new()).with_language(Language {
            name: "German".to_string(),
            color: "#336699".to_string(),
        });

        assert!(entry.add_category(BibliographicCategory::new("Linguistics")));
        assert!(entry.add_category(BibliographicCategory::new("History")));
        assert!(!entry.add_category(BibliographicCategory::new("Linguistics")));

        let names: Vec<_> = entry.categories.iter().map(|c| c.to_string()).collect();
        assert_eq!(names, ["Linguistics", "History"]);
        assert_eq!(entry.language.as_ref().unwrap().to_string(), "German");
    }

    #[test]
    fn test_entry_json_format() {
        let mut entry = BibliographicEntry::new("<i>x</i>".to_string())
            .with_language(Language::new("English"));
        entry.add_category(BibliographicCategory::new("Linguistics"));

        let json = serde_json::to_string(&entry).unwrap();

        assert!(json.contains("\"styledReference\":\"<i>x</i>\""));
        assert!(json.contains("\"language\":{\"name\":\"English\",\"color\":\"\"}"));
        assert!(json.contains("\"categories\":[{\"name\":\"Linguistics\"}]"));

        let back: BibliographicEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.language, entry.language);
        assert_eq!(back.categories, entry.categories);
    }

    #[test]
    fn test_entry_without_language_or_categories_deserializes() {
        let json = r#"{
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "styledReference": "",
            "authors": "Doe",
            "titleArticle": "",
            "titleMonograph": "",
            "publicationDate": null,
            "created": "2024-05-01"
        }"#;

        let entry: BibliographicEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.language, None);
        assert!(entry.categories.is_empty());
        assert_eq!(entry.reference_name(), "(Doe)");
    }
}
