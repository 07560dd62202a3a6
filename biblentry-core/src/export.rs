use anyhow::{Context, Result};
use serde::Serialize;

use crate::engine::Annotator;
use crate::entry::BibliographicEntry;
use crate::model::{AnnotatedSpan, MarkupDocument};
use crate::surface::Surface;

/// JSON shape of an annotated reference
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEntry {
    #[serde(flatten)]
    pub entry: BibliographicEntry,
    pub reference_name: String,
    pub label: String,
    pub text: String,
    pub spans: Vec<AnnotatedSpan>,
}

impl ExportEntry {
    pub fn from_annotator(annotator: &Annotator<MarkupDocument>) -> Result<Self> {
        let entry = BibliographicEntry::from_document(annotator)
            .context("Failed to serialize styled reference")?;
        Ok(Self {
            reference_name: entry.reference_name(),
            label: entry.to_string(),
            text: annotator.surface().text(),
            spans: annotator.spans(),
            entry,
        })
    }
}

/// Pretty-printed JSON for the reference an annotator is editing
pub fn to_json(annotator: &Annotator<MarkupDocument>) -> Result<String> {
    let export = ExportEntry::from_annotator(annotator)?;
    serde_json::to_string_pretty(&export).context("Failed to serialize entry")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Selection;

    #[test]
    fn test_export_format() {
        let doc = MarkupDocument::parse("Smith, J. 2001").unwrap();
        let mut engine = Annotator::new(doc);
        engine.surface_mut().set_selection(Selection::new(0, 9));
        engine.apply_tag("author").unwrap();

        let json = to_json(&engine).unwrap();

        // Verify camelCase field names
        assert!(json.contains("\"authors\": \"Smith, J.\""));
        assert!(json.contains("\"titleArticle\": \"\""));
        assert!(json.contains("\"publicationDate\": null"));
        assert!(json.contains("\"referenceName\": \"(Smith)\""));
        assert!(json.contains("\"text\": \"Smith, J. 2001\""));
        assert!(json.contains("\"category\": \"author\""));
        assert!(json.contains("\"startOffset\": 0"));
    }
}
