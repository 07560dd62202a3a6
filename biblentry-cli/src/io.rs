//! File I/O for the CLI

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use biblentry_core::{EngineConfig, MarkupDocument};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "biblentry.toml";

/// Load a markup fragment and parse it into a document
pub fn load_file(path: &Path) -> Result<MarkupDocument> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve path: {}", path.display()))?;

    let content = fs::read_to_string(&canonical)
        .with_context(|| format!("Failed to read file: {}", canonical.display()))?;

    MarkupDocument::parse(content.trim_end_matches(['\r', '\n']))
        .with_context(|| format!("Failed to parse markup in {}", canonical.display()))
}

/// Load engine settings from `path`, or from `biblentry.toml` if it exists
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let path = match path {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Path::new(DEFAULT_CONFIG_FILE),
        None => return Ok(EngineConfig::default()),
    };
    log::debug!("Loading config from {}", path.display());

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid config: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use biblentry_core::ClassMatch;

    #[test]
    fn test_load_file_strips_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ref.xml");
        fs::write(&path, "<em>Book</em>\n").unwrap();

        let doc = load_file(&path).unwrap();

        assert_eq!(doc.to_markup().unwrap(), "<em>Book</em>");
    }

    #[test]
    fn test_load_config_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "class-match = \"substring\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.class_match, ClassMatch::Substring);
        assert!(config.unmark_span_only);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
