use serde::{Deserialize, Serialize};

/// How classification decides that a node on the ancestor chain carries a category
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ClassMatch {
    /// One node carries every class token of the category
    #[default]
    Token,
    /// The category's class string occurs in the `|`-joined class lists of the chain
    Substring,
}

/// Engine behaviour knobs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
    pub class_match: ClassMatch,
    /// Ancestor unmark stops at block structure and at tagged non-span elements
    pub unmark_span_only: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            class_match: ClassMatch::Token,
            unmark_span_only: true,
        }
    }
}
