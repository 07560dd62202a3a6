use serde::{Serialize, Serializer};

use super::{TagCategory, TextRange};

/// A maximal run of text carrying one category's markup
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AnnotatedSpan {
    #[serde(serialize_with = "category_id")]
    pub category: &'static TagCategory,
    #[serde(flatten)]
    pub range: TextRange,
    pub text: String,
}

fn category_id<S: Serializer>(
    category: &&'static TagCategory,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(category.id)
}

impl AnnotatedSpan {
    pub fn new(category: &'static TagCategory, range: TextRange, text: String) -> Self {
        Self {
            category,
            range,
            text,
        }
    }
}
