use serde::Serialize;

/// Class prefix marking engine-owned markup
pub const TEI_PREFIX: &str = "tei-";

/// Semantic tag a span of a bibliographic reference can carry
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagCategory {
    pub id: &'static str,
    pub display_name: &'static str,
    pub class_names: &'static [&'static str],
    /// At most one span of this category may exist in a document
    pub unique: bool,
    pub color: Option<u32>,
}

static CATEGORIES: [TagCategory; 5] = [
    TagCategory {
        id: "author",
        display_name: "Author",
        class_names: &["tei-author"],
        unique: false,
        color: Some(0x800000),
    },
    TagCategory {
        id: "editor",
        display_name: "Editor",
        class_names: &["tei-editor"],
        unique: false,
        color: Some(0xFFA500),
    },
    TagCategory {
        id: "titlearticle",
        display_name: "TitleArticle",
        class_names: &["tei-title", "teia-level__a"],
        unique: true,
        color: Some(0x0000FF),
    },
    TagCategory {
        id: "titlemonograph",
        display_name: "TitleMonograph",
        class_names: &["tei-title", "teia-level__m"],
        unique: true,
        color: Some(0x0000FF),
    },
    TagCategory {
        id: "date",
        display_name: "Date",
        class_names: &["tei-date"],
        unique: true,
        color: Some(0x008000),
    },
];

// UI affordance only, never the category of a span
static UNMARK: TagCategory = TagCategory {
    id: "unmark",
    display_name: "Unmark",
    class_names: &[],
    unique: false,
    color: None,
};

impl TagCategory {
    /// The fixed registry, in toolbar order
    pub fn all() -> &'static [TagCategory] {
        &CATEGORIES
    }

    pub fn unmark() -> &'static TagCategory {
        &UNMARK
    }

    /// Look up a span category by id, ignoring case. `unmark` is not a span category.
    pub fn by_id(id: &str) -> Option<&'static TagCategory> {
        CATEGORIES.iter().find(|c| c.id.eq_ignore_ascii_case(id))
    }

    pub fn is_unmark(&self) -> bool {
        self.class_names.is_empty()
    }

    /// Value of the `class` attribute written on spans of this category
    pub fn class_attr(&self) -> String {
        self.class_names.join(" ")
    }

    /// True when `classes` carries every class token of this category
    pub fn matches_tokens<S: AsRef<str>>(&self, classes: &[S]) -> bool {
        !self.is_unmark()
            && self
                .class_names
                .iter()
                .all(|name| classes.iter().any(|c| c.as_ref() == *name))
    }
}

impl PartialEq for TagCategory {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TagCategory {}

/// Whether a single class token follows the engine's naming convention
pub fn is_tei_class(class: &str) -> bool {
    class.starts_with(TEI_PREFIX)
}

/// Whether a node with these classes is engine-owned markup
pub fn is_tei_node<S: AsRef<str>>(classes: &[S]) -> bool {
    classes.iter().any(|c| is_tei_class(c.as_ref()))
}
