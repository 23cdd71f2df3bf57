//! Documents produced by routing.

use dossier_model::{EntityId, EntityKind};
use serde::Serialize;

/// Template a backend uses for a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    /// Project landing page showing the readme.
    Index,
    /// Entity page listing members and child documents.
    Reflection,
    /// Free-form document entity.
    Document,
}

impl Template {
    /// Template identifier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Reflection => "reflection",
            Self::Document => "document",
        }
    }
}

/// Heading collected while rendering a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageHeading {
    /// Heading level (1-6).
    pub level: u8,
    /// Display text.
    pub text: String,
    /// Anchor within the document.
    pub anchor: String,
    /// Kind of the entity the heading introduces, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntityKind>,
}

/// One unit of output.
///
/// Created by a router; backends only append render bookkeeping
/// ([`headings`](Self::headings)) while rendering it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Relative, slash-separated path, unique within one output target.
    /// Empty for single-file outputs written directly to the target path.
    pub path: String,
    /// Template selector.
    pub template: Template,
    /// Entity rendered by this document.
    pub model: EntityId,
    /// Headings collected during render.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub headings: Vec<PageHeading>,
}

impl Document {
    /// Create a document with no collected headings.
    #[must_use]
    pub fn new(path: impl Into<String>, template: Template, model: EntityId) -> Self {
        Self {
            path: path.into(),
            template,
            model,
            headings: Vec::new(),
        }
    }

    /// Directory component of the path (empty at the output root).
    #[must_use]
    pub fn directory(&self) -> &str {
        self.path.rsplit_once('/').map_or("", |(dir, _)| dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_of_nested_path() {
        let doc = Document::new("classes/Foo.html", Template::Reflection, EntityId::ROOT);
        assert_eq!(doc.directory(), "classes");
    }

    #[test]
    fn test_directory_of_root_path() {
        let doc = Document::new("index.html", Template::Index, EntityId::ROOT);
        assert_eq!(doc.directory(), "");
    }
}
