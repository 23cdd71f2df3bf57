//! Entities and their content blocks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kind::EntityKind;

/// Identity of an entity within one [`ProjectGraph`](crate::ProjectGraph).
///
/// Ids are arena indices: they are only meaningful for the graph that
/// produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub(crate) usize);

impl EntityId {
    /// The root entity of every graph.
    pub const ROOT: Self = Self(0);

    /// Arena index of this id.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of a pre-resolved content block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Project or module readme.
    Readme,
    /// Short description shown in listings and page headers.
    Summary,
    /// Longer remarks rendered below the summary.
    Remarks,
}

/// Markup text attached to an entity.
///
/// Content is produced by external collaborators and passed through to
/// output backends untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Block kind.
    pub kind: ContentKind,
    /// Markdown source.
    pub text: String,
}

impl ContentBlock {
    /// Create a content block.
    #[must_use]
    pub fn new(kind: ContentKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Node in the documentation graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    /// Identity within the owning graph.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Kind tag.
    pub kind: EntityKind,
    /// Ordered children.
    pub children: Vec<EntityId>,
    /// Non-owning back reference. `None` only for the root.
    pub parent: Option<EntityId>,
    /// Pre-resolved content blocks.
    pub content: Vec<ContentBlock>,
    /// Precomputed relevance weight.
    pub relevance: Option<f64>,
}

impl Entity {
    /// First content block of the given kind.
    #[must_use]
    pub fn content(&self, kind: ContentKind) -> Option<&str> {
        self.content
            .iter()
            .find(|block| block.kind == kind)
            .map(|block| block.text.as_str())
    }

    /// Readme content, if any.
    #[must_use]
    pub fn readme(&self) -> Option<&str> {
        self.content(ContentKind::Readme)
    }

    /// Summary content, if any.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.content(ContentKind::Summary)
    }
}
