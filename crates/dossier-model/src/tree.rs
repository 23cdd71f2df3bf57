//! Nested JSON representation of a project graph.
//!
//! The graph provider hands over projects as a nested tree:
//!
//! ```json
//! {
//!   "name": "demo",
//!   "kind": "project",
//!   "content": [{ "kind": "readme", "text": "# Demo" }],
//!   "children": [{ "name": "Parser", "kind": "class" }]
//! }
//! ```
//!
//! The same shape is produced by [`ProjectGraph::to_tree`] for JSON output.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::entity::{ContentBlock, EntityId};
use crate::graph::{GraphBuilder, ProjectGraph};
use crate::kind::EntityKind;

/// Error returned when loading a project graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Malformed JSON or unknown entity kind.
    #[error("Invalid project JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The top-level node is not a project.
    #[error("Root entity must be a project, found {0}")]
    RootKind(EntityKind),
}

/// One node of the nested tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityTree {
    /// Display name.
    pub name: String,
    /// Kind tag.
    pub kind: EntityKind,
    /// Content blocks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<ContentBlock>,
    /// Relevance weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
    /// Child nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<EntityTree>,
}

impl ProjectGraph {
    /// Build a graph from a nested tree.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::RootKind`] if the top-level node is not a project.
    pub fn from_tree(tree: EntityTree) -> Result<Self, GraphError> {
        if tree.kind != EntityKind::Project {
            return Err(GraphError::RootKind(tree.kind));
        }

        let mut builder = GraphBuilder::new(tree.name);
        let root = builder.root();
        attach(&mut builder, root, tree.content, tree.relevance, tree.children);
        Ok(builder.build())
    }

    /// Parse a graph from JSON text.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        Self::from_tree(serde_json::from_str(json)?)
    }

    /// Parse a graph from a JSON reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, GraphError> {
        Self::from_tree(serde_json::from_reader(reader)?)
    }

    /// Convert the graph back into a nested tree.
    #[must_use]
    pub fn to_tree(&self) -> EntityTree {
        self.subtree(self.root_id())
    }

    fn subtree(&self, id: EntityId) -> EntityTree {
        let entity = &self[id];
        EntityTree {
            name: entity.name.clone(),
            kind: entity.kind,
            content: entity.content.clone(),
            relevance: entity.relevance,
            children: entity.children.iter().map(|&c| self.subtree(c)).collect(),
        }
    }
}

fn attach(
    builder: &mut GraphBuilder,
    id: EntityId,
    content: Vec<ContentBlock>,
    relevance: Option<f64>,
    children: Vec<EntityTree>,
) {
    for block in content {
        builder.add_content(id, block);
    }
    if let Some(relevance) = relevance {
        builder.set_relevance(id, relevance);
    }
    for child in children {
        let child_id = builder.add(id, child.name, child.kind);
        attach(builder, child_id, child.content, child.relevance, child.children);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ContentKind;
    use pretty_assertions::assert_eq;

    const PROJECT: &str = r##"{
        "name": "demo",
        "kind": "project",
        "content": [{ "kind": "readme", "text": "# Demo" }],
        "children": [
            {
                "name": "core",
                "kind": "module",
                "children": [
                    { "name": "Parser", "kind": "class", "relevance": 0.5 }
                ]
            }
        ]
    }"##;

    #[test]
    fn test_from_json_builds_arena() {
        let graph = ProjectGraph::from_json(PROJECT).unwrap();

        assert_eq!(graph.name(), "demo");
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.readme(), Some("# Demo"));

        let parser = graph.iter().find(|e| e.name == "Parser").unwrap();
        assert_eq!(parser.kind, EntityKind::Class);
        assert_eq!(parser.relevance, Some(0.5));
        assert_eq!(graph.parent(parser.id).unwrap().name, "core");
    }

    #[test]
    fn test_to_tree_preserves_shape() {
        let graph = ProjectGraph::from_json(PROJECT).unwrap();
        let tree = graph.to_tree();

        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].children[0].name, "Parser");
        assert_eq!(
            tree.content,
            vec![ContentBlock::new(ContentKind::Readme, "# Demo")]
        );
        assert_eq!(ProjectGraph::from_tree(tree).unwrap(), graph);
    }

    #[test]
    fn test_root_must_be_project() {
        let err = ProjectGraph::from_json(r#"{ "name": "x", "kind": "class" }"#).unwrap_err();
        assert!(matches!(err, GraphError::RootKind(EntityKind::Class)));
    }

    #[test]
    fn test_unknown_kind_is_json_error() {
        let err = ProjectGraph::from_json(r#"{ "name": "x", "kind": "widget" }"#).unwrap_err();
        assert!(matches!(err, GraphError::Json(_)));
    }
}
