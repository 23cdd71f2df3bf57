//! Project graph arena.
//!
//! Entities are stored in a flat `Vec<Entity>` with parent/children
//! relationships tracked by [`EntityId`] indices. The graph is immutable once
//! built: routers and backends keep their own side tables keyed by id.

use std::ops::Index;

use crate::entity::{ContentBlock, Entity, EntityId};
use crate::kind::EntityKind;

/// Rooted documentation graph.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectGraph {
    entities: Vec<Entity>,
}

impl ProjectGraph {
    /// Root entity id.
    #[must_use]
    pub fn root_id(&self) -> EntityId {
        EntityId::ROOT
    }

    /// Root entity.
    #[must_use]
    pub fn root(&self) -> &Entity {
        &self.entities[0]
    }

    /// Project name (root entity name).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.root().name
    }

    /// Get an entity by id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0)
    }

    /// Number of entities, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Always false: a graph has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate over all entities in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Children of an entity, in declaration order.
    pub fn children(&self, id: EntityId) -> impl Iterator<Item = &Entity> {
        self[id].children.iter().map(|&child| &self[child])
    }

    /// Parent of an entity.
    #[must_use]
    pub fn parent(&self, id: EntityId) -> Option<&Entity> {
        self[id].parent.map(|parent| &self[parent])
    }

    /// Ancestors of an entity, nearest first, root last.
    pub fn ancestors(&self, id: EntityId) -> impl Iterator<Item = &Entity> {
        std::iter::successors(self.parent(id), |entity| self.parent(entity.id))
    }

    /// Readme of the root entity.
    #[must_use]
    pub fn readme(&self) -> Option<&str> {
        self.root().readme()
    }
}

impl Index<EntityId> for ProjectGraph {
    type Output = Entity;

    fn index(&self, id: EntityId) -> &Entity {
        &self.entities[id.0]
    }
}

/// Incremental graph construction.
///
/// The root `project` entity is created by [`GraphBuilder::new`]; every
/// further entity is attached to an existing parent.
#[derive(Debug)]
pub struct GraphBuilder {
    entities: Vec<Entity>,
}

impl GraphBuilder {
    /// Start a graph with a project root named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            entities: vec![Entity {
                id: EntityId::ROOT,
                name: name.into(),
                kind: EntityKind::Project,
                children: Vec::new(),
                parent: None,
                content: Vec::new(),
                relevance: None,
            }],
        }
    }

    /// Root id.
    #[must_use]
    pub fn root(&self) -> EntityId {
        EntityId::ROOT
    }

    /// Add an entity under `parent` and return its id.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was not produced by this builder.
    pub fn add(&mut self, parent: EntityId, name: impl Into<String>, kind: EntityKind) -> EntityId {
        let id = EntityId(self.entities.len());
        self.entities.push(Entity {
            id,
            name: name.into(),
            kind,
            children: Vec::new(),
            parent: Some(parent),
            content: Vec::new(),
            relevance: None,
        });
        self.entities[parent.0].children.push(id);
        id
    }

    /// Attach a content block to an entity.
    pub fn add_content(&mut self, id: EntityId, block: ContentBlock) -> &mut Self {
        self.entities[id.0].content.push(block);
        self
    }

    /// Set the relevance weight of an entity.
    pub fn set_relevance(&mut self, id: EntityId, relevance: f64) -> &mut Self {
        self.entities[id.0].relevance = Some(relevance);
        self
    }

    /// Rename the project root.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.entities[0].name = name.into();
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> ProjectGraph {
        ProjectGraph {
            entities: self.entities,
        }
    }
}

impl From<ProjectGraph> for GraphBuilder {
    fn from(graph: ProjectGraph) -> Self {
        Self {
            entities: graph.entities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ContentKind;

    fn sample() -> (ProjectGraph, EntityId, EntityId) {
        let mut builder = GraphBuilder::new("demo");
        let module = builder.add(builder.root(), "core", EntityKind::Module);
        let class = builder.add(module, "Parser", EntityKind::Class);
        (builder.build(), module, class)
    }

    #[test]
    fn test_builder_links_parent_and_children() {
        let (graph, module, class) = sample();

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.root().children, vec![module]);
        assert_eq!(graph[module].children, vec![class]);
        assert_eq!(graph[class].parent, Some(module));
        assert_eq!(graph.root().parent, None);
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let (graph, module, class) = sample();

        let ancestors: Vec<_> = graph.ancestors(class).map(|e| e.id).collect();
        assert_eq!(ancestors, vec![module, EntityId::ROOT]);
        assert_eq!(graph.ancestors(EntityId::ROOT).count(), 0);
    }

    #[test]
    fn test_get_unknown_id_returns_none() {
        let (graph, _, _) = sample();
        assert!(graph.get(EntityId(42)).is_none());
    }

    #[test]
    fn test_readme_from_root_content() {
        let mut builder = GraphBuilder::new("demo");
        let root = builder.root();
        builder.add_content(root, ContentBlock::new(ContentKind::Readme, "# Demo"));
        let graph = builder.build();

        assert_eq!(graph.readme(), Some("# Demo"));
        assert_eq!(graph.root().summary(), None);
    }
}
