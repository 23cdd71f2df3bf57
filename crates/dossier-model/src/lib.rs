//! Documentation entity graph for Dossier.
//!
//! The graph is built once per run by an external provider (or loaded from
//! its nested JSON form) and stays read-only while routers and output
//! backends work on it. Everything downstream addresses entities by
//! [`EntityId`].
//!
//! # Example
//!
//! ```
//! use dossier_model::{EntityKind, GraphBuilder};
//!
//! let mut builder = GraphBuilder::new("demo");
//! let module = builder.add(builder.root(), "core", EntityKind::Module);
//! builder.add(module, "Parser", EntityKind::Class);
//! let graph = builder.build();
//!
//! assert_eq!(graph.children(module).count(), 1);
//! ```

mod entity;
mod graph;
mod kind;
mod tree;

pub use entity::{ContentBlock, ContentKind, Entity, EntityId};
pub use graph::{GraphBuilder, ProjectGraph};
pub use kind::EntityKind;
pub use tree::{EntityTree, GraphError};
