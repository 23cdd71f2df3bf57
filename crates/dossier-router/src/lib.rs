//! Document routing for Dossier.
//!
//! A [`Router`] walks the [`ProjectGraph`](dossier_model::ProjectGraph),
//! decides which entities own a document, assigns every entity an
//! [`Address`] and afterwards resolves links between documents relative to
//! the page currently being rendered.
//!
//! Strategies are looked up by name in a [`RouterRegistry`]:
//!
//! | Name            | Class `core.Parser`            |
//! |-----------------|--------------------------------|
//! | `kind`          | `classes/core.Parser.html`     |
//! | `kind-dir`      | `classes/core.Parser/index.html` |
//! | `structure`     | `core/Parser.html`             |
//! | `structure-dir` | `core/Parser/index.html`       |
//!
//! ```
//! use dossier_model::{EntityKind, GraphBuilder};
//! use dossier_router::{ReadmeMode, RouterOptions, RouterRegistry};
//!
//! let mut builder = GraphBuilder::new("demo");
//! let class = builder.add(builder.root(), "Foo", EntityKind::Class);
//! let method = builder.add(class, "run", EntityKind::Method);
//! let graph = builder.build();
//!
//! let options = RouterOptions { readme: ReadmeMode::None, ..RouterOptions::default() };
//! let mut router = RouterRegistry::with_defaults().create("kind", "site", &options).unwrap();
//! let documents = router.build_documents(&graph);
//!
//! assert_eq!(documents.len(), 2);
//! assert_eq!(router.resolve(method).as_deref(), Some("classes/Foo.html#run"));
//! ```

mod address;
mod document;
mod navigation;
mod registry;
mod router;
mod slug;
mod strategy;
mod url;

pub use address::{Address, AddressTable};
pub use document::{Document, PageHeading, Template};
pub use navigation::NavigationElement;
pub use registry::{DEFAULT_ROUTER, RouterError, RouterRegistry};
pub use router::{
    INDEX_PATH, KindDirRouter, KindRouter, MODULES_PATH, ReadmeMode, Router, RouterOptions,
    SingleFileRouter, StrategyRouter, StructureDirRouter, StructureRouter,
};
pub use slug::alias;
pub use strategy::{
    KindDirScheme, KindScheme, PathScheme, StructureDirScheme, StructureScheme, is_document_worthy,
    kind_directory,
};
pub use url::{is_external, relative_path};
