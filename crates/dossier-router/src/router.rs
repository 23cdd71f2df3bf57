//! Router contract and the shared boundary walk.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use dossier_model::{EntityId, EntityKind, ProjectGraph};

use crate::address::AddressTable;
use crate::document::{Document, Template};
use crate::navigation::{self, NavigationElement};
use crate::slug::{Slugger, alias};
use crate::strategy::{KindDirScheme, KindScheme, PathScheme, StructureDirScheme, StructureScheme};
use crate::url::LinkResolver;

/// Path of the project landing document.
pub const INDEX_PATH: &str = "index.html";
/// Path of the module listing when the landing document shows the readme.
pub const MODULES_PATH: &str = "modules.html";

/// Whether the project readme gets its own landing document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadmeMode {
    /// Use the root readme when the project has one.
    #[default]
    Present,
    /// Never render a readme landing page.
    None,
}

/// Options shared by every routing strategy.
#[derive(Clone, Debug, Default)]
pub struct RouterOptions {
    /// Readme handling for the root document.
    pub readme: ReadmeMode,
    /// Append a cache-busting query to URLs requested with `cache_bust`.
    pub cache_bust: bool,
    /// Run start time in milliseconds, used as the cache-busting value.
    pub run_started_ms: u64,
}

/// Decides document boundaries and addresses, and resolves links.
///
/// One router instance serves exactly one run for one output target. It
/// holds the "current document" context used for relative links, so
/// documents must be rendered one at a time against it.
pub trait Router: Send {
    /// Registry name of the strategy.
    fn name(&self) -> &'static str;

    /// Output root the document paths are relative to.
    fn base_path(&self) -> &Path;

    /// Walk the graph, fill the address table and return the documents in
    /// render order. Previous routing state is discarded first.
    fn build_documents(&mut self, graph: &ProjectGraph) -> Vec<Document>;

    /// Addresses assigned by the last [`build_documents`](Self::build_documents).
    fn address_table(&self) -> &AddressTable;

    /// Set the document relative links are computed from.
    fn set_current_document(&mut self, document: &Document);

    /// Path of the current document.
    fn current_document(&self) -> Option<&str>;

    /// Path of `url` relative to the current document.
    ///
    /// External URLs are returned unchanged. With `cache_bust` set and cache
    /// busting enabled in the options, a `?cache=` suffix is appended.
    fn relative_url(&mut self, url: &str, cache_bust: bool) -> String;

    /// Navigation tree, computed on first use and cached.
    fn navigation(&mut self, graph: &ProjectGraph) -> &[NavigationElement];

    /// Absolute URL of an entity.
    fn resolve(&self, id: EntityId) -> Option<String> {
        self.address_table().resolve(id)
    }

    /// URL of an entity relative to the current document.
    fn resolve_relative(&mut self, id: EntityId) -> Option<String> {
        let url = self.resolve(id)?;
        Some(self.relative_url(&url, false))
    }

    /// Whether an entity owns a document.
    fn has_own_document(&self, id: EntityId) -> bool {
        self.address_table().has_own_document(id)
    }

    /// Anchor of an entity rendered inside an ancestor's document.
    fn anchor(&self, id: EntityId) -> Option<&str> {
        self.address_table().anchor(id)
    }

    /// Filesystem path a document is written to.
    fn output_path(&self, document: &Document) -> PathBuf {
        if document.path.is_empty() {
            self.base_path().to_path_buf()
        } else {
            self.base_path().join(&document.path)
        }
    }
}

/// Default document-boundary walk parameterized by a [`PathScheme`].
#[derive(Debug)]
pub struct StrategyRouter<S: PathScheme> {
    scheme: S,
    base_path: PathBuf,
    options: RouterOptions,
    table: AddressTable,
    slugger: Slugger,
    links: LinkResolver,
    navigation: Option<Vec<NavigationElement>>,
}

/// `classes/Foo.html` routing.
pub type KindRouter = StrategyRouter<KindScheme>;
/// `classes/Foo/index.html` routing.
pub type KindDirRouter = StrategyRouter<KindDirScheme>;
/// `module/Foo.html` routing.
pub type StructureRouter = StrategyRouter<StructureScheme>;
/// `module/Foo/index.html` routing.
pub type StructureDirRouter = StrategyRouter<StructureDirScheme>;

/// Position in the walk: the document being filled and how to name things in it.
struct Scope {
    document_url: String,
    segments: Vec<String>,
    anchor_prefix: Option<String>,
}

/// Documents produced so far, with path collision tracking.
///
/// Paths taken by the root are reserved: entities never replace them.
#[derive(Default)]
struct Walk {
    documents: Vec<Document>,
    paths: HashSet<String>,
    reserved: HashSet<String>,
}

impl Walk {
    fn add_root(&mut self, document: Document) {
        self.reserved.insert(document.path.clone());
        self.add(document);
    }

    /// Move `path` off a root path by suffixing its file stem with `_`.
    fn unreserved(&self, path: String) -> String {
        if !self.reserved.contains(&path) {
            return path;
        }
        let moved = match path.strip_suffix(".html") {
            Some(stem) => format!("{stem}_.html"),
            None => format!("{path}_"),
        };
        tracing::warn!(path = %path, moved = %moved, "Document path is reserved for the project root");
        self.unreserved(moved)
    }

    fn add(&mut self, document: Document) {
        if !self.paths.insert(document.path.clone())
            && let Some(position) = self.documents.iter().position(|d| d.path == document.path)
        {
            let previous = self.documents.remove(position);
            tracing::warn!(
                path = %document.path,
                replaced = %previous.model,
                by = %document.model,
                "Document path collision, later entity wins"
            );
        }
        self.documents.push(document);
    }
}

impl<S: PathScheme> StrategyRouter<S> {
    /// Create a router writing below `base_path`.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>, options: RouterOptions) -> Self {
        let links = LinkResolver::new(options.cache_bust, options.run_started_ms);
        Self {
            scheme: S::default(),
            base_path: base_path.into(),
            options,
            table: AddressTable::new(),
            slugger: Slugger::default(),
            links,
            navigation: None,
        }
    }

    /// Route the root and return the URL its inline children anchor into.
    fn route_root(&mut self, graph: &ProjectGraph, walk: &mut Walk) -> String {
        let root = graph.root();
        let has_readme = self.options.readme == ReadmeMode::Present && root.readme().is_some();

        if !has_readme {
            walk.add_root(Document::new(INDEX_PATH, Template::Reflection, root.id));
            self.table.set_url(root.id, INDEX_PATH);
            return INDEX_PATH.to_owned();
        }

        walk.add_root(Document::new(INDEX_PATH, Template::Index, root.id));
        let all_modules = graph.children(root.id).all(|child| child.kind.is_module_like());
        if all_modules {
            self.table.set_url(root.id, INDEX_PATH);
            INDEX_PATH.to_owned()
        } else {
            walk.add_root(Document::new(MODULES_PATH, Template::Reflection, root.id));
            self.table.set_url(root.id, MODULES_PATH);
            MODULES_PATH.to_owned()
        }
    }

    fn visit(&mut self, graph: &ProjectGraph, id: EntityId, scope: &Scope, walk: &mut Walk) {
        let entity = &graph[id];
        let name = alias(&entity.name);

        let child_scope = if self.scheme.is_document_worthy(entity.kind) {
            let mut segments = scope.segments.clone();
            segments.push(name);
            let path = walk.unreserved(self.scheme.document_path(entity.kind, &segments));
            let template = if entity.kind == EntityKind::Document {
                Template::Document
            } else {
                Template::Reflection
            };

            self.table.set_url(id, path.clone());
            walk.add(Document::new(path.clone(), template, id));
            Scope {
                document_url: path,
                segments,
                anchor_prefix: None,
            }
        } else {
            let base = match &scope.anchor_prefix {
                Some(prefix) => format!("{prefix}.{name}"),
                None => name,
            };
            let anchor = self
                .slugger
                .slug(&scope.document_url, &base.to_lowercase());
            self.table
                .set_anchor(id, scope.document_url.clone(), anchor);
            Scope {
                document_url: scope.document_url.clone(),
                segments: scope.segments.clone(),
                anchor_prefix: Some(base),
            }
        };

        for &child in &entity.children {
            self.visit(graph, child, &child_scope, walk);
        }
    }
}

impl<S: PathScheme> Router for StrategyRouter<S> {
    fn name(&self) -> &'static str {
        S::NAME
    }

    fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn build_documents(&mut self, graph: &ProjectGraph) -> Vec<Document> {
        self.table.clear();
        self.slugger.clear();
        self.links.reset();
        self.navigation = None;

        let mut walk = Walk::default();
        let document_url = self.route_root(graph, &mut walk);
        let scope = Scope {
            document_url,
            segments: Vec::new(),
            anchor_prefix: None,
        };
        for &child in &graph.root().children {
            self.visit(graph, child, &scope, &mut walk);
        }

        tracing::debug!(
            router = S::NAME,
            documents = walk.documents.len(),
            addresses = self.table.len(),
            "Routed project"
        );
        walk.documents
    }

    fn address_table(&self) -> &AddressTable {
        &self.table
    }

    fn set_current_document(&mut self, document: &Document) {
        self.links.set_current(document);
    }

    fn current_document(&self) -> Option<&str> {
        self.links.current()
    }

    fn relative_url(&mut self, url: &str, cache_bust: bool) -> String {
        self.links.relative(url, cache_bust)
    }

    fn navigation(&mut self, graph: &ProjectGraph) -> &[NavigationElement] {
        let table = &self.table;
        self.navigation
            .get_or_insert_with(|| navigation::build(graph, table, graph.root_id()))
    }
}

/// Everything in one document written straight to the base path.
///
/// Used by single-file outputs such as the JSON dump.
#[derive(Debug)]
pub struct SingleFileRouter {
    base_path: PathBuf,
    table: AddressTable,
    slugger: Slugger,
    links: LinkResolver,
    navigation: Option<Vec<NavigationElement>>,
}

impl SingleFileRouter {
    /// Create a router writing the single document to `base_path`.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>, options: &RouterOptions) -> Self {
        Self {
            base_path: base_path.into(),
            table: AddressTable::new(),
            slugger: Slugger::default(),
            links: LinkResolver::new(options.cache_bust, options.run_started_ms),
            navigation: None,
        }
    }

    fn anchor_children(&mut self, graph: &ProjectGraph, id: EntityId, prefix: Option<&str>) {
        for child in graph.children(id) {
            let name = alias(&child.name);
            let base = prefix.map_or_else(|| name.clone(), |p| format!("{p}.{name}"));
            let anchor = self.slugger.slug("", &base.to_lowercase());
            self.table.set_anchor(child.id, "", anchor);
            self.anchor_children(graph, child.id, Some(&base));
        }
    }
}

impl Router for SingleFileRouter {
    fn name(&self) -> &'static str {
        "single-file"
    }

    fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn build_documents(&mut self, graph: &ProjectGraph) -> Vec<Document> {
        self.table.clear();
        self.slugger.clear();
        self.links.reset();
        self.navigation = None;

        self.table.set_url(graph.root_id(), "");
        self.anchor_children(graph, graph.root_id(), None);
        vec![Document::new("", Template::Reflection, graph.root_id())]
    }

    fn address_table(&self) -> &AddressTable {
        &self.table
    }

    fn set_current_document(&mut self, document: &Document) {
        self.links.set_current(document);
    }

    fn current_document(&self) -> Option<&str> {
        self.links.current()
    }

    fn relative_url(&mut self, url: &str, cache_bust: bool) -> String {
        self.links.relative(url, cache_bust)
    }

    fn navigation(&mut self, graph: &ProjectGraph) -> &[NavigationElement] {
        let table = &self.table;
        self.navigation
            .get_or_insert_with(|| navigation::build(graph, table, graph.root_id()))
    }
}
