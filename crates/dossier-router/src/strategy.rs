//! Path schemes for the routing strategies.
//!
//! A scheme decides which entity kinds own a document and where that
//! document lives. The boundary walk itself is shared by every scheme, see
//! [`StrategyRouter`](crate::StrategyRouter).

use dossier_model::EntityKind;

/// Directory for documents of a kind, `None` for kinds rendered inline.
#[must_use]
pub fn kind_directory(kind: EntityKind) -> Option<&'static str> {
    match kind {
        EntityKind::Module | EntityKind::Namespace => Some("modules"),
        EntityKind::Class => Some("classes"),
        EntityKind::Interface => Some("interfaces"),
        EntityKind::Enum => Some("enums"),
        EntityKind::TypeAlias => Some("types"),
        EntityKind::Function => Some("functions"),
        EntityKind::Variable => Some("variables"),
        EntityKind::Document => Some("documents"),
        EntityKind::Project
        | EntityKind::EnumMember
        | EntityKind::Constructor
        | EntityKind::Property
        | EntityKind::Method
        | EntityKind::Accessor
        | EntityKind::TypeLiteral
        | EntityKind::Parameter => None,
    }
}

/// Whether entities of `kind` get their own document.
#[must_use]
pub fn is_document_worthy(kind: EntityKind) -> bool {
    kind_directory(kind).is_some()
}

/// Placement of documents in the output tree.
pub trait PathScheme: Default + Send + Sync + 'static {
    /// Registry name of the strategy.
    const NAME: &'static str;

    /// Whether entities of `kind` get their own document.
    fn is_document_worthy(&self, kind: EntityKind) -> bool {
        is_document_worthy(kind)
    }

    /// Document path for an entity.
    ///
    /// `segments` are the aliases of the document-owning ancestors (root
    /// excluded), outermost first, ending with the entity's own alias.
    fn document_path(&self, kind: EntityKind, segments: &[String]) -> String;
}

/// `classes/core.Parser.html`
#[derive(Debug, Default)]
pub struct KindScheme;

impl PathScheme for KindScheme {
    const NAME: &'static str = "kind";

    fn document_path(&self, kind: EntityKind, segments: &[String]) -> String {
        format!("{}/{}.html", directory(kind), segments.join("."))
    }
}

/// `classes/core.Parser/index.html`
#[derive(Debug, Default)]
pub struct KindDirScheme;

impl PathScheme for KindDirScheme {
    const NAME: &'static str = "kind-dir";

    fn document_path(&self, kind: EntityKind, segments: &[String]) -> String {
        format!("{}/{}/index.html", directory(kind), segments.join("."))
    }
}

/// `core/Parser.html`
#[derive(Debug, Default)]
pub struct StructureScheme;

impl PathScheme for StructureScheme {
    const NAME: &'static str = "structure";

    fn document_path(&self, _kind: EntityKind, segments: &[String]) -> String {
        format!("{}.html", segments.join("/"))
    }
}

/// `core/Parser/index.html`
#[derive(Debug, Default)]
pub struct StructureDirScheme;

impl PathScheme for StructureDirScheme {
    const NAME: &'static str = "structure-dir";

    fn document_path(&self, _kind: EntityKind, segments: &[String]) -> String {
        format!("{}/index.html", segments.join("/"))
    }
}

fn directory(kind: EntityKind) -> &'static str {
    kind_directory(kind).unwrap_or("other")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn test_document_worthy_kinds() {
        assert!(is_document_worthy(EntityKind::Class));
        assert!(is_document_worthy(EntityKind::Interface));
        assert!(is_document_worthy(EntityKind::Module));
        assert!(is_document_worthy(EntityKind::Function));
        assert!(!is_document_worthy(EntityKind::Method));
        assert!(!is_document_worthy(EntityKind::Property));
        assert!(!is_document_worthy(EntityKind::Project));
    }

    #[test]
    fn test_kind_scheme_joins_with_dots() {
        let path = KindScheme.document_path(EntityKind::Class, &segments(&["core", "Parser"]));
        assert_eq!(path, "classes/core.Parser.html");
    }

    #[test]
    fn test_kind_dir_scheme() {
        let path = KindDirScheme.document_path(EntityKind::Enum, &segments(&["Color"]));
        assert_eq!(path, "enums/Color/index.html");
    }

    #[test]
    fn test_structure_schemes_mirror_hierarchy() {
        let parts = segments(&["core", "Parser"]);
        assert_eq!(
            StructureScheme.document_path(EntityKind::Class, &parts),
            "core/Parser.html"
        );
        assert_eq!(
            StructureDirScheme.document_path(EntityKind::Class, &parts),
            "core/Parser/index.html"
        );
    }
}
