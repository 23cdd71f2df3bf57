//! Entity kind tags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a documentation entity.
///
/// The kind drives routing (which entities own a document) and presentation
/// (section grouping, CSS classes). Serialized in kebab-case, e.g. `type-alias`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Project,
    Module,
    Namespace,
    Enum,
    EnumMember,
    Variable,
    Function,
    Class,
    Interface,
    Constructor,
    Property,
    Method,
    Accessor,
    TypeAlias,
    TypeLiteral,
    Parameter,
    Document,
}

impl EntityKind {
    /// All kinds in declaration order.
    pub const ALL: [Self; 17] = [
        Self::Project,
        Self::Module,
        Self::Namespace,
        Self::Enum,
        Self::EnumMember,
        Self::Variable,
        Self::Function,
        Self::Class,
        Self::Interface,
        Self::Constructor,
        Self::Property,
        Self::Method,
        Self::Accessor,
        Self::TypeAlias,
        Self::TypeLiteral,
        Self::Parameter,
        Self::Document,
    ];

    /// Kebab-case identifier, identical to the serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Module => "module",
            Self::Namespace => "namespace",
            Self::Enum => "enum",
            Self::EnumMember => "enum-member",
            Self::Variable => "variable",
            Self::Function => "function",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Constructor => "constructor",
            Self::Property => "property",
            Self::Method => "method",
            Self::Accessor => "accessor",
            Self::TypeAlias => "type-alias",
            Self::TypeLiteral => "type-literal",
            Self::Parameter => "parameter",
            Self::Document => "document",
        }
    }

    /// Human readable singular label ("Type Alias").
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::Module => "Module",
            Self::Namespace => "Namespace",
            Self::Enum => "Enumeration",
            Self::EnumMember => "Enumeration Member",
            Self::Variable => "Variable",
            Self::Function => "Function",
            Self::Class => "Class",
            Self::Interface => "Interface",
            Self::Constructor => "Constructor",
            Self::Property => "Property",
            Self::Method => "Method",
            Self::Accessor => "Accessor",
            Self::TypeAlias => "Type Alias",
            Self::TypeLiteral => "Type Literal",
            Self::Parameter => "Parameter",
            Self::Document => "Document",
        }
    }

    /// Human readable plural label, used for member section headings.
    #[must_use]
    pub fn plural(self) -> &'static str {
        match self {
            Self::Project => "Projects",
            Self::Module => "Modules",
            Self::Namespace => "Namespaces",
            Self::Enum => "Enumerations",
            Self::EnumMember => "Enumeration Members",
            Self::Variable => "Variables",
            Self::Function => "Functions",
            Self::Class => "Classes",
            Self::Interface => "Interfaces",
            Self::Constructor => "Constructors",
            Self::Property => "Properties",
            Self::Method => "Methods",
            Self::Accessor => "Accessors",
            Self::TypeAlias => "Type Aliases",
            Self::TypeLiteral => "Type Literals",
            Self::Parameter => "Parameters",
            Self::Document => "Documents",
        }
    }

    /// Module-like kinds group other declarations.
    #[must_use]
    pub fn is_module_like(self) -> bool {
        matches!(self, Self::Module | Self::Namespace)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_matches_serialized_form() {
        for kind in EntityKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_deserialize_kebab_case() {
        let kind: EntityKind = serde_json::from_str("\"type-alias\"").unwrap();
        assert_eq!(kind, EntityKind::TypeAlias);
    }

    #[test]
    fn test_module_like() {
        assert!(EntityKind::Module.is_module_like());
        assert!(EntityKind::Namespace.is_module_like());
        assert!(!EntityKind::Class.is_module_like());
    }
}
