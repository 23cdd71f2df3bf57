//! Navigation tree projection.

use dossier_model::{EntityId, EntityKind, ProjectGraph};
use serde::Serialize;

use crate::address::AddressTable;

/// Node of the navigation tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavigationElement {
    /// Display label.
    pub text: String,
    /// Document URL relative to the output root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Entity kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntityKind>,
    /// CSS classes supplied by the output backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Child elements.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavigationElement>,
}

/// Build the navigation tree below `id`.
///
/// Only entities that own a document appear; inline entities are kept as
/// plain groups when documents live below them, and dropped otherwise.
pub(crate) fn build(graph: &ProjectGraph, table: &AddressTable, id: EntityId) -> Vec<NavigationElement> {
    graph
        .children(id)
        .filter_map(|child| {
            let children = build(graph, table, child.id);
            let path = table.url(child.id).map(str::to_owned);
            if path.is_none() && children.is_empty() {
                return None;
            }
            Some(NavigationElement {
                text: child.name.clone(),
                path,
                kind: Some(child.kind),
                class: None,
                children,
            })
        })
        .collect()
}

impl NavigationElement {
    /// Visit every element depth-first, parents before children.
    pub fn walk_mut(elements: &mut [Self], visit: &mut impl FnMut(&mut Self)) {
        for element in elements {
            visit(element);
            Self::walk_mut(&mut element.children, visit);
        }
    }
}
