//! Router-owned address table.

use std::collections::BTreeMap;

use dossier_model::EntityId;

/// Where an entity lives in the output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Address {
    /// The entity owns a document at this URL.
    Document {
        /// Document URL, relative to the output root.
        url: String,
    },
    /// The entity is a section of an ancestor's document.
    Anchor {
        /// URL of the document the entity is rendered in.
        document_url: String,
        /// Fragment identifier within that document.
        anchor: String,
    },
}

/// Mapping from entity to its address.
///
/// Each entity has at most one address: assigning a new one replaces the
/// previous entry. Kept outside the graph so several routers can address the
/// same graph independently.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddressTable {
    entries: BTreeMap<EntityId, Address>,
}

impl AddressTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Give an entity its own document URL.
    pub fn set_url(&mut self, id: EntityId, url: impl Into<String>) {
        self.entries.insert(id, Address::Document { url: url.into() });
    }

    /// Anchor an entity inside another document.
    pub fn set_anchor(
        &mut self,
        id: EntityId,
        document_url: impl Into<String>,
        anchor: impl Into<String>,
    ) {
        self.entries.insert(
            id,
            Address::Anchor {
                document_url: document_url.into(),
                anchor: anchor.into(),
            },
        );
    }

    /// Address of an entity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Address> {
        self.entries.get(&id)
    }

    /// Own document URL, for entities that own a document.
    #[must_use]
    pub fn url(&self, id: EntityId) -> Option<&str> {
        match self.entries.get(&id)? {
            Address::Document { url } => Some(url),
            Address::Anchor { .. } => None,
        }
    }

    /// Anchor, for entities rendered inside an ancestor's document.
    #[must_use]
    pub fn anchor(&self, id: EntityId) -> Option<&str> {
        match self.entries.get(&id)? {
            Address::Anchor { anchor, .. } => Some(anchor),
            Address::Document { .. } => None,
        }
    }

    /// Whether an entity owns a document.
    #[must_use]
    pub fn has_own_document(&self, id: EntityId) -> bool {
        matches!(self.entries.get(&id), Some(Address::Document { .. }))
    }

    /// Absolute URL of an entity: its own URL or `document#anchor`.
    #[must_use]
    pub fn resolve(&self, id: EntityId) -> Option<String> {
        match self.entries.get(&id)? {
            Address::Document { url } => Some(url.clone()),
            Address::Anchor {
                document_url,
                anchor,
            } => Some(format!("{document_url}#{anchor}")),
        }
    }

    /// Number of addressed entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entity is addressed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Address)> {
        self.entries.iter().map(|(&id, address)| (id, address))
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_and_anchor_are_exclusive() {
        let mut table = AddressTable::new();
        let id = EntityId::ROOT;

        table.set_url(id, "index.html");
        assert_eq!(table.url(id), Some("index.html"));
        assert_eq!(table.anchor(id), None);

        table.set_anchor(id, "index.html", "root");
        assert_eq!(table.url(id), None);
        assert_eq!(table.anchor(id), Some("root"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_resolve_anchor_joins_document_url() {
        let mut table = AddressTable::new();
        table.set_anchor(EntityId::ROOT, "classes/Foo.html", "bar");
        assert_eq!(
            table.resolve(EntityId::ROOT),
            Some("classes/Foo.html#bar".to_owned())
        );
    }
}
