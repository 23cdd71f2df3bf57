//! Path aliases and per-document anchor slugs.

use std::collections::{HashMap, HashSet};

/// Filesystem and URL safe alias of an entity name.
///
/// Characters outside `[A-Za-z0-9_$-]` become `_`; an empty name becomes `_`.
#[must_use]
pub fn alias(name: &str) -> String {
    if name.is_empty() {
        return "_".to_owned();
    }
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Hands out anchors that are unique within each document.
///
/// The first request for `foo` gets `foo`, the next ones `foo-1`, `foo-2`,
/// skipping candidates that are already taken.
#[derive(Debug, Default)]
pub(crate) struct Slugger {
    used: HashMap<String, HashSet<String>>,
}

impl Slugger {
    pub(crate) fn slug(&mut self, document_url: &str, base: &str) -> String {
        let used = self.used.entry(document_url.to_owned()).or_default();
        if used.insert(base.to_owned()) {
            return base.to_owned();
        }
        let mut n = 1;
        loop {
            let candidate = format!("{base}-{n}");
            if used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.used.clear();
    }
}
