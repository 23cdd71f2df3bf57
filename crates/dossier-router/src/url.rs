//! Relative URL computation.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::document::Document;

static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*:").unwrap());

/// Whether `url` is external (has a scheme or is protocol-relative).
///
/// ```
/// use dossier_router::is_external;
///
/// assert!(is_external("https://example.com"));
/// assert!(is_external("mailto:me@example.com"));
/// assert!(is_external("//cdn.example.com/x.js"));
/// assert!(!is_external("classes/Foo.html"));
/// ```
pub fn is_external(url: &str) -> bool {
    url.starts_with("//") || SCHEME_RE.is_match(url)
}

/// Relative path from a directory to a target path, POSIX style.
///
/// Both arguments are slash-separated and relative to the output root.
/// `from_dir` is a directory (empty for the root), `to` a file path that
/// may carry a `#fragment`.
///
/// # Examples
///
/// ```
/// use dossier_router::relative_path;
///
/// assert_eq!(relative_path("classes", "functions/foo.html"), "../functions/foo.html");
/// assert_eq!(relative_path("classes", "classes/bar.html"), "bar.html");
/// assert_eq!(relative_path("", "modules.html"), "modules.html");
/// ```
pub fn relative_path(from_dir: &str, to: &str) -> String {
    let from_segs: Vec<&str> = from_dir.split('/').filter(|s| !s.is_empty()).collect();
    let to_segs: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    // The last target segment is a file name and never matches a directory.
    let comparable = to_segs.len().saturating_sub(1);
    let common = from_segs
        .iter()
        .zip(&to_segs[..comparable])
        .take_while(|(a, b)| a == b)
        .count();

    let ups_part = "../".repeat(from_segs.len() - common);
    let down_part = to_segs[common..].join("/");

    let result = format!("{ups_part}{down_part}");
    if result.is_empty() {
        "./".to_owned()
    } else {
        result
    }
}

/// Current-document context plus memoized relative URLs.
///
/// Shared by every router strategy. The memo lives as long as the router,
/// i.e. one run.
#[derive(Debug, Default)]
pub(crate) struct LinkResolver {
    current_path: Option<String>,
    current_dir: String,
    memo: HashMap<(String, String), String>,
    cache_bust: bool,
    cache_key: u64,
}

impl LinkResolver {
    pub(crate) fn new(cache_bust: bool, cache_key: u64) -> Self {
        Self {
            cache_bust,
            cache_key,
            ..Self::default()
        }
    }

    pub(crate) fn set_current(&mut self, document: &Document) {
        self.current_dir = document.directory().to_owned();
        self.current_path = Some(document.path.clone());
    }

    pub(crate) fn current(&self) -> Option<&str> {
        self.current_path.as_deref()
    }

    pub(crate) fn relative(&mut self, url: &str, cache_bust: bool) -> String {
        if is_external(url) {
            return url.to_owned();
        }

        let relative = self
            .memo
            .entry((self.current_dir.clone(), url.to_owned()))
            .or_insert_with(|| relative_path(&self.current_dir, url))
            .clone();

        if !(cache_bust && self.cache_bust) {
            return relative;
        }
        match relative.split_once('#') {
            Some((path, fragment)) => format!("{path}?cache={}#{fragment}", self.cache_key),
            None => format!("{relative}?cache={}", self.cache_key),
        }
    }

    pub(crate) fn memo_len(&self) -> usize {
        self.memo.len()
    }

    pub(crate) fn reset(&mut self) {
        self.current_path = None;
        self.current_dir.clear();
        self.memo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Template;
    use dossier_model::EntityId;

    fn doc(path: &str) -> Document {
        Document::new(path, Template::Reflection, EntityId::ROOT)
    }

    #[test]
    fn test_relative_path_up_and_across() {
        assert_eq!(
            relative_path("classes", "functions/foo.html"),
            "../functions/foo.html"
        );
    }

    #[test]
    fn test_relative_path_same_directory() {
        assert_eq!(relative_path("classes", "classes/bar.html"), "bar.html");
    }

    #[test]
    fn test_relative_path_root_to_nested() {
        assert_eq!(relative_path("", "classes/Foo.html"), "classes/Foo.html");
    }

    #[test]
    fn test_relative_path_nested_to_root() {
        assert_eq!(relative_path("a/b", "index.html"), "../../index.html");
    }

    #[test]
    fn test_relative_path_keeps_fragment() {
        assert_eq!(
            relative_path("classes", "classes/Foo.html#bar"),
            "Foo.html#bar"
        );
    }

    #[test]
    fn test_relative_path_file_named_like_directory() {
        assert_eq!(relative_path("a", "a"), "../a");
    }

    #[test]
    fn test_relative_path_deep_common_prefix() {
        assert_eq!(relative_path("a/b/c", "a/b/d/e.html"), "../d/e.html");
    }

    #[test]
    fn test_relative_path_empty_target() {
        assert_eq!(relative_path("", ""), "./");
    }

    #[test]
    fn test_resolver_uses_current_directory() {
        let mut resolver = LinkResolver::new(false, 0);
        resolver.set_current(&doc("classes/Foo.html"));
        assert_eq!(
            resolver.relative("functions/foo.html", false),
            "../functions/foo.html"
        );
        assert_eq!(resolver.relative("classes/bar.html", false), "bar.html");
        assert_eq!(resolver.current(), Some("classes/Foo.html"));
    }

    #[test]
    fn test_resolver_memoizes_per_directory() {
        let mut resolver = LinkResolver::new(false, 0);
        resolver.set_current(&doc("classes/Foo.html"));
        resolver.relative("index.html", false);
        resolver.set_current(&doc("classes/Bar.html"));
        resolver.relative("index.html", false);
        assert_eq!(resolver.memo_len(), 1);

        resolver.set_current(&doc("index.html"));
        assert_eq!(resolver.relative("index.html", false), "index.html");
        assert_eq!(resolver.memo_len(), 2);
    }

    #[test]
    fn test_resolver_external_bypasses_memo() {
        let mut resolver = LinkResolver::new(true, 7);
        resolver.set_current(&doc("classes/Foo.html"));
        assert_eq!(
            resolver.relative("https://example.com/x", true),
            "https://example.com/x"
        );
        assert_eq!(resolver.memo_len(), 0);
    }

    #[test]
    fn test_resolver_cache_bust_requires_option() {
        let mut enabled = LinkResolver::new(true, 1234);
        enabled.set_current(&doc("index.html"));
        assert_eq!(
            enabled.relative("assets/style.css", true),
            "assets/style.css?cache=1234"
        );
        assert_eq!(enabled.relative("assets/style.css", false), "assets/style.css");

        let mut disabled = LinkResolver::new(false, 1234);
        disabled.set_current(&doc("index.html"));
        assert_eq!(disabled.relative("assets/style.css", true), "assets/style.css");
    }

    #[test]
    fn test_resolver_cache_bust_keeps_fragment_last() {
        let mut resolver = LinkResolver::new(true, 42);
        resolver.set_current(&doc("classes/Bar.html"));
        assert_eq!(
            resolver.relative("classes/Foo.html#parse", true),
            "Foo.html?cache=42#parse"
        );
    }
}
