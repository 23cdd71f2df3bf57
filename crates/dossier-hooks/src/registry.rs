//! Hook registry implementation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Shared listener callback.
pub type Listener<P, R> = Arc<dyn Fn(&mut P) -> R + Send + Sync>;

/// Handle returned by [`HookRegistry::on`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Subscriber<P, R> {
    id: SubscriptionId,
    priority: i32,
    listener: Listener<P, R>,
}

impl<P, R> Clone for Subscriber<P, R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            priority: self.priority,
            listener: Arc::clone(&self.listener),
        }
    }
}

type Channels<P, R> = BTreeMap<String, Vec<Subscriber<P, R>>>;

/// Saved registry state.
///
/// Produced by [`HookRegistry::snapshot`] and consumed by
/// [`HookRegistry::restore`].
pub struct Snapshot<P, R = ()> {
    channels: Channels<P, R>,
}

/// Named channels of ordered listeners.
///
/// Each channel keeps its listeners sorted by priority (highest first);
/// listeners with equal priority run in subscription order.
///
/// `P` is the payload handed to listeners (mutable, so listeners can alter
/// it), `R` is what each listener returns. Registries with `R = String` are
/// insertion points whose results are concatenated by [`render`](Self::render).
///
/// # Example
///
/// ```
/// use dossier_hooks::HookRegistry;
///
/// let mut hooks: HookRegistry<u32, String> = HookRegistry::new();
/// hooks.on("body.end", |n: &mut u32| format!("<b>{n}</b>"));
///
/// let snapshot = hooks.snapshot();
/// hooks.on("body.end", |_: &mut u32| "<i>temp</i>".to_owned());
/// assert_eq!(hooks.render("body.end", &mut 1), "<b>1</b><i>temp</i>");
///
/// hooks.restore(snapshot);
/// assert_eq!(hooks.render("body.end", &mut 1), "<b>1</b>");
/// ```
pub struct HookRegistry<P, R = ()> {
    channels: Channels<P, R>,
    next_id: u64,
}

impl<P, R> HookRegistry<P, R> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Subscribe to a channel with default priority 0.
    pub fn on<F>(&mut self, channel: impl Into<String>, listener: F) -> SubscriptionId
    where
        F: Fn(&mut P) -> R + Send + Sync + 'static,
    {
        self.on_with_priority(channel, 0, listener)
    }

    /// Subscribe to a channel with an explicit priority.
    pub fn on_with_priority<F>(
        &mut self,
        channel: impl Into<String>,
        priority: i32,
        listener: F,
    ) -> SubscriptionId
    where
        F: Fn(&mut P) -> R + Send + Sync + 'static,
    {
        self.subscribe(channel.into(), priority, Arc::new(listener))
    }

    fn subscribe(&mut self, channel: String, priority: i32, listener: Listener<P, R>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        let subscribers = self.channels.entry(channel).or_default();
        let position = subscribers
            .iter()
            .position(|s| s.priority < priority)
            .unwrap_or(subscribers.len());
        subscribers.insert(
            position,
            Subscriber {
                id,
                priority,
                listener,
            },
        );
        id
    }

    /// Remove a subscription. Returns `false` if it was not registered.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        for subscribers in self.channels.values_mut() {
            if let Some(position) = subscribers.iter().position(|s| s.id == id) {
                subscribers.remove(position);
                return true;
            }
        }
        false
    }

    /// Merge queued registrations into the registry.
    pub fn extend(&mut self, queue: HookQueue<P, R>) {
        for (channel, priority, listener) in queue.pending {
            self.subscribe(channel, priority, listener);
        }
    }

    /// Call every listener of `channel` in order and collect their results.
    pub fn emit(&self, channel: &str, payload: &mut P) -> Vec<R> {
        let Some(subscribers) = self.channels.get(channel) else {
            return Vec::new();
        };
        tracing::trace!(channel, listeners = subscribers.len(), "Emitting hook");
        subscribers
            .iter()
            .map(|subscriber| (subscriber.listener)(payload))
            .collect()
    }

    /// Whether `channel` has at least one listener.
    #[must_use]
    pub fn has_listeners(&self, channel: &str) -> bool {
        self.channels.get(channel).is_some_and(|s| !s.is_empty())
    }

    /// Names of channels with listeners, sorted.
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.channels
            .iter()
            .filter(|(_, subscribers)| !subscribers.is_empty())
            .map(|(name, _)| name.as_str())
    }

    /// Capture the current registrations.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<P, R> {
        Snapshot {
            channels: self.channels.clone(),
        }
    }

    /// Roll back to a previously captured state.
    ///
    /// Registrations made after the snapshot are dropped; registrations
    /// removed after the snapshot come back. Subscription ids are never
    /// reused.
    pub fn restore(&mut self, snapshot: Snapshot<P, R>) {
        self.channels = snapshot.channels;
    }
}

impl<P> HookRegistry<P, String> {
    /// Emit an insertion point and concatenate the listener output.
    pub fn render(&self, channel: &str, payload: &mut P) -> String {
        self.emit(channel, payload).concat()
    }
}

impl<P, R> Default for HookRegistry<P, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, R> fmt::Debug for HookRegistry<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: BTreeMap<&str, usize> = self
            .channels
            .iter()
            .map(|(name, subscribers)| (name.as_str(), subscribers.len()))
            .collect();
        f.debug_struct("HookRegistry").field("channels", &counts).finish()
    }
}

/// Registrations waiting to be merged into a [`HookRegistry`].
///
/// Used where listeners want to subscribe while the registry itself is
/// borrowed, e.g. from inside a page event listener.
pub struct HookQueue<P, R = ()> {
    pending: Vec<(String, i32, Listener<P, R>)>,
}

impl<P, R> HookQueue<P, R> {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Queue a subscription with default priority.
    pub fn on<F>(&mut self, channel: impl Into<String>, listener: F)
    where
        F: Fn(&mut P) -> R + Send + Sync + 'static,
    {
        self.on_with_priority(channel, 0, listener);
    }

    /// Queue a subscription with an explicit priority.
    pub fn on_with_priority<F>(&mut self, channel: impl Into<String>, priority: i32, listener: F)
    where
        F: Fn(&mut P) -> R + Send + Sync + 'static,
    {
        self.pending.push((channel.into(), priority, Arc::new(listener)));
    }

    /// Number of queued subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<P, R> Default for HookQueue<P, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, R> fmt::Debug for HookQueue<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookQueue")
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tag(text: &'static str) -> impl Fn(&mut Vec<&'static str>) + Send + Sync {
        move |log: &mut Vec<&'static str>| log.push(text)
    }

    #[test]
    fn test_emit_runs_in_subscription_order() {
        let mut hooks: HookRegistry<Vec<&'static str>> = HookRegistry::new();
        hooks.on("beginPage", tag("a"));
        hooks.on("beginPage", tag("b"));
        hooks.on("endPage", tag("x"));

        let mut log = Vec::new();
        hooks.emit("beginPage", &mut log);
        assert_eq!(log, vec!["a", "b"]);
    }

    #[test]
    fn test_priority_runs_first() {
        let mut hooks: HookRegistry<Vec<&'static str>> = HookRegistry::new();
        hooks.on("c", tag("low"));
        hooks.on_with_priority("c", 10, tag("high"));
        hooks.on_with_priority("c", -5, tag("last"));
        hooks.on("c", tag("low2"));

        let mut log = Vec::new();
        hooks.emit("c", &mut log);
        assert_eq!(log, vec!["high", "low", "low2", "last"]);
    }

    #[test]
    fn test_emit_unknown_channel_is_empty() {
        let hooks: HookRegistry<u8, String> = HookRegistry::new();
        assert!(hooks.emit("nothing", &mut 0).is_empty());
        assert!(!hooks.has_listeners("nothing"));
    }

    #[test]
    fn test_render_concatenates() {
        let mut hooks: HookRegistry<String, String> = HookRegistry::new();
        hooks.on("head.end", |title: &mut String| format!("<meta name=\"{title}\">"));
        hooks.on("head.end", |_: &mut String| "<script></script>".to_owned());

        let html = hooks.render("head.end", &mut "x".to_owned());
        assert_eq!(html, "<meta name=\"x\"><script></script>");
    }

    #[test]
    fn test_listener_mutates_payload() {
        let mut hooks: HookRegistry<String> = HookRegistry::new();
        hooks.on("endPage", |contents: &mut String| contents.push_str("<!-- end -->"));

        let mut contents = "<html></html>".to_owned();
        hooks.emit("endPage", &mut contents);
        assert_eq!(contents, "<html></html><!-- end -->");
    }

    #[test]
    fn test_off_removes_single_subscription() {
        let mut hooks: HookRegistry<Vec<&'static str>> = HookRegistry::new();
        let first = hooks.on("c", tag("a"));
        hooks.on("c", tag("b"));

        assert!(hooks.off(first));
        assert!(!hooks.off(first));

        let mut log = Vec::new();
        hooks.emit("c", &mut log);
        assert_eq!(log, vec!["b"]);
    }

    #[test]
    fn test_restore_drops_later_registrations() {
        let mut hooks: HookRegistry<Vec<&'static str>> = HookRegistry::new();
        hooks.on("c", tag("run"));
        let snapshot = hooks.snapshot();

        hooks.on("c", tag("page"));
        hooks.on("other", tag("page"));
        hooks.restore(snapshot);

        let mut log = Vec::new();
        hooks.emit("c", &mut log);
        hooks.emit("other", &mut log);
        assert_eq!(log, vec!["run"]);
        assert_eq!(hooks.channels().collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn test_restore_brings_back_removed_registrations() {
        let mut hooks: HookRegistry<Vec<&'static str>> = HookRegistry::new();
        let id = hooks.on("c", tag("a"));
        let snapshot = hooks.snapshot();
        hooks.off(id);
        hooks.restore(snapshot);

        assert!(hooks.has_listeners("c"));
    }

    #[test]
    fn test_ids_not_reused_after_restore() {
        let mut hooks: HookRegistry<u8> = HookRegistry::new();
        let snapshot = hooks.snapshot();
        let first = hooks.on("c", |_: &mut u8| {});
        hooks.restore(snapshot);
        let second = hooks.on("c", |_: &mut u8| {});

        assert_ne!(first, second);
    }

    #[test]
    fn test_extend_merges_queue() {
        let mut hooks: HookRegistry<Vec<&'static str>> = HookRegistry::new();
        hooks.on("c", tag("registry"));

        let mut queue = HookQueue::new();
        queue.on("c", tag("queued"));
        queue.on_with_priority("c", 1, tag("urgent"));
        assert_eq!(queue.len(), 2);
        hooks.extend(queue);

        let mut log = Vec::new();
        hooks.emit("c", &mut log);
        assert_eq!(log, vec!["urgent", "registry", "queued"]);
    }
}
