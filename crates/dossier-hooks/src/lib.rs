//! Named hook channels with scoped registrations for Dossier.
//!
//! A [`HookRegistry`] maps channel names to ordered listener lists. The
//! renderer uses one registry per payload type: lifecycle events
//! (`beginRender`, `beginPage`, ...) and insertion points (`head.end`,
//! `sidebar.begin`, ...) whose listener output is spliced into pages.
//!
//! Registrations can be scoped with [`HookRegistry::snapshot`] and
//! [`HookRegistry::restore`]: anything registered in between is rolled back.

mod registry;

pub use registry::{HookQueue, HookRegistry, Listener, Snapshot, SubscriptionId};

/// Well-known channel names.
pub mod channel {
    /// Fired once per run after routing, before any page renders.
    pub const BEGIN_RENDER: &str = "beginRender";
    /// Fired once per run after every page has been written.
    pub const END_RENDER: &str = "endRender";
    /// Fired before a page renders.
    pub const BEGIN_PAGE: &str = "beginPage";
    /// Fired after a page renders, before it is written.
    pub const END_PAGE: &str = "endPage";

    pub const HEAD_BEGIN: &str = "head.begin";
    pub const HEAD_END: &str = "head.end";
    pub const BODY_BEGIN: &str = "body.begin";
    pub const BODY_END: &str = "body.end";
    pub const SIDEBAR_BEGIN: &str = "sidebar.begin";
    pub const SIDEBAR_END: &str = "sidebar.end";
    pub const CONTENT_BEGIN: &str = "content.begin";
    pub const CONTENT_END: &str = "content.end";
    pub const NAVIGATION_BEGIN: &str = "navigation.begin";
    pub const NAVIGATION_END: &str = "navigation.end";
}
