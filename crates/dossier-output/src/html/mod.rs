//! Static HTML site backend.

mod template;

use std::fmt::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dossier_hooks::channel;
use dossier_model::{ContentKind, Entity, EntityId, EntityKind, ProjectGraph};
use dossier_router::{
    Address, INDEX_PATH, NavigationElement, PageHeading, Router, RouterError, RouterOptions,
    RouterRegistry, Template,
};

use self::template::{Breadcrumb, Insertions, NavItem, PageData, render_page};
use crate::backend::{EntityStyles, OutputBackend};
use crate::context::{BoxFuture, OutputOptions, PageContext, RunContext};
use crate::error::OutputError;
use crate::job::JobError;
use crate::markup::{CommonMarkRenderer, HeadingIds, MarkupRenderer, escape_html};

/// Stylesheet location relative to the output root.
pub const STYLESHEET_PATH: &str = "assets/style.css";
/// Navigation index location relative to the output root.
pub const NAVIGATION_PATH: &str = "assets/navigation.json";

const NAME: &str = "html";
const DEFAULT_STYLESHEET: &str = include_str!("style.css");
const MAX_HEADING_LEVEL: u8 = 6;

/// `kind-<kind>` CSS classes, matching the built-in stylesheet.
#[derive(Clone, Copy, Debug, Default)]
pub struct KindStyles;

impl EntityStyles for KindStyles {
    fn class_for(&self, kind: EntityKind) -> Option<String> {
        Some(format!("kind-{}", kind.as_str()))
    }
}

/// Renders every document to a standalone HTML page.
pub struct HtmlBackend {
    options: OutputOptions,
    routers: RouterRegistry,
    styles: KindStyles,
    stylesheet: Option<Arc<str>>,
    markup: Option<Box<dyn MarkupRenderer>>,
}

impl HtmlBackend {
    #[must_use]
    pub fn new(options: OutputOptions) -> Self {
        Self {
            options,
            routers: RouterRegistry::with_defaults(),
            styles: KindStyles,
            stylesheet: None,
            markup: None,
        }
    }

    /// Replace the routing strategies available to this backend.
    #[must_use]
    pub fn with_routers(mut self, routers: RouterRegistry) -> Self {
        self.routers = routers;
        self
    }

    async fn load_stylesheet(&self) -> Result<Arc<str>, OutputError> {
        match &self.options.custom_css {
            Some(path) => {
                let css = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| OutputError::Stylesheet {
                        path: path.clone(),
                        source,
                    })?;
                Ok(Arc::from(css))
            }
            None => Ok(Arc::from(DEFAULT_STYLESHEET)),
        }
    }
}

impl fmt::Debug for HtmlBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlBackend")
            .field("options", &self.options)
            .field("routers", &self.routers)
            .field("ready", &self.markup.is_some())
            .finish_non_exhaustive()
    }
}

impl OutputBackend for HtmlBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    fn setup<'a>(&'a mut self, context: &'a RunContext) -> BoxFuture<'a, Result<(), OutputError>> {
        Box::pin(async move {
            let stylesheet = self.load_stylesheet().await?;
            self.markup = Some(Box::new(CommonMarkRenderer::new()));
            self.stylesheet = Some(Arc::clone(&stylesheet));

            let styles = self.styles;
            context
                .post_render_jobs()
                .push("html-assets", move |event| async move {
                    write_asset(&event.output_path, STYLESHEET_PATH, stylesheet.as_bytes()).await?;

                    let mut navigation = event.navigation.clone();
                    let mut add_class = |element: &mut NavigationElement| {
                        element.class = element.kind.and_then(|kind| styles.class_for(kind));
                    };
                    NavigationElement::walk_mut(&mut navigation, &mut add_class);
                    let json = serde_json::to_string(&navigation).map_err(|source| {
                        JobError::Serialize {
                            what: "navigation",
                            source,
                        }
                    })?;
                    write_asset(&event.output_path, NAVIGATION_PATH, json.as_bytes()).await
                });

            tracing::debug!(
                custom_css = self.options.custom_css.is_some(),
                "HTML backend ready"
            );
            Ok(())
        })
    }

    fn teardown<'a>(
        &'a mut self,
        _context: &'a RunContext,
    ) -> BoxFuture<'a, Result<(), OutputError>> {
        Box::pin(async move {
            self.stylesheet = None;
            self.markup = None;
            Ok(())
        })
    }

    fn build_router(
        &self,
        router: &str,
        base_path: &Path,
        options: &RouterOptions,
    ) -> Result<Box<dyn Router>, RouterError> {
        self.routers.create(router, base_path, options)
    }

    fn render(&mut self, page: &mut PageContext<'_>) -> Result<String, OutputError> {
        let (Some(markup), Some(_)) = (self.markup.as_deref(), &self.stylesheet) else {
            return Err(OutputError::NotReady(NAME));
        };
        let graph = page.graph;
        let document = page.page.document.clone();
        let entity = graph
            .get(document.model)
            .ok_or(OutputError::MissingEntity(document.model))?;

        let headings = std::mem::take(&mut page.page.document.headings);
        // Router anchors are fixed; markup headings take whatever ids are left.
        let mut ids: HeadingIds = headings.iter().map(|h| h.anchor.clone()).collect();
        ids.extend(
            page.router
                .address_table()
                .iter()
                .filter_map(|(_, address)| match address {
                    Address::Anchor {
                        document_url,
                        anchor,
                    } if *document_url == document.path => Some(anchor.clone()),
                    _ => None,
                }),
        );

        let mut view = PageView {
            graph,
            router: &mut *page.router,
            markup,
            styles: &self.styles,
            ids,
            headings,
        };
        let content_html = match document.template {
            Template::Index => view.index(),
            Template::Reflection => view.reflection(entity),
            Template::Document => view.document(entity),
        };
        let title = if entity.id == graph.root_id() {
            graph.name().to_owned()
        } else {
            format!("{} | {}", entity.name, graph.name())
        };
        let breadcrumbs = view.breadcrumbs(entity);
        let navigation = view.navigation(&document.path);
        let css_href = view.router.relative_url(STYLESHEET_PATH, true);
        let root_href = view.router.relative_url(INDEX_PATH, false);
        page.page.document.headings = view.headings;

        let mut hook_context = page.hook_context();
        let mut insert = |channel: &str| page.insert(channel, &mut hook_context);
        let insertions = Insertions {
            head_begin: insert(channel::HEAD_BEGIN),
            head_end: insert(channel::HEAD_END),
            body_begin: insert(channel::BODY_BEGIN),
            body_end: insert(channel::BODY_END),
            sidebar_begin: insert(channel::SIDEBAR_BEGIN),
            sidebar_end: insert(channel::SIDEBAR_END),
            navigation_begin: insert(channel::NAVIGATION_BEGIN),
            navigation_end: insert(channel::NAVIGATION_END),
            content_begin: insert(channel::CONTENT_BEGIN),
            content_end: insert(channel::CONTENT_END),
        };

        Ok(render_page(&PageData {
            title,
            project: graph.name().to_owned(),
            root_href,
            css_href,
            content_html,
            breadcrumbs,
            toc: &page.page.document.headings,
            navigation,
            insertions,
        }))
    }

    fn styles(&self) -> Option<&dyn EntityStyles> {
        Some(&self.styles)
    }
}

async fn write_asset(root: &Path, relative: &str, contents: &[u8]) -> Result<(), JobError> {
    let path: PathBuf = root.join(relative);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| JobError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    tokio::fs::write(&path, contents)
        .await
        .map_err(|source| JobError::Write {
            path: path.clone(),
            source,
        })?;
    tracing::debug!(path = %path.display(), "Wrote asset");
    Ok(())
}

/// Content rendering state for one page.
struct PageView<'a> {
    graph: &'a ProjectGraph,
    router: &'a mut dyn Router,
    markup: &'a dyn MarkupRenderer,
    styles: &'a dyn EntityStyles,
    ids: HeadingIds,
    headings: Vec<PageHeading>,
}

impl PageView<'_> {
    fn index(&mut self) -> String {
        let mut html = String::new();
        match self.graph.readme() {
            Some(readme) => {
                html.push_str(&self.markup.render(readme, &mut self.ids, &mut self.headings));
            }
            None => {
                let _ = writeln!(html, "<h1>{}</h1>", escape_html(self.graph.name()));
            }
        }
        html
    }

    fn reflection(&mut self, entity: &Entity) -> String {
        let mut html = String::from("<header>\n");
        if entity.kind != EntityKind::Project {
            let _ = writeln!(
                html,
                "<span class=\"kind-label\">{}</span>",
                entity.kind.label()
            );
        }
        let _ = writeln!(html, "<h1>{}</h1>", escape_html(&entity.name));
        html.push_str("</header>\n");

        self.blocks(&mut html, entity, &[ContentKind::Summary, ContentKind::Remarks]);
        self.members(&mut html, entity.id, 2);
        html
    }

    fn document(&mut self, entity: &Entity) -> String {
        let mut html = String::new();
        self.blocks(
            &mut html,
            entity,
            &[ContentKind::Readme, ContentKind::Summary, ContentKind::Remarks],
        );
        if html.is_empty() {
            let _ = writeln!(html, "<h1>{}</h1>", escape_html(&entity.name));
        }
        self.members(&mut html, entity.id, 2);
        html
    }

    fn blocks(&mut self, html: &mut String, entity: &Entity, kinds: &[ContentKind]) {
        for block in entity.content.iter().filter(|b| kinds.contains(&b.kind)) {
            html.push_str(&self.markup.render(&block.text, &mut self.ids, &mut self.headings));
        }
    }

    /// Children of `id` grouped by kind. Children owning a document are
    /// listed with links, the others rendered in place with their anchor.
    fn members(&mut self, html: &mut String, id: EntityId, level: u8) {
        let graph = self.graph;
        for kind in EntityKind::ALL {
            let group: Vec<&Entity> = graph.children(id).filter(|c| c.kind == kind).collect();
            if group.is_empty() {
                continue;
            }

            let _ = writeln!(
                html,
                "<section class=\"members\">\n<h{level}>{}</h{level}>",
                kind.plural()
            );

            let (linked, inline): (Vec<&Entity>, Vec<&Entity>) = group
                .into_iter()
                .partition(|child| self.router.has_own_document(child.id));

            if !linked.is_empty() {
                html.push_str("<ul class=\"index-list\">\n");
                for child in linked {
                    self.index_item(html, child);
                }
                html.push_str("</ul>\n");
            }
            for child in inline {
                self.member(html, child, (level + 1).min(MAX_HEADING_LEVEL));
            }

            html.push_str("</section>\n");
        }
    }

    fn index_item(&mut self, html: &mut String, child: &Entity) {
        let href = self
            .router
            .resolve_relative(child.id)
            .unwrap_or_default();
        let class = self.styles.class_for(child.kind).unwrap_or_default();
        let _ = write!(
            html,
            "<li class=\"{}\"><a href=\"{}\">{}</a>",
            escape_html(&class),
            escape_html(&href),
            escape_html(&child.name)
        );
        if let Some(summary) = child.summary().and_then(|s| s.lines().next()) {
            let _ = write!(html, " <span class=\"summary\">{}</span>", escape_html(summary));
        }
        html.push_str("</li>\n");
    }

    fn member(&mut self, html: &mut String, member: &Entity, level: u8) {
        let anchor = self.router.anchor(member.id).unwrap_or_default().to_owned();
        let _ = writeln!(
            html,
            "<section class=\"member {}\">\n<h{level} id=\"{}\">{}</h{level}>",
            escape_html(&self.styles.class_for(member.kind).unwrap_or_default()),
            escape_html(&anchor),
            escape_html(&member.name)
        );
        self.headings.push(PageHeading {
            level,
            text: member.name.clone(),
            anchor,
            kind: Some(member.kind),
        });

        self.blocks(html, member, &[ContentKind::Summary, ContentKind::Remarks]);
        self.members(html, member.id, (level + 1).min(MAX_HEADING_LEVEL));
        html.push_str("</section>\n");
    }

    /// Ancestors that own a URL, outermost first.
    fn breadcrumbs(&mut self, entity: &Entity) -> Vec<Breadcrumb> {
        if entity.id == self.graph.root_id() {
            return Vec::new();
        }
        let ancestors: Vec<&Entity> = self.graph.ancestors(entity.id).collect();
        let mut crumbs = Vec::new();
        for ancestor in ancestors.into_iter().rev() {
            if let Some(href) = self.router.resolve_relative(ancestor.id) {
                crumbs.push(Breadcrumb {
                    title: ancestor.name.clone(),
                    href,
                });
            }
        }
        crumbs
    }

    fn navigation(&mut self, current: &str) -> Vec<NavItem> {
        let elements = self.router.navigation(self.graph).to_vec();
        self.nav_items(&elements, current)
    }

    fn nav_items(&mut self, elements: &[NavigationElement], current: &str) -> Vec<NavItem> {
        let mut items = Vec::with_capacity(elements.len());
        for element in elements {
            let href = element
                .path
                .as_deref()
                .map(|path| self.router.relative_url(path, false));
            items.push(NavItem {
                title: element.text.clone(),
                href,
                class: element.kind.and_then(|kind| self.styles.class_for(kind)),
                is_active: element.path.as_deref() == Some(current),
                children: self.nav_items(&element.children, current),
            });
        }
        items
    }
}
