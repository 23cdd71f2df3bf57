//! HTML page skeleton.
//!
//! Content-specific markup is produced by the backend; this module only
//! wraps it with head, sidebar, breadcrumbs and table of contents, and
//! splices in the insertion-point hook output.

use std::fmt::Write;

use dossier_router::PageHeading;

use crate::markup::escape_html;

/// Navigation item with its link already relative to the page.
pub(crate) struct NavItem {
    pub title: String,
    pub href: Option<String>,
    pub class: Option<String>,
    pub is_active: bool,
    pub children: Vec<NavItem>,
}

pub(crate) struct Breadcrumb {
    pub title: String,
    pub href: String,
}

/// Output of the insertion-point hooks for one page.
#[derive(Default)]
pub(crate) struct Insertions {
    pub head_begin: String,
    pub head_end: String,
    pub body_begin: String,
    pub body_end: String,
    pub sidebar_begin: String,
    pub sidebar_end: String,
    pub navigation_begin: String,
    pub navigation_end: String,
    pub content_begin: String,
    pub content_end: String,
}

/// Everything needed to assemble one page.
pub(crate) struct PageData<'a> {
    pub title: String,
    pub project: String,
    pub root_href: String,
    pub css_href: String,
    pub content_html: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub toc: &'a [PageHeading],
    pub navigation: Vec<NavItem>,
    pub insertions: Insertions,
}

/// Render a complete HTML page.
pub(crate) fn render_page(page: &PageData<'_>) -> String {
    let ins = &page.insertions;
    let mut html = String::with_capacity(8192 + page.content_html.len());

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str(&ins.head_begin);
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape_html(&page.title));
    let _ = writeln!(
        html,
        "<link rel=\"stylesheet\" href=\"{}\">",
        escape_html(&page.css_href)
    );
    html.push_str(&ins.head_end);
    html.push_str("</head>\n<body>\n");
    html.push_str(&ins.body_begin);

    html.push_str("<div class=\"layout\">\n");
    render_sidebar(&mut html, page);

    html.push_str("<div class=\"main\">\n");
    render_breadcrumbs(&mut html, &page.breadcrumbs);
    html.push_str("<div class=\"container\">\n");
    html.push_str("<main class=\"content\">\n");
    html.push_str(&ins.content_begin);
    html.push_str(&page.content_html);
    html.push_str(&ins.content_end);
    html.push_str("</main>\n");
    render_toc(&mut html, page.toc);
    html.push_str("</div>\n</div>\n</div>\n");

    html.push_str(&ins.body_end);
    html.push_str("</body>\n</html>\n");
    html
}

fn render_sidebar(html: &mut String, page: &PageData<'_>) {
    let ins = &page.insertions;
    html.push_str("<aside class=\"sidebar\">\n");
    html.push_str(&ins.sidebar_begin);
    let _ = writeln!(
        html,
        "<a class=\"project\" href=\"{}\">{}</a>",
        escape_html(&page.root_href),
        escape_html(&page.project)
    );
    html.push_str("<nav>\n");
    html.push_str(&ins.navigation_begin);
    if !page.navigation.is_empty() {
        html.push_str("<ul>\n");
        render_nav_items(html, &page.navigation);
        html.push_str("</ul>\n");
    }
    html.push_str(&ins.navigation_end);
    html.push_str("</nav>\n");
    html.push_str(&ins.sidebar_end);
    html.push_str("</aside>\n");
}

fn render_nav_items(html: &mut String, items: &[NavItem]) {
    for item in items {
        match &item.class {
            Some(class) => {
                let _ = writeln!(html, "<li class=\"{}\">", escape_html(class));
            }
            None => html.push_str("<li>\n"),
        }

        match &item.href {
            Some(href) => {
                let active = if item.is_active { " class=\"active\"" } else { "" };
                let _ = writeln!(
                    html,
                    "<a href=\"{}\"{}>{}</a>",
                    escape_html(href),
                    active,
                    escape_html(&item.title)
                );
            }
            None => {
                let _ = writeln!(html, "<span>{}</span>", escape_html(&item.title));
            }
        }

        if !item.children.is_empty() {
            html.push_str("<ul>\n");
            render_nav_items(html, &item.children);
            html.push_str("</ul>\n");
        }
        html.push_str("</li>\n");
    }
}

fn render_breadcrumbs(html: &mut String, breadcrumbs: &[Breadcrumb]) {
    if breadcrumbs.is_empty() {
        return;
    }
    html.push_str("<ol class=\"breadcrumbs\">\n");
    for crumb in breadcrumbs {
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}</a></li>",
            escape_html(&crumb.href),
            escape_html(&crumb.title)
        );
    }
    html.push_str("</ol>\n");
}

fn render_toc(html: &mut String, toc: &[PageHeading]) {
    if toc.is_empty() {
        return;
    }
    html.push_str("<aside class=\"toc\">\n<h3>On this page</h3>\n<ul>\n");
    for heading in toc {
        let _ = writeln!(
            html,
            "<li class=\"level-{}\"><a href=\"#{}\">{}</a></li>",
            heading.level,
            escape_html(&heading.anchor),
            escape_html(&heading.text)
        );
    }
    html.push_str("</ul>\n</aside>\n");
}
