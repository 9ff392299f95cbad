//! Table-of-contents synthesis.
//!
//! Walks the navigation tree a second time (independent of the body's
//! divider/content splitting) and produces a nested outline bounded by the
//! configured depth. Titles are reconciled against the heading text found
//! in each page's assembled article so the outline picks up injected
//! numbers and any drift between nav metadata and in-page headings.

use std::collections::HashMap;

use crate::assemble::Article;
use crate::config::ComposeConfig;
use crate::markup::{self, Heading};
use crate::nav::{NavNode, OutlineEntry};

/// One entry in the synthesized outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub title: String,
    /// Anchor into the merged document; empty for section headers.
    pub href: String,
    /// Nesting depth within the outline (1-based): a child entry is always
    /// one level below its parent, whether it came from a nav node or an
    /// in-page heading.
    pub level: u8,
    pub children: Vec<TocEntry>,
}

/// Build the outline for the composed document.
///
/// Top-level entries appear in original nav order, which matches final
/// document order. Opted-out pages and external links are excluded at
/// every level. Headings at or beyond the configured depth are omitted
/// even though they remain (numbered) in the body.
pub fn build(
    nav: &[NavNode],
    config: &ComposeConfig,
    articles: &HashMap<String, Article>,
) -> Vec<TocEntry> {
    entries_for_nodes(nav, config.effective_toc_depth(), articles, 1)
}

fn entries_for_nodes(
    nodes: &[NavNode],
    depth_bound: u8,
    articles: &HashMap<String, Article>,
    toc_level: u8,
) -> Vec<TocEntry> {
    nodes
        .iter()
        .filter_map(|node| entry_for_node(node, depth_bound, articles, toc_level))
        .collect()
}

fn entry_for_node(
    node: &NavNode,
    depth_bound: u8,
    articles: &HashMap<String, Article>,
    toc_level: u8,
) -> Option<TocEntry> {
    if node.opted_out() {
        return None;
    }
    if node.is_external || node.url.as_deref().is_some_and(markup::is_external) {
        return None;
    }

    if node.is_page {
        Some(entry_for_page(node, depth_bound, articles, toc_level))
    } else if !node.children.is_empty() {
        Some(TocEntry {
            title: markup::normalize_text(&node.title),
            href: String::new(),
            level: toc_level,
            children: entries_for_nodes(&node.children, depth_bound, articles, toc_level + 1),
        })
    } else {
        None
    }
}

fn entry_for_page(
    node: &NavNode,
    depth_bound: u8,
    articles: &HashMap<String, Article>,
    toc_level: u8,
) -> TocEntry {
    let headings = node
        .url
        .as_deref()
        .and_then(|url| articles.get(url))
        .map(|article| markup::collect_headings(&article.body).unwrap_or_default())
        .unwrap_or_default();

    TocEntry {
        title: reconcile(&node.title, 1, &headings),
        href: node.url.as_deref().map(markup::anchor_for).unwrap_or_default(),
        level: toc_level,
        children: outline_entries(&node.outline, &headings, depth_bound, toc_level + 1),
    }
}

/// The depth bound applies to the heading's in-page depth; the emitted
/// entry carries the outline nesting depth instead.
fn outline_entries(
    outline: &[OutlineEntry],
    headings: &[Heading],
    depth_bound: u8,
    toc_level: u8,
) -> Vec<TocEntry> {
    outline
        .iter()
        .filter(|entry| entry.level < depth_bound)
        .map(|entry| TocEntry {
            title: reconcile(&entry.title, entry.level, headings),
            href: entry.anchor.clone(),
            level: toc_level,
            children: outline_entries(&entry.children, headings, depth_bound, toc_level + 1),
        })
        .collect()
}

/// Match a nav-supplied title against rendered heading text.
///
/// First matching heading at the same depth wins (so injected numbers
/// propagate into the outline); the nav title is the fallback. Sibling
/// headings with identical text reconcile to the same heading, a known
/// limitation carried over from the first-match rule.
fn reconcile(title: &str, level: u8, headings: &[Heading]) -> String {
    let title = markup::normalize_text(title);
    headings
        .iter()
        .find(|h| h.level == level && h.text.contains(&title))
        .map(|h| h.text.clone())
        .unwrap_or(title)
}
