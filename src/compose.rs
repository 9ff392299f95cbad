//! Document composition.
//!
//! Drives the full pipeline for one run: linearize the navigation tree,
//! assemble articles, number headings chapter by chapter, synthesize the
//! outline, and wrap everything in a [`Document`] that serializes to a
//! single self-contained HTML file.

use std::collections::HashMap;

use log::{info, warn};

use crate::assemble::{self, Article, ArticleKind, AssemblyOutcome, DocumentOrder};
use crate::config::{ComposeConfig, CoverInfo, TocPosition};
use crate::error::Result;
use crate::markup::escape_xml;
use crate::nav::NavNode;
use crate::numbering::{self, HeadingCounters};
use crate::store::ContentStore;
use crate::toc::{self, TocEntry};
use crate::walk;

const DEFAULT_VERSION_TAG: &str = "Version 1.0";
const DEFAULT_COPYRIGHT: &str = "CC-BY-SA";

/// Result of a composition run.
#[derive(Debug)]
pub enum ComposeOutcome {
    Document(Document),
    /// A page's content could not be resolved; no document is produced.
    NotGeneratable { url: String },
}

/// A fully composed document, ready to serialize.
#[derive(Debug)]
pub struct Document {
    cover: CoverInfo,
    toc_title: String,
    toc_position: TocPosition,
    toc: Vec<TocEntry>,
    order: DocumentOrder,
    articles: HashMap<String, Article>,
}

/// Compose the navigation tree and rendered pages into one document.
///
/// All-or-nothing: the first page whose content cannot be resolved turns
/// the whole run into [`ComposeOutcome::NotGeneratable`]. Heading numbers
/// are injected before the outline is built so reconciled TOC titles carry
/// them.
pub fn compose(
    nav: &[NavNode],
    store: &ContentStore,
    config: &ComposeConfig,
) -> Result<ComposeOutcome> {
    let slots = walk::linearize(nav);

    let (order, mut articles) = match assemble::assemble(&slots, store)? {
        AssemblyOutcome::Complete { order, articles } => (order, articles),
        AssemblyOutcome::MissingContent { url } => {
            warn!("document not generatable, missing content for: {url}");
            return Ok(ComposeOutcome::NotGeneratable { url });
        }
    };

    if config.numbered {
        number_articles(&order, &mut articles, config.effective_toc_depth())?;
    }

    let toc = toc::build(nav, config, &articles);
    info!(
        "composed document: {} articles, {} top-level outline entries",
        order.len(),
        toc.len()
    );

    Ok(ComposeOutcome::Document(Document {
        cover: config.cover.clone(),
        toc_title: config.toc_title.clone(),
        toc_position: config.toc_position,
        toc,
        order,
        articles,
    }))
}

/// Number headings in document order, resetting sub-counters at every
/// divider so each chapter starts a fresh `n.1` sequence.
fn number_articles(
    order: &DocumentOrder,
    articles: &mut HashMap<String, Article>,
    max_depth: u8,
) -> Result<()> {
    let mut counters = HeadingCounters::new(max_depth);
    for id in order.iter() {
        let Some(article) = articles.get_mut(id) else {
            continue;
        };
        match article.kind {
            ArticleKind::Divider => counters.start_chapter(),
            ArticleKind::Content => {
                article.body = numbering::number_fragment(&article.body, &mut counters)?;
            }
        }
    }
    Ok(())
}

impl Document {
    pub fn toc(&self) -> &[TocEntry] {
        &self.toc
    }

    pub fn order(&self) -> impl Iterator<Item = &str> {
        self.order.iter()
    }

    pub fn article(&self, id: &str) -> Option<&Article> {
        self.articles.get(id)
    }

    /// Serialize the document as a standalone HTML page.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html>\n");
        self.write_head(&mut out);
        out.push_str("<body>\n");
        self.write_cover(&mut out);
        if self.toc_position == TocPosition::Pre {
            self.write_toc(&mut out);
        }
        for id in self.order.iter() {
            if let Some(article) = self.articles.get(id) {
                write_article(&mut out, article);
            }
        }
        if self.toc_position == TocPosition::Post {
            self.write_toc(&mut out);
        }
        out.push_str("</body>\n</html>\n");
        out
    }

    fn write_head(&self, out: &mut String) {
        out.push_str("<head>\n<meta charset=\"utf-8\"/>\n<title>");
        out.push_str(&escape_xml(&self.cover.title));
        out.push_str("</title>\n");
        if let Some(author) = &self.cover.author {
            out.push_str("<meta name=\"author\" content=\"");
            out.push_str(&escape_xml(author));
            out.push_str("\"/>\n");
        }
        if let Some(description) = &self.cover.description {
            out.push_str("<meta name=\"description\" content=\"");
            out.push_str(&escape_xml(description));
            out.push_str("\"/>\n");
        }
        out.push_str("</head>\n");
    }

    fn write_cover(&self, out: &mut String) {
        out.push_str("<article id=\"doc-cover\">\n<h1 id=\"doc-title\">");
        out.push_str(&escape_xml(&self.cover.title));
        out.push_str("</h1>\n<p id=\"version\">");
        out.push_str(&escape_xml(
            self.cover.version_tag.as_deref().unwrap_or(DEFAULT_VERSION_TAG),
        ));
        out.push_str("</p>\n<address>\n");
        if let Some(project) = &self.cover.project_name {
            out.push_str("<p>");
            out.push_str(&escape_xml(project));
            out.push_str("</p>\n");
        }
        if let Some(author) = &self.cover.author {
            out.push_str("<p>");
            out.push_str(&escape_xml(author));
            out.push_str("</p>\n");
        }
        out.push_str("<p>");
        out.push_str(&escape_xml(
            self.cover.copyright.as_deref().unwrap_or(DEFAULT_COPYRIGHT),
        ));
        out.push_str("</p>\n</address>\n</article>\n");
    }

    fn write_toc(&self, out: &mut String) {
        out.push_str("<article id=\"contents\">\n<h1 id=\"toc-title\">");
        out.push_str(&escape_xml(&self.toc_title));
        out.push_str("</h1>\n");
        write_toc_list(out, &self.toc);
        out.push_str("</article>\n");
    }
}

fn write_toc_list(out: &mut String, entries: &[TocEntry]) {
    if entries.is_empty() {
        return;
    }
    out.push_str("<ul>\n");
    for entry in entries {
        out.push_str("<li>");
        if entry.href.is_empty() {
            // Section header without a target of its own.
            out.push_str("<strong>");
            out.push_str(&escape_xml(&entry.title));
            out.push_str("</strong>");
        } else {
            out.push_str("<a href=\"");
            out.push_str(&escape_xml(&entry.href));
            out.push_str("\">");
            out.push_str(&escape_xml(&entry.title));
            out.push_str("</a>");
        }
        write_toc_list(out, &entry.children);
        out.push_str("</li>\n");
    }
    out.push_str("</ul>\n");
}

fn write_article(out: &mut String, article: &Article) {
    match article.kind {
        ArticleKind::Divider => {
            out.push_str("<article id=\"");
            out.push_str(&escape_xml(&article.id));
            out.push_str("\" class=\"");
            out.push_str(article.style.class_name());
            out.push_str("\">\n<h1 id=\"");
            out.push_str(&escape_xml(&article.id));
            out.push_str("-title\" class=\"section_title\">");
            out.push_str(&escape_xml(article.title.as_deref().unwrap_or_default()));
            out.push_str("</h1>\n</article>\n");
        }
        ArticleKind::Content => {
            out.push_str("<article id=\"");
            out.push_str(&escape_xml(&article.id));
            out.push_str("\">\n");
            out.push_str(&article.body);
            out.push_str("\n</article>\n");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_html(heading: &str) -> String {
        format!("<html><body><article><h1>{heading}</h1><p>text</p></article></body></html>")
    }

    fn simple_setup() -> (Vec<NavNode>, ContentStore) {
        let nav = vec![
            NavNode::page("Alpha", "alpha/"),
            NavNode::page("Beta", "beta/"),
        ];
        let mut store = ContentStore::new();
        store.insert("alpha/", page_html("Alpha"), "site/alpha");
        store.insert("beta/", page_html("Beta"), "site/beta");
        (nav, store)
    }

    #[test]
    fn composes_complete_document() {
        let (nav, store) = simple_setup();
        let config = ComposeConfig::new().with_cover(CoverInfo::new("Handbook"));

        let ComposeOutcome::Document(doc) = compose(&nav, &store, &config).unwrap() else {
            panic!("expected a document");
        };
        let ids: Vec<_> = doc.order().collect();
        assert_eq!(ids, vec!["divider-0", "alpha/", "divider-1", "beta/"]);

        let html = doc.to_html();
        assert!(html.contains(r#"<h1 id="doc-title">Handbook</h1>"#));
        assert!(html.contains(r#"<article id="alpha/">"#));
        assert!(html.contains("<h1>Alpha</h1>"));
    }

    #[test]
    fn missing_content_is_not_generatable() {
        let nav = vec![NavNode::page("Alpha", "alpha/")];
        let store = ContentStore::new();
        let outcome = compose(&nav, &store, &ComposeConfig::new()).unwrap();
        assert!(matches!(outcome, ComposeOutcome::NotGeneratable { url } if url == "alpha/"));
    }

    #[test]
    fn numbering_restarts_subsections_per_chapter() {
        let nav = vec![
            NavNode::page("A", "a/"),
            NavNode::page("B", "b/"),
        ];
        let mut store = ContentStore::new();
        store.insert(
            "a/",
            "<article><h1>A</h1><h2>A sub</h2></article>",
            "site/a",
        );
        store.insert(
            "b/",
            "<article><h1>B</h1><h2>B sub</h2></article>",
            "site/b",
        );
        let config = ComposeConfig::new().numbered(true).with_toc_depth(2);

        let ComposeOutcome::Document(doc) = compose(&nav, &store, &config).unwrap() else {
            panic!("expected a document");
        };
        let a = &doc.article("a/").unwrap().body;
        let b = &doc.article("b/").unwrap().body;
        assert!(a.contains("<h1>1 A</h1>"), "got: {a}");
        assert!(a.contains("<h2>1.1 A sub</h2>"), "got: {a}");
        assert!(b.contains("<h1>2 B</h1>"), "got: {b}");
        assert!(b.contains("<h2>2.1 B sub</h2>"), "got: {b}");
    }

    #[test]
    fn toc_position_controls_placement() {
        let (nav, store) = simple_setup();

        let pre = ComposeConfig::new();
        let ComposeOutcome::Document(doc) = compose(&nav, &store, &pre).unwrap() else {
            panic!("expected a document");
        };
        let html = doc.to_html();
        let contents = html.find(r#"<article id="contents">"#).unwrap();
        let first_page = html.find(r#"<article id="alpha/">"#).unwrap();
        assert!(contents < first_page);

        let post = ComposeConfig::new().with_toc_position(TocPosition::Post);
        let ComposeOutcome::Document(doc) = compose(&nav, &store, &post).unwrap() else {
            panic!("expected a document");
        };
        let html = doc.to_html();
        let contents = html.find(r#"<article id="contents">"#).unwrap();
        let first_page = html.find(r#"<article id="alpha/">"#).unwrap();
        assert!(contents > first_page);
    }

    #[test]
    fn cover_defaults_apply() {
        let (nav, store) = simple_setup();
        let config = ComposeConfig::new().with_cover(CoverInfo::new("Docs"));
        let ComposeOutcome::Document(doc) = compose(&nav, &store, &config).unwrap() else {
            panic!("expected a document");
        };
        let html = doc.to_html();
        assert!(html.contains(r#"<p id="version">Version 1.0</p>"#));
        assert!(html.contains("<p>CC-BY-SA</p>"));
    }

    #[test]
    fn cover_overrides_render() {
        let (nav, store) = simple_setup();
        let cover = CoverInfo::new("Docs")
            .with_author("Jo Doe")
            .with_version_tag("v2.4.0")
            .with_copyright("MIT");
        let config = ComposeConfig::new().with_cover(cover);
        let ComposeOutcome::Document(doc) = compose(&nav, &store, &config).unwrap() else {
            panic!("expected a document");
        };
        let html = doc.to_html();
        assert!(html.contains(r#"<p id="version">v2.4.0</p>"#));
        assert!(html.contains(r#"<meta name="author" content="Jo Doe"/>"#));
        assert!(html.contains("<p>MIT</p>"));
        assert!(!html.contains("CC-BY-SA"));
    }

    #[test]
    fn divider_articles_render_section_titles() {
        let (nav, store) = simple_setup();
        let ComposeOutcome::Document(doc) =
            compose(&nav, &store, &ComposeConfig::new()).unwrap()
        else {
            panic!("expected a document");
        };
        let html = doc.to_html();
        assert!(html.contains(
            r#"<article id="divider-0" class="chapter">"#
        ));
        assert!(html.contains(r#"<h1 id="divider-0-title" class="section_title">Alpha</h1>"#));
    }
}
