//! Article assembly.
//!
//! Resolves slots into concrete articles: divider slots become
//! heading-only articles, content slots pull the page's fragment from the
//! [`ContentStore`], rewrite its relative references, and copy it into an
//! owned article body. A single unresolvable page aborts the whole run;
//! there is no partial document.

use std::collections::HashMap;

use log::warn;

use crate::error::Result;
use crate::markup;
use crate::store::ContentStore;
use crate::walk::Slot;

/// What an article contributes to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleKind {
    /// Synthetic chapter/section title, no body.
    Divider,
    /// A real page's content.
    Content,
}

/// Styling class attached to the article element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleStyle {
    /// The document has a single top-level node.
    Standalone,
    Chapter,
}

impl ArticleStyle {
    pub fn class_name(self) -> &'static str {
        match self {
            ArticleStyle::Standalone => "standalone",
            ArticleStyle::Chapter => "chapter",
        }
    }
}

/// One rendering unit of the final document.
///
/// Divider ids come from the walker's `divider-{n}` space; content ids are
/// the page url. Bodies are owned copies of the store's fragments, already
/// rewritten for the merged document.
#[derive(Debug, Clone)]
pub struct Article {
    pub id: String,
    pub kind: ArticleKind,
    /// Set for dividers; used as the chapter/section heading.
    pub title: Option<String>,
    /// Empty for dividers.
    pub body: String,
    pub style: ArticleStyle,
}

/// Final document layout: article ids in document order.
///
/// Append-only while assembling; immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct DocumentOrder(Vec<String>);

impl DocumentOrder {
    fn push(&mut self, id: String) {
        self.0.push(id);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of assembling the slot sequence.
#[derive(Debug)]
pub enum AssemblyOutcome {
    Complete {
        order: DocumentOrder,
        articles: HashMap<String, Article>,
    },
    /// A page could not be resolved to a content container. The run is not
    /// generatable; the caller must skip emission.
    MissingContent { url: String },
}

/// Resolve every slot to an article.
///
/// Returns early with [`AssemblyOutcome::MissingContent`] on the first page
/// whose fragment is absent or lacks a content container. Reference
/// rewriting happens here, before attachment; article bodies are immutable
/// afterwards.
pub fn assemble(slots: &[Slot], store: &ContentStore) -> Result<AssemblyOutcome> {
    let mut order = DocumentOrder::default();
    let mut articles = HashMap::new();

    for slot in slots {
        match slot {
            Slot::Divider { id, title, style } => {
                order.push(id.clone());
                articles.insert(
                    id.clone(),
                    Article {
                        id: id.clone(),
                        kind: ArticleKind::Divider,
                        title: Some(title.clone()),
                        body: String::new(),
                        style: *style,
                    },
                );
            }
            Slot::Content { url } => {
                let Some(page) = store.get(url) else {
                    warn!("no rendered content for page: {url}");
                    return Ok(AssemblyOutcome::MissingContent { url: url.clone() });
                };
                let Some(fragment) = markup::extract_container(&page.body)? else {
                    warn!("no content container in page: {url}");
                    return Ok(AssemblyOutcome::MissingContent { url: url.clone() });
                };
                let body = markup::rewrite_links(&fragment, &page.base_url, url)?;

                order.push(url.clone());
                articles.insert(
                    url.clone(),
                    Article {
                        id: url.clone(),
                        kind: ArticleKind::Content,
                        title: None,
                        body,
                        style: ArticleStyle::Chapter,
                    },
                );
            }
        }
    }

    Ok(AssemblyOutcome::Complete { order, articles })
}
