//! Per-page rendered content, keyed by page url.

use std::collections::HashMap;

/// A page's extracted body fragment plus its originating base location.
///
/// The base location is the directory the page was rendered from; it is
/// used to rewrite relative asset references when the fragment is copied
/// into the merged document.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub body: String,
    pub base_url: String,
}

/// Holds rendered page fragments for the assembler.
///
/// Populated by an external renderer before composition; the core only
/// reads from it. Fragments are copied into articles, never shared.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    pages: HashMap<String, PageContent>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a page's rendered body and base location.
    pub fn insert(
        &mut self,
        url: impl Into<String>,
        body: impl Into<String>,
        base_url: impl Into<String>,
    ) {
        self.pages.insert(
            url.into(),
            PageContent {
                body: body.into(),
                base_url: base_url.into(),
            },
        );
    }

    pub fn get(&self, url: &str) -> Option<&PageContent> {
        self.pages.get(url)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
