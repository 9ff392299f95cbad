//! Navigation tree input model.
//!
//! A [`NavNode`] tree is supplied by an external site-structure builder and
//! is read-only input to the assembly pipeline: the walker, the assembler,
//! and the TOC builder all traverse it without mutating it.

/// Per-page metadata carried from the page's front matter.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "cli", derive(serde::Serialize, serde::Deserialize))]
pub struct PageMeta {
    /// Opt-out flag: when false, the page and its descendants are excluded
    /// from the merged document and the TOC.
    #[cfg_attr(feature = "cli", serde(default = "default_pdf"))]
    pub pdf: bool,
}

#[cfg(feature = "cli")]
fn default_pdf() -> bool {
    true
}

impl Default for PageMeta {
    fn default() -> Self {
        Self { pdf: true }
    }
}

/// A heading extracted from a page's rendered content.
///
/// Levels are heading depths (h1 → 1). The `anchor` is the in-page link
/// target (e.g. `#getting-started`); element ids survive the merge, so
/// anchors remain valid in the composed document.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "cli", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(default))]
pub struct OutlineEntry {
    pub title: String,
    pub anchor: String,
    pub level: u8,
    pub children: Vec<OutlineEntry>,
}

impl OutlineEntry {
    pub fn new(title: impl Into<String>, anchor: impl Into<String>, level: u8) -> Self {
        Self {
            title: title.into(),
            anchor: anchor.into(),
            level,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: OutlineEntry) -> Self {
        self.children.push(child);
        self
    }
}

/// A page or section in the source navigation tree.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "cli", derive(serde::Serialize, serde::Deserialize))]
pub struct NavNode {
    pub title: String,
    /// Absent for pure sections.
    #[cfg_attr(feature = "cli", serde(default))]
    pub url: Option<String>,
    /// Depth from the root of the navigation tree (1-based).
    #[cfg_attr(feature = "cli", serde(default = "default_level"))]
    pub level: u8,
    #[cfg_attr(feature = "cli", serde(default))]
    pub is_page: bool,
    #[cfg_attr(feature = "cli", serde(default))]
    pub is_external: bool,
    #[cfg_attr(feature = "cli", serde(default))]
    pub children: Vec<NavNode>,
    #[cfg_attr(feature = "cli", serde(default))]
    pub meta: PageMeta,
    /// Heading outline of the rendered page (empty for sections).
    #[cfg_attr(feature = "cli", serde(default))]
    pub outline: Vec<OutlineEntry>,
}

#[cfg(feature = "cli")]
fn default_level() -> u8 {
    1
}

impl NavNode {
    /// Create a page node.
    pub fn page(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: Some(url.into()),
            level: 1,
            is_page: true,
            is_external: false,
            children: Vec::new(),
            meta: PageMeta::default(),
            outline: Vec::new(),
        }
    }

    /// Create a section node holding child nodes.
    pub fn section(title: impl Into<String>, children: Vec<NavNode>) -> Self {
        Self {
            title: title.into(),
            url: None,
            level: 1,
            is_page: false,
            is_external: false,
            children,
            meta: PageMeta::default(),
            outline: Vec::new(),
        }
    }

    /// Create an external link node (never emitted into the document).
    pub fn external(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: Some(url.into()),
            level: 1,
            is_page: true,
            is_external: true,
            children: Vec::new(),
            meta: PageMeta::default(),
            outline: Vec::new(),
        }
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_outline(mut self, outline: Vec<OutlineEntry>) -> Self {
        self.outline = outline;
        self
    }

    /// Mark the page as opted out of the merged document.
    pub fn exclude_from_print(mut self) -> Self {
        self.meta.pdf = false;
        self
    }

    /// True if the node is an opted-out page.
    pub fn opted_out(&self) -> bool {
        self.is_page && !self.meta.pdf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults() {
        let node = NavNode::page("Intro", "intro/");
        assert!(node.is_page);
        assert!(!node.is_external);
        assert!(node.meta.pdf);
        assert_eq!(node.url.as_deref(), Some("intro/"));
    }

    #[test]
    fn opt_out() {
        let node = NavNode::page("Hidden", "hidden/").exclude_from_print();
        assert!(node.opted_out());
        assert!(!NavNode::section("S", vec![]).opted_out());
    }

    #[test]
    fn outline_builder() {
        let entry = OutlineEntry::new("Install", "#install", 1)
            .with_child(OutlineEntry::new("From source", "#from-source", 2));
        assert_eq!(entry.children.len(), 1);
        assert_eq!(entry.children[0].level, 2);
    }
}
