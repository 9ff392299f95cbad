//! Composition configuration.

/// Where the table of contents is placed relative to the document body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(rename_all = "lowercase"))]
pub enum TocPosition {
    #[default]
    Pre,
    Post,
}

/// Fields rendered on the cover page.
///
/// `version_tag` and `copyright` fall back to `"Version 1.0"` and
/// `"CC-BY-SA"` at composition time when unset; discovering a real version
/// tag (e.g. from a git repository) is the caller's concern.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "cli", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(default))]
pub struct CoverInfo {
    /// Document title (usually the site name).
    pub title: String,
    pub project_name: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub copyright: Option<String>,
    pub version_tag: Option<String>,
}

impl CoverInfo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_version_tag(mut self, tag: impl Into<String>) -> Self {
        self.version_tag = Some(tag.into());
        self
    }

    pub fn with_copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = Some(copyright.into());
        self
    }
}

/// Configuration for one document composition.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "cli", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(default))]
pub struct ComposeConfig {
    /// Inject hierarchical numbers into heading text.
    pub numbered: bool,
    /// Maximum heading depth included in the outline; also bounds numbering.
    pub toc_depth: u8,
    pub toc_title: String,
    pub toc_position: TocPosition,
    pub cover: CoverInfo,
    /// Where the caller should write the composed document.
    pub output_path: String,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            numbered: false,
            toc_depth: 3,
            toc_title: "Table of Contents".to_string(),
            toc_position: TocPosition::Pre,
            cover: CoverInfo::default(),
            output_path: "document.html".to_string(),
        }
    }
}

impl ComposeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn numbered(mut self, numbered: bool) -> Self {
        self.numbered = numbered;
        self
    }

    /// Set the TOC depth bound. Clamped to at least 1.
    pub fn with_toc_depth(mut self, depth: u8) -> Self {
        self.toc_depth = depth.max(1);
        self
    }

    pub fn with_toc_title(mut self, title: impl Into<String>) -> Self {
        self.toc_title = title.into();
        self
    }

    pub fn with_toc_position(mut self, position: TocPosition) -> Self {
        self.toc_position = position;
        self
    }

    pub fn with_cover(mut self, cover: CoverInfo) -> Self {
        self.cover = cover;
        self
    }

    pub fn with_output_path(mut self, path: impl Into<String>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Depth bound with the ≥ 1 invariant enforced even for hand-built configs.
    pub fn effective_toc_depth(&self) -> u8 {
        self.toc_depth.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ComposeConfig::default();
        assert!(!config.numbered);
        assert_eq!(config.toc_depth, 3);
        assert_eq!(config.toc_title, "Table of Contents");
        assert_eq!(config.toc_position, TocPosition::Pre);
    }

    #[test]
    fn toc_depth_clamped() {
        let config = ComposeConfig::new().with_toc_depth(0);
        assert_eq!(config.toc_depth, 1);
    }

    #[test]
    fn effective_depth_guards_zero() {
        let mut config = ComposeConfig::default();
        config.toc_depth = 0;
        assert_eq!(config.effective_toc_depth(), 1);
    }
}
