//! # bindery
//!
//! Print-document assembly for rendered documentation sites.
//!
//! ## Features
//!
//! - Merge a site's rendered pages into a single self-contained HTML document
//! - Chapter and section dividers synthesized from the navigation tree
//! - Hierarchical heading numbering (`1`, `1.1`, `1.1.2`) per chapter
//! - Depth-bounded table of contents reconciled against in-page headings
//! - Cover page with title, version tag, and attribution
//!
//! ## Quick Start
//!
//! ```
//! use bindery::{compose, ComposeConfig, ComposeOutcome, ContentStore, CoverInfo, NavNode};
//!
//! let nav = vec![
//!     NavNode::page("Introduction", "intro/"),
//!     NavNode::section("Guide", vec![NavNode::page("Setup", "guide/setup/")]),
//! ];
//!
//! let mut store = ContentStore::new();
//! store.insert(
//!     "intro/",
//!     "<html><body><article><h1>Introduction</h1></article></body></html>",
//!     "site/intro",
//! );
//! store.insert(
//!     "guide/setup/",
//!     "<html><body><article><h1>Setup</h1></article></body></html>",
//!     "site/guide/setup",
//! );
//!
//! let config = ComposeConfig::new()
//!     .numbered(true)
//!     .with_cover(CoverInfo::new("Example Handbook"));
//!
//! match compose(&nav, &store, &config).unwrap() {
//!     ComposeOutcome::Document(doc) => {
//!         let html = doc.to_html();
//!         assert!(html.contains("1 Introduction"));
//!     }
//!     ComposeOutcome::NotGeneratable { url } => {
//!         eprintln!("cannot compose, missing content for {url}");
//!     }
//! }
//! ```
//!
//! ## Pipeline
//!
//! Composition runs in fixed stages: the navigation tree is linearized into
//! document order ([`walk`]), pages are resolved into articles with their
//! references rewritten ([`assemble`]), headings are numbered chapter by
//! chapter ([`numbering`]), and the outline is reconciled against the
//! numbered headings ([`toc`]). A page that cannot be resolved makes the
//! whole run [`ComposeOutcome::NotGeneratable`]; there are no partial
//! documents.

pub mod assemble;
pub mod compose;
pub mod config;
pub mod error;
pub mod markup;
pub mod nav;
pub mod numbering;
pub mod store;
pub mod toc;
pub mod walk;

pub use assemble::{Article, ArticleKind, ArticleStyle, DocumentOrder};
pub use compose::{Document, ComposeOutcome, compose};
pub use config::{ComposeConfig, CoverInfo, TocPosition};
pub use error::{Error, Result};
pub use nav::{NavNode, OutlineEntry, PageMeta};
pub use store::{ContentStore, PageContent};
pub use toc::TocEntry;
