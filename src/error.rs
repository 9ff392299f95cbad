//! Error types for bindery operations.

use thiserror::Error;

/// Errors that can occur while assembling a print document.
///
/// Missing page content is deliberately *not* an error: a run that cannot
/// locate a content container is reported through
/// [`ComposeOutcome::NotGeneratable`](crate::compose::ComposeOutcome) so the
/// caller can skip emission instead of unwinding.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;
