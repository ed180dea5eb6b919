//! Error types for footernotes.
//!
//! Library crates use [`FooternotesError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all footernotes operations.
#[derive(Debug, thiserror::Error)]
pub enum FooternotesError {
    /// A citation URL passed validation but no domain could be resolved from it.
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    /// The per-domain counter cannot be incremented any further.
    #[error("Footnote counter exhausted for domain: {domain}")]
    CounterExhausted { domain: String },

    /// The input path does not carry an accepted Markdown extension.
    #[error("Input file must be a Markdown file (.md): {path:?}")]
    NotMarkdown { path: PathBuf },

    /// The input file is not valid UTF-8.
    #[error("Input file must be UTF-8 encoded: {path:?}")]
    Encoding { path: PathBuf },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FooternotesError>;

impl FooternotesError {
    /// Create an invalid-URL error for the offending URL.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
