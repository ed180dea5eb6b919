//! Shared types, error model, and configuration for footernotes.
//!
//! This crate is the foundation depended on by all other footernotes crates.
//! It provides:
//! - [`FooternotesError`], the unified error type
//! - Domain types ([`Citation`], [`Footnote`], [`FootnoteId`])
//! - Configuration ([`AppConfig`], [`ConvertOptions`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{AppConfig, ConvertOptions, DefaultsConfig, OutputMode, init_config, load_config};
pub use error::{FooternotesError, Result};
pub use types::{Citation, FOOTNOTES_BEGIN_MARKER, FOOTNOTES_END_MARKER, Footnote, FootnoteId};
