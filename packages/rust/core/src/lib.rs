//! File pipeline for footernotes.
//!
//! This crate wraps the pure conversion engine from `footernotes-markdown`
//! with file validation, reading, and writing (e.g., `convert_file`).

pub mod pipeline;
