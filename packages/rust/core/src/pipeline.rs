//! End-to-end file pipeline: validate → read → convert → write back.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::{info, instrument, warn};

use footernotes_markdown::convert_with_report;
use footernotes_shared::{ConvertOptions, FooternotesError, OutputMode, Result};

/// Result of converting a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    /// The converted file.
    pub path: PathBuf,
    /// Whether the converted text differs from the file's content.
    pub changed: bool,
    /// Whether the result was written back to `path`.
    pub written: bool,
    /// Inline citations replaced.
    pub citations_replaced: usize,
    /// Footnote entries added.
    pub footnotes_added: usize,
    /// Footnote entries that were already present.
    pub footnotes_preserved: usize,
    /// Converted text, kept only in [`OutputMode::Stdout`].
    #[serde(skip)]
    pub output: Option<String>,
}

/// Result of [`convert_files`].
#[derive(Debug)]
pub struct BatchResult {
    /// Per-file results, in input order.
    pub files: Vec<(PathBuf, Result<FileOutcome>)>,
    /// Number of files whose text changed (or would change, in check mode).
    pub changed: usize,
    /// Number of files that failed.
    pub failed: usize,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called before a file is read.
    fn file_started(&self, path: &Path, current: usize, total: usize);
    /// Called after a file converted successfully.
    fn file_finished(&self, outcome: &FileOutcome);
    /// Called when the batch completes.
    fn done(&self, result: &BatchResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn file_started(&self, _path: &Path, _current: usize, _total: usize) {}
    fn file_finished(&self, _outcome: &FileOutcome) {}
    fn done(&self, _result: &BatchResult) {}
}

// ---------------------------------------------------------------------------
// Input validation
// ---------------------------------------------------------------------------

/// Whether `path` ends in one of `extensions` (compared case-insensitively).
pub fn is_markdown_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
}

/// Decode file bytes as strict UTF-8.
pub fn decode_utf8(path: &Path, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| FooternotesError::Encoding {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Convert the citations of one Markdown file.
///
/// Nothing is written unless the whole conversion succeeded, and in
/// [`OutputMode::InPlace`] only when the text actually changed.
#[instrument(skip(path, options, progress), fields(path = %path.display()))]
pub async fn convert_file(
    path: &Path,
    options: &ConvertOptions,
    progress: &dyn ProgressReporter,
) -> Result<FileOutcome> {
    if !is_markdown_file(path, &options.extensions) {
        return Err(FooternotesError::NotMarkdown {
            path: path.to_path_buf(),
        });
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| FooternotesError::io(path, e))?;
    let text = decode_utf8(path, bytes)?;

    let conversion = convert_with_report(&text)?;
    let changed = conversion.text != text;

    let written = match options.output {
        OutputMode::InPlace if changed => {
            tokio::fs::write(path, &conversion.text)
                .await
                .map_err(|e| FooternotesError::io(path, e))?;
            true
        }
        _ => false,
    };

    let outcome = FileOutcome {
        path: path.to_path_buf(),
        changed,
        written,
        citations_replaced: conversion.stats.citations_replaced,
        footnotes_added: conversion.stats.footnotes_added,
        footnotes_preserved: conversion.stats.footnotes_preserved,
        output: (options.output == OutputMode::Stdout).then_some(conversion.text),
    };

    info!(
        changed,
        written,
        citations = outcome.citations_replaced,
        added = outcome.footnotes_added,
        "converted file"
    );
    progress.file_finished(&outcome);

    Ok(outcome)
}

/// Convert several files, each independently of the others.
///
/// A failing file does not stop the batch; its error is returned in place.
#[instrument(skip_all, fields(files = paths.len()))]
pub async fn convert_files(
    paths: &[PathBuf],
    options: &ConvertOptions,
    progress: &dyn ProgressReporter,
) -> BatchResult {
    let start = Instant::now();
    let total = paths.len();
    let mut files = Vec::with_capacity(total);
    let mut changed = 0;
    let mut failed = 0;

    for (i, path) in paths.iter().enumerate() {
        progress.file_started(path, i + 1, total);
        let result = convert_file(path, options, progress).await;
        match &result {
            Ok(outcome) if outcome.changed => changed += 1,
            Ok(_) => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "conversion failed");
                failed += 1;
            }
        }
        files.push((path.clone(), result));
    }

    let result = BatchResult {
        files,
        changed,
        failed,
        elapsed: start.elapsed(),
    };
    progress.done(&result);
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
