//! Sequential traversal-and-index pipeline.
//!
//! For every regular file under the root the pipeline runs the same four
//! steps in order: derive the content identity, probe the store for it,
//! extract plain text, write the document. The probe comes before
//! extraction on purpose: extraction is the expensive step, and a cheap
//! identity lookup lets a re-run over an unchanged tree skip all extraction
//! and write work. Every failure is terminal for that single file only; the
//! run always continues to the next file, and there are no retries —
//! re-invoking the whole run is cheap for files that already succeeded.

use crate::{
    config::Config,
    extract::{ExtractionError, TextExtractor, TikaService},
    identity::compute_identity,
    metrics::{RunMetrics, RunReport},
    store::{DocumentStore, ElasticsearchService, IndexedDocument, StoreError},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use walkdir::WalkDir;

/// Terminal classification for one processed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Extracted and written to the store during this run.
    Indexed,
    /// Identity already present in the store; no extraction or write issued.
    AlreadyPresent,
    /// File content could not be read.
    ReadFailed,
    /// Existence probe failed; extraction and write were not attempted.
    ProbeFailed,
    /// Extraction failed or produced no usable text.
    ExtractionFailed,
    /// Store write failed after successful extraction.
    WriteFailed,
}

/// Errors that prevent a run from starting or from being constructed.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configured root is not a traversable directory.
    #[error("Root directory is not a directory: {0}")]
    RootNotADirectory(PathBuf),
    /// Extraction client could not be constructed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    /// Store client could not be constructed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Coordinates the full indexing pipeline: identity, existence probe,
/// extraction, and store write, one file at a time.
pub struct IndexPipeline {
    extractor: Box<dyn TextExtractor>,
    store: Box<dyn DocumentStore>,
    metrics: Arc<RunMetrics>,
}

impl IndexPipeline {
    /// Build a pipeline backed by the real Tika and Elasticsearch services.
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        let extractor = TikaService::new(&config.tika_url, config.request_timeout)?;
        let store = ElasticsearchService::new(
            &config.elasticsearch_url,
            &config.index,
            config.request_timeout,
        )?;
        Ok(Self::new(Box::new(extractor), Box::new(store)))
    }

    /// Build a pipeline from explicit collaborators.
    pub fn new(extractor: Box<dyn TextExtractor>, store: Box<dyn DocumentStore>) -> Self {
        Self {
            extractor,
            store,
            metrics: Arc::new(RunMetrics::new()),
        }
    }

    /// Traverse `root` and process every regular file beneath it,
    /// returning the per-outcome counters for the run.
    pub async fn run(&self, root: &Path) -> Result<RunReport, PipelineError> {
        if !root.is_dir() {
            return Err(PipelineError::RootNotADirectory(root.to_path_buf()));
        }
        tracing::info!(root = %root.display(), "Scanning directory");

        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    // An unreadable subdirectory skips its subtree, not the run.
                    tracing::warn!(error = %err, "Failed to read directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let outcome = self.process_file(entry.path()).await;
            self.metrics.record(outcome);
        }

        let report = self.metrics.snapshot();
        tracing::info!(
            indexed = report.indexed,
            already_present = report.already_present,
            failures = report.failures(),
            total = report.total(),
            "Run complete"
        );
        Ok(report)
    }

    /// Snapshot the counters accumulated so far.
    pub fn report(&self) -> RunReport {
        self.metrics.snapshot()
    }

    async fn process_file(&self, path: &Path) -> FileOutcome {
        let identity = match compute_identity(path).await {
            Ok(identity) => identity,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Skipped: unreadable");
                return FileOutcome::ReadFailed;
            }
        };

        match self.store.exists(&identity).await {
            Ok(true) => {
                tracing::debug!(path = %path.display(), identity = %identity, "Skipped: already indexed");
                return FileOutcome::AlreadyPresent;
            }
            Ok(false) => {}
            Err(err) => {
                // Unreachable store is not "not indexed"; proceeding here
                // would re-extract and re-write on every degraded run.
                tracing::warn!(path = %path.display(), identity = %identity, error = %err, "Skipped: existence probe failed");
                return FileOutcome::ProbeFailed;
            }
        }

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Skipped: unreadable");
                return FileOutcome::ReadFailed;
            }
        };

        let content = match self.extractor.extract_text(bytes).await {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(path = %path.display(), identity = %identity, error = %err, "Skipped: extraction failed");
                return FileOutcome::ExtractionFailed;
            }
        };

        let document = IndexedDocument {
            filename: file_name(path),
            path: path.display().to_string(),
            category: category(path),
            content,
        };
        match self.store.put_document(&identity, &document).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), identity = %identity, category = %document.category, "Indexed");
                FileOutcome::Indexed
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), identity = %identity, error = %err, "Skipped: write failed");
                FileOutcome::WriteFailed
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Coarse classification tag: the immediate parent directory name.
fn category(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_is_immediate_parent_name() {
        assert_eq!(category(Path::new("/mnt/data/docs/a.txt")), "docs");
        assert_eq!(category(Path::new("/mnt/data/reports/c.txt")), "reports");
    }

    #[test]
    fn file_name_drops_directories() {
        assert_eq!(file_name(Path::new("/mnt/data/docs/a.txt")), "a.txt");
    }
}
