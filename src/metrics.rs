use crate::pipeline::FileOutcome;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing indexing activity for one run.
#[derive(Default)]
pub struct RunMetrics {
    indexed: AtomicU64,
    already_present: AtomicU64,
    read_failed: AtomicU64,
    probe_failed: AtomicU64,
    extraction_failed: AtomicU64,
    write_failed: AtomicU64,
}

impl RunMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the terminal outcome for one processed file.
    pub fn record(&self, outcome: FileOutcome) {
        let counter = match outcome {
            FileOutcome::Indexed => &self.indexed,
            FileOutcome::AlreadyPresent => &self.already_present,
            FileOutcome::ReadFailed => &self.read_failed,
            FileOutcome::ProbeFailed => &self.probe_failed,
            FileOutcome::ExtractionFailed => &self.extraction_failed,
            FileOutcome::WriteFailed => &self.write_failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> RunReport {
        RunReport {
            indexed: self.indexed.load(Ordering::Relaxed),
            already_present: self.already_present.load(Ordering::Relaxed),
            read_failed: self.read_failed.load(Ordering::Relaxed),
            probe_failed: self.probe_failed.load(Ordering::Relaxed),
            extraction_failed: self.extraction_failed.load(Ordering::Relaxed),
            write_failed: self.write_failed.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of run counters used for operator-facing reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct RunReport {
    /// Files extracted and written during this run.
    pub indexed: u64,
    /// Files skipped because their identity was already in the store.
    pub already_present: u64,
    /// Files skipped because their content could not be read.
    pub read_failed: u64,
    /// Files skipped because the existence probe failed.
    pub probe_failed: u64,
    /// Files skipped because extraction failed or produced no text.
    pub extraction_failed: u64,
    /// Files skipped because the store write failed.
    pub write_failed: u64,
}

impl RunReport {
    /// Total number of files classified during the run.
    pub fn total(&self) -> u64 {
        self.indexed
            + self.already_present
            + self.read_failed
            + self.probe_failed
            + self.extraction_failed
            + self.write_failed
    }

    /// Number of files skipped due to a failure rather than idempotence.
    pub fn failures(&self) -> u64 {
        self.read_failed + self.probe_failed + self.extraction_failed + self.write_failed
    }
}
