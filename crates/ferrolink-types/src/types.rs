//! Core data types for FerroLink
//!
//! This module provides the data types shared by the sync engine and its
//! callers: sync pairs, walked files, per-file link outcomes and the run
//! summary handed back to the presentation layer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Unique identifier for a sync run
pub type RunId = uuid::Uuid;

/// A source directory mirrored into a destination directory
///
/// An empty path stands for a field that was missing from the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SyncPair {
    /// Root of the tree to mirror
    pub source_directory: PathBuf,
    /// Root under which the hard links are created
    pub destination_directory: PathBuf,
}

impl SyncPair {
    /// Create a new sync pair
    pub fn new<S: Into<PathBuf>, D: Into<PathBuf>>(source: S, destination: D) -> Self {
        Self {
            source_directory: source.into(),
            destination_directory: destination.into(),
        }
    }

    /// Whether both directories are present
    pub fn is_complete(&self) -> bool {
        !self.source_directory.as_os_str().is_empty()
            && !self.destination_directory.as_os_str().is_empty()
    }
}

/// A regular file found under a source root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    /// Absolute path of the file; this is the key recorded in the history
    pub absolute_source_path: PathBuf,
    /// Path of the file relative to the source root
    pub relative_path: PathBuf,
}

impl WalkedFile {
    /// Mirrored location of this file under `destination_directory`
    pub fn destination_in(&self, destination_directory: &Path) -> PathBuf {
        destination_directory.join(&self.relative_path)
    }
}

/// Why a single link attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FailureReason {
    /// A missing ancestor of the destination could not be created
    DirectoryCreate,
    /// The hard link itself could not be created
    Link,
    /// The source path would not read back unchanged from the history log
    Unrecordable,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryCreate => f.write_str("directory creation failed"),
            Self::Link => f.write_str("hard link failed"),
            Self::Unrecordable => f.write_str("path cannot be recorded in the history log"),
        }
    }
}

/// A failed link attempt
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkFailure {
    /// Source file that was to be linked
    pub source: PathBuf,
    /// Destination path of the link
    pub destination: PathBuf,
    /// Stage at which the attempt failed
    pub reason: FailureReason,
    /// OS-level error text
    pub message: String,
}

impl LinkFailure {
    /// Create a failure record from an I/O error
    pub fn new(
        source: &Path,
        destination: &Path,
        reason: FailureReason,
        error: &std::io::Error,
    ) -> Self {
        Self {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            reason,
            message: error.to_string(),
        }
    }

    /// Create a failure record for a source whose path the history log
    /// cannot hold
    pub fn unrecordable(source: &Path, destination: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            reason: FailureReason::Unrecordable,
            message: "path ends in whitespace or contains a line break".to_string(),
        }
    }
}

impl std::fmt::Display for LinkFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {}: {}: {}",
            self.source.display(),
            self.destination.display(),
            self.reason,
            self.message
        )
    }
}

/// Result of processing one walked file
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LinkOutcome {
    /// Source already recorded in the history
    Skipped {
        /// Source file
        source: PathBuf,
    },
    /// Hard link created; the source must be added to the history
    Linked {
        /// Source file
        source: PathBuf,
        /// Created link
        destination: PathBuf,
    },
    /// Dry run: the link would have been created
    Planned {
        /// Source file
        source: PathBuf,
        /// Link that would be created
        destination: PathBuf,
    },
    /// Link attempt failed
    Failed(LinkFailure),
}

impl LinkOutcome {
    /// Source path to record in the history, if any
    pub fn linked_source(&self) -> Option<&Path> {
        match self {
            Self::Linked { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A pair that could not be processed at all
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PairFailure {
    /// The pair as configured
    pub pair: SyncPair,
    /// Human-readable reason
    pub message: String,
}

/// Per-file counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkStats {
    /// Files newly linked
    pub linked: u64,
    /// Files skipped because they are already in the history
    pub skipped: u64,
    /// Files whose link attempt failed
    pub failed: u64,
    /// Files that would be linked (dry run only)
    pub planned: u64,
    /// Entries the walker could not visit
    pub walk_errors: u64,
}

impl LinkStats {
    /// Create a new empty statistics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one outcome
    pub fn record(&mut self, outcome: &LinkOutcome) {
        match outcome {
            LinkOutcome::Skipped { .. } => self.skipped += 1,
            LinkOutcome::Linked { .. } => self.linked += 1,
            LinkOutcome::Planned { .. } => self.planned += 1,
            LinkOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Counts added since the `earlier` snapshot of the same counters
    pub fn since(&self, earlier: &LinkStats) -> LinkStats {
        LinkStats {
            linked: self.linked.saturating_sub(earlier.linked),
            skipped: self.skipped.saturating_sub(earlier.skipped),
            failed: self.failed.saturating_sub(earlier.failed),
            planned: self.planned.saturating_sub(earlier.planned),
            walk_errors: self.walk_errors.saturating_sub(earlier.walk_errors),
        }
    }

    /// Total number of files seen by the planner
    pub fn files_seen(&self) -> u64 {
        self.linked + self.skipped + self.failed + self.planned
    }
}

/// Summary of one sync run
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunSummary {
    /// Run identifier
    pub run_id: RunId,
    /// Per-file counters
    pub stats: LinkStats,
    /// Every failed link attempt
    pub failures: Vec<LinkFailure>,
    /// Pairs that could not be walked
    pub pair_failures: Vec<PairFailure>,
    /// Pairs skipped because a directory was missing from the configuration
    pub skipped_pairs: u64,
    /// Entries appended to the history log
    pub history_appended: u64,
    /// Whether this was a dry run
    pub dry_run: bool,
    /// Total duration of the run
    pub duration: Duration,
}

impl RunSummary {
    /// Create an empty summary for a new run
    pub fn new() -> Self {
        Self {
            run_id: uuid::Uuid::new_v4(),
            ..Self::default()
        }
    }

    /// Count one outcome, keeping the failure record if there is one
    pub fn record(&mut self, outcome: &LinkOutcome) {
        self.stats.record(outcome);
        if let LinkOutcome::Failed(failure) = outcome {
            self.failures.push(failure.clone());
        }
    }

    /// Number of files newly linked
    pub fn linked(&self) -> u64 {
        self.stats.linked
    }

    /// Number of files skipped
    pub fn skipped(&self) -> u64 {
        self.stats.skipped
    }

    /// Number of failed files
    pub fn failed(&self) -> u64 {
        self.stats.failed
    }

    /// Whether every pair and every file was processed without failure
    pub fn is_clean(&self) -> bool {
        self.stats.failed == 0
            && self.stats.walk_errors == 0
            && self.pair_failures.is_empty()
            && self.skipped_pairs == 0
    }
}
