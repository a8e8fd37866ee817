//! JSON output structures for FerroLink CLI

use ferrolink_types::{Error, LinkFailure, PairFailure, RunSummary};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete JSON output for a sync run
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncResultJson {
    /// Operation metadata
    pub metadata: OperationMetadata,
    /// Per-file counters
    pub stats: SyncStatsJson,
    /// Failed link attempts
    pub failures: Vec<LinkFailureJson>,
    /// Pairs that could not be processed
    pub pair_failures: Vec<PairFailureJson>,
    /// Overall result
    pub result: OperationResult,
}

/// Operation metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct OperationMetadata {
    /// FerroLink version
    pub version: String,
    /// Operation type
    pub operation: String,
    /// Timestamp when the output was produced
    pub timestamp: String,
    /// Run identifier
    pub run_id: String,
    /// History log used by the run
    pub history_file: String,
    /// Whether this was a dry run
    pub dry_run: bool,
}

/// Sync statistics in JSON format
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncStatsJson {
    /// Files newly linked
    pub linked: u64,
    /// Files already in the history
    pub skipped: u64,
    /// Failed link attempts
    pub failed: u64,
    /// Files that would be linked (dry run)
    pub planned: u64,
    /// Entries the walker could not read
    pub walk_errors: u64,
    /// Pairs skipped for a missing directory
    pub skipped_pairs: u64,
    /// Entries appended to the history log
    pub history_appended: u64,
    /// Duration in seconds
    pub duration_seconds: f64,
}

/// One failed link attempt
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkFailureJson {
    /// Source file
    pub source: String,
    /// Destination path
    pub destination: String,
    /// Failure stage
    pub reason: String,
    /// OS error text
    pub message: String,
}

/// One failed pair
#[derive(Debug, Serialize, Deserialize)]
pub struct PairFailureJson {
    /// Source directory
    pub source_directory: String,
    /// Destination directory
    pub destination_directory: String,
    /// Reason
    pub message: String,
}

/// Overall operation result
#[derive(Debug, Serialize, Deserialize)]
pub struct OperationResult {
    /// Whether every pair and file succeeded
    pub success: bool,
    /// Whether the run stopped on a fatal error
    pub aborted: bool,
    /// Result message
    pub message: String,
}

impl SyncResultJson {
    /// Create a SyncResultJson from a run summary and an optional fatal error
    pub fn new(
        operation: &str,
        history_file: &Path,
        summary: &RunSummary,
        fatal: Option<&Error>,
    ) -> Self {
        let message = match fatal {
            Some(error) => format!("Run aborted: {}", error),
            None if summary.is_clean() => "Sync completed successfully".to_string(),
            None => format!(
                "Sync completed with {} failed files and {} failed pairs",
                summary.failed(),
                summary.pair_failures.len()
            ),
        };

        Self {
            metadata: OperationMetadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                operation: operation.to_string(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                run_id: summary.run_id.to_string(),
                history_file: history_file.display().to_string(),
                dry_run: summary.dry_run,
            },
            stats: SyncStatsJson::from_summary(summary),
            failures: summary
                .failures
                .iter()
                .map(LinkFailureJson::from_failure)
                .collect(),
            pair_failures: summary
                .pair_failures
                .iter()
                .map(PairFailureJson::from_failure)
                .collect(),
            result: OperationResult {
                success: fatal.is_none() && summary.is_clean(),
                aborted: fatal.is_some(),
                message,
            },
        }
    }
}

impl SyncStatsJson {
    /// Create SyncStatsJson from a RunSummary
    pub fn from_summary(summary: &RunSummary) -> Self {
        Self {
            linked: summary.stats.linked,
            skipped: summary.stats.skipped,
            failed: summary.stats.failed,
            planned: summary.stats.planned,
            walk_errors: summary.stats.walk_errors,
            skipped_pairs: summary.skipped_pairs,
            history_appended: summary.history_appended,
            duration_seconds: summary.duration.as_secs_f64(),
        }
    }
}

impl LinkFailureJson {
    /// Create LinkFailureJson from a LinkFailure
    pub fn from_failure(failure: &LinkFailure) -> Self {
        Self {
            source: failure.source.display().to_string(),
            destination: failure.destination.display().to_string(),
            reason: failure.reason.to_string(),
            message: failure.message.clone(),
        }
    }
}

impl PairFailureJson {
    /// Create PairFailureJson from a PairFailure
    pub fn from_failure(failure: &PairFailure) -> Self {
        Self {
            source_directory: failure.pair.source_directory.display().to_string(),
            destination_directory: failure.pair.destination_directory.display().to_string(),
            message: failure.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrolink_types::{FailureReason, LinkOutcome, SyncPair};

    fn summary_with_failure() -> RunSummary {
        let mut summary = RunSummary::new();
        summary.record(&LinkOutcome::Linked {
            source: "/src/a.txt".into(),
            destination: "/dst/a.txt".into(),
        });
        summary.record(&LinkOutcome::Failed(LinkFailure::new(
            Path::new("/src/b.txt"),
            Path::new("/dst/b.txt"),
            FailureReason::Link,
            &std::io::Error::from(std::io::ErrorKind::AlreadyExists),
        )));
        summary
    }

    #[test]
    fn test_json_reports_failures() {
        let summary = summary_with_failure();
        let output = SyncResultJson::new("run", Path::new("history.txt"), &summary, None);
        let value = serde_json::to_value(&output).unwrap();

        assert_eq!(value["metadata"]["operation"], "run");
        assert_eq!(value["metadata"]["run_id"], summary.run_id.to_string());
        assert_eq!(value["stats"]["linked"], 1);
        assert_eq!(value["stats"]["failed"], 1);
        assert_eq!(value["failures"][0]["source"], "/src/b.txt");
        assert_eq!(value["failures"][0]["reason"], "hard link failed");
        assert_eq!(value["result"]["success"], false);
        assert_eq!(value["result"]["aborted"], false);
    }

    #[test]
    fn test_json_marks_aborted_run() {
        let summary = RunSummary::new();
        let error = Error::other("disk full");
        let output = SyncResultJson::new("link", Path::new("history.txt"), &summary, Some(&error));

        assert!(output.result.aborted);
        assert!(!output.result.success);
        assert!(output.result.message.contains("disk full"));
    }

    #[test]
    fn test_json_pair_failures() {
        let mut summary = RunSummary::new();
        summary.pair_failures.push(PairFailure {
            pair: SyncPair::new("/missing", "/dst"),
            message: "Source directory not found".to_string(),
        });

        let output = SyncResultJson::new("run", Path::new("history.txt"), &summary, None);
        assert_eq!(output.pair_failures.len(), 1);
        assert_eq!(output.pair_failures[0].source_directory, "/missing");
        assert!(output.result.message.contains("1 failed pairs"));
    }
}
