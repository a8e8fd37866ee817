//! Core traits for FerroLink operations

use crate::{Error, LinkOutcome, RunSummary, SyncPair};

/// Trait for observing a sync run as it progresses
///
/// All methods have empty default bodies so implementors only override
/// what they render.
pub trait ProgressReporter: Sync {
    /// A pair is about to be walked
    fn report_pair_started(&self, _pair: &SyncPair) {}

    /// One file has been processed
    fn report_outcome(&self, _outcome: &LinkOutcome) {}

    /// A pair could not be processed
    fn report_pair_failed(&self, _pair: &SyncPair, _error: &Error) {}

    /// The run finished (successfully or not)
    fn report_completion(&self, _summary: &RunSummary) {}
}

/// Reporter that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {}
