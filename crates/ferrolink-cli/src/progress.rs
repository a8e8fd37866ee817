//! Progress tracking for CLI

use crate::display;
use console::style;
use ferrolink_types::{Error, LinkOutcome, ProgressReporter, RunSummary, SyncPair};
use indicatif::ProgressBar;

/// Spinner that follows a sync run pair by pair
pub struct SpinnerReporter {
    progress_bar: Option<ProgressBar>,
}

impl SpinnerReporter {
    /// Create a reporter; a quiet reporter draws nothing
    pub fn new(quiet: bool) -> Self {
        Self {
            progress_bar: (!quiet).then(display::create_spinner),
        }
    }
}

impl ProgressReporter for SpinnerReporter {
    fn report_pair_started(&self, pair: &SyncPair) {
        if let Some(pb) = &self.progress_bar {
            pb.set_message(format!(
                "Linking {} -> {}",
                pair.source_directory.display(),
                pair.destination_directory.display()
            ));
        }
    }

    fn report_outcome(&self, outcome: &LinkOutcome) {
        if let Some(pb) = &self.progress_bar {
            pb.inc(1);
            if let LinkOutcome::Failed(failure) = outcome {
                pb.println(format!("  {} {}", style("✗").red(), failure));
            }
        }
    }

    fn report_pair_failed(&self, pair: &SyncPair, error: &Error) {
        if let Some(pb) = &self.progress_bar {
            pb.println(format!(
                "  {} {}: {}",
                style("✗").red().bold(),
                pair.source_directory.display(),
                error
            ));
        }
    }

    fn report_completion(&self, _summary: &RunSummary) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_and_clear();
        }
    }
}
