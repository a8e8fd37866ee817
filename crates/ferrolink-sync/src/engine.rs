//! Main synchronization engine

use crate::{
    executor::LinkExecutor,
    history::{is_recordable, HistorySet, HistoryStore},
    planner::{LinkPlan, LinkPlanner},
    walker::TreeWalker,
};
use ferrolink_config::PerformanceConfig;
use ferrolink_types::{
    Error, LinkFailure, LinkOutcome, NoopReporter, PairFailure, ProgressReporter, Result,
    RunSummary, SyncPair, ThreadCount,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Synchronization options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOptions {
    /// Plan every link but create nothing and leave the history untouched
    pub dry_run: bool,
    /// Workers linking the files of one pair
    pub link_workers: ThreadCount,
}

impl SyncOptions {
    /// Options for a dry run
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    /// Set the number of link workers
    pub fn with_link_workers(mut self, link_workers: ThreadCount) -> Self {
        self.link_workers = link_workers;
        self
    }
}

impl From<&PerformanceConfig> for SyncOptions {
    fn from(config: &PerformanceConfig) -> Self {
        Self {
            dry_run: false,
            link_workers: config.link_workers,
        }
    }
}

/// A run stopped by a fatal error
///
/// Links created before the failure stay in place. `summary` holds what was
/// counted up to that point.
#[derive(Debug, thiserror::Error)]
#[error("sync run aborted: {error}")]
pub struct RunAborted {
    /// Partial summary of the aborted run
    pub summary: RunSummary,
    /// The fatal error
    #[source]
    pub error: Error,
}

/// Drives sync pairs through walking, planning, linking and the final
/// history append
#[derive(Debug, Clone, Default)]
pub struct SyncEngine {
    options: SyncOptions,
}

impl SyncEngine {
    /// Create an engine with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom options
    pub fn with_options(options: SyncOptions) -> Self {
        Self { options }
    }

    /// Options in use
    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Process `pairs` in order against the history log at `history_file`
    pub fn run<P: AsRef<Path>>(
        &self,
        pairs: &[SyncPair],
        history_file: P,
    ) -> std::result::Result<RunSummary, RunAborted> {
        self.run_with_reporter(pairs, history_file, &NoopReporter)
    }

    /// Like [`SyncEngine::run`], notifying `reporter` as the run progresses
    ///
    /// Pair-level and file-level failures are recorded in the summary and
    /// never stop the run. Only a history log that cannot be read or
    /// appended aborts it.
    pub fn run_with_reporter<P: AsRef<Path>>(
        &self,
        pairs: &[SyncPair],
        history_file: P,
        reporter: &dyn ProgressReporter,
    ) -> std::result::Result<RunSummary, RunAborted> {
        let started = Instant::now();
        let mut summary = RunSummary::new();
        summary.dry_run = self.options.dry_run;

        info!(
            "Starting sync run {} over {} pairs{}",
            summary.run_id,
            pairs.len(),
            if self.options.dry_run { " (dry run)" } else { "" }
        );

        let store = HistoryStore::new(history_file);
        let history = match store.load() {
            Ok(history) => history,
            Err(error) => return Err(Self::abort(summary, started, error, reporter)),
        };

        let pool = self.build_pool();
        let mut new_paths = BTreeSet::new();

        for pair in pairs {
            if !pair.is_complete() {
                warn!(
                    "Skipping pair with missing directory: source '{}', destination '{}'",
                    pair.source_directory.display(),
                    pair.destination_directory.display()
                );
                summary.skipped_pairs += 1;
                continue;
            }

            reporter.report_pair_started(pair);
            if let Err(error) = self.sync_pair(
                pair,
                &history,
                pool.as_ref(),
                &mut summary,
                &mut new_paths,
                reporter,
            ) {
                warn!(
                    "Pair {} -> {} failed: {}",
                    pair.source_directory.display(),
                    pair.destination_directory.display(),
                    error
                );
                reporter.report_pair_failed(pair, &error);
                summary.pair_failures.push(PairFailure {
                    pair: pair.clone(),
                    message: error.to_string(),
                });
            }
        }

        if !self.options.dry_run {
            match store.append(&new_paths) {
                Ok(appended) => summary.history_appended = appended as u64,
                Err(error) => return Err(Self::abort(summary, started, error, reporter)),
            }
        }

        summary.duration = started.elapsed();
        info!(
            "Sync run {} finished: {} linked, {} skipped, {} failed, {} pair failures in {:?}",
            summary.run_id,
            summary.linked(),
            summary.skipped(),
            summary.failed(),
            summary.pair_failures.len(),
            summary.duration
        );
        reporter.report_completion(&summary);
        Ok(summary)
    }

    fn sync_pair(
        &self,
        pair: &SyncPair,
        history: &HistorySet,
        pool: Option<&rayon::ThreadPool>,
        summary: &mut RunSummary,
        new_paths: &mut BTreeSet<PathBuf>,
        reporter: &dyn ProgressReporter,
    ) -> Result<()> {
        let walker = TreeWalker::new(&pair.source_directory)?;
        info!(
            "Syncing {} -> {}",
            walker.root().display(),
            pair.destination_directory.display()
        );

        let planner = LinkPlanner::new(&pair.destination_directory, history);
        let before = summary.stats;
        let mut pending = Vec::new();

        // The walk completes before any link exists, so a destination
        // nested in its source never feeds back into the walk
        for item in walker.walk() {
            let file = match item {
                Ok(file) => file,
                Err(error) => {
                    warn!("Skipping unreadable entry: {}", error);
                    summary.stats.walk_errors += 1;
                    continue;
                }
            };

            match planner.plan(&file) {
                LinkPlan::Skip => {
                    debug!("Already linked: {}", file.absolute_source_path.display());
                    let outcome = LinkOutcome::Skipped {
                        source: file.absolute_source_path,
                    };
                    reporter.report_outcome(&outcome);
                    summary.record(&outcome);
                }
                LinkPlan::LinkTo(destination) if !is_recordable(&file.absolute_source_path) => {
                    warn!(
                        "Not linking {}: its path cannot be recorded in the history log",
                        file.absolute_source_path.display()
                    );
                    let outcome = LinkOutcome::Failed(LinkFailure::unrecordable(
                        &file.absolute_source_path,
                        &destination,
                    ));
                    reporter.report_outcome(&outcome);
                    summary.record(&outcome);
                }
                LinkPlan::LinkTo(destination) => {
                    pending.push((file.absolute_source_path, destination));
                }
            }
        }

        let executor = LinkExecutor::new().dry_run(self.options.dry_run);
        for outcome in Self::execute_all(executor, &pending, pool, reporter) {
            summary.record(&outcome);
            if let Some(source) = outcome.linked_source() {
                new_paths.insert(source.to_path_buf());
            }
        }

        let stats = summary.stats.since(&before);
        info!(
            "Pair {} done: {} files, {} linked, {} skipped, {} failed, {} planned",
            pair.source_directory.display(),
            stats.files_seen(),
            stats.linked,
            stats.skipped,
            stats.failed,
            stats.planned
        );
        Ok(())
    }

    fn execute_all(
        executor: LinkExecutor,
        pending: &[(PathBuf, PathBuf)],
        pool: Option<&rayon::ThreadPool>,
        reporter: &dyn ProgressReporter,
    ) -> Vec<LinkOutcome> {
        let execute = |(source, destination): &(PathBuf, PathBuf)| {
            let outcome = executor.execute(source, destination);
            reporter.report_outcome(&outcome);
            outcome
        };

        match pool {
            Some(pool) if pending.len() > 1 => {
                pool.install(|| pending.par_iter().map(execute).collect())
            }
            _ => pending.iter().map(execute).collect(),
        }
    }

    fn build_pool(&self) -> Option<rayon::ThreadPool> {
        let workers = self.options.link_workers;
        if !workers.is_parallel() {
            return None;
        }

        match rayon::ThreadPoolBuilder::new()
            .num_threads(workers.get())
            .thread_name(|index| format!("ferrolink-link-{}", index))
            .build()
        {
            Ok(pool) => {
                debug!("Linking with {} workers", workers.get());
                Some(pool)
            }
            Err(e) => {
                warn!("Failed to start link workers, linking sequentially: {}", e);
                None
            }
        }
    }

    fn abort(
        mut summary: RunSummary,
        started: Instant,
        error: Error,
        reporter: &dyn ProgressReporter,
    ) -> RunAborted {
        summary.duration = started.elapsed();
        tracing::error!("Sync run {} aborted: {}", summary.run_id, error);
        reporter.report_completion(&summary);
        RunAborted { summary, error }
    }
}
