//! Hard link creation

use ferrolink_types::{FailureReason, LinkFailure, LinkOutcome};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// Creates one hard link per call, building missing destination directories
///
/// Failures are returned as [`LinkOutcome::Failed`] and never abort the
/// caller. An existing destination is never replaced.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkExecutor {
    dry_run: bool,
}

impl LinkExecutor {
    /// Create an executor that modifies the filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Report what would be linked without touching the filesystem
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Whether this executor only plans
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Link `source` at `destination`
    pub fn execute(&self, source: &Path, destination: &Path) -> LinkOutcome {
        if self.dry_run {
            debug!(
                "Would link {} -> {}",
                source.display(),
                destination.display()
            );
            return LinkOutcome::Planned {
                source: source.to_path_buf(),
                destination: destination.to_path_buf(),
            };
        }

        if let Some(parent) = destination.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Failed to create directory {}: {}", parent.display(), e);
                return LinkOutcome::Failed(LinkFailure::new(
                    source,
                    destination,
                    FailureReason::DirectoryCreate,
                    &e,
                ));
            }
        }

        match fs::hard_link(source, destination) {
            Ok(()) => {
                debug!("Linked {} -> {}", source.display(), destination.display());
                linked(source, destination)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && same_file(source, destination) => {
                // Left behind by a run whose history append never happened
                debug!(
                    "Destination {} already links {}",
                    destination.display(),
                    source.display()
                );
                linked(source, destination)
            }
            Err(e) => {
                warn!(
                    "Failed to link {} -> {}: {}",
                    source.display(),
                    destination.display(),
                    e
                );
                LinkOutcome::Failed(LinkFailure::new(
                    source,
                    destination,
                    FailureReason::Link,
                    &e,
                ))
            }
        }
    }
}

fn linked(source: &Path, destination: &Path) -> LinkOutcome {
    LinkOutcome::Linked {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
    }
}

#[cfg(unix)]
fn same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_file(_a: &Path, _b: &Path) -> bool {
    false
}
