//! Per-file link decisions

use crate::history::HistorySet;
use ferrolink_types::WalkedFile;
use std::path::{Path, PathBuf};

/// What to do with one walked file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkPlan {
    /// The source is already in the history
    Skip,
    /// Create a hard link at this destination
    LinkTo(PathBuf),
}

/// Decides, without touching the filesystem, whether a file gets linked
///
/// The history consulted is the one loaded at the start of the run. Files
/// linked earlier in the same run are not visible here.
#[derive(Debug, Clone, Copy)]
pub struct LinkPlanner<'a> {
    destination_directory: &'a Path,
    history: &'a HistorySet,
}

impl<'a> LinkPlanner<'a> {
    /// Create a planner for one pair
    pub fn new(destination_directory: &'a Path, history: &'a HistorySet) -> Self {
        Self {
            destination_directory,
            history,
        }
    }

    /// Plan a single file
    ///
    /// Only the history is consulted. A file already present at the
    /// destination is not skipped here; the link attempt reports it.
    pub fn plan(&self, file: &WalkedFile) -> LinkPlan {
        if self.history.contains(&file.absolute_source_path) {
            LinkPlan::Skip
        } else {
            LinkPlan::LinkTo(file.destination_in(self.destination_directory))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn walked(source_root: &str, relative: &str) -> WalkedFile {
        WalkedFile {
            absolute_source_path: Path::new(source_root).join(relative),
            relative_path: PathBuf::from(relative),
        }
    }

    #[test]
    fn test_unrecorded_file_is_linked_under_destination() {
        let history = HistorySet::new();
        let planner = LinkPlanner::new(Path::new("/dst"), &history);

        let plan = planner.plan(&walked("/src", "b/c.txt"));
        assert_eq!(plan, LinkPlan::LinkTo(PathBuf::from("/dst/b/c.txt")));
    }

    #[test]
    fn test_recorded_file_is_skipped() {
        let history: HistorySet = [PathBuf::from("/src/a.txt")].into_iter().collect();
        let planner = LinkPlanner::new(Path::new("/dst"), &history);

        assert_eq!(planner.plan(&walked("/src", "a.txt")), LinkPlan::Skip);
        assert_eq!(
            planner.plan(&walked("/src", "b.txt")),
            LinkPlan::LinkTo(PathBuf::from("/dst/b.txt"))
        );
    }

    #[test]
    fn test_history_is_keyed_by_source_not_destination() {
        let history: HistorySet = [PathBuf::from("/dst/a.txt")].into_iter().collect();
        let planner = LinkPlanner::new(Path::new("/dst"), &history);

        assert_eq!(
            planner.plan(&walked("/src", "a.txt")),
            LinkPlan::LinkTo(PathBuf::from("/dst/a.txt"))
        );
    }

    proptest! {
        #[test]
        fn test_plan_mirrors_relative_path(
            segments in prop::collection::vec("[a-z0-9_]{1,8}", 1..5),
            recorded in any::<bool>(),
        ) {
            let relative: PathBuf = segments.iter().collect();
            let file = WalkedFile {
                absolute_source_path: Path::new("/src").join(&relative),
                relative_path: relative.clone(),
            };
            let history: HistorySet = if recorded {
                [file.absolute_source_path.clone()].into_iter().collect()
            } else {
                HistorySet::new()
            };

            let plan = LinkPlanner::new(Path::new("/dst"), &history).plan(&file);
            if recorded {
                prop_assert_eq!(plan, LinkPlan::Skip);
            } else {
                prop_assert_eq!(plan, LinkPlan::LinkTo(Path::new("/dst").join(&relative)));
            }
        }
    }
}
