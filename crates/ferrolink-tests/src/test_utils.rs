//! Unified test utilities for FerroLink benchmarks and tests
//!
//! Every fixture lives in its own temporary directory that is removed when
//! the fixture is dropped.

use ferrolink_types::SyncPair;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding source trees, destination trees and a
/// history log
pub struct TestTree {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl TestTree {
    /// Create an empty fixture
    ///
    /// The root is canonicalized so that paths built here compare equal to
    /// the absolute paths the sync engine records.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp dir");
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Root of the fixture
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of `relative` inside the fixture
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Write a file, creating its parent directories
    pub fn file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    /// Create an empty directory
    pub fn dir(&self, relative: &str) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(&path).expect("Failed to create directory");
        path
    }

    /// Pair of two fixture directories
    pub fn pair(&self, source: &str, destination: &str) -> SyncPair {
        SyncPair::new(self.path(source), self.path(destination))
    }

    /// Default history log location
    pub fn history_path(&self) -> PathBuf {
        self.path("history.txt")
    }

    /// Lines of the default history log; empty when the log is absent
    pub fn history_lines(&self) -> Vec<String> {
        fs::read_to_string(self.history_path())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Populate `relative` with `file_count` files spread over
    /// `dirs_per_level` directories on each of `depth` levels
    pub fn populate(&self, relative: &str, file_count: usize, dirs_per_level: usize, depth: usize) {
        let dirs_per_level = dirs_per_level.max(1);
        for index in 0..file_count {
            let mut path = PathBuf::from(relative);
            let mut bucket = index;
            for level in 0..depth {
                path.push(format!("d{}_{}", level, bucket % dirs_per_level));
                bucket /= dirs_per_level;
            }
            path.push(format!("file{}.dat", index));
            self.file(&path.to_string_lossy(), "x");
        }
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Tree shapes used by the benchmarks
pub struct CommonTreeSizes;

impl CommonTreeSizes {
    /// (name, file count, directories per level, depth)
    pub fn all() -> Vec<(&'static str, usize, usize, usize)> {
        vec![
            ("flat_100", 100, 1, 0),
            ("nested_500", 500, 4, 3),
            ("wide_1000", 1000, 32, 1),
        ]
    }
}
