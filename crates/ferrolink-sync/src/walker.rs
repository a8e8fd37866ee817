//! Source tree enumeration

use ferrolink_types::{Error, Result, WalkedFile};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Enumerates the regular files under a source root
#[derive(Debug, Clone)]
pub struct TreeWalker {
    root: PathBuf,
}

impl TreeWalker {
    /// Prepare a walk of `source_directory`
    ///
    /// The root is made absolute so that every yielded source path is
    /// absolute. Fails when the root is missing or is not a directory.
    pub fn new<P: AsRef<Path>>(source_directory: P) -> Result<Self> {
        let root = absolute(source_directory.as_ref())?;

        let metadata = match std::fs::metadata(&root) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::source_not_found(&root));
            }
            Err(e) => return Err(Error::walk(&root, e.to_string())),
        };
        if !metadata.is_dir() {
            return Err(Error::not_a_directory(&root));
        }

        Ok(Self { root })
    }

    /// Absolute source root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start the walk
    ///
    /// Directories are descended but not yielded; symlinks are neither
    /// followed nor yielded, and neither are other non-regular files.
    /// Entries that cannot be read are yielded as [`Error::Walk`] and the
    /// walk carries on with their siblings.
    pub fn walk(self) -> Walk {
        let inner = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();
        Walk {
            root: self.root,
            inner,
        }
    }
}

/// Lazy, single-pass iterator over the regular files of a tree
#[derive(Debug)]
pub struct Walk {
    root: PathBuf,
    inner: walkdir::IntoIter,
}

impl Iterator for Walk {
    type Item = Result<WalkedFile>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(self.root.as_path()).to_path_buf();
                    return Some(Err(Error::walk(path, e.to_string())));
                }
            };

            if !entry.file_type().is_file() {
                if !entry.file_type().is_dir() {
                    debug!("Ignoring non-regular file: {}", entry.path().display());
                }
                continue;
            }

            let relative_path = match entry.path().strip_prefix(&self.root) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => {
                    return Some(Err(Error::walk(
                        entry.path(),
                        "entry is outside of the walk root",
                    )));
                }
            };

            return Some(Ok(WalkedFile {
                absolute_source_path: entry.into_path(),
                relative_path,
            }));
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrolink_types::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    fn relative_paths(walker: TreeWalker) -> Vec<PathBuf> {
        walker
            .walk()
            .map(|item| item.unwrap().relative_path)
            .collect()
    }

    #[test]
    fn test_walk_yields_only_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("b/empty")).unwrap();
        fs::write(temp_dir.path().join("a.txt"), b"a").unwrap();
        fs::write(temp_dir.path().join("b/c.txt"), b"c").unwrap();

        let paths = relative_paths(TreeWalker::new(temp_dir.path()).unwrap());
        assert_eq!(paths, vec![PathBuf::from("a.txt"), PathBuf::from("b/c.txt")]);
    }

    #[test]
    fn test_walk_paths_are_absolute() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), b"a").unwrap();

        let walker = TreeWalker::new(temp_dir.path()).unwrap();
        let root = walker.root().to_path_buf();
        let files: Vec<WalkedFile> = walker.walk().map(|item| item.unwrap()).collect();

        assert_eq!(files.len(), 1);
        assert!(files[0].absolute_source_path.is_absolute());
        assert_eq!(files[0].absolute_source_path, root.join("a.txt"));
    }

    #[test]
    fn test_missing_root_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let error = TreeWalker::new(temp_dir.path().join("missing")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert!(matches!(error, Error::SourceNotFound { .. }));
    }

    #[test]
    fn test_file_root_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.txt");
        fs::write(&file, b"a").unwrap();

        let error = TreeWalker::new(&file).unwrap_err();
        assert!(matches!(error, Error::NotADirectory { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_excluded() {
        let temp_dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("target.txt"), b"t").unwrap();
        fs::write(temp_dir.path().join("real.txt"), b"r").unwrap();
        std::os::unix::fs::symlink(
            outside.path().join("target.txt"),
            temp_dir.path().join("link.txt"),
        )
        .unwrap();
        std::os::unix::fs::symlink(outside.path(), temp_dir.path().join("linked_dir")).unwrap();

        let paths = relative_paths(TreeWalker::new(temp_dir.path()).unwrap());
        assert_eq!(paths, vec![PathBuf::from("real.txt")]);
    }

    #[test]
    fn test_relative_root_is_made_absolute() {
        let temp_dir = tempfile::Builder::new()
            .prefix("walker-relative")
            .tempdir_in(".")
            .unwrap();
        fs::write(temp_dir.path().join("a.txt"), b"a").unwrap();
        let relative = PathBuf::from(temp_dir.path().file_name().unwrap());
        assert!(relative.is_relative());

        let walker = TreeWalker::new(&relative).unwrap();
        let root = walker.root().to_path_buf();
        assert_eq!(root, std::env::current_dir().unwrap().join(&relative));

        let files: Vec<WalkedFile> = walker.walk().map(|item| item.unwrap()).collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].absolute_source_path.is_absolute());
        assert_eq!(files[0].absolute_source_path, root.join("a.txt"));
    }
}
