//! Persistent record of already-linked source files
//!
//! The history log is a plain text file holding one absolute source path per
//! line. It only ever grows: entries are appended once per run and never
//! rewritten, so a path that made it into the log is never linked again,
//! even if its destination link is later removed.
//!
//! No locking is performed. Two runs sharing one log can interleave their
//! appends.

use ferrolink_types::{Error, Result};
use std::collections::{BTreeSet, HashSet};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// In-memory set of source paths recorded in the history log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistorySet {
    entries: HashSet<PathBuf>,
}

impl HistorySet {
    /// Create an empty history set
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `source` has already been processed
    pub fn contains(&self, source: &Path) -> bool {
        self.entries.contains(source)
    }

    /// Number of distinct entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the recorded paths in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(PathBuf::as_path)
    }
}

impl FromIterator<PathBuf> for HistorySet {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Loads and appends the history log at a fixed location
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Create a store for the log at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Location of the history log
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the log into a set
    ///
    /// A missing log is a valid first-run state and yields an empty set.
    /// Trailing whitespace is trimmed and blank lines are ignored.
    pub fn load(&self) -> Result<HistorySet> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No history log at {}, starting empty", self.path.display());
                return Ok(HistorySet::new());
            }
            Err(e) => return Err(Error::history(&self.path, &e)),
        };

        let history: HistorySet = bytes
            .split(|&byte| byte == b'\n')
            .map(trim_trailing_whitespace)
            .filter(|line| !line.is_empty())
            .map(path_from_bytes)
            .collect();

        info!(
            "Loaded {} history entries from {}",
            history.len(),
            self.path.display()
        );
        Ok(history)
    }

    /// Append `entries` to the log, one per line, in sorted order
    ///
    /// Does nothing when `entries` is empty. The log and its parent
    /// directory are created when absent. Returns the number of lines
    /// written.
    pub fn append(&self, entries: &BTreeSet<PathBuf>) -> Result<usize> {
        if entries.is_empty() {
            return Ok(0);
        }

        self.write_entries(entries)
            .map_err(|e| Error::history(&self.path, &e))?;

        info!(
            "Appended {} entries to history log {}",
            entries.len(),
            self.path.display()
        );
        Ok(entries.len())
    }

    fn write_entries(&self, entries: &BTreeSet<PathBuf>) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let needs_separator = self.ends_without_newline()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);

        // A hand-edited log may lack its final newline
        if needs_separator {
            writer.write_all(b"\n")?;
        }
        for entry in entries {
            writer.write_all(&path_to_bytes(entry))?;
            writer.write_all(b"\n")?;
        }

        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()
    }

    fn ends_without_newline(&self) -> std::io::Result<bool> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };
        if file.metadata()?.len() == 0 {
            return Ok(false);
        }
        file.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        Ok(last[0] != b'\n')
    }
}

/// Whether `path` reads back from the log exactly as it was written
///
/// Lines are split on `\n` and lose their trailing whitespace on load, so a
/// path holding a line break or ending in whitespace never matches its entry.
pub fn is_recordable(path: &Path) -> bool {
    let bytes = path_to_bytes(path);
    !bytes.contains(&b'\n') && trim_trailing_whitespace(&bytes).len() == bytes.len()
}

fn trim_trailing_whitespace(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|byte| !byte.is_ascii_whitespace())
        .map_or(0, |index| index + 1);
    &line[..end]
}

#[cfg(unix)]
fn path_to_bytes(path: &Path) -> std::borrow::Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    std::borrow::Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_to_bytes(path: &Path) -> std::borrow::Cow<'_, [u8]> {
    match path.to_string_lossy() {
        std::borrow::Cow::Borrowed(text) => std::borrow::Cow::Borrowed(text.as_bytes()),
        std::borrow::Cow::Owned(text) => std::borrow::Cow::Owned(text.into_bytes()),
    }
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrolink_types::ErrorKind;
    use rstest::rstest;
    use tempfile::TempDir;

    fn entries(paths: &[&str]) -> BTreeSet<PathBuf> {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_missing_log_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = HistoryStore::new(temp_dir.path().join("history.txt"));

        let history = store.load().unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_load_trims_and_deduplicates() {
        let temp_dir = TempDir::new().unwrap();
        let log = temp_dir.path().join("history.txt");
        fs::write(&log, "/src/a.txt\n/src/b.txt  \r\n\n/src/a.txt\t\n").unwrap();

        let history = HistoryStore::new(&log).load().unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.contains(Path::new("/src/a.txt")));
        assert!(history.contains(Path::new("/src/b.txt")));
    }

    #[test]
    fn test_append_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = HistoryStore::new(temp_dir.path().join("history.txt"));

        let written = store.append(&entries(&["/src/b.txt", "/src/a.txt"])).unwrap();
        assert_eq!(written, 2);

        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "/src/a.txt\n/src/b.txt\n");

        let history = store.load().unwrap();
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_append_empty_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let store = HistoryStore::new(temp_dir.path().join("history.txt"));

        assert_eq!(store.append(&BTreeSet::new()).unwrap(), 0);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_append_only_grows() {
        let temp_dir = TempDir::new().unwrap();
        let store = HistoryStore::new(temp_dir.path().join("history.txt"));

        store.append(&entries(&["/src/a.txt"])).unwrap();
        store.append(&entries(&["/src/b.txt"])).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "/src/a.txt\n/src/b.txt\n");
    }

    #[test]
    fn test_append_repairs_missing_final_newline() {
        let temp_dir = TempDir::new().unwrap();
        let log = temp_dir.path().join("history.txt");
        fs::write(&log, "/src/a.txt").unwrap();

        HistoryStore::new(&log)
            .append(&entries(&["/src/b.txt"]))
            .unwrap();

        let contents = fs::read_to_string(&log).unwrap();
        assert_eq!(contents, "/src/a.txt\n/src/b.txt\n");
    }

    #[test]
    fn test_append_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = HistoryStore::new(temp_dir.path().join("state/ferrolink/history.txt"));

        store.append(&entries(&["/src/a.txt"])).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_load_directory_is_history_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = HistoryStore::new(temp_dir.path());

        let error = store.load().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::History);
        assert!(error.is_fatal());
    }

    #[test]
    fn test_trim_trailing_whitespace() {
        assert_eq!(trim_trailing_whitespace(b"/a b \r"), b"/a b");
        assert_eq!(trim_trailing_whitespace(b"  "), b"");
        assert_eq!(trim_trailing_whitespace(b""), b"");
    }

    #[rstest]
    #[case("/src/a.txt", true)]
    #[case("/src/a b/c.txt", true)]
    #[case("/src/a.txt ", false)]
    #[case("/src/a.txt\t", false)]
    #[case("/src/b\nc.txt", false)]
    #[case("/src/b\rc.txt", true)]
    fn test_is_recordable(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_recordable(Path::new(path)), expected);
    }

    #[test]
    fn test_recordable_paths_read_back_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let store = HistoryStore::new(temp_dir.path().join("history.txt"));
        let written = entries(&["/src/a b/c.txt", "/src/b\rc.txt"]);
        assert!(written.iter().all(|path| is_recordable(path)));

        store.append(&written).unwrap();
        let history = store.load().unwrap();
        assert!(written.iter().all(|path| history.contains(path)));
    }
}
