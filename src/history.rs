//! Session history: in-memory list plus on-disk persistence
//!
//! The store owns the lines typed this session and the 1-based absolute
//! number of its first entry (`base`), which accounts for lines already on
//! disk when the shell started. Filesystem trouble never surfaces to the
//! prompt; a history operation that cannot touch its file is a no-op.

use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// In-memory command history for the current session.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    entries: Vec<String>,
    base: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore {
    pub fn new() -> Self {
        HistoryStore { entries: Vec::new(), base: 1 }
    }

    /// A store whose first entry will carry the given absolute number.
    pub fn with_base(base: usize) -> Self {
        HistoryStore { entries: Vec::new(), base }
    }

    /// Append one raw command line.
    pub fn record(&mut self, line: &str) {
        self.entries.push(line.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn base(&self) -> usize {
        self.base
    }

    /// `history -r`: append every non-empty line of the file to the list.
    pub fn read_from(&mut self, path: &str) {
        let path = resolve_read_path(path);
        if let Ok(text) = fs::read_to_string(path) {
            for line in text.split('\n') {
                if !line.is_empty() {
                    self.entries.push(line.to_string());
                }
            }
        }
    }

    /// `history -w`: truncate the file and write the list's non-empty
    /// entries, one per line.
    pub fn write_to(&self, path: &str) {
        let path = expand_tilde(path);
        if let Ok(file) = File::create(path) {
            let _ = write_filtered(file, &self.entries);
        }
    }

    /// `history -a`: append the list's non-empty entries to the file, then
    /// advance `base` past the whole list and clear it. This is the single
    /// write path for `-a`; the flushed entries are not written again at
    /// exit.
    pub fn append_to(&mut self, path: &str) {
        let path = expand_tilde(path);
        if let Ok(file) = OpenOptions::new().append(true).create(true).open(path) {
            let _ = write_filtered(file, &self.entries);
        }
        self.base += self.entries.len();
        self.entries.clear();
    }

    /// Normal-exit persistence: append the list's non-empty entries to the
    /// default history file.
    pub fn flush(&self) {
        if let Some(path) = default_path() {
            if let Ok(file) = OpenOptions::new().append(true).create(true).open(path) {
                let _ = write_filtered(file, &self.entries);
            }
        }
    }

    /// `history` / `history N`: render the on-disk file followed by the
    /// in-memory list. Disk lines carry their 1-based position, memory
    /// entries carry `base + index`; empty entries are skipped and at most
    /// `limit` entries are printed, scanning disk first.
    pub fn render(&self, limit: Option<usize>) -> String {
        let disk = default_path()
            .and_then(|path| fs::read_to_string(path).ok())
            .unwrap_or_default();
        self.render_with(limit, &disk)
    }

    fn render_with(&self, limit: Option<usize>, disk: &str) -> String {
        let disk_lines: Vec<&str> = disk.split('\n').collect();
        let max = limit.unwrap_or(disk_lines.len() + self.entries.len());
        let mut out = String::new();
        let mut printed = 0;
        for (i, line) in disk_lines.iter().enumerate() {
            if printed >= max {
                break;
            }
            if line.is_empty() {
                continue;
            }
            out.push_str(&format!("{:5}  {}\n", i + 1, line));
            printed += 1;
        }
        for (i, entry) in self.entries.iter().enumerate() {
            if printed >= max {
                break;
            }
            if entry.is_empty() {
                continue;
            }
            out.push_str(&format!("{:5}  {}\n", self.base + i, entry));
            printed += 1;
        }
        out
    }
}

fn write_filtered(mut file: File, entries: &[String]) -> io::Result<()> {
    for entry in entries {
        if !entry.is_empty() {
            writeln!(file, "{}", entry)?;
        }
    }
    Ok(())
}

/// The history file: `$HISTFILE` when set and non-empty, else
/// `$HOME/.gosh_history`.
pub fn default_path() -> Option<PathBuf> {
    match env::var("HISTFILE") {
        Ok(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => home_dir().map(|home| home.join(".gosh_history")),
    }
}

/// The user's home directory, from `$HOME`.
pub fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME").map(PathBuf::from)
}

/// Expand a leading `~` or `~/` against `$HOME`.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn resolve_read_path(path: &str) -> PathBuf {
    let expanded = expand_tilde(path);
    fs::canonicalize(&expanded).unwrap_or(expanded)
}

/// Non-empty lines of the history file, for replay into the editor's ring
/// at startup.
pub fn replay_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .map(|text| {
            text.split('\n')
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(entries: &[&str], base: usize) -> HistoryStore {
        let mut store = HistoryStore::with_base(base);
        for entry in entries {
            store.record(entry);
        }
        store
    }

    #[test]
    fn record_grows_the_list() {
        let mut store = HistoryStore::new();
        store.record("ls");
        store.record("pwd");
        assert_eq!(store.len(), 2);
        assert_eq!(store.base(), 1);
    }

    #[test]
    fn render_numbers_memory_from_base() {
        let store = store_with(&["ls", "pwd"], 1);
        assert_eq!(store.render_with(None, ""), "    1  ls\n    2  pwd\n");
    }

    #[test]
    fn render_numbers_disk_then_memory() {
        let store = store_with(&["pwd"], 3);
        let out = store.render_with(None, "ls\ncat f\n");
        assert_eq!(out, "    1  ls\n    2  cat f\n    3  pwd\n");
    }

    #[test]
    fn render_skips_empty_entries_everywhere() {
        let mut store = store_with(&["ls"], 4);
        store.record("");
        store.record("pwd");
        let out = store.render_with(None, "a\n\nb\n");
        assert_eq!(out, "    1  a\n    3  b\n    4  ls\n    6  pwd\n");
    }

    #[test]
    fn render_limit_caps_printed_entries() {
        let store = store_with(&["pwd"], 3);
        let out = store.render_with(Some(2), "ls\ncat f\n");
        assert_eq!(out, "    1  ls\n    2  cat f\n");
    }

    #[test]
    fn render_default_limit_prints_everything() {
        let store = store_with(&["one", "two", "three"], 1);
        let out = store.render_with(None, "");
        assert_eq!(out.lines().count(), 3);
    }

    #[test]
    fn numbers_right_justify_in_five_columns() {
        let store = store_with(&["wide"], 12345);
        assert_eq!(store.render_with(None, ""), "12345  wide\n");
    }

    #[test]
    fn write_to_filters_empty_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist");
        let mut store = store_with(&["ls"], 1);
        store.record("");
        store.record("pwd");
        store.write_to(path.to_str().unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "ls\npwd\n");
    }

    #[test]
    fn write_to_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist");
        fs::write(&path, "stale\n").unwrap();
        let store = store_with(&["fresh"], 1);
        store.write_to(path.to_str().unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[test]
    fn read_from_appends_non_empty_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist");
        fs::write(&path, "alpha\n\nbeta\n").unwrap();
        let mut store = store_with(&["typed"], 1);
        store.read_from(path.to_str().unwrap());
        assert_eq!(store.len(), 3);
        assert_eq!(store.base(), 1);
        assert_eq!(
            store.render_with(None, ""),
            "    1  typed\n    2  alpha\n    3  beta\n"
        );
    }

    #[test]
    fn read_from_missing_file_is_a_noop() {
        let mut store = store_with(&["typed"], 1);
        store.read_from("/no/such/file/anywhere");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn append_to_advances_base_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist");
        fs::write(&path, "old\n").unwrap();
        let mut store = store_with(&["one", "two"], 5);
        store.append_to(path.to_str().unwrap());
        assert!(store.is_empty());
        assert_eq!(store.base(), 7);
        assert_eq!(fs::read_to_string(&path).unwrap(), "old\none\ntwo\n");
    }

    #[test]
    fn replay_skips_empty_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist");
        fs::write(&path, "a\n\nb\n").unwrap();
        assert_eq!(replay_lines(&path), vec!["a", "b"]);
        assert!(replay_lines(&dir.path().join("missing")).is_empty());
    }

    #[test]
    fn expand_tilde_passthrough_without_prefix() {
        assert_eq!(expand_tilde("/tmp/h"), PathBuf::from("/tmp/h"));
        assert_eq!(expand_tilde("rel/h"), PathBuf::from("rel/h"));
        // A tilde not at the start is literal.
        assert_eq!(expand_tilde("a~b"), PathBuf::from("a~b"));
    }
}
