//! Executable lookup across `PATH`
//!
//! Resolution concatenates each colon-separated `PATH` entry with the program
//! name and takes the first candidate whose stat succeeds with any execute
//! bit set. An empty `PATH` entry therefore yields a candidate of `/name`;
//! that oddity is kept on purpose, as is the fact that a stat-able directory
//! with execute bits satisfies resolution. The completion scan is stricter
//! and skips directories.

use std::collections::HashSet;
use std::env;
use std::fs;

use crate::builtins::BUILTINS;

/// Resolve a program name to the first matching executable path on `PATH`.
pub fn find_executable(name: &str) -> Option<String> {
    find_in(&env::var("PATH").unwrap_or_default(), name)
}

/// Resolution against an explicit `PATH` string (testable without touching
/// the environment).
fn find_in(path: &str, name: &str) -> Option<String> {
    for dir in path.split(':') {
        let candidate = if dir.ends_with('/') {
            format!("{}{}", dir, name)
        } else {
            format!("{}/{}", dir, name)
        };
        if let Ok(metadata) = fs::metadata(&candidate) {
            if has_exec_bit(&metadata) {
                return Some(candidate);
            }
        }
    }
    None
}

#[cfg(unix)]
fn has_exec_bit(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn has_exec_bit(_metadata: &fs::Metadata) -> bool {
    true
}

/// Build the completion candidate set: every built-in name plus every
/// non-directory entry with an execute bit in any `PATH` directory, deduped
/// by basename and sorted. Computed once at shell startup.
pub fn scan_candidates() -> Vec<String> {
    scan_in(&env::var("PATH").unwrap_or_default())
}

fn scan_in(path: &str) -> Vec<String> {
    let mut names: HashSet<String> = BUILTINS.iter().map(|b| b.to_string()).collect();
    for dir in path.split(':') {
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.filter_map(|e| e.ok()) {
                if let Ok(metadata) = entry.metadata() {
                    if metadata.is_dir() || !has_exec_bit(&metadata) {
                        continue;
                    }
                    if let Some(name) = entry.file_name().to_str() {
                        names.insert(name.to_string());
                    }
                }
            }
        }
    }
    let mut candidates: Vec<String> = names.into_iter().collect();
    candidates.sort();
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    #[cfg(unix)]
    fn make_executable(path: &std::path::Path) {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms).unwrap();
    }

    #[cfg(unix)]
    fn make_plain(path: &std::path::Path) {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path).unwrap().permissions();
        perms.set_mode(0o644);
        fs::set_permissions(path, perms).unwrap();
    }

    #[test]
    #[cfg(unix)]
    fn finds_first_executable_on_path() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        for dir in [&first, &second] {
            let exe = dir.path().join("prog");
            File::create(&exe).unwrap().write_all(b"#!/bin/sh\n").unwrap();
            make_executable(&exe);
        }
        let path = format!("{}:{}", first.path().display(), second.path().display());
        let found = find_in(&path, "prog").unwrap();
        assert_eq!(found, first.path().join("prog").display().to_string());
    }

    #[test]
    #[cfg(unix)]
    fn skips_entries_without_exec_bits() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("data");
        File::create(&file).unwrap();
        make_plain(&file);
        let path = dir.path().display().to_string();
        assert!(find_in(&path, "data").is_none());
    }

    #[test]
    #[cfg(unix)]
    fn trailing_slash_on_path_entry_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("prog");
        File::create(&exe).unwrap();
        make_executable(&exe);
        let path = format!("{}/", dir.path().display());
        let found = find_in(&path, "prog").unwrap();
        assert_eq!(found, format!("{}/prog", dir.path().display()));
    }

    #[test]
    fn missing_program_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_in(&dir.path().display().to_string(), "no_such_prog").is_none());
    }

    #[test]
    fn empty_path_entry_builds_root_candidate() {
        // An empty PATH component concatenates to "/name"; nothing should
        // resolve for a name that does not exist at the filesystem root.
        assert!(find_in("", "surely_not_a_root_binary").is_none());
    }

    #[test]
    #[cfg(unix)]
    fn scan_collects_builtins_and_executables() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("myprog");
        File::create(&exe).unwrap();
        make_executable(&exe);
        let plain = dir.path().join("notes.txt");
        File::create(&plain).unwrap();
        make_plain(&plain);
        fs::create_dir(dir.path().join("subdir")).unwrap();

        let candidates = scan_in(&dir.path().display().to_string());
        assert!(candidates.contains(&"myprog".to_string()));
        assert!(candidates.contains(&"echo".to_string()));
        assert!(candidates.contains(&"history".to_string()));
        assert!(!candidates.contains(&"notes.txt".to_string()));
        assert!(!candidates.contains(&"subdir".to_string()));
        let mut sorted = candidates.clone();
        sorted.sort();
        assert_eq!(candidates, sorted);
    }

    #[test]
    #[cfg(unix)]
    fn scan_dedupes_by_basename() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        for dir in [&first, &second] {
            let exe = dir.path().join("twice");
            File::create(&exe).unwrap();
            make_executable(&exe);
        }
        let path = format!("{}:{}", first.path().display(), second.path().display());
        let candidates = scan_in(&path);
        assert_eq!(candidates.iter().filter(|c| *c == "twice").count(), 1);
    }
}
