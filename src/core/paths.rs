//! Search path construction and library directory probing
//!
//! Candidate order is fixed: the current directory, then every entry of the
//! configured search list, then the installation data directory.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::core::config::{StoreConfig, MARKER_FILE};
use crate::core::ident::lib_dir_name;

/// Append `path` unless the list already holds `max` entries.
fn push_path(paths: &mut Vec<PathBuf>, path: impl Into<PathBuf>, max: usize) {
    if paths.len() < max {
        paths.push(path.into());
    }
}

/// Ordered candidate directories for a lookup.
pub fn search_candidates(config: &StoreConfig, search: bool) -> Vec<PathBuf> {
    let max = config.max_search_paths;
    let mut paths = Vec::new();

    push_path(&mut paths, &config.current_dir, max);

    if search {
        if let Some(lib_path) = &config.lib_path {
            for token in lib_path.split(':').filter(|t| !t.is_empty()) {
                push_path(&mut paths, token, max);
            }
        }
        push_path(&mut paths, &config.data_dir, max);
    }

    paths
}

/// Directory a library named `name` would occupy under `parent`.
pub fn library_dir(parent: &Path, name: &str) -> PathBuf {
    parent.join(lib_dir_name(name))
}

/// Location of the marker file inside a library directory.
pub fn marker_path(dir: &Path) -> PathBuf {
    dir.join(MARKER_FILE)
}

/// Return the library directory for `name` under `candidate`, if it exists
/// and carries a marker file.
pub fn probe(candidate: &Path, name: &str) -> Option<PathBuf> {
    let dir = library_dir(candidate, name);
    if !dir.exists() {
        tracing::debug!("probe {}: no such directory", dir.display());
        return None;
    }
    if !marker_path(&dir).exists() {
        tracing::debug!("probe {}: missing {}", dir.display(), MARKER_FILE);
        return None;
    }
    Some(dir)
}

/// Check if a directory entry name is hidden (starts with '.')
///
/// Works on raw names so entries that are not valid UTF-8 are classified too.
pub fn is_hidden(name: impl AsRef<OsStr>) -> bool {
    name.as_ref().as_encoded_bytes().first() == Some(&b'.')
}

/// A name that maps to exactly one entry directly inside a directory.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('\0')
        && !name.chars().any(std::path::is_separator)
}

/// Hidden entries and store bookkeeping files (`_` prefix) are not units.
pub fn is_reserved(name: &str) -> bool {
    is_hidden(name) || name.starts_with('_')
}
