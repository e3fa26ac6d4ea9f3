//! Store configuration
//!
//! Everything the resolver and the libraries need from the environment is
//! gathered here once, so the rest of the crate never reads env vars itself.

use once_cell::sync::Lazy;
use std::path::PathBuf;

/// Marker file whose presence makes a directory a library.
pub const MARKER_FILE: &str = "_NVC_LIB";

/// Environment variable holding extra `:`-separated search directories.
pub const LIBPATH_ENV: &str = "NVC_LIBPATH";

/// Default cap on the number of search candidates.
pub const DEFAULT_MAX_SEARCH_PATHS: usize = 64;

/// Installation data directory, fixed at build time.
pub static DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    PathBuf::from(option_env!("UNITSTORE_DATADIR").unwrap_or("/usr/local/share/unitstore/lib"))
});

/// Configuration shared by a session and every library it opens.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// First search candidate and parent directory for new libraries.
    pub current_dir: PathBuf,

    /// Raw `:`-separated search list, consulted only when searching.
    pub lib_path: Option<String>,

    /// Last search candidate, consulted only when searching.
    pub data_dir: PathBuf,

    /// Upper bound on search candidates; extra entries are dropped.
    pub max_search_paths: usize,

    /// Optional upper bound on cached units per library.
    pub unit_capacity: Option<usize>,

    /// Line written into the marker file of new libraries.
    pub marker_tag: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            current_dir: PathBuf::from("."),
            lib_path: None,
            data_dir: DATA_DIR.clone(),
            max_search_paths: DEFAULT_MAX_SEARCH_PATHS,
            unit_capacity: None,
            marker_tag: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

impl StoreConfig {
    /// Defaults plus the search list from `NVC_LIBPATH`.
    pub fn from_env() -> Self {
        Self {
            lib_path: std::env::var(LIBPATH_ENV).ok(),
            ..Self::default()
        }
    }

    pub fn with_current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = dir.into();
        self
    }

    pub fn with_lib_path(mut self, lib_path: Option<String>) -> Self {
        self.lib_path = lib_path;
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_max_search_paths(mut self, max: usize) -> Self {
        self.max_search_paths = max;
        self
    }

    pub fn with_unit_capacity(mut self, capacity: Option<usize>) -> Self {
        self.unit_capacity = capacity;
        self
    }
}
