//! Error types for the library store

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::ident::Ident;
use crate::library::registry::LibraryId;
use crate::unit::frame::CodecError;

/// How an error should be treated by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Reported to the user; the session stays usable.
    User,
    /// The caller broke an API contract.
    Invariant,
    /// The backing store of an established library is gone.
    Fatal,
}

#[derive(Debug, Error)]
pub enum LibError {
    #[error("file {} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("library {0} is already open")]
    AlreadyOpen(Ident),

    #[error("failed to create library directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid unit name {0:?}: must be a single file name")]
    InvalidName(String),

    #[error("library {name} not found in {} location(s)", .searched.len())]
    NotFound { name: String, searched: Vec<PathBuf> },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unit file {}: {source}", .path.display())]
    Codec {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("no open library for handle {0:?}")]
    UnknownLibrary(LibraryId),

    #[error("unit cache of library {library} is full ({capacity} units)")]
    CacheFull { library: Ident, capacity: usize },

    #[error("no work library has been set")]
    NoWorkLibrary,

    #[error("{}: {source}", .path.display())]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LibError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LibError::AlreadyExists(_)
            | LibError::AlreadyOpen(_)
            | LibError::CreateDir { .. }
            | LibError::InvalidName(_)
            | LibError::NotFound { .. }
            | LibError::Io { .. }
            | LibError::Codec { .. } => ErrorCategory::User,
            LibError::UnknownLibrary(_) | LibError::CacheFull { .. } | LibError::NoWorkLibrary => {
                ErrorCategory::Invariant
            }
            LibError::StoreUnavailable { .. } => ErrorCategory::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.category() == ErrorCategory::Fatal
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LibError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Process exit code for an error category.
pub fn to_exit_code(category: ErrorCategory) -> i32 {
    match category {
        ErrorCategory::User => 1,
        ErrorCategory::Invariant => 2,
        ErrorCategory::Fatal => 3,
    }
}

pub type Result<T, E = LibError> = std::result::Result<T, E>;
