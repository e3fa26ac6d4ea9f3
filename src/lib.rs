//! unitstore - library and unit store for a compiler toolchain
//!
//! A library is a directory of serialized compilation units, one file per
//! unit, tagged with a `_NVC_LIB` marker file. A [`Session`] resolves library
//! names through the search path, keeps every open library in its registry,
//! and serves units through a per-library cache that loads from disk on a
//! miss and writes back only what changed.
//!
//! ```no_run
//! use unitstore::{DesignUnit, FindOptions, Session, StoreConfig, UnitKind};
//!
//! # fn main() -> unitstore::Result<()> {
//! let mut session: Session<DesignUnit> = Session::new(StoreConfig::from_env());
//! let work = session.new_library("work")?;
//! session.set_work(work)?;
//!
//! let lib = session.library_mut(work)?;
//! lib.put(DesignUnit::new("WORK.TOP", UnitKind::Entity))?;
//! lib.save()?;
//!
//! let ieee = session.find("ieee", FindOptions { verbose: true, search: true })?;
//! # let _ = ieee;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod core;
pub mod library;
pub mod unit;

pub use crate::cache::store::{DestroyReport, OpenMode};
pub use crate::core::config::StoreConfig;
pub use crate::core::error::{ErrorCategory, LibError, Result};
pub use crate::core::ident::{lib_dir_name, upcase_name, Ident};
pub use crate::library::registry::LibraryId;
pub use crate::library::session::{FindOptions, Resolution, Session};
pub use crate::library::Library;
pub use crate::unit::{DesignUnit, Unit, UnitKind};
