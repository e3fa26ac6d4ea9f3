//! Cache module - Units held in memory and the directory they persist to
//!
//! Provides:
//! - The insertion-ordered unit cache with dirty flags
//! - The directory store that maps unit identifiers to files

pub mod store;
pub mod units;
