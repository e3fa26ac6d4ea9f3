//! Core module - Names, configuration, errors and output model
//!
//! This module provides:
//! - Identifier interning and library name normalization
//! - Store configuration
//! - Error types
//! - Search path construction
//! - Result model and rendering for the command-line front end

pub mod config;
pub mod error;
pub mod ident;
pub mod model;
pub mod paths;
pub mod render;
