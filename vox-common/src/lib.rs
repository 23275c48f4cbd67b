//! # Vox Common Library
//!
//! Shared code for the vox services including:
//! - Error types
//! - Configuration loading (TOML file discovery, compiled defaults)
//! - Framework-independent API authentication helpers

pub mod api;
pub mod config;
pub mod error;

pub use error::{Error, Result};
