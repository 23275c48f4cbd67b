//! API module for shared HTTP API functionality
//!
//! # Design Principle
//!
//! This module contains ONLY pure functions and shared types with no HTTP
//! framework dependencies. Each service wraps these with its own (Axum)
//! middleware.

pub mod auth;

pub use auth::{key_fingerprint, validate_api_key, ApiAuthError};
