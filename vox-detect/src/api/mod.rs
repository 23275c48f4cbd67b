//! HTTP API handlers for vox-detect

pub mod auth;
pub mod health;
pub mod predict;

pub use auth::{auth_middleware, API_KEY_HEADER};
pub use health::{health_routes, not_found};
pub use predict::predict_routes;
