//! Test Helper Utilities
//!
//! Shared utilities for testing vox-detect

// Each test binary uses a different subset of these helpers
#![allow(dead_code)]

pub mod audio_generator;
pub mod test_app;

#[allow(unused_imports)]
pub use audio_generator::{generate_test_wav, wav_base64, wav_bytes, AudioConfig};
#[allow(unused_imports)]
pub use test_app::{post_predict, spawn_audio_server, test_app, test_app_with_limit, TEST_API_KEY};
