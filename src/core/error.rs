//! Error types for voxgen

use thiserror::Error;

/// Main error type for the generator.
///
/// Generation itself never fails; only configuration loading and
/// validation surface errors, before any voxel is written.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),
}
