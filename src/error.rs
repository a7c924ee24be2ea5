use thiserror::Error;

/// Crate-level error type for the few seams where callers dispatch on the
/// failure kind. Internal plumbing uses `anyhow` and converts at the boundary.
#[derive(Debug, Error)]
pub enum PulseError {
    #[error("prediction transport failed: {0}")]
    Cloud(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("audit log error: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PulseError>;
