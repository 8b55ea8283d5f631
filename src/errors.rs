// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Only [`SsmRunError::Dispatch`], [`SsmRunError::PollQuery`] and, when the
//! run is raced against an interrupt, [`SsmRunError::Interrupted`] escape the
//! lifecycle controller. `LogFetch`, `Cancel` and `Handoff` are
//! produced by the collaborators but caught at the call site and turned into
//! diagnostics.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SsmRunError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to send command: {0}")]
    Dispatch(String),

    #[error("Failed to query command status: {0}")]
    PollQuery(String),

    #[error("Unable to fetch from s3://{bucket}/{key}: {message}")]
    LogFetch {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("Failed to cancel command: {0}")]
    Cancel(String),

    #[error("Handoff store error: {0}")]
    Handoff(String),

    #[error("Interrupted before the remote command finished")]
    Interrupted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SsmRunError>;
