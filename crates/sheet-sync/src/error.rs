//! Error types for the sync run.
//!
//! Only setup failures surface as [`SyncError`]; everything that can go wrong
//! for a single message is handled inside the per-item loop and never escapes
//! it.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort a run before any message is processed
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration file missing, unreadable or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// OAuth flow or service client construction failed
    #[error("Authentication failed: {0}")]
    Auth(#[source] anyhow::Error),

    /// The header row could not be checked or written
    #[error("Failed to set up sheet headers: {0}")]
    HeaderSetup(#[source] anyhow::Error),
}

impl SyncError {
    /// Create a config error with a custom message
    pub fn config(message: impl Into<String>) -> Self {
        SyncError::Config(message.into())
    }
}

/// Failures of the processed-id log
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read state file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write state file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
