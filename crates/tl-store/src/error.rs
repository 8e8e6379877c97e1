//! Error types for store access.

use crate::types::ProcessId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {message}")]
    Unavailable { message: String },

    #[error("Failed to read store file {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write store file {path}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to lock store file {path}")]
    Lock {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed store contents: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed value for process {process} tag {tag}: {value}")]
    Malformed {
        process: ProcessId,
        tag: String,
        value: String,
    },

    #[error("Refusing to write non-finite value {value} to process {process} tag {tag}")]
    NonFinite {
        process: ProcessId,
        tag: String,
        value: f64,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;
