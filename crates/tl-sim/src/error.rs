//! Error types for simulation operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors encountered while configuring or running the simulation.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid configuration: {what}")]
    InvalidConfig { what: &'static str },

    #[error("Failed to read configuration file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("State store error: {0}")]
    Store(#[from] tl_store::StoreError),

    #[error("Hydraulics error: {0}")]
    Hydraulics(#[from] tl_hydraulics::HydraulicsError),
}

pub type SimResult<T> = Result<T, SimError>;
