//! Error type for the command line front end.

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Simulation error: {0}")]
    Sim(#[from] tl_sim::SimError),

    #[error("State store error: {0}")]
    Store(#[from] tl_store::StoreError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type CliResult<T> = Result<T, CliError>;
