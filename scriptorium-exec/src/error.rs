use thiserror::Error;

/// Faults that stop a request before or outside normal program output.
///
/// Compile errors, runtime errors and timeouts are not in here: those are
/// expected, user-caused outcomes and live in [`crate::Outcome`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("Language not supported: {0}")]
    UnsupportedLanguage(String),

    #[error("Invalid source: {0}")]
    InvalidSource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal fault: {0}")]
    Internal(String),

    #[error("Execution service is shutting down")]
    CapacityClosed,
}
