use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("insufficient data: {required} values required, {available} available")]
    InsufficientData { required: usize, available: usize },

    #[error("market data unavailable: {0}")]
    DataUnavailable(String),

    #[error("degenerate computation: {0}")]
    DegenerateComputation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for the length check every indicator performs up front.
    pub fn require(required: usize, available: usize) -> Result<()> {
        if available < required {
            return Err(Error::InsufficientData {
                required,
                available,
            });
        }
        Ok(())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
