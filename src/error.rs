use thiserror::Error;

/// Failure kinds of a single banding computation.
///
/// Every variant is terminal for the request: the core never retries and never
/// returns a partially computed series.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BandError {
    /// The data provider could not deliver a history (unknown ticker, network, bad payload).
    #[error("data unavailable: {0}")]
    DataUnavailable(String),
    /// No dividend records survive the warm-up year after the first payment.
    #[error("insufficient history: need more than one year of dividends after the first payment")]
    InsufficientHistory,
    /// Fewer than two rows remain once the series is trimmed to the first known dividend.
    #[error("insufficient data: fewer than 2 priced rows with a known trailing dividend")]
    InsufficientData,
}

impl BandError {
    /// Process exit code used by the CLI for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            BandError::DataUnavailable(_) => 4,
            BandError::InsufficientHistory | BandError::InsufficientData => 3,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<BandError> for AppError {
    fn from(err: BandError) -> Self {
        Self::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
