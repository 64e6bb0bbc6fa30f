use thiserror::Error;

/// Result type for dexa operations
pub type Result<T> = std::result::Result<T, DexaError>;

/// Error types for dexa operations
#[derive(Error, Debug)]
pub enum DexaError {
    /// Input table could not be read at all
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Zero, negative or non-finite value where a ratio needs a positive one
    #[error("Invalid measurement: {0}")]
    InvalidMeasurement(String),

    /// Zero-valued first sample in trend classification
    #[error("Invalid baseline: {0}")]
    InvalidBaseline(String),

    /// Body part outside the known button universe
    #[error("Unknown selection: {0}")]
    UnknownSelection(String),

    /// Event payload that could not be decoded
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// Patient or selection with no matching rows
    #[error("No data: {0}")]
    NoData(String),

    /// Unparseable field value
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Bad configuration
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DexaError {
    /// Message shown to the user in place of the failed widget
    ///
    /// Derivation errors never abort a session; the presentation layer
    /// renders this text instead.
    pub fn user_message(&self) -> &'static str {
        match self {
            DexaError::InvalidBaseline(_) => "Insufficient data",
            DexaError::UnknownSelection(_) | DexaError::InvalidEvent(_) => {
                "Unrecognized selection"
            }
            DexaError::Config(_) => "Configuration error",
            DexaError::DataUnavailable(_)
            | DexaError::InvalidMeasurement(_)
            | DexaError::NoData(_)
            | DexaError::InvalidValue(_)
            | DexaError::IoError(_) => "No data available",
        }
    }
}

impl From<chrono::ParseError> for DexaError {
    fn from(e: chrono::ParseError) -> Self {
        DexaError::InvalidValue(format!("{}", e))
    }
}

impl From<serde_json::Error> for DexaError {
    fn from(e: serde_json::Error) -> Self {
        DexaError::InvalidEvent(format!("{}", e))
    }
}
