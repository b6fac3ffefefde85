//! Error types for the hand-control library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Landmark input had the wrong shape (missing points, bad count)
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A screen mapping was requested before a transform was fit
    #[error("Not calibrated")]
    NotCalibrated,

    /// The supplied correspondence points cannot determine a transform
    #[error("Degenerate calibration: {0}")]
    DegenerateCalibration(String),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Smoother initialization or processing error
    #[error("Filter error: {0}")]
    Filter(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Calibration persistence error
    #[error("Calibration store error: {0}")]
    CalibrationStore(String),

    /// Action dispatch layer failure
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
