//! Error types for wave field simulation.

use thiserror::Error;

/// Result type for wavegrid operations.
pub type Result<T> = std::result::Result<T, WaveGridError>;

/// Errors that can occur while building or driving a wave field.
///
/// Every error is raised synchronously by the call that detected it and
/// leaves the field exactly as it was before that call.
#[derive(Error, Debug)]
pub enum WaveGridError {
    /// Invalid dimensions or physical parameters.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Cell coordinates outside `[0, width) x [0, height)`.
    #[error("Cell ({x}, {y}) is outside the {width}x{height} grid")]
    IndexOutOfBounds {
        /// Requested column.
        x: i64,
        /// Requested row.
        y: i64,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },

    /// Malformed pressure trace text.
    #[error("Trace error: {0}")]
    Trace(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WaveGridError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a trace parsing error.
    pub fn trace(msg: impl Into<String>) -> Self {
        Self::Trace(msg.into())
    }

    /// Create an out-of-bounds error for the given coordinates.
    pub fn out_of_bounds(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self::IndexOutOfBounds {
            x,
            y,
            width,
            height,
        }
    }

    /// True if this is an out-of-bounds access.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::IndexOutOfBounds { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_message() {
        let err = WaveGridError::out_of_bounds(-1, 0, 8, 4);
        assert!(err.is_out_of_bounds());
        assert_eq!(err.to_string(), "Cell (-1, 0) is outside the 8x4 grid");
    }

    #[test]
    fn test_config_error() {
        let err = WaveGridError::config("width must be positive");
        assert!(!err.is_out_of_bounds());
        assert_eq!(
            err.to_string(),
            "Configuration error: width must be positive"
        );
    }
}
