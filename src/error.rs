//! Error types for the analytics pipeline

use thiserror::Error;

/// Errors that can occur while computing portfolio analytics
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// Malformed table, non-positive price, missing benchmark, too few rows/columns
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Weight vector length does not match the number of asset columns
    #[error("Dimension mismatch: expected {expected} weights, got {got}")]
    DimensionMismatch {
        expected: usize,
        got: usize,
    },

    /// Weights do not sum to 1.0 within tolerance, or contain negative values
    #[error("Weight normalization error: {0}")]
    WeightNormalization(String),

    /// Zero volatility where a ratio was requested
    #[error("Division undefined: {0}")]
    DivisionUndefined(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_message() {
        let err = AnalyticsError::DimensionMismatch { expected: 3, got: 2 };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 3 weights, got 2");
    }

    #[test]
    fn test_yaml_error_conversion() {
        let parse: std::result::Result<Vec<f64>, _> = serde_yaml::from_str("[1.0, oops");
        let err: AnalyticsError = parse.unwrap_err().into();
        assert!(matches!(err, AnalyticsError::YamlError(_)));
    }
}
