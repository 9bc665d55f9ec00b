use std::fmt;

/// Result type for sandbox operations
pub type Result<T> = std::result::Result<T, SandboxError>;

/// Main error type for the sandbox library
#[derive(Debug, Clone, PartialEq)]
pub enum SandboxError {
    /// Invalid parameter value
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Invalid dimensions for operations
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// A cell outside the board was referenced
    OutOfBounds {
        row: isize,
        col: isize,
    },

    /// The value-weighted policy found no neighbour with a positive value
    NoPositiveNeighbor {
        row: isize,
        col: isize,
    },

    /// Numerical computation errors
    NumericalError(String),

    /// IO errors (file operations)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),
}

impl fmt::Display for SandboxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SandboxError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            SandboxError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, actual)
            }
            SandboxError::OutOfBounds { row, col } => {
                write!(f, "Cell ({}, {}) lies outside the board", row, col)
            }
            SandboxError::NoPositiveNeighbor { row, col } => {
                write!(f, "No neighbour of ({}, {}) has a positive value", row, col)
            }
            SandboxError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            SandboxError::IoError(msg) => write!(f, "IO error: {}", msg),
            SandboxError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for SandboxError {}

// Conversion from std::io::Error
impl From<std::io::Error> for SandboxError {
    fn from(err: std::io::Error) -> Self {
        SandboxError::IoError(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SandboxError {
    fn from(err: serde_json::Error) -> Self {
        SandboxError::SerializationError(err.to_string())
    }
}

// Helper functions for common error patterns
impl SandboxError {
    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        SandboxError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        SandboxError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SandboxError::invalid_parameter("num_arms", "must be at least 1");
        assert_eq!(err.to_string(), "Invalid parameter 'num_arms': must be at least 1");

        let err = SandboxError::NoPositiveNeighbor { row: 2, col: 3 };
        assert_eq!(err.to_string(), "No neighbour of (2, 3) has a positive value");
    }

    #[test]
    fn test_from_serde_json() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err: SandboxError = parse.unwrap_err().into();
        assert!(matches!(err, SandboxError::SerializationError(_)));
    }
}
