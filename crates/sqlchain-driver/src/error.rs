//! Driver-level error types.

use thiserror::Error;

/// A failure reported by an underlying driver.
///
/// Carries the driver's message plus an optional vendor error code, the same
/// shape most drivers expose through their error-info call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverError {
    /// Vendor-specific error code, when the driver reports one.
    pub code: Option<i32>,
    /// Human-readable message from the driver.
    pub message: String,
}

impl DriverError {
    /// Create a driver error with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    /// Create a driver error with a vendor code.
    pub fn with_code(code: i32, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for DriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for DriverError {}

/// Errors raised while building a [`Config`](crate::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The DSN did not parse as a URL.
    #[error("invalid DSN `{dsn}`: {reason}")]
    InvalidDsn {
        /// The offending DSN text.
        dsn: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A required DSN component is absent.
    #[error("DSN is missing the {field}")]
    MissingField {
        /// Name of the missing component.
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_and_without_code() {
        assert_eq!(DriverError::new("boom").to_string(), "boom");
        assert_eq!(
            DriverError::with_code(1064, "syntax error").to_string(),
            "syntax error (code 1064)"
        );
    }
}
