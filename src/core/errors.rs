use thiserror::Error;

/// Errors raised by the crate itself.
///
/// Failures reported by units of work never pass through this type; they are
/// returned to the caller unchanged.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Validation errors
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
        expected: Option<String>,
        actual: Option<String>,
    },

    /// Serialization errors
    #[error("Serialization failed: {format}")]
    Serialization {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl FlowError {
    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a validation error with field
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            field: None,
            expected: None,
            actual: None,
        }
    }

    /// Create a configuration error naming the offending field
    pub fn configuration_field<S: Into<String>, F: Into<String>>(
        message: S,
        field: F,
        expected: Option<String>,
        actual: Option<String>,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            field: Some(field.into()),
            expected,
            actual,
        }
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        format: S,
        source: E,
    ) -> Self {
        Self::Serialization {
            format: format.into(),
            source: Box::new(source),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Configuration { .. } => "configuration",
            Self::Serialization { .. } => "serialization",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, FlowError>;

impl From<serde_json::Error> for FlowError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization("json", err)
    }
}

impl From<serde_yaml::Error> for FlowError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::serialization("yaml", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = FlowError::validation("duplicate key");
        assert!(matches!(err, FlowError::Validation { field: None, .. }));
        assert_eq!(err.category(), "validation");
        assert_eq!(err.to_string(), "Validation failed: duplicate key");

        let err = FlowError::configuration("no flows defined");
        assert!(matches!(
            err,
            FlowError::Configuration {
                field: None,
                expected: None,
                actual: None,
                ..
            }
        ));
        assert_eq!(err.category(), "configuration");
        assert_eq!(err.to_string(), "Configuration error: no flows defined");
    }

    #[test]
    fn test_field_errors() {
        let err = FlowError::validation_field("duplicate key", "a");
        if let FlowError::Validation { field, .. } = err {
            assert_eq!(field.as_deref(), Some("a"));
        } else {
            panic!("Expected validation error");
        }

        let err = FlowError::configuration_field(
            "name must not be empty",
            "name",
            Some("non-empty string".to_string()),
            Some(String::new()),
        );
        assert_eq!(err.category(), "configuration");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: FlowError = json_err.into();
        assert_eq!(err.category(), "serialization");
        assert!(std::error::Error::source(&err).is_some());
    }
}
