//! Error types for the translation backend

use thiserror::Error;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Error)]
pub enum BackendError {
    /// Invalid or incomplete configuration (e.g. no `db_name` and no collection)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failed to create the database client
    #[error("Connection error: {0}")]
    Connection(String),

    /// A find/update/insert against the store failed
    #[error("Backend error: {0}")]
    Backend(String),

    /// A value could not be converted to a storable document value
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A stored document does not have the expected shape
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Query or update operator not supported by the collection
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// One or more languages failed during `create`
    #[error("Create failed for {}", describe_failures(.failures))]
    CreateFailed {
        /// Failed languages paired with their error
        failures: Vec<(String, BackendError)>,
    },
}

fn describe_failures(failures: &[(String, BackendError)]) -> String {
    failures
        .iter()
        .map(|(lang, err)| format!("'{}' ({})", lang, err))
        .collect::<Vec<_>>()
        .join(", ")
}

impl BackendError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a deserialization error
    pub fn deserialization<S: Into<String>>(message: S) -> Self {
        Self::Deserialization(message.into())
    }

    /// Create an unsupported operation error
    pub fn unsupported<S: Into<String>>(message: S) -> Self {
        Self::UnsupportedOperation(message.into())
    }

    /// Languages that failed, if this is a `CreateFailed` error
    pub fn failed_languages(&self) -> Vec<&str> {
        match self {
            BackendError::CreateFailed { failures } => {
                failures.iter().map(|(lang, _)| lang.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

impl From<mongodb::error::Error> for BackendError {
    fn from(err: mongodb::error::Error) -> Self {
        BackendError::Backend(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for BackendError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        BackendError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BackendError::configuration("dbName is required");
        assert_eq!(err.to_string(), "Configuration error: dbName is required");

        let err = BackendError::unsupported("$regex");
        assert_eq!(err.to_string(), "Unsupported operation: $regex");
    }

    #[test]
    fn test_create_failed_lists_languages() {
        let err = BackendError::CreateFailed {
            failures: vec![
                ("de".to_string(), BackendError::Backend("timeout".to_string())),
                ("fr".to_string(), BackendError::Backend("refused".to_string())),
            ],
        };

        assert_eq!(err.failed_languages(), vec!["de", "fr"]);
        let message = err.to_string();
        assert!(message.contains("'de' (Backend error: timeout)"));
        assert!(message.contains("'fr' (Backend error: refused)"));
    }

    #[test]
    fn test_failed_languages_empty_for_other_errors() {
        let err = BackendError::Connection("no route".to_string());
        assert!(err.failed_languages().is_empty());
    }
}
