//! Error types for Folio

use thiserror::Error;

/// Main error type for Folio operations.
///
/// None of these are fatal for the page: a controller that fails to
/// initialize is skipped and the rest keep running.
#[derive(Error, Debug)]
pub enum FolioError {
    /// A selector required by a controller matched nothing
    #[error("Element not found: {selector}")]
    MissingElement { selector: String },

    /// Configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// The platform refused an operation
    #[error("Host error: {0}")]
    Host(String),
}

impl FolioError {
    pub fn missing(selector: impl Into<String>) -> Self {
        FolioError::MissingElement {
            selector: selector.into(),
        }
    }
}

/// Result type alias using FolioError
pub type FolioResult<T> = Result<T, FolioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FolioError::missing(".nav__toggle");
        assert_eq!(format!("{}", err), "Element not found: .nav__toggle");
    }

    #[test]
    fn test_error_from_json() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: FolioError = parse.into();
        assert!(matches!(err, FolioError::InvalidConfig(_)));
        assert!(err.to_string().starts_with("Invalid configuration"));
    }
}
