//! Custom error types for tvmaze-browser.
//!
//! Transport and decoding failures are kept apart in [`AppError`] so they can
//! be logged precisely, while [`FetchFailure`] carries the single generic
//! message the user sees for a failed load.

use std::error::Error;
use std::fmt;
use std::io;

/// Application error types.
#[derive(Debug)]
pub enum AppError {
    /// Request never produced a response (DNS, connect, timeout, ...)
    Network(String),
    /// Server answered with a non-success status code
    Status(u16),
    /// Response body could not be decoded
    Parse(String),
    /// Configuration errors
    Config(String),
    /// File I/O errors
    Io(io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Status(code) => write!(f, "HTTP status {}", code),
            AppError::Parse(msg) => write!(f, "Parse error: {}", msg),
            AppError::Config(msg) => write!(f, "Config error: {}", msg),
            AppError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Io(err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            AppError::Status(status.as_u16())
        } else if err.is_decode() {
            AppError::Parse(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;

/// What a failed request was trying to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    /// The full show catalog
    Shows,
    /// The episode list of one show
    Episodes(u32),
}

/// A failed gateway request.
#[derive(Debug)]
pub struct FetchFailure {
    pub target: FetchTarget,
    pub cause: AppError,
}

impl FetchFailure {
    pub fn new(target: FetchTarget, cause: AppError) -> Self {
        Self { target, cause }
    }

    /// Banner text shown to the user. Deliberately independent of the cause.
    pub fn user_message(&self) -> &'static str {
        match self.target {
            FetchTarget::Shows => "Failed to load shows. Please try again later.",
            FetchTarget::Episodes(_) => "Failed to load episodes. Please try again later.",
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            FetchTarget::Shows => write!(f, "fetching shows failed: {}", self.cause),
            FetchTarget::Episodes(id) => {
                write!(f, "fetching episodes for show {} failed: {}", id, self.cause)
            }
        }
    }
}

impl Error for FetchFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "Network error: connection refused");
        assert_eq!(AppError::Status(503).to_string(), "HTTP status 503");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        let app_err: AppError = json_err.into();
        assert!(matches!(app_err, AppError::Parse(_)));
    }

    #[test]
    fn test_user_message_ignores_cause() {
        let network = FetchFailure::new(
            FetchTarget::Episodes(5),
            AppError::Network("timed out".to_string()),
        );
        let status = FetchFailure::new(FetchTarget::Episodes(5), AppError::Status(404));
        assert_eq!(network.user_message(), status.user_message());
        assert_ne!(network.to_string(), status.to_string());
    }

    #[test]
    fn test_fetch_failure_display_names_show() {
        let failure = FetchFailure::new(FetchTarget::Episodes(42), AppError::Status(500));
        assert!(failure.to_string().contains("show 42"));
        assert!(failure.to_string().contains("500"));
    }
}
