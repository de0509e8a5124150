//! Centralized error types for LazyTable.
//!
//! This module provides a unified error hierarchy for the application with
//! user-friendly error messages. The table core itself never fails; errors
//! only come from loading configuration and data, and from the terminal.

use thiserror::Error;

use crate::config::ConfigError;
use crate::data::DataError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Record loading errors.
    #[error("{0}")]
    Data(#[from] DataError),

    /// IO errors (file system, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal-related errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Generic errors with a message.
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Create a terminal error.
    pub fn terminal(msg: impl Into<String>) -> Self {
        AppError::Terminal(msg.into())
    }

    /// Create a generic error.
    pub fn other(msg: impl Into<String>) -> Self {
        AppError::Other(msg.into())
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::CreateDirError(_) => {
                    "Could not create configuration directory. Check file permissions.".to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read configuration file. Please check it is readable.".to_string()
                }
                ConfigError::WriteError(_) => {
                    "Could not save configuration. Please check file permissions.".to_string()
                }
                ConfigError::ParseError(_) => {
                    "Configuration file is invalid. Please check the file format.".to_string()
                }
                ConfigError::SerializeError(_) => {
                    "Could not save configuration. Internal error.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
            },
            AppError::Data(e) => match e {
                DataError::Read(_) => {
                    "Could not read the data file. Please check the path.".to_string()
                }
                DataError::Parse(_) => "The data file is not valid JSON.".to_string(),
                DataError::NotAnArray => {
                    "The data file must contain a JSON array of records.".to_string()
                }
                DataError::NotAnObject { index } => {
                    format!("Record {} in the data file is not an object.", index)
                }
            },
            AppError::Io(_) => {
                "A file operation failed. Please check file permissions.".to_string()
            }
            AppError::Terminal(msg) => format!("Terminal error: {}", msg),
            AppError::Other(msg) => msg.clone(),
        }
    }

    /// Check if this error prevents the application from starting.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            AppError::Config(_) | AppError::Data(_) | AppError::Terminal(_)
        )
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Config(ConfigError::ParseError(_))
            | AppError::Config(ConfigError::ValidationError(_)) => {
                Some("Fix the configuration file or pass --config with another path.")
            }
            AppError::Data(DataError::Read(_)) => {
                Some("Pass --data with the path of an existing JSON file.")
            }
            AppError::Data(DataError::NotAnArray)
            | AppError::Data(DataError::NotAnObject { .. }) => {
                Some("Wrap the records in a top-level JSON array of objects.")
            }
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_from_config_error() {
        let app_err: AppError = ConfigError::NoConfigDir.into();
        assert!(matches!(
            app_err,
            AppError::Config(ConfigError::NoConfigDir)
        ));
    }

    #[test]
    fn test_app_error_from_data_error() {
        let app_err: AppError = DataError::NotAnArray.into();
        assert!(matches!(app_err, AppError::Data(DataError::NotAnArray)));
    }

    #[test]
    fn test_user_message_config_validation() {
        let err = AppError::Config(ConfigError::ValidationError(
            "breakpoints must increase".to_string(),
        ));
        assert!(err.user_message().contains("breakpoints must increase"));
    }

    #[test]
    fn test_user_message_not_an_object() {
        let err = AppError::Data(DataError::NotAnObject { index: 4 });
        let msg = err.user_message();
        assert!(msg.contains("Record 4"));
        assert!(msg.contains("not an object"));
    }

    #[test]
    fn test_is_critical() {
        assert!(AppError::Config(ConfigError::NoConfigDir).is_critical());
        assert!(AppError::Data(DataError::NotAnArray).is_critical());
        assert!(AppError::terminal("no tty").is_critical());
        assert!(!AppError::other("minor").is_critical());
    }

    #[test]
    fn test_suggested_action_data() {
        let err = AppError::Data(DataError::NotAnArray);
        assert!(err.suggested_action().unwrap().contains("array"));
        assert!(AppError::other("x").suggested_action().is_none());
    }

    #[test]
    fn test_terminal_error() {
        let err = AppError::terminal("test error");
        assert!(matches!(err, AppError::Terminal(_)));
        assert_eq!(err.user_message(), "Terminal error: test error");
    }

    #[test]
    fn test_other_error() {
        let err = AppError::other("something went wrong");
        assert_eq!(err.user_message(), "something went wrong");
    }
}
