//! Error types and handling for the CLI
//!
//! Every failure ends the process with exit code 1 after one line on
//! stderr.

use crate::credentials::CredentialsError;
use icann_client::ConfigError;
use std::io;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error from the ICANN client library
    #[error(transparent)]
    Client(#[from] icann_client::Error),

    /// Flags and credentials do not form a valid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    /// IO error (writing output, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// A follow-up line telling the user how to fix the input, if any
    pub fn hint(&self) -> Option<&'static str> {
        match self.config_error()? {
            ConfigError::TldRequired => {
                Some("provide --tld, set tld in the credentials profile, or use a profile named after the TLD")
            }
            ConfigError::UsernameRequired | ConfigError::PasswordRequired => {
                Some("provide --username/--password or set them in the credentials profile")
            }
            ConfigError::CertificateRequired | ConfigError::KeyRequired => {
                Some("provide --cert-pem/--key-pem or set certificate_pem/key_pem in the credentials profile")
            }
            _ => None,
        }
    }

    fn config_error(&self) -> Option<ConfigError> {
        match self {
            Error::Config(err) => Some(*err),
            Error::Client(err) => err.as_config(),
            _ => None,
        }
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    let mut message = if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    };

    if let Some(hint) = error.hint() {
        message.push_str("\n  hint: ");
        message.push_str(hint);
    }
    message
}
