//! Error types for the Telegram profile controller

use thiserror::Error;

/// Result type alias for Telegram operations
pub type Result<T> = std::result::Result<T, TelegramError>;

/// Errors that can occur while driving the Telegram account
#[derive(Debug, Error)]
pub enum TelegramError {
    /// The API id from the configuration is not a number
    #[error("Invalid Telegram API id: {0}")]
    InvalidApiId(String),

    /// Connection to the Telegram servers failed
    #[error("Telegram connection failed: {0}")]
    Connect(String),

    /// The phone number has no account and the server asks for a sign-up
    #[error("Signing up new Telegram accounts is not supported")]
    SignUpNotSupported,

    /// The server asks to accept new terms of service
    #[error("Accepting Telegram terms of service is not supported")]
    TermsOfServiceNotSupported,

    /// Login refused (bad code, bad password, flood wait, ...)
    #[error("Telegram authorization failed: {0}")]
    Auth(String),

    /// A remote call failed
    #[error("Telegram call {operation} failed: {message}")]
    Invocation {
        operation: &'static str,
        message: String,
    },

    /// Reading or writing the session file failed
    #[error("Telegram session I/O error: {0}")]
    Session(#[source] std::io::Error),

    /// Reading the operator's answer failed
    #[error("Cannot read operator input: {0}")]
    Prompt(#[source] std::io::Error),

    /// Operation requires a completed authentication
    #[error("Telegram client is not authenticated")]
    NotAuthenticated,

    /// Generic error
    #[error("{0}")]
    Other(String),
}
