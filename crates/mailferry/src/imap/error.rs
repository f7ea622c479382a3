//! IMAP transport error types.

use thiserror::Error;

/// Errors that can occur while talking to an IMAP server.
#[derive(Error, Debug)]
pub enum ImapError {
    /// Failed to establish the TCP connection.
    #[error("IMAP connection failed: {0}")]
    ConnectionFailed(String),

    /// The server address could not be resolved.
    #[error("Invalid server address '{0}'")]
    InvalidAddress(String),

    /// TLS/SSL error during connection.
    #[error("TLS error: {0}")]
    TlsError(String),

    /// Plaintext transport was configured; only TLS is supported.
    #[error("TLS is required for IMAP connections")]
    TlsRequired,

    /// LOGIN was rejected.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Any other IMAP command failure.
    #[error("IMAP protocol error: {0}")]
    Protocol(String),
}

impl From<async_native_tls::Error> for ImapError {
    fn from(err: async_native_tls::Error) -> Self {
        ImapError::TlsError(err.to_string())
    }
}

/// Result type for IMAP operations.
pub type Result<T> = std::result::Result<T, ImapError>;
