//! IMAP transport layer.
//!
//! Establishes authenticated TLS sessions and exposes the handful of
//! protocol operations the migration engine needs: LIST, EXAMINE/SELECT,
//! CREATE, batched FETCH, header SEARCH, and APPEND.

pub mod client;
pub mod error;
pub mod message;

pub use client::{connect, Credentials, MailSession};
pub use error::ImapError;
pub use message::{append_flags, format_internal_date, MessageFlag, MessageRecord};
