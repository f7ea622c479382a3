//! Synchronization error types.

use thiserror::Error;

use crate::imap::ImapError;

/// Errors raised while migrating mailboxes.
///
/// Only `Enumeration` is fatal to a run; everything else is scoped to the
/// mailbox it names and the driver continues with the next one. Dedup search
/// failures are deliberately absent: a failed search is treated as "not a
/// duplicate" and at most logged.
#[derive(Error, Debug)]
pub enum SyncError {
    /// LIST on the source account failed; without a mailbox list there is
    /// nothing to migrate.
    #[error("Failed to list mailboxes: {0}")]
    Enumeration(#[source] ImapError),

    /// Selecting a source or destination mailbox failed.
    #[error("Failed to select mailbox '{mailbox}': {source}")]
    Selection {
        mailbox: String,
        #[source]
        source: ImapError,
    },

    /// Creating the destination mailbox failed after a failed selection.
    #[error("Failed to create destination mailbox '{mailbox}': {source}")]
    Creation {
        mailbox: String,
        #[source]
        source: ImapError,
    },

    /// The batch fetch completion signal carried an error.
    #[error("Batch fetch failed in mailbox '{mailbox}': {source}")]
    Fetch {
        mailbox: String,
        #[source]
        source: ImapError,
    },

    /// Appending a message to the destination failed.
    #[error("Failed to append message to '{mailbox}': {source}")]
    Append {
        mailbox: String,
        #[source]
        source: ImapError,
    },

    /// The source session was lost by a fetch task that never reported back.
    #[error("Source session was lost by an aborted fetch task")]
    SessionLost,
}

/// Result type for synchronization operations.
pub type Result<T> = std::result::Result<T, SyncError>;
