//! Session seam between the sync engine and the IMAP transport.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::imap::error::Result;
use crate::imap::{MailSession, MessageRecord};

/// The server operations the migration engine drives.
///
/// [`MailSession`] is the production implementation; tests substitute
/// scripted stores to exercise the engine without a live server.
#[async_trait]
pub trait MailStore: Send {
    /// Names of the selectable mailboxes matching `pattern`, in server order.
    async fn list_mailboxes(&mut self, pattern: &str) -> Result<Vec<String>>;

    /// Selects a mailbox read-only and returns its message count.
    async fn examine(&mut self, mailbox: &str) -> Result<u32>;

    /// Selects a mailbox read-write and returns its message count.
    async fn select(&mut self, mailbox: &str) -> Result<u32>;

    /// Creates a mailbox.
    async fn create(&mut self, mailbox: &str) -> Result<()>;

    /// Fetches the given sequence set from the selected mailbox, forwarding
    /// records through `records` in arrival order.
    async fn fetch_batch(
        &mut self,
        sequence_set: &str,
        records: &mpsc::Sender<MessageRecord>,
    ) -> Result<()>;

    /// Whether the selected mailbox holds a message with this `Message-ID`.
    async fn message_id_exists(&mut self, message_id: &str) -> Result<bool>;

    /// Appends raw message bytes, preserving flags and internal date when given.
    async fn append(
        &mut self,
        mailbox: &str,
        flags: Option<&str>,
        internal_date: Option<&str>,
        body: &[u8],
    ) -> Result<()>;
}

#[async_trait]
impl MailStore for MailSession {
    async fn list_mailboxes(&mut self, pattern: &str) -> Result<Vec<String>> {
        MailSession::list_mailboxes(self, pattern).await
    }

    async fn examine(&mut self, mailbox: &str) -> Result<u32> {
        MailSession::examine(self, mailbox).await
    }

    async fn select(&mut self, mailbox: &str) -> Result<u32> {
        MailSession::select(self, mailbox).await
    }

    async fn create(&mut self, mailbox: &str) -> Result<()> {
        MailSession::create(self, mailbox).await
    }

    async fn fetch_batch(
        &mut self,
        sequence_set: &str,
        records: &mpsc::Sender<MessageRecord>,
    ) -> Result<()> {
        MailSession::fetch_batch(self, sequence_set, records).await
    }

    async fn message_id_exists(&mut self, message_id: &str) -> Result<bool> {
        MailSession::message_id_exists(self, message_id).await
    }

    async fn append(
        &mut self,
        mailbox: &str,
        flags: Option<&str>,
        internal_date: Option<&str>,
        body: &[u8],
    ) -> Result<()> {
        MailSession::append(self, mailbox, flags, internal_date, body).await
    }
}
