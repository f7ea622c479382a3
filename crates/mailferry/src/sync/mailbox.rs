//! Per-mailbox synchronization.
//!
//! One mailbox moves through `Selecting -> (Empty | Preparing) ->
//! Paginating -> Completed`, falling into `Failed` from any non-terminal
//! state. Failure is mailbox-scoped: partial counts survive and the caller
//! decides whether to continue with the next mailbox.

use tracing::{info, warn};

use crate::imap::{append_flags, format_internal_date, MailSession, MessageRecord};

use super::batch::batch_ranges;
use super::dedup::message_exists;
use super::error::{Result, SyncError};
use super::fetch::BatchFetch;
use super::folders::resolve_folder;
use super::progress::{ProgressReporter, SyncEvent};
use super::store::MailStore;

/// Terminal state of one mailbox's synchronization.
#[derive(Debug)]
pub enum SyncStatus {
    /// The source mailbox had no messages; the destination was never touched.
    Empty,
    /// All batches processed.
    Completed,
    /// A mailbox-scoped error interrupted the sync; counts are partial.
    Failed(SyncError),
}

impl SyncStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, SyncStatus::Failed(_))
    }
}

/// Outcome of synchronizing one mailbox.
#[derive(Debug)]
pub struct SyncResult {
    /// Source mailbox name.
    pub mailbox: String,
    /// Resolved destination mailbox name.
    pub destination: String,
    /// Messages appended to the destination.
    pub moved: u32,
    /// Messages skipped because the destination already had them.
    pub skipped: u32,
    pub status: SyncStatus,
}

/// Drives mailbox synchronization against one source and one destination
/// session, both held for the lifetime of the run.
///
/// The source session is lent to a fetch task for the duration of each
/// batch and recovered from its completion signal.
pub struct MailboxSynchronizer<S = MailSession> {
    source: Option<S>,
    destination: S,
    batch_size: u32,
}

impl<S: MailStore + 'static> MailboxSynchronizer<S> {
    pub fn new(source: S, destination: S, batch_size: u32) -> Self {
        Self {
            source: Some(source),
            destination,
            batch_size,
        }
    }

    /// The source session, when no fetch task has lost it.
    pub fn source(&mut self) -> Result<&mut S> {
        self.source.as_mut().ok_or(SyncError::SessionLost)
    }

    /// Releases both sessions, e.g. for a graceful logout.
    pub fn into_sessions(self) -> (Option<S>, S) {
        (self.source, self.destination)
    }

    /// Synchronizes one mailbox end to end.
    ///
    /// Errors are absorbed here into a `Failed` result carrying the partial
    /// counts; this method itself never aborts the run.
    pub async fn sync_mailbox(
        &mut self,
        name: &str,
        reporter: &dyn ProgressReporter,
    ) -> SyncResult {
        let destination = resolve_folder(name).to_string();
        let mut moved = 0u32;
        let mut skipped = 0u32;

        let status = match self
            .run(name, &destination, &mut moved, &mut skipped, reporter)
            .await
        {
            Ok(status) => status,
            Err(err) => {
                warn!("sync of '{}' failed: {}", name, err);
                SyncStatus::Failed(err)
            }
        };

        SyncResult {
            mailbox: name.to_string(),
            destination,
            moved,
            skipped,
            status,
        }
    }

    async fn run(
        &mut self,
        name: &str,
        dst_name: &str,
        moved: &mut u32,
        skipped: &mut u32,
        reporter: &dyn ProgressReporter,
    ) -> Result<SyncStatus> {
        // Selecting: read-only, the count is a snapshot at selection time.
        let total = self
            .source()?
            .examine(name)
            .await
            .map_err(|e| SyncError::Selection {
                mailbox: name.to_string(),
                source: e,
            })?;
        if total == 0 {
            reporter.report(SyncEvent::MailboxEmpty { mailbox: name });
            return Ok(SyncStatus::Empty);
        }

        // Preparing: the destination mailbox is created on demand.
        if self.destination.select(dst_name).await.is_err() {
            self.destination
                .create(dst_name)
                .await
                .map_err(|e| SyncError::Creation {
                    mailbox: dst_name.to_string(),
                    source: e,
                })?;
            self.destination
                .select(dst_name)
                .await
                .map_err(|e| SyncError::Selection {
                    mailbox: dst_name.to_string(),
                    source: e,
                })?;
        }
        reporter.report(SyncEvent::MailboxStarted {
            source: name,
            destination: dst_name,
            total,
        });
        info!("Syncing '{}' -> '{}' ({} messages)", name, dst_name, total);

        // Paginating.
        for range in batch_ranges(total, self.batch_size) {
            let session = self.source.take().ok_or(SyncError::SessionLost)?;
            let mut fetch = BatchFetch::spawn(session, range);

            let mut append_failure: Option<SyncError> = None;
            while let Some(record) = fetch.next_record().await {
                if let Some(id) = record.message_id.as_deref() {
                    if message_exists(&mut self.destination, id).await {
                        *skipped += 1;
                        reporter.report(SyncEvent::MessageSkipped {
                            destination: dst_name,
                            message_id: id,
                        });
                        continue;
                    }
                }

                if let Err(e) = append_record(&mut self.destination, dst_name, &record).await {
                    append_failure = Some(SyncError::Append {
                        mailbox: dst_name.to_string(),
                        source: e,
                    });
                    break;
                }
                *moved += 1;
                reporter.report(SyncEvent::Progress {
                    destination: dst_name,
                    processed: *moved + *skipped,
                    total,
                });
            }

            // The completion signal is observed exactly once, after the
            // drain, even when an append already doomed the batch.
            let (session, fetch_result) = fetch.finish().await;
            self.source = session;

            if let Some(err) = append_failure {
                return Err(err);
            }
            fetch_result.map_err(|e| SyncError::Fetch {
                mailbox: name.to_string(),
                source: e,
            })?;
        }

        Ok(SyncStatus::Completed)
    }
}

/// Appends one record to the destination, carrying over flags and internal
/// date exactly as fetched.
async fn append_record<S: MailStore>(
    destination: &mut S,
    mailbox: &str,
    record: &MessageRecord,
) -> std::result::Result<(), crate::imap::ImapError> {
    let flags = append_flags(&record.flags);
    let date = record.internal_date.as_ref().map(format_internal_date);
    destination
        .append(mailbox, flags.as_deref(), date.as_deref(), &record.body)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_failed_predicate() {
        assert!(!SyncStatus::Empty.is_failed());
        assert!(!SyncStatus::Completed.is_failed());
        let failed = SyncStatus::Failed(SyncError::SessionLost);
        assert!(failed.is_failed());
    }
}
