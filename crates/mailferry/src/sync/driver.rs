//! Top-level migration driver.

use tracing::{error, info};

use super::error::{Result, SyncError};
use super::mailbox::{MailboxSynchronizer, SyncResult, SyncStatus};
use super::progress::{ProgressReporter, SyncEvent};
use super::store::MailStore;

/// Ordered per-mailbox outcomes of one migration run.
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub results: Vec<SyncResult>,
}

impl MigrationReport {
    pub fn total_moved(&self) -> u32 {
        self.results.iter().map(|r| r.moved).sum()
    }

    pub fn total_skipped(&self) -> u32 {
        self.results.iter().map(|r| r.skipped).sum()
    }

    /// The mailboxes whose sync failed.
    pub fn failures(&self) -> impl Iterator<Item = &SyncResult> {
        self.results.iter().filter(|r| r.status.is_failed())
    }
}

/// Migrates every selectable mailbox matching `pattern`, strictly one at a
/// time, in server order.
///
/// A mailbox-level failure is reported and the run continues; only mailbox
/// enumeration failure aborts the whole run.
pub async fn run_migration<S: MailStore + 'static>(
    synchronizer: &mut MailboxSynchronizer<S>,
    pattern: &str,
    reporter: &dyn ProgressReporter,
) -> Result<MigrationReport> {
    let mailboxes = synchronizer
        .source()?
        .list_mailboxes(pattern)
        .await
        .map_err(SyncError::Enumeration)?;
    info!("Migrating {} mailboxes", mailboxes.len());

    let mut report = MigrationReport::default();
    for name in mailboxes {
        let result = synchronizer.sync_mailbox(&name, reporter).await;
        match &result.status {
            SyncStatus::Failed(err) => {
                error!("Error syncing {}: {}", result.mailbox, err);
                let message = err.to_string();
                reporter.report(SyncEvent::MailboxFailed {
                    mailbox: &result.mailbox,
                    error: &message,
                });
            }
            SyncStatus::Completed => {
                reporter.report(SyncEvent::MailboxCompleted {
                    mailbox: &result.mailbox,
                    moved: result.moved,
                    skipped: result.skipped,
                });
            }
            SyncStatus::Empty => {}
        }
        report.results.push(result);
    }
    Ok(report)
}
