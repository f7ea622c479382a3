//! Progress reporting for the migration run.

/// Events emitted while synchronizing mailboxes.
///
/// `Progress` carries `(processed, total)` where `processed` is
/// `moved + skipped`, monotonically non-decreasing within one mailbox.
pub enum SyncEvent<'a> {
    MailboxEmpty {
        mailbox: &'a str,
    },
    MailboxStarted {
        source: &'a str,
        destination: &'a str,
        total: u32,
    },
    MessageSkipped {
        destination: &'a str,
        message_id: &'a str,
    },
    Progress {
        destination: &'a str,
        processed: u32,
        total: u32,
    },
    MailboxCompleted {
        mailbox: &'a str,
        moved: u32,
        skipped: u32,
    },
    MailboxFailed {
        mailbox: &'a str,
        error: &'a str,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: SyncEvent<'_>);
}

/// No-op reporter for unit tests and embedding.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: SyncEvent<'_>) {}
}

/// Human-readable console surface.
pub struct ConsoleProgress;

impl ProgressReporter for ConsoleProgress {
    fn report(&self, event: SyncEvent<'_>) {
        match event {
            SyncEvent::MailboxEmpty { mailbox } => {
                println!("[{}] Mailbox is empty", mailbox);
            }
            SyncEvent::MailboxStarted {
                source,
                destination,
                total,
            } => {
                println!("[{} -> {}] Mails total count: {}", source, destination, total);
            }
            SyncEvent::MessageSkipped {
                destination,
                message_id,
            } => {
                println!("[{}] Skipping existing: {}", destination, message_id);
            }
            SyncEvent::Progress {
                destination,
                processed,
                total,
            } => {
                println!(
                    "[{}] Progress: {}/{} ({:.1}%)",
                    destination,
                    processed,
                    total,
                    f64::from(processed) / f64::from(total) * 100.0
                );
            }
            SyncEvent::MailboxCompleted {
                mailbox,
                moved,
                skipped,
            } => {
                println!(
                    "Done {}: moved {} messages, and skipped {} messages",
                    mailbox, moved, skipped
                );
            }
            SyncEvent::MailboxFailed { mailbox, error } => {
                println!("Error syncing {}: {}", mailbox, error);
            }
        }
    }
}
