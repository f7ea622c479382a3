//! Mailbox synchronization engine.
//!
//! Enumerates the source account's mailboxes, translates folder names,
//! fetches messages in fixed-size batches, deduplicates against the
//! destination server, and appends what is missing, preserving flags and
//! internal dates. Idempotence across runs comes entirely from the
//! destination-side dedup lookups; no sync state is persisted locally.

pub mod batch;
pub mod dedup;
pub mod driver;
pub mod error;
pub mod fetch;
pub mod folders;
pub mod mailbox;
pub mod progress;
pub mod store;

pub use batch::{batch_ranges, BatchRange};
pub use driver::{run_migration, MigrationReport};
pub use error::SyncError;
pub use folders::resolve_folder;
pub use mailbox::{MailboxSynchronizer, SyncResult, SyncStatus};
pub use progress::{ConsoleProgress, NoopProgress, ProgressReporter, SyncEvent};
pub use store::MailStore;
