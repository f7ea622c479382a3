pub mod cache;
pub mod config;
pub mod error;
pub mod imap;
pub mod sync;

pub use cache::{CachedCredentials, CredentialCache};
pub use config::{RunConfig, ServerConfig};
pub use error::{MailferryError, Result};
pub use imap::{connect, Credentials, MailSession};
pub use sync::{
    run_migration, ConsoleProgress, MailStore, MailboxSynchronizer, MigrationReport, NoopProgress,
    ProgressReporter, SyncResult, SyncStatus,
};
