use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailferryError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Credential cache error: {0}")]
    Cache(#[from] crate::cache::CacheError),

    #[error("IMAP error: {0}")]
    Imap(#[from] crate::imap::ImapError),

    #[error("Sync error: {0}")]
    Sync(#[from] crate::sync::SyncError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MailferryError>;
