//! IMAP session handling: TLS dial, LOGIN, and the protocol operations the
//! migration engine consumes.

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use async_imap::types::{Name, NameAttribute};
use async_imap::Session;
use async_native_tls::TlsConnector;
use futures_util::{Stream, TryStreamExt};
use log::{debug, info};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::mpsc;

use crate::config::ServerConfig;

use super::error::{ImapError, Result};
use super::message::MessageRecord;

/// Type alias for the underlying async stream (std TCP wrapped with async-io).
type AsyncTcpStream = async_io::Async<TcpStream>;

/// Type alias for the TLS stream used by the IMAP session.
type TlsStream = async_native_tls::TlsStream<AsyncTcpStream>;

/// TCP dial timeout; no other timeout is applied to in-flight commands.
const DIAL_TIMEOUT: Duration = Duration::from_secs(20);

/// FETCH item set for a migration batch: envelope metadata, flags, internal
/// date, and the full body without marking the source message as read.
const BATCH_FETCH_QUERY: &str = "(ENVELOPE FLAGS INTERNALDATE BODY.PEEK[])";

/// Account credentials for a LOGIN.
pub struct Credentials {
    pub user: String,
    pub password: SecretString,
}

/// An authenticated IMAP session against one server.
pub struct MailSession {
    session: Session<TlsStream>,
    host: String,
}

/// Connects to an IMAP server and authenticates.
///
/// TLS is required; a config with `use_tls: false` is rejected before any
/// network traffic happens.
pub async fn connect(server: &ServerConfig, credentials: &Credentials) -> Result<MailSession> {
    if !server.use_tls {
        return Err(ImapError::TlsRequired);
    }

    let addr = format!("{}:{}", server.host, server.port);
    info!("Connecting to IMAP server at {}", addr);

    let socket_addr = addr
        .to_socket_addrs()
        .map_err(|e| ImapError::ConnectionFailed(e.to_string()))?
        .next()
        .ok_or_else(|| ImapError::InvalidAddress(addr.clone()))?;

    let std_stream = TcpStream::connect_timeout(&socket_addr, DIAL_TIMEOUT)
        .map_err(|e| ImapError::ConnectionFailed(e.to_string()))?;
    std_stream
        .set_nonblocking(true)
        .map_err(|e| ImapError::ConnectionFailed(e.to_string()))?;
    let tcp_stream = async_io::Async::new(std_stream)
        .map_err(|e| ImapError::ConnectionFailed(e.to_string()))?;

    let tls = TlsConnector::new();
    let tls_stream = tls
        .connect(&server.host, tcp_stream)
        .await
        .map_err(|e| ImapError::TlsError(e.to_string()))?;

    let client = async_imap::Client::new(tls_stream);
    let session = client
        .login(&credentials.user, credentials.password.expose_secret())
        .await
        .map_err(|(e, _)| ImapError::AuthenticationFailed(e.to_string()))?;

    info!("Authenticated to {} as {}", server.host, credentials.user);
    Ok(MailSession {
        session,
        host: server.host.clone(),
    })
}

impl MailSession {
    /// Issues LIST with the given wildcard pattern and returns the names of
    /// the selectable mailboxes, in server order.
    ///
    /// Entries flagged `\Noselect` (pure hierarchy containers) are dropped.
    pub async fn list_mailboxes(&mut self, pattern: &str) -> Result<Vec<String>> {
        let stream = self
            .session
            .list(Some(""), Some(pattern))
            .await
            .map_err(|e| ImapError::Protocol(e.to_string()))?;
        let names = stream
            .try_collect::<Vec<Name>>()
            .await
            .map_err(|e| ImapError::Protocol(e.to_string()))?;
        let mailboxes: Vec<String> = names
            .iter()
            .filter(|name| {
                let selectable = is_selectable(name);
                if !selectable {
                    debug!("skipping non-selectable mailbox '{}'", name.name());
                }
                selectable
            })
            .map(|name| name.name().to_string())
            .collect();
        debug!("Found {} selectable mailboxes on {}", mailboxes.len(), self.host);
        Ok(mailboxes)
    }

    /// Selects a mailbox in read-only mode (EXAMINE) and returns its message
    /// count as of selection time.
    pub async fn examine(&mut self, mailbox: &str) -> Result<u32> {
        let mbx = self
            .session
            .examine(mailbox)
            .await
            .map_err(|e| ImapError::Protocol(e.to_string()))?;
        debug!("Examined '{}' on {}: {} messages", mailbox, self.host, mbx.exists);
        Ok(mbx.exists)
    }

    /// Selects a mailbox in read-write mode and returns its message count.
    pub async fn select(&mut self, mailbox: &str) -> Result<u32> {
        let mbx = self
            .session
            .select(mailbox)
            .await
            .map_err(|e| ImapError::Protocol(e.to_string()))?;
        Ok(mbx.exists)
    }

    /// Creates a mailbox.
    pub async fn create(&mut self, mailbox: &str) -> Result<()> {
        self.session
            .create(mailbox)
            .await
            .map_err(|e| ImapError::Protocol(e.to_string()))
    }

    /// Runs one batch FETCH over the currently selected mailbox and forwards
    /// each usable record to `records`, in arrival order.
    ///
    /// Messages without a body section are dropped here. A closed receiver
    /// stops the forwarding, but the response stream is still consumed to
    /// its end: the connection is reused for later commands and must not be
    /// left with unread FETCH data.
    pub async fn fetch_batch(
        &mut self,
        sequence_set: &str,
        records: &mpsc::Sender<MessageRecord>,
    ) -> Result<()> {
        let stream = self
            .session
            .fetch(sequence_set, BATCH_FETCH_QUERY)
            .await
            .map_err(|e| ImapError::Protocol(e.to_string()))?;
        let stream = stream
            .map_err(|e| ImapError::Protocol(e.to_string()))
            .map_ok(|fetch| (fetch.message, MessageRecord::from_fetch(&fetch)));
        relay_records(stream, records).await
    }

    /// Searches the currently selected mailbox for a `Message-ID` header
    /// equal to the given identifier.
    pub async fn message_id_exists(&mut self, message_id: &str) -> Result<bool> {
        // Embedded quotes would break the quoted search string.
        let needle = message_id.replace('"', "");
        let query = format!("HEADER Message-ID \"{}\"", needle);
        let hits = self
            .session
            .search(&query)
            .await
            .map_err(|e| ImapError::Protocol(e.to_string()))?;
        Ok(!hits.is_empty())
    }

    /// Appends raw message bytes to a mailbox, preserving flags and internal
    /// date when given.
    pub async fn append(
        &mut self,
        mailbox: &str,
        flags: Option<&str>,
        internal_date: Option<&str>,
        body: &[u8],
    ) -> Result<()> {
        self.session
            .append(mailbox, flags, internal_date, body)
            .await
            .map_err(|e| ImapError::Protocol(e.to_string()))
    }

    /// Logs out and closes the connection gracefully.
    pub async fn logout(mut self) -> Result<()> {
        info!("Disconnecting from {}", self.host);
        self.session
            .logout()
            .await
            .map_err(|e| ImapError::Protocol(e.to_string()))
    }
}

fn is_selectable(name: &Name) -> bool {
    !name
        .attributes()
        .iter()
        .any(|attr| matches!(attr, NameAttribute::NoSelect))
}

/// Forwards `(seq, record)` pairs from a FETCH response stream into the
/// batch channel.
///
/// The stream is always consumed to its end, even after the receiver goes
/// away, so no part of the response stays unread on the connection. Pairs
/// with no record (body section absent) are dropped with a log line.
async fn relay_records<St>(stream: St, records: &mpsc::Sender<MessageRecord>) -> Result<()>
where
    St: Stream<Item = Result<(u32, Option<MessageRecord>)>>,
{
    futures_util::pin_mut!(stream);
    let mut receiver_open = true;
    while let Some((seq, record)) = stream.try_next().await? {
        let Some(record) = record else {
            debug!("message {} has no body section, dropping", seq);
            continue;
        };
        if receiver_open && records.send(record).await.is_err() {
            debug!("record receiver dropped, discarding the rest of the batch");
            receiver_open = false;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use futures_util::{stream, StreamExt};

    use super::*;

    fn record(seq: u32) -> MessageRecord {
        MessageRecord {
            seq,
            message_id: None,
            flags: Vec::new(),
            internal_date: None,
            body: b"body".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_relay_consumes_whole_stream_after_receiver_drops() {
        let items: Vec<Result<(u32, Option<MessageRecord>)>> =
            (1..=5).map(|seq| Ok((seq, Some(record(seq))))).collect();
        let pulled = Arc::new(AtomicU32::new(0));
        let counter = pulled.clone();
        let stream = stream::iter(items).inspect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        relay_records(stream, &tx).await.unwrap();
        assert_eq!(pulled.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_relay_drops_bodyless_entries_without_sending() {
        let items: Vec<Result<(u32, Option<MessageRecord>)>> = vec![
            Ok((1, Some(record(1)))),
            Ok((2, None)),
            Ok((3, Some(record(3)))),
        ];
        let (tx, mut rx) = mpsc::channel(8);

        relay_records(stream::iter(items), &tx).await.unwrap();
        drop(tx);

        let mut delivered = Vec::new();
        while let Some(record) = rx.recv().await {
            delivered.push(record.seq);
        }
        assert_eq!(delivered, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_relay_propagates_stream_errors() {
        let items: Vec<Result<(u32, Option<MessageRecord>)>> = vec![
            Ok((1, Some(record(1)))),
            Err(ImapError::Protocol("connection reset".to_string())),
        ];
        let (tx, _rx) = mpsc::channel(8);

        let result = relay_records(stream::iter(items), &tx).await;
        assert!(matches!(result, Err(ImapError::Protocol(_))));
    }
}
