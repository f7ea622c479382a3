//! Concurrent batch fetch: one producer task per batch.
//!
//! The source session moves into a spawned task that issues the FETCH and
//! forwards records through a bounded channel while the caller consumes
//! them, overlapping server round-trips with append work. Completion is a
//! single-shot signal carrying the session back together with the batch
//! outcome; it must be observed exactly once, after the record channel
//! drains, so a terminal error is never lost and the task never leaks.

use tokio::sync::{mpsc, oneshot};

use crate::imap::{ImapError, MessageRecord};

use super::batch::BatchRange;
use super::store::MailStore;

/// Bound on records buffered between the fetch task and the consumer.
const RECORD_BUFFER: usize = 20;

/// A running batch fetch against the source session.
pub struct BatchFetch<S> {
    records: mpsc::Receiver<MessageRecord>,
    done: oneshot::Receiver<(S, Result<(), ImapError>)>,
}

impl<S: MailStore + 'static> BatchFetch<S> {
    /// Starts fetching the given range from the mailbox currently selected
    /// on `session`. The session is owned by the fetch task until
    /// [`BatchFetch::finish`] returns it.
    pub fn spawn(mut session: S, range: BatchRange) -> Self {
        let (record_tx, record_rx) = mpsc::channel(RECORD_BUFFER);
        let (done_tx, done_rx) = oneshot::channel();

        tokio::spawn(async move {
            let sequence_set = range.sequence_set();
            let result = session.fetch_batch(&sequence_set, &record_tx).await;
            drop(record_tx);
            // The receiver may be gone when the consumer abandoned the batch.
            let _ = done_tx.send((session, result));
        });

        BatchFetch {
            records: record_rx,
            done: done_rx,
        }
    }

    /// Yields the next record, in arrival order, until the batch is drained.
    pub async fn next_record(&mut self) -> Option<MessageRecord> {
        self.records.recv().await
    }

    /// Observes the completion signal and recovers the source session.
    ///
    /// Dropping the record receiver first lets an abandoned producer finish
    /// promptly. `None` for the session only happens if the task died
    /// without reporting, which also surfaces as a fetch error.
    pub async fn finish(self) -> (Option<S>, Result<(), ImapError>) {
        drop(self.records);
        match self.done.await {
            Ok((session, result)) => (Some(session), result),
            Err(_) => (
                None,
                Err(ImapError::Protocol(
                    "fetch task exited without reporting completion".to_string(),
                )),
            ),
        }
    }
}
