//! Destination-side duplicate detection.

use tracing::debug;

use super::store::MailStore;

/// Checks whether a message with the given `Message-ID` already exists in
/// the currently selected destination mailbox.
///
/// A failed search answers `false`: an extra append is preferred over a
/// missed message, so dedup accuracy yields to availability here.
pub async fn message_exists<S: MailStore>(session: &mut S, message_id: &str) -> bool {
    match session.message_id_exists(message_id).await {
        Ok(found) => found,
        Err(err) => {
            debug!(
                "dedup search for {} failed ({}), assuming not present",
                message_id, err
            );
            false
        }
    }
}
