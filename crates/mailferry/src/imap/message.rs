//! Message records produced by batch fetches.
//!
//! A [`MessageRecord`] carries everything needed to re-append a message on the
//! destination server: the raw body bytes, the standard flags, and the
//! internal date assigned by the originating server. The body is never
//! re-encoded or reparsed.

use async_imap::types::{Fetch, Flag};
use chrono::{DateTime, FixedOffset};

/// The standard IMAP system flags that survive a migration.
///
/// `\Recent` is session-scoped and cannot be set through APPEND; custom
/// keywords are not carried over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFlag {
    Seen,
    Answered,
    Flagged,
    Deleted,
    Draft,
}

impl MessageFlag {
    /// The wire form used in FLAGS lists and APPEND commands.
    pub fn as_imap_str(&self) -> &'static str {
        match self {
            MessageFlag::Seen => "\\Seen",
            MessageFlag::Answered => "\\Answered",
            MessageFlag::Flagged => "\\Flagged",
            MessageFlag::Deleted => "\\Deleted",
            MessageFlag::Draft => "\\Draft",
        }
    }

    fn from_imap(flag: &Flag<'_>) -> Option<Self> {
        match flag {
            Flag::Seen => Some(MessageFlag::Seen),
            Flag::Answered => Some(MessageFlag::Answered),
            Flag::Flagged => Some(MessageFlag::Flagged),
            Flag::Deleted => Some(MessageFlag::Deleted),
            Flag::Draft => Some(MessageFlag::Draft),
            _ => None,
        }
    }
}

/// One message pulled from the source mailbox.
#[derive(Debug, Clone)]
pub struct MessageRecord {
    /// 1-based sequence number, valid only for the current selection.
    pub seq: u32,
    /// `Message-ID` header value, when the message has one. Messages without
    /// it are never deduplicated.
    pub message_id: Option<String>,
    /// Standard flags set on the source message.
    pub flags: Vec<MessageFlag>,
    /// Server-assigned internal date, preserved verbatim.
    pub internal_date: Option<DateTime<FixedOffset>>,
    /// Exact byte sequence of the full message, headers included.
    pub body: Vec<u8>,
}

impl MessageRecord {
    /// Builds a record from a FETCH response.
    ///
    /// Returns `None` when the body section is absent; such messages are
    /// dropped and contribute to neither the moved nor the skipped count.
    pub fn from_fetch(fetch: &Fetch) -> Option<Self> {
        let body = fetch.body()?.to_vec();
        let message_id =
            parse_message_id(fetch.envelope().and_then(|env| env.message_id.as_deref()));
        Some(MessageRecord {
            seq: fetch.message,
            message_id,
            flags: standard_flags(fetch.flags()),
            internal_date: fetch.internal_date(),
            body,
        })
    }
}

/// Keeps the standard system flags and drops `\Recent` and custom keywords.
pub fn standard_flags<'a>(flags: impl Iterator<Item = Flag<'a>>) -> Vec<MessageFlag> {
    flags.filter_map(|f| MessageFlag::from_imap(&f)).collect()
}

/// Renders a flag set for an APPEND command, `None` when there is nothing to set.
pub fn append_flags(flags: &[MessageFlag]) -> Option<String> {
    if flags.is_empty() {
        return None;
    }
    Some(
        flags
            .iter()
            .map(MessageFlag::as_imap_str)
            .collect::<Vec<_>>()
            .join(" "),
    )
}

/// Renders an internal date in IMAP date-time form for APPEND.
pub fn format_internal_date(date: &DateTime<FixedOffset>) -> String {
    date.format("%d-%b-%Y %H:%M:%S %z").to_string()
}

/// Decodes a raw ENVELOPE `Message-ID` value into a usable identifier.
pub(crate) fn parse_message_id(raw: Option<&[u8]>) -> Option<String> {
    raw.and_then(|bytes| std::str::from_utf8(bytes).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::borrow::Cow;

    #[test]
    fn test_standard_flags_keep_system_flags() {
        let flags = vec![
            Flag::Seen,
            Flag::Flagged,
            Flag::Answered,
            Flag::Deleted,
            Flag::Draft,
        ];
        let converted = standard_flags(flags.into_iter());
        assert_eq!(
            converted,
            vec![
                MessageFlag::Seen,
                MessageFlag::Flagged,
                MessageFlag::Answered,
                MessageFlag::Deleted,
                MessageFlag::Draft,
            ]
        );
    }

    #[test]
    fn test_standard_flags_drop_recent_and_custom() {
        let flags = vec![
            Flag::Recent,
            Flag::Custom(Cow::Borrowed("$Forwarded")),
            Flag::Seen,
        ];
        let converted = standard_flags(flags.into_iter());
        assert_eq!(converted, vec![MessageFlag::Seen]);
    }

    #[test]
    fn test_append_flags_rendering() {
        assert_eq!(append_flags(&[]), None);
        assert_eq!(
            append_flags(&[MessageFlag::Seen, MessageFlag::Flagged]).as_deref(),
            Some("\\Seen \\Flagged")
        );
    }

    #[test]
    fn test_format_internal_date() {
        let date = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 5, 9, 30, 7)
            .unwrap();
        assert_eq!(format_internal_date(&date), "05-Jan-2024 09:30:07 +0100");
    }

    #[test]
    fn test_parse_message_id() {
        assert_eq!(
            parse_message_id(Some(b" <abc@example.com> ")).as_deref(),
            Some("<abc@example.com>")
        );
        assert_eq!(parse_message_id(Some(b"   ")), None);
        assert_eq!(parse_message_id(None), None);
    }
}
