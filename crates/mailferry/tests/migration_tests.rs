//! Tests for folder resolution and run-level result accounting.

use mailferry::sync::{resolve_folder, MigrationReport, SyncError, SyncResult, SyncStatus};

fn result(mailbox: &str, moved: u32, skipped: u32, status: SyncStatus) -> SyncResult {
    SyncResult {
        mailbox: mailbox.to_string(),
        destination: resolve_folder(mailbox).to_string(),
        moved,
        skipped,
        status,
    }
}

struct ResolveCase {
    source: &'static str,
    expected: &'static str,
}

const RESOLVE_CASES: &[ResolveCase] = &[
    ResolveCase {
        source: "INBOX",
        expected: "INBOX",
    },
    ResolveCase {
        source: "[Gmail]/Sent Mail",
        expected: "Sent",
    },
    ResolveCase {
        source: "[Gmail]/Drafts",
        expected: "Drafts",
    },
    ResolveCase {
        source: "[Gmail]/Spam",
        expected: "Junk",
    },
    ResolveCase {
        source: "[Gmail]/Trash",
        expected: "Trash",
    },
    ResolveCase {
        source: "[Gmail]/All Mail",
        expected: "Archive",
    },
    ResolveCase {
        source: "Custom/Project",
        expected: "Custom/Project",
    },
    ResolveCase {
        source: "Work/2024/Invoices",
        expected: "Work/2024/Invoices",
    },
];

#[test]
fn folder_resolution_table() {
    for case in RESOLVE_CASES {
        assert_eq!(
            resolve_folder(case.source),
            case.expected,
            "resolve({})",
            case.source
        );
    }
}

#[test]
fn report_aggregates_counts_across_mailboxes() {
    let report = MigrationReport {
        results: vec![
            result("INBOX", 430, 20, SyncStatus::Completed),
            result("[Gmail]/Trash", 0, 0, SyncStatus::Empty),
            result("[Gmail]/Sent Mail", 12, 3, SyncStatus::Completed),
        ],
    };

    assert_eq!(report.total_moved(), 442);
    assert_eq!(report.total_skipped(), 23);
    assert_eq!(report.failures().count(), 0);
}

#[test]
fn report_keeps_partial_counts_of_failed_mailboxes() {
    let report = MigrationReport {
        results: vec![
            result("INBOX", 200, 109, SyncStatus::Failed(SyncError::SessionLost)),
            result("Receipts", 5, 0, SyncStatus::Completed),
        ],
    };

    // A failed mailbox still contributes what it managed to move.
    assert_eq!(report.total_moved(), 205);
    assert_eq!(report.total_skipped(), 109);

    let failed: Vec<&SyncResult> = report.failures().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].mailbox, "INBOX");
    assert!(failed[0].status.is_failed());
}

#[test]
fn empty_mailbox_result_has_zero_counts() {
    let empty = result("Archive/Old", 0, 0, SyncStatus::Empty);
    assert_eq!(empty.moved, 0);
    assert_eq!(empty.skipped, 0);
    assert!(!empty.status.is_failed());
}
