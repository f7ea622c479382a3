//! Folder name translation between providers.

/// Maps provider-specific special folders to their generic equivalents.
///
/// Names not in the table pass through unchanged. Pure and total.
pub fn resolve_folder(name: &str) -> &str {
    match name {
        "INBOX" => "INBOX",
        "[Gmail]/Sent Mail" => "Sent",
        "[Gmail]/Drafts" => "Drafts",
        "[Gmail]/Spam" => "Junk",
        "[Gmail]/Trash" => "Trash",
        "[Gmail]/All Mail" => "Archive",
        other => other,
    }
}
