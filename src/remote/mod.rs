//! Remote Directory Client
//!
//! Listing, recursive enumeration, and content/description access against a
//! remote hierarchical file store. The store is reached through the
//! [`RemoteDirectory`] trait so callers can inject the Drive client or an
//! in-memory fake.

pub mod auth;
pub mod drive;
pub mod memory;

pub use drive::{DriveClient, DriveDirectory};
pub use memory::MemoryDirectory;

use crate::error::ApiError;
use crate::types::{FOLDER_MIME_TYPE, MARKDOWN_MIME_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One listed object in the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEntry {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    /// Only the first parent is meaningful.
    #[serde(default)]
    pub parents: Vec<String>,
    /// Change fingerprint.
    #[serde(default)]
    pub modified_time: String,
}

impl RemoteEntry {
    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME_TYPE
    }

    pub fn is_markdown(&self) -> bool {
        self.mime_type == MARKDOWN_MIME_TYPE
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }

    pub fn first_parent(&self) -> Option<&str> {
        self.parents.first().map(String::as_str)
    }
}

/// Remote directory access.
///
/// Calls block until the remote answers; failures are returned to the caller
/// and never retried here.
pub trait RemoteDirectory {
    /// Direct (non-recursive), non-trashed children of a folder.
    fn list_children(&self, folder_id: &str) -> Result<Vec<RemoteEntry>, ApiError>;

    /// Raw bytes of a file, fully buffered.
    fn read_bytes(&self, file_id: &str) -> Result<Vec<u8>, ApiError>;

    /// Current description of a file; a missing description reads as empty.
    fn read_description(&self, file_id: &str) -> Result<String, ApiError>;

    /// Replace the description of a file.
    fn write_description(&self, file_id: &str, text: &str) -> Result<(), ApiError>;

    /// File content decoded as UTF-8.
    fn read_text_content(&self, file_id: &str) -> Result<String, ApiError> {
        let bytes = self.read_bytes(file_id)?;
        String::from_utf8(bytes).map_err(|source| ApiError::Decode {
            file_id: file_id.to_string(),
            source,
        })
    }

    /// Append a line to the description history of a file and return the stored value.
    fn append_description(&self, file_id: &str, text: &str) -> Result<String, ApiError> {
        let current = self.read_description(file_id)?;
        let updated = compose_history(&current, text);
        self.write_description(file_id, &updated)?;
        Ok(updated)
    }
}

/// Join an existing description and a new history line.
pub fn compose_history(current: &str, entry: &str) -> String {
    let current = current.trim();
    if current.is_empty() {
        entry.to_string()
    } else {
        format!("{}\n{}", current, entry)
    }
}

/// Enumerate a folder recursively.
///
/// Pre-order: every entry is followed by the enumeration of its own children
/// when it is a folder.
pub fn list_recursive(
    remote: &dyn RemoteDirectory,
    folder_id: &str,
) -> Result<Vec<RemoteEntry>, ApiError> {
    let mut all = Vec::new();
    walk(remote, folder_id, &mut all)?;
    debug!(folder_id, entries = all.len(), "Recursive listing complete");
    Ok(all)
}

fn walk(
    remote: &dyn RemoteDirectory,
    folder_id: &str,
    out: &mut Vec<RemoteEntry>,
) -> Result<(), ApiError> {
    for entry in remote.list_children(folder_id)? {
        let descend = entry.is_folder().then(|| entry.id.clone());
        out.push(entry);
        if let Some(child) = descend {
            walk(remote, &child, out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_history_on_empty_description() {
        assert_eq!(compose_history("", "2024-01-01 crop"), "2024-01-01 crop");
        assert_eq!(compose_history("  \n", "x"), "x");
    }

    #[test]
    fn test_compose_history_appends_line() {
        assert_eq!(compose_history("first\n", "second"), "first\nsecond");
    }

    #[test]
    fn test_list_recursive_is_preorder() {
        let remote = MemoryDirectory::new()
            .with_folder("A", "alpha", "top")
            .with_folder("B", "beta", "A")
            .with_file("f1", "one.md", MARKDOWN_MIME_TYPE, "B", "t1", "# one")
            .with_file("f0", "zero.md", MARKDOWN_MIME_TYPE, "A", "t0", "# zero");

        let ids: Vec<String> = list_recursive(&remote, "top")
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["A", "B", "f1", "f0"]);
    }

    #[test]
    fn test_read_text_content_rejects_invalid_utf8() {
        let remote = MemoryDirectory::new().with_binary_file(
            "bin",
            "bad.md",
            MARKDOWN_MIME_TYPE,
            "top",
            "t",
            vec![0xff, 0xfe, 0x00],
        );
        let err = remote.read_text_content("bin").unwrap_err();
        assert!(matches!(err, ApiError::Decode { ref file_id, .. } if file_id == "bin"));
    }

    #[test]
    fn test_append_description_keeps_history() {
        let remote = MemoryDirectory::new().with_file(
            "img",
            "cover.png",
            "image/png",
            "top",
            "t",
            "",
        );
        remote.append_description("img", "first").unwrap();
        let stored = remote.append_description("img", "second").unwrap();
        assert_eq!(stored, "first\nsecond");
        assert_eq!(remote.read_description("img").unwrap(), "first\nsecond");
    }
}
