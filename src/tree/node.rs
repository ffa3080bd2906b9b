//! Folder node and file descriptor types

use crate::error::ApiError;
use crate::types::{FileId, FolderId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Markdown file attached to a folder node.
///
/// Renders as `id|modifiedTime|name`; the name may itself contain `|`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct FileDescriptor {
    pub id: FileId,
    pub modified_time: String,
    pub name: String,
}

impl FileDescriptor {
    pub fn new(id: &str, modified_time: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            modified_time: modified_time.to_string(),
            name: name.to_string(),
        }
    }

    /// Whether the rendered descriptor ends in `.md`.
    pub fn is_markdown_name(&self) -> bool {
        self.name.ends_with(".md")
    }

    /// Cache key for the file content; excludes the fingerprint so that a
    /// changed file overwrites its previous entry.
    pub fn cache_key(&self) -> String {
        format!("folder_contents_{}|{}", self.id, self.name)
    }
}

impl fmt::Display for FileDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.id, self.modified_time, self.name)
    }
}

impl FromStr for FileDescriptor {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '|');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(id), Some(modified_time), Some(name)) if !id.is_empty() => {
                Ok(FileDescriptor::new(id, modified_time, name))
            }
            _ => Err(ApiError::Validation(format!(
                "file descriptor must look like id|modifiedTime|name: {}",
                s
            ))),
        }
    }
}

impl From<FileDescriptor> for String {
    fn from(descriptor: FileDescriptor) -> Self {
        descriptor.to_string()
    }
}

impl TryFrom<String> for FileDescriptor {
    type Error = ApiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Folder node in the built tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    pub name: String,
    pub files: Vec<FileDescriptor>,
    pub subfolders: Vec<FolderId>,
}

impl FolderNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            files: Vec::new(),
            subfolders: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_display_and_parse() {
        let d = FileDescriptor::new("f1", "2024-05-01T10:00:00.000Z", "notes.md");
        assert_eq!(d.to_string(), "f1|2024-05-01T10:00:00.000Z|notes.md");
        let parsed: FileDescriptor = d.to_string().parse().unwrap();
        assert_eq!(parsed, d);
    }

    #[test]
    fn test_descriptor_name_may_contain_pipe() {
        let parsed: FileDescriptor = "f2|ts|a|b.md".parse().unwrap();
        assert_eq!(parsed.name, "a|b.md");
        assert!(parsed.is_markdown_name());
    }

    #[test]
    fn test_descriptor_rejects_short_form() {
        assert!("f1|ts".parse::<FileDescriptor>().is_err());
        assert!("|ts|x.md".parse::<FileDescriptor>().is_err());
    }

    #[test]
    fn test_descriptor_serializes_as_string() {
        let d = FileDescriptor::new("f1", "t", "x.md");
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"f1|t|x.md\"");
    }

    #[test]
    fn test_cache_key_ignores_fingerprint() {
        let a = FileDescriptor::new("f1", "t1", "x.md");
        let b = FileDescriptor::new("f1", "t2", "x.md");
        assert_eq!(a.cache_key(), b.cache_key());
    }
}
