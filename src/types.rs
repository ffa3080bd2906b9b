//! Core types shared across drivefold modules.

/// FolderId: opaque remote identifier of a folder
pub type FolderId = String;

/// FileId: opaque remote identifier of a file
pub type FileId = String;

/// Mime type the remote store uses to mark folders
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Mime type of markdown files attached to folder nodes
pub const MARKDOWN_MIME_TYPE: &str = "text/markdown";

/// Display name of the synthetic root node
pub const ROOT_NAME: &str = "ROOT";
