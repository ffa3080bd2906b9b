//! Error types for drivefold.

use thiserror::Error;

/// Errors surfaced by the remote client, tree builder, collector and CLI.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network or authentication failure against the remote store. Never retried.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File {file_id} is not valid UTF-8: {source}")]
    Decode {
        file_id: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Malformed front matter. The aggregator recovers from this per document.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Folder not in tree: {0}")]
    FolderNotInTree(String),

    #[error("Listing produced no entries and no root folder was given")]
    EmptyTree,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Image error: {0}")]
    Image(String),

    /// Output could not be rendered as JSON or YAML.
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<image::ImageError> for ApiError {
    fn from(err: image::ImageError) -> Self {
        ApiError::Image(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Serialization(err.to_string())
    }
}

impl From<crate::frontmatter::FrontMatterError> for ApiError {
    fn from(err: crate::frontmatter::FrontMatterError) -> Self {
        ApiError::Parse(err.to_string())
    }
}

impl ApiError {
    /// True for errors the user can fix by correcting input, as opposed to remote failures.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ApiError::NotFound(_) | ApiError::Validation(_) | ApiError::FolderNotInTree(_)
        )
    }
}
