//! Google Drive v3 client.
//!
//! `DriveClient` speaks the REST API asynchronously; `DriveDirectory` wraps it
//! in a current-thread runtime so every call blocks the caller, matching the
//! one-pass-per-interaction model of the rest of the crate.

use super::auth::ServiceAccountAuth;
use super::{RemoteDirectory, RemoteEntry};
use crate::config::DriveSettings;
use crate::error::ApiError;
use futures::StreamExt;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const LIST_FIELDS: &str = "nextPageToken,files(id,name,mimeType,parents,modifiedTime)";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFileList {
    #[serde(default)]
    files: Vec<RemoteEntry>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DescriptionOnly {
    #[serde(default)]
    description: Option<String>,
}

/// Asynchronous Drive API client.
pub struct DriveClient {
    auth: ServiceAccountAuth,
    client: reqwest::Client,
    api_base: String,
    page_size: u32,
}

impl DriveClient {
    pub fn new(auth: ServiceAccountAuth, settings: &DriveSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            auth,
            client,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            page_size: settings.page_size,
        })
    }

    async fn auth_header(&self) -> Result<HeaderValue, ApiError> {
        let token = self.auth.access_token(&self.client).await?;
        HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| ApiError::Transport(format!("invalid token: {}", e)))
    }

    async fn check(response: Response, id: &str) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::NOT_FOUND => ApiError::NotFound(id.to_string()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ApiError::Transport(format!("access denied for {} ({}): {}", id, status, text))
            }
            _ => ApiError::Transport(format!("API error {} for {}: {}", status, id, text)),
        })
    }

    /// Direct, non-trashed children of a folder, following all pages.
    pub async fn list_children(&self, folder_id: &str) -> Result<Vec<RemoteEntry>, ApiError> {
        let query = format!("'{}' in parents and trashed = false", folder_id);
        let page_size = self.page_size.to_string();
        let url = format!("{}/files", self.api_base);
        let mut all = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params: Vec<(&str, &str)> = vec![
                ("q", query.as_str()),
                ("fields", LIST_FIELDS),
                ("pageSize", page_size.as_str()),
            ];
            if let Some(token) = page_token.as_deref() {
                params.push(("pageToken", token));
            }

            let response = self
                .client
                .get(&url)
                .header(AUTHORIZATION, self.auth_header().await?)
                .query(&params)
                .send()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            let list: DriveFileList = Self::check(response, folder_id)
                .await?
                .json()
                .await
                .map_err(|e| ApiError::Transport(format!("listing unreadable: {}", e)))?;

            all.extend(list.files);
            match list.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(folder_id, count = all.len(), "Listed folder");
        Ok(all)
    }

    /// Download file content, streaming chunks into one buffer.
    pub async fn download(&self, file_id: &str) -> Result<Vec<u8>, ApiError> {
        let url = format!("{}/files/{}", self.api_base, file_id);
        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.auth_header().await?)
            .query(&[("alt", "media")])
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let response = Self::check(response, file_id).await?;

        let mut buffer = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| ApiError::Transport(e.to_string()))?;
            buffer.extend_from_slice(&chunk);
        }
        debug!(file_id, bytes = buffer.len(), "Downloaded file");
        Ok(buffer)
    }

    pub async fn description(&self, file_id: &str) -> Result<String, ApiError> {
        let url = format!("{}/files/{}", self.api_base, file_id);
        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.auth_header().await?)
            .query(&[("fields", "description")])
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let body: DescriptionOnly = Self::check(response, file_id)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Transport(format!("description unreadable: {}", e)))?;
        Ok(body.description.unwrap_or_default())
    }

    pub async fn update_description(&self, file_id: &str, text: &str) -> Result<(), ApiError> {
        let url = format!("{}/files/{}", self.api_base, file_id);
        let response = self
            .client
            .patch(&url)
            .header(AUTHORIZATION, self.auth_header().await?)
            .json(&serde_json::json!({ "description": text }))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::check(response, file_id).await?;
        info!(file_id, "Updated description");
        Ok(())
    }
}

/// Blocking adapter over [`DriveClient`].
pub struct DriveDirectory {
    runtime: tokio::runtime::Runtime,
    client: DriveClient,
}

impl DriveDirectory {
    pub fn new(client: DriveClient) -> Result<Self, ApiError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self { runtime, client })
    }
}

impl RemoteDirectory for DriveDirectory {
    fn list_children(&self, folder_id: &str) -> Result<Vec<RemoteEntry>, ApiError> {
        self.runtime.block_on(self.client.list_children(folder_id))
    }

    fn read_bytes(&self, file_id: &str) -> Result<Vec<u8>, ApiError> {
        self.runtime.block_on(self.client.download(file_id))
    }

    fn read_description(&self, file_id: &str) -> Result<String, ApiError> {
        self.runtime.block_on(self.client.description(file_id))
    }

    fn write_description(&self, file_id: &str, text: &str) -> Result<(), ApiError> {
        self.runtime
            .block_on(self.client.update_description(file_id, text))
    }
}
