//! In-memory remote directory.
//!
//! Holds a fixed snapshot of entries, contents and descriptions. Counts
//! content reads so callers can check what the cache saved them.

use super::{RemoteDirectory, RemoteEntry};
use crate::error::ApiError;
use crate::types::FOLDER_MIME_TYPE;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct MemoryDirectory {
    entries: RefCell<Vec<RemoteEntry>>,
    contents: RefCell<HashMap<String, Vec<u8>>>,
    descriptions: RefCell<HashMap<String, String>>,
    failing: RefCell<HashSet<String>>,
    reads: Cell<usize>,
    read_log: RefCell<Vec<String>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folder(self, id: &str, name: &str, parent: &str) -> Self {
        self.entries.borrow_mut().push(RemoteEntry {
            id: id.to_string(),
            name: name.to_string(),
            mime_type: FOLDER_MIME_TYPE.to_string(),
            parents: vec![parent.to_string()],
            modified_time: String::new(),
        });
        self
    }

    pub fn with_file(
        self,
        id: &str,
        name: &str,
        mime_type: &str,
        parent: &str,
        modified_time: &str,
        content: &str,
    ) -> Self {
        self.with_binary_file(
            id,
            name,
            mime_type,
            parent,
            modified_time,
            content.as_bytes().to_vec(),
        )
    }

    pub fn with_binary_file(
        self,
        id: &str,
        name: &str,
        mime_type: &str,
        parent: &str,
        modified_time: &str,
        content: Vec<u8>,
    ) -> Self {
        self.entries.borrow_mut().push(RemoteEntry {
            id: id.to_string(),
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            parents: vec![parent.to_string()],
            modified_time: modified_time.to_string(),
        });
        self.contents.borrow_mut().insert(id.to_string(), content);
        self
    }

    /// Make every listing of `folder_id` fail with a transport error.
    pub fn with_transport_failure(self, folder_id: &str) -> Self {
        self.failing.borrow_mut().insert(folder_id.to_string());
        self
    }

    /// Simulate a remote edit: new content and a new modified time.
    pub fn update_file(&self, id: &str, modified_time: &str, content: &str) {
        for entry in self.entries.borrow_mut().iter_mut() {
            if entry.id == id {
                entry.modified_time = modified_time.to_string();
            }
        }
        self.contents
            .borrow_mut()
            .insert(id.to_string(), content.as_bytes().to_vec());
    }

    /// Number of content reads served so far.
    pub fn content_reads(&self) -> usize {
        self.reads.get()
    }

    /// Ids of files read, in read order.
    pub fn read_log(&self) -> Vec<String> {
        self.read_log.borrow().clone()
    }

    pub fn reset_read_log(&self) {
        self.reads.set(0);
        self.read_log.borrow_mut().clear();
    }
}

impl RemoteDirectory for MemoryDirectory {
    fn list_children(&self, folder_id: &str) -> Result<Vec<RemoteEntry>, ApiError> {
        if self.failing.borrow().contains(folder_id) {
            return Err(ApiError::Transport(format!(
                "listing {} refused by remote",
                folder_id
            )));
        }
        Ok(self
            .entries
            .borrow()
            .iter()
            .filter(|e| e.first_parent() == Some(folder_id))
            .cloned()
            .collect())
    }

    fn read_bytes(&self, file_id: &str) -> Result<Vec<u8>, ApiError> {
        let bytes = self
            .contents
            .borrow()
            .get(file_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(file_id.to_string()))?;
        self.reads.set(self.reads.get() + 1);
        self.read_log.borrow_mut().push(file_id.to_string());
        Ok(bytes)
    }

    fn read_description(&self, file_id: &str) -> Result<String, ApiError> {
        if !self.entries.borrow().iter().any(|e| e.id == file_id) {
            return Err(ApiError::NotFound(file_id.to_string()));
        }
        Ok(self
            .descriptions
            .borrow()
            .get(file_id)
            .cloned()
            .unwrap_or_default())
    }

    fn write_description(&self, file_id: &str, text: &str) -> Result<(), ApiError> {
        if !self.entries.borrow().iter().any(|e| e.id == file_id) {
            return Err(ApiError::NotFound(file_id.to_string()));
        }
        self.descriptions
            .borrow_mut()
            .insert(file_id.to_string(), text.to_string());
        Ok(())
    }
}
