//! Recursive Collector
//!
//! Walks a built folder tree depth-first, pre-order: a folder's own markdown
//! files come before the contents of its subfolders. Every file read goes
//! through the session's content cache, fingerprinted by modified time, so a
//! second walk over an unchanged tree does no remote I/O.

use crate::cache::ContentCache;
use crate::error::ApiError;
use crate::remote::RemoteDirectory;
use crate::tree::{FileDescriptor, FolderTree};
use crate::types::FolderId;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Result of one collection walk.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Markdown texts in traversal order.
    pub contents: Vec<String>,
    /// Folder id to the texts collected under it (itself and descendants).
    pub memo: HashMap<FolderId, Vec<String>>,
    /// Descriptors of the files behind `contents`, same order.
    pub files: Vec<FileDescriptor>,
    /// Folder id to the descriptors collected under it.
    pub folder_files: HashMap<FolderId, Vec<FileDescriptor>>,
}

impl Collection {
    /// All texts joined with a blank line.
    pub fn concatenated(&self) -> String {
        self.contents.join("\n\n")
    }
}

/// Collector bound to one remote and one session cache.
pub struct Collector<'a> {
    remote: &'a dyn RemoteDirectory,
    cache: &'a mut ContentCache,
}

impl<'a> Collector<'a> {
    pub fn new(remote: &'a dyn RemoteDirectory, cache: &'a mut ContentCache) -> Self {
        Self { remote, cache }
    }

    /// Collect every markdown text under `folder_id`.
    #[instrument(skip(self, tree))]
    pub fn collect(&mut self, folder_id: &str, tree: &FolderTree) -> Result<Collection, ApiError> {
        let mut out = Collection::default();
        let (contents, files) = self.visit(folder_id, tree, &mut out)?;
        out.contents = contents;
        out.files = files;
        debug!(
            folder_id,
            files = out.files.len(),
            folders = out.memo.len(),
            "Collected folder contents"
        );
        Ok(out)
    }

    fn visit(
        &mut self,
        folder_id: &str,
        tree: &FolderTree,
        out: &mut Collection,
    ) -> Result<(Vec<String>, Vec<FileDescriptor>), ApiError> {
        if let (Some(contents), Some(files)) =
            (out.memo.get(folder_id), out.folder_files.get(folder_id))
        {
            return Ok((contents.clone(), files.clone()));
        }

        let node = tree
            .get(folder_id)
            .ok_or_else(|| ApiError::FolderNotInTree(folder_id.to_string()))?;

        let mut contents = Vec::new();
        let mut files = Vec::new();
        for file in node.files.iter().filter(|f| f.is_markdown_name()) {
            let remote = self.remote;
            let text = self.cache.try_get_or_compute(
                &file.cache_key(),
                file.modified_time.clone(),
                || remote.read_text_content(&file.id),
            )?;
            contents.push(text);
            files.push(file.clone());
        }

        for sub in &node.subfolders {
            let (sub_contents, sub_files) = self.visit(sub, tree, out)?;
            contents.extend(sub_contents);
            files.extend(sub_files);
        }

        out.memo.insert(folder_id.to_string(), contents.clone());
        out.folder_files.insert(folder_id.to_string(), files.clone());
        Ok((contents, files))
    }
}
