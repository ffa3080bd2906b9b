//! Session
//!
//! One session owns one content cache and borrows an injected remote. Each
//! render pass enumerates the folder, builds the tree, collects markdown
//! through the cache and aggregates front matter. Repeated passes over an
//! unchanged folder read no file content.

use crate::cache::{CacheStats, ContentCache};
use crate::collect::{Collection, Collector};
use crate::error::ApiError;
use crate::frontmatter::{aggregate, Aggregate};
use crate::links::MediaListing;
use crate::remote::{list_recursive, RemoteDirectory, RemoteEntry};
use crate::sections::collect_bullet_items;
use crate::tree::{FolderTree, RootPolicy, TreeBuilder};
use serde::Serialize;
use tracing::{info, instrument};

/// Output of one render pass.
#[derive(Debug, Clone, Serialize)]
pub struct RenderPass {
    pub tree: FolderTree,
    #[serde(skip)]
    pub collection: Collection,
    pub aggregate: Aggregate,
}

impl RenderPass {
    /// Bullets under `## <section>:` across every collected document.
    pub fn bullets(&self, section: &str) -> Vec<String> {
        collect_bullet_items(&self.collection.contents, section)
    }
}

pub struct Session<'a> {
    remote: &'a dyn RemoteDirectory,
    cache: ContentCache,
    root_policy: RootPolicy,
}

impl<'a> Session<'a> {
    pub fn new(remote: &'a dyn RemoteDirectory) -> Self {
        Self {
            remote,
            cache: ContentCache::new(),
            root_policy: RootPolicy::default(),
        }
    }

    pub fn with_root_policy(mut self, policy: RootPolicy) -> Self {
        self.root_policy = policy;
        self
    }

    pub fn remote(&self) -> &dyn RemoteDirectory {
        self.remote
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Recursive listing of `folder_id`.
    pub fn enumerate(&self, folder_id: &str) -> Result<Vec<RemoteEntry>, ApiError> {
        list_recursive(self.remote, folder_id)
    }

    /// Tree of the markdown files under `folder_id`.
    pub fn build_tree(&self, folder_id: &str) -> Result<FolderTree, ApiError> {
        let entries = self.enumerate(folder_id)?;
        self.tree_from_entries(folder_id, &entries)
    }

    fn tree_from_entries(
        &self,
        folder_id: &str,
        entries: &[RemoteEntry],
    ) -> Result<FolderTree, ApiError> {
        TreeBuilder::new()
            .with_root_policy(self.root_policy)
            .with_root_hint(folder_id)
            .build(entries)
    }

    /// Enumerate, build, collect from the tree root, aggregate.
    ///
    /// Any remote failure aborts the pass; cache entries written before the
    /// failure stay valid for the next pass.
    #[instrument(skip(self))]
    pub fn render(&mut self, folder_id: &str) -> Result<RenderPass, ApiError> {
        let tree = self.build_tree(folder_id)?;
        let collection =
            Collector::new(self.remote, &mut self.cache).collect(&tree.root_id, &tree)?;
        let aggregate = aggregate(&collection.contents);
        let stats = self.cache.stats();
        info!(
            folder_id,
            folders = tree.len(),
            documents = collection.contents.len(),
            warnings = aggregate.warnings.len(),
            cache_hits = stats.hits,
            cache_misses = stats.misses,
            "Render pass complete"
        );
        Ok(RenderPass {
            tree,
            collection,
            aggregate,
        })
    }

    /// Images and videos directly inside `folder_id`.
    pub fn media(&self, folder_id: &str) -> Result<MediaListing, ApiError> {
        let entries = self.remote.list_children(folder_id)?;
        Ok(MediaListing::from_entries(&entries))
    }

    /// Append a history line to a file description; returns the stored value.
    pub fn record_history(&self, file_id: &str, entry: &str) -> Result<String, ApiError> {
        let stored = self.remote.append_description(file_id, entry)?;
        info!(file_id, "Appended description history");
        Ok(stored)
    }
}
