//! Tree construction from a flat listing.

use super::node::{FileDescriptor, FolderNode};
use crate::error::ApiError;
use crate::remote::RemoteEntry;
use crate::types::{FolderId, ROOT_NAME};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Which folders the synthetic root lists as subfolders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootPolicy {
    /// Every folder in the tree, nested ones included.
    #[default]
    AllFolders,
    /// Only folders whose parent is not itself in the tree.
    TopLevelOnly,
}

/// Built tree: folder nodes in listing order plus the synthetic root.
#[derive(Debug, Clone, Serialize)]
pub struct FolderTree {
    pub root_id: FolderId,
    order: Vec<FolderId>,
    nodes: HashMap<FolderId, FolderNode>,
}

impl FolderTree {
    /// Assemble a tree from already-built nodes, e.g. one restored from JSON.
    pub fn from_nodes(
        root_id: impl Into<FolderId>,
        nodes: Vec<(FolderId, FolderNode)>,
    ) -> Result<Self, ApiError> {
        let root_id = root_id.into();
        let order: Vec<FolderId> = nodes.iter().map(|(id, _)| id.clone()).collect();
        let nodes: HashMap<FolderId, FolderNode> = nodes.into_iter().collect();
        if !nodes.contains_key(&root_id) {
            return Err(ApiError::FolderNotInTree(root_id));
        }
        Ok(Self {
            root_id,
            order,
            nodes,
        })
    }

    pub fn get(&self, folder_id: &str) -> Option<&FolderNode> {
        self.nodes.get(folder_id)
    }

    pub fn root(&self) -> &FolderNode {
        &self.nodes[&self.root_id]
    }

    pub fn contains(&self, folder_id: &str) -> bool {
        self.nodes.contains_key(folder_id)
    }

    /// Nodes in insertion order; the root comes last.
    pub fn iter(&self) -> impl Iterator<Item = (&FolderId, &FolderNode)> {
        self.order.iter().map(move |id| (id, &self.nodes[id]))
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Tree builder
pub struct TreeBuilder {
    root_policy: RootPolicy,
    root_hint: Option<FolderId>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            root_policy: RootPolicy::default(),
            root_hint: None,
        }
    }

    pub fn with_root_policy(mut self, policy: RootPolicy) -> Self {
        self.root_policy = policy;
        self
    }

    /// Root id preferred when it is among the unresolved parents, and used
    /// as-is when the listing yields no candidate (e.g. an empty folder).
    pub fn with_root_hint(mut self, folder_id: impl Into<FolderId>) -> Self {
        self.root_hint = Some(folder_id.into());
        self
    }

    pub fn build(&self, entries: &[RemoteEntry]) -> Result<FolderTree, ApiError> {
        let mut order: Vec<FolderId> = Vec::new();
        let mut nodes: HashMap<FolderId, FolderNode> = HashMap::new();

        for entry in entries.iter().filter(|e| e.is_folder()) {
            if !nodes.contains_key(&entry.id) {
                order.push(entry.id.clone());
            }
            nodes.insert(entry.id.clone(), FolderNode::new(&entry.name));
        }

        let mut candidates: BTreeSet<FolderId> = BTreeSet::new();
        let mut top_level: Vec<FolderId> = Vec::new();

        for entry in entries {
            let Some(parent_id) = entry.first_parent() else {
                if entry.is_folder() {
                    top_level.push(entry.id.clone());
                }
                continue;
            };
            let Some(parent) = nodes.get_mut(parent_id) else {
                candidates.insert(parent_id.to_string());
                if entry.is_folder() {
                    top_level.push(entry.id.clone());
                }
                continue;
            };

            if entry.is_folder() {
                parent.subfolders.push(entry.id.clone());
            } else if entry.is_markdown() {
                parent.files.push(FileDescriptor::new(
                    &entry.id,
                    &entry.modified_time,
                    &entry.name,
                ));
            }
        }

        let hinted = self
            .root_hint
            .as_ref()
            .filter(|hint| candidates.contains(hint.as_str()));
        let root_id = match (hinted, candidates.iter().next()) {
            (Some(hint), _) => hint.clone(),
            (None, Some(first)) => {
                if candidates.len() > 1 {
                    warn!(
                        candidates = ?candidates,
                        chosen = %first,
                        "Listing has several unresolved parents; picking the smallest id as root"
                    );
                }
                first.clone()
            }
            (None, None) => self.root_hint.clone().ok_or(ApiError::EmptyTree)?,
        };

        let subfolders = match self.root_policy {
            RootPolicy::AllFolders => order.clone(),
            RootPolicy::TopLevelOnly => top_level,
        };
        if nodes.contains_key(&root_id) {
            // Only reachable through a root hint naming a listed folder.
            order.retain(|id| id != &root_id);
        }
        order.push(root_id.clone());
        nodes.insert(
            root_id.clone(),
            FolderNode {
                name: ROOT_NAME.to_string(),
                files: Vec::new(),
                subfolders: subfolders.into_iter().filter(|id| id != &root_id).collect(),
            },
        );

        debug!(
            root_id = %root_id,
            folders = nodes.len() - 1,
            "Built folder tree"
        );
        Ok(FolderTree {
            root_id,
            order,
            nodes,
        })
    }
}
