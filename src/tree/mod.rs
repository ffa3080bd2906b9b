//! Folder tree
//!
//! In-memory rooted tree of remote folders built from a flat recursive listing.

pub mod builder;
pub mod node;

pub use builder::{FolderTree, RootPolicy, TreeBuilder};
pub use node::{FileDescriptor, FolderNode};
