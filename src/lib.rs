//! Drivefold: Drive Folder-Tree Aggregation
//!
//! Walks a remote folder hierarchy, builds an in-memory tree of folders and
//! markdown files, merges the YAML front matter scattered across that tree and
//! caches file content by change fingerprint so repeated passes skip unchanged
//! data. Link formatting and image cropping sit alongside as thin helpers.

pub mod cache;
pub mod collect;
pub mod config;
pub mod crop;
pub mod error;
pub mod frontmatter;
pub mod links;
pub mod logging;
pub mod remote;
pub mod sections;
pub mod session;
pub mod tooling;
pub mod tree;
pub mod types;
