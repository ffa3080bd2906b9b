//! Integration tests for drivefold, driven by an in-memory remote

mod cli_parse;
mod collect_cache;
mod front_matter;
mod support;
mod tree_structure;
