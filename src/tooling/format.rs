//! Format trees, collections and media listings as text.

use crate::cache::CacheStats;
use crate::collect::Collection;
use crate::frontmatter::FrontMatterWarning;
use crate::links::{bullet_list, preview_iframe, thumbnail_url, MediaListing};
use crate::tree::FolderTree;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Folder nodes in listing order, root last.
pub fn format_tree_text(tree: &FolderTree) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Folder Tree")));
    out.push_str(&format!("  Root: {}\n", tree.root_id));
    out.push_str(&format!("  Folders: {}\n\n", tree.len().saturating_sub(1)));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Folder", "Name", "Markdown files", "Subfolders"]);
    for (id, node) in tree.iter() {
        table.add_row(vec![
            id.clone(),
            node.name.clone(),
            node.files.len().to_string(),
            node.subfolders.len().to_string(),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

/// Files behind a collection, in traversal order, with cache counters.
pub fn format_collection_text(collection: &Collection, stats: CacheStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Collected Files")));
    if collection.files.is_empty() {
        out.push_str("  No markdown files found.\n");
    } else {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["File", "Name", "Modified", "Bytes"]);
        for (file, content) in collection.files.iter().zip(&collection.contents) {
            table.add_row(vec![
                file.id.clone(),
                file.name.clone(),
                file.modified_time.clone(),
                content.len().to_string(),
            ]);
        }
        out.push_str(&format!("{}\n", table));
    }
    out.push_str(&format!(
        "\n  Cache: {} hits, {} misses\n",
        stats.hits, stats.misses
    ));
    out
}

/// Documents skipped by the aggregator.
pub fn format_warnings_text(warnings: &[FrontMatterWarning]) -> String {
    if warnings.is_empty() {
        return String::new();
    }
    let mut out = format!("{}\n\n", format_section_heading("Skipped Front Matter"));
    for warning in warnings {
        out.push_str(&format!("  #{}: {}\n", warning.index, warning.message));
    }
    out
}

/// Media table plus the copyable link block.
///
/// `thumbnail_sizes` pairs with `listing.images`; missing sizes fall back to
/// the last one given.
pub fn format_media_text(listing: &MediaListing, thumbnail_sizes: &[u32]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Media")));
    if listing.is_empty() {
        out.push_str("  No images or videos in this folder.\n");
        return out;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Kind", "Name", "Id", "Size"]);
    let size_of = |index: usize| {
        thumbnail_sizes
            .get(index)
            .or(thumbnail_sizes.last())
            .copied()
            .unwrap_or_default()
    };
    for (index, item) in listing.images.iter().enumerate() {
        table.add_row(vec![
            "image".to_string(),
            item.name.clone(),
            item.id.clone(),
            size_of(index).to_string(),
        ]);
    }
    for item in &listing.videos {
        table.add_row(vec![
            "video".to_string(),
            item.name.clone(),
            item.id.clone(),
            String::new(),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));

    out.push_str(&format!("{}\n\n", format_section_heading("Links")));
    let images = listing
        .images
        .iter()
        .enumerate()
        .map(|(index, item)| thumbnail_url(&item.id, size_of(index)));
    out.push_str(&bullet_list(images));
    for video in &listing.videos {
        out.push('\n');
        out.push_str(&preview_iframe(&video.id));
    }
    out.push('\n');
    out
}
