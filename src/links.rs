//! Drive links: id extraction and embed-code formatting.

use crate::error::ApiError;
use crate::remote::RemoteEntry;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static FILE_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"drive\.google\.com/file/d/([a-zA-Z0-9_-]+)",
        r"id=([a-zA-Z0-9_-]+)",
        r"drive\.google\.com/open\?id=([a-zA-Z0-9_-]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("file id pattern is valid"))
    .collect()
});

static FOLDER_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/folders/([a-zA-Z0-9_-]+)").expect("folder pattern is valid"));

static BARE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("id pattern is valid"));

/// File id from a share link (`/file/d/<id>`, `id=<id>` or `open?id=<id>`).
pub fn file_id_from_link(link: &str) -> Result<String, ApiError> {
    FILE_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(link))
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| ApiError::Validation(format!("no file id in link: {}", link)))
}

/// Folder id from a folder URL containing `/folders/<id>`.
pub fn folder_id_from_url(url: &str) -> Result<String, ApiError> {
    FOLDER_ID_RE
        .captures(url)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| {
            ApiError::Validation(format!(
                "folder link must contain /folders/<ID>: {}",
                url
            ))
        })
}

/// Accept either a folder URL or a bare folder id.
pub fn resolve_folder_id(input: &str) -> Result<String, ApiError> {
    let input = input.trim();
    if BARE_ID_RE.is_match(input) {
        return Ok(input.to_string());
    }
    folder_id_from_url(input)
}

/// Accept either a file share link or a bare file id.
pub fn resolve_file_id(input: &str) -> Result<String, ApiError> {
    let input = input.trim();
    if BARE_ID_RE.is_match(input) {
        return Ok(input.to_string());
    }
    file_id_from_link(input)
}

pub fn download_url(file_id: &str) -> String {
    format!("https://drive.google.com/uc?export=download&id={}", file_id)
}

/// Thumbnail URL whose longest side is `size` pixels.
pub fn thumbnail_url(file_id: &str, size: u32) -> String {
    format!("https://drive.google.com/thumbnail?id={}&sz=s{}", file_id, size)
}

pub fn preview_iframe(file_id: &str) -> String {
    format!(
        "<iframe src='https://drive.google.com/file/d/{}/preview' width='1024' height='576' \
         allow='autoplay' allowfullscreen webkitallowfullscreen mozallowfullscreen></iframe>",
        file_id
    )
}

pub fn image_html(file_id: &str, alt: &str, size: u32) -> String {
    format!(
        "<img src='{}' alt='{}' style='width:100%; border-radius:6px;'>",
        thumbnail_url(file_id, size),
        alt.replace('\'', "&#39;")
    )
}

pub fn image_markdown(file_id: &str, size: u32) -> String {
    format!("![Preview]({})", thumbnail_url(file_id, size))
}

/// Markdown bullet list of links.
pub fn bullet_list<I, S>(links: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    links
        .into_iter()
        .map(|l| format!("- {}", l.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Named media file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaItem {
    pub name: String,
    pub id: String,
}

/// Images and videos directly inside a folder, each sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaListing {
    pub images: Vec<MediaItem>,
    pub videos: Vec<MediaItem>,
}

impl MediaListing {
    pub fn from_entries(entries: &[RemoteEntry]) -> Self {
        let pick = |keep: fn(&RemoteEntry) -> bool| {
            let mut items: Vec<MediaItem> = entries
                .iter()
                .filter(|e| keep(e))
                .map(|e| MediaItem {
                    name: e.name.clone(),
                    id: e.id.clone(),
                })
                .collect();
            items.sort_by(|a, b| a.name.cmp(&b.name));
            items
        };
        Self {
            images: pick(RemoteEntry::is_image),
            videos: pick(RemoteEntry::is_video),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.videos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_id_patterns() {
        assert_eq!(
            file_id_from_link("https://drive.google.com/file/d/1AbC-_x/view?usp=sharing").unwrap(),
            "1AbC-_x"
        );
        assert_eq!(
            file_id_from_link("https://drive.google.com/open?id=XyZ9").unwrap(),
            "XyZ9"
        );
        assert_eq!(
            file_id_from_link("https://drive.google.com/uc?export=download&id=k_1").unwrap(),
            "k_1"
        );
    }

    #[test]
    fn test_invalid_links_are_validation_errors() {
        assert!(matches!(
            file_id_from_link("https://example.com/nothing"),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            folder_id_from_url("https://drive.google.com/drive/my-drive"),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_resolve_folder_id_accepts_url_or_id() {
        assert_eq!(
            resolve_folder_id("https://drive.google.com/drive/folders/1FoLd?usp=share").unwrap(),
            "1FoLd"
        );
        assert_eq!(resolve_folder_id(" 1FoLd ").unwrap(), "1FoLd");
    }

    #[test]
    fn test_embed_formats() {
        assert_eq!(
            thumbnail_url("abc", 1920),
            "https://drive.google.com/thumbnail?id=abc&sz=s1920"
        );
        assert_eq!(
            image_markdown("abc", 800),
            "![Preview](https://drive.google.com/thumbnail?id=abc&sz=s800)"
        );
        assert!(image_html("abc", "it's", 10).contains("alt='it&#39;s'"));
        assert!(preview_iframe("v1").contains("/file/d/v1/preview"));
        assert_eq!(bullet_list(["a", "b"]), "- a\n- b");
    }

    #[test]
    fn test_media_listing_sorts_and_splits() {
        let entry = |id: &str, name: &str, mime: &str| RemoteEntry {
            id: id.to_string(),
            name: name.to_string(),
            mime_type: mime.to_string(),
            parents: vec!["top".to_string()],
            modified_time: String::new(),
        };
        let listing = MediaListing::from_entries(&[
            entry("2", "b.png", "image/png"),
            entry("1", "a.jpg", "image/jpeg"),
            entry("3", "clip.mp4", "video/mp4"),
            entry("4", "notes.md", "text/markdown"),
        ]);
        let names: Vec<&str> = listing.images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);
        assert_eq!(listing.videos.len(), 1);
    }
}
