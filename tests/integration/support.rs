use drivefold::remote::MemoryDirectory;
use drivefold::types::MARKDOWN_MIME_TYPE;

pub const T0: &str = "2024-05-01T08:00:00.000Z";
pub const T1: &str = "2024-05-02T09:30:00.000Z";

/// `project` holds `scenes` (two markdown files) which holds `props` (one
/// markdown file and an image). `project` itself sits under `drive`.
pub fn project_remote() -> MemoryDirectory {
    MemoryDirectory::default()
        .with_folder("scenes", "Scenes", "project")
        .with_folder("props", "Props", "scenes")
        .with_file(
            "s1",
            "intro.md",
            MARKDOWN_MIME_TYPE,
            "scenes",
            T0,
            "---\ntitle: Intro\ntags: [day]\ncast: {lead: Ana}\n---\n## Shots:\n- wide\n",
        )
        .with_file(
            "s2",
            "outro.md",
            MARKDOWN_MIME_TYPE,
            "scenes",
            T0,
            "---\ntags: [night]\ncast: {extra: Bo}\n---\n## Shots:\n- close\n- wide\n",
        )
        .with_file(
            "p1",
            "list.md",
            MARKDOWN_MIME_TYPE,
            "props",
            T0,
            "No front matter here.\n## Shots:\n- insert\n",
        )
        .with_file("img", "lamp.jpg", "image/jpeg", "props", T0, "")
}
