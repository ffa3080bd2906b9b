use drivefold::error::ApiError;
use drivefold::remote::{list_recursive, MemoryDirectory, RemoteEntry};
use drivefold::tree::{RootPolicy, TreeBuilder};
use drivefold::types::{FOLDER_MIME_TYPE, MARKDOWN_MIME_TYPE, ROOT_NAME};

use super::support::{project_remote, T0};

fn entry(id: &str, mime: &str, parents: &[&str]) -> RemoteEntry {
    RemoteEntry {
        id: id.to_string(),
        name: format!("{}.md", id),
        mime_type: mime.to_string(),
        parents: parents.iter().map(|p| p.to_string()).collect(),
        modified_time: T0.to_string(),
    }
}

#[test]
fn nested_folders_attach_to_their_parents() {
    let entries = vec![
        entry("A", FOLDER_MIME_TYPE, &["drive"]),
        entry("B", FOLDER_MIME_TYPE, &["A"]),
        entry("f1", MARKDOWN_MIME_TYPE, &["B"]),
    ];
    let tree = TreeBuilder::new().build(&entries).unwrap();

    assert_eq!(tree.get("A").unwrap().subfolders, vec!["B".to_string()]);
    let files: Vec<String> = tree
        .get("B")
        .unwrap()
        .files
        .iter()
        .map(|f| f.to_string())
        .collect();
    assert_eq!(files, vec![format!("f1|{}|f1.md", T0)]);

    let root = tree.root();
    assert_eq!(root.name, ROOT_NAME);
    assert!(root.subfolders.contains(&"A".to_string()));
    assert!(root.subfolders.contains(&"B".to_string()));
}

#[test]
fn recursive_listing_is_preorder() {
    let remote = project_remote();
    let ids: Vec<String> = list_recursive(&remote, "project")
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec!["scenes", "props", "p1", "img", "s1", "s2"]);
}

#[test]
fn listing_builds_rooted_tree() {
    let remote = project_remote();
    let entries = list_recursive(&remote, "project").unwrap();

    let tree = TreeBuilder::new()
        .with_root_policy(RootPolicy::TopLevelOnly)
        .build(&entries)
        .unwrap();
    assert_eq!(tree.root_id, "project");
    assert_eq!(tree.root().subfolders, vec!["scenes".to_string()]);
    assert_eq!(tree.get("props").unwrap().files.len(), 1);

    let broad = TreeBuilder::new().build(&entries).unwrap();
    assert_eq!(
        broad.root().subfolders,
        vec!["scenes".to_string(), "props".to_string()]
    );
}

#[test]
fn transport_failure_aborts_listing() {
    let remote = project_remote().with_transport_failure("props");
    let err = list_recursive(&remote, "project").unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[test]
fn empty_folder_uses_root_hint() {
    let remote = MemoryDirectory::default();
    let entries = list_recursive(&remote, "empty").unwrap();
    assert!(matches!(
        TreeBuilder::new().build(&entries),
        Err(ApiError::EmptyTree)
    ));
    let tree = TreeBuilder::new()
        .with_root_hint("empty")
        .build(&entries)
        .unwrap();
    assert_eq!(tree.root_id, "empty");
    assert!(tree.root().subfolders.is_empty());
}
