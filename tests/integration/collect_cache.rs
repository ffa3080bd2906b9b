use drivefold::cache::ContentCache;
use drivefold::collect::Collector;
use drivefold::error::ApiError;
use drivefold::remote::{list_recursive, MemoryDirectory};
use drivefold::session::Session;
use drivefold::tree::{RootPolicy, TreeBuilder};
use drivefold::types::MARKDOWN_MIME_TYPE;

use super::support::{project_remote, T0, T1};

#[test]
fn second_collect_reads_nothing() {
    let remote = project_remote();
    let entries = list_recursive(&remote, "project").unwrap();
    let tree = TreeBuilder::new()
        .with_root_policy(RootPolicy::TopLevelOnly)
        .build(&entries)
        .unwrap();
    let mut cache = ContentCache::new();

    let first = Collector::new(&remote, &mut cache)
        .collect("scenes", &tree)
        .unwrap();
    assert_eq!(remote.content_reads(), 3);

    remote.reset_read_log();
    let second = Collector::new(&remote, &mut cache)
        .collect("scenes", &tree)
        .unwrap();
    assert_eq!(remote.content_reads(), 0);
    assert_eq!(first.contents, second.contents);
}

#[test]
fn changed_fingerprint_rereads_only_that_file() {
    let remote = project_remote();
    let mut session = Session::new(&remote).with_root_policy(RootPolicy::TopLevelOnly);
    let before = session.render("project").unwrap();
    assert_eq!(remote.content_reads(), 3);

    remote.update_file("s2", T1, "---\ntags: [dusk]\n---\n");
    remote.reset_read_log();
    let after = session.render("project").unwrap();

    assert_eq!(remote.read_log(), vec!["s2".to_string()]);
    assert_ne!(before.collection.contents, after.collection.contents);
    assert_eq!(session.cache().len(), 3);
}

#[test]
fn content_change_without_new_fingerprint_is_not_seen() {
    let remote = project_remote();
    let mut session = Session::new(&remote).with_root_policy(RootPolicy::TopLevelOnly);
    let before = session.render("project").unwrap();

    remote.update_file("s1", T0, "---\ntitle: Changed\n---\n");
    let after = session.render("project").unwrap();
    assert_eq!(before.collection.contents, after.collection.contents);
}

#[test]
fn traversal_is_preorder_per_folder() {
    let remote = project_remote();
    let mut session = Session::new(&remote).with_root_policy(RootPolicy::TopLevelOnly);
    let pass = session.render("project").unwrap();
    let ids: Vec<&str> = pass
        .collection
        .files
        .iter()
        .map(|f| f.id.as_str())
        .collect();
    assert_eq!(ids, vec!["s1", "s2", "p1"]);
    assert_eq!(pass.collection.memo["props"].len(), 1);
    assert_eq!(pass.collection.memo["scenes"].len(), 3);
}

#[test]
fn non_utf8_content_aborts_the_pass() {
    let remote = project_remote().with_binary_file(
        "bad",
        "broken.md",
        MARKDOWN_MIME_TYPE,
        "props",
        T0,
        vec![0xff, 0xfe, 0x00],
    );
    let mut session = Session::new(&remote);
    let err = session.render("project").unwrap_err();
    assert!(matches!(err, ApiError::Decode { ref file_id, .. } if file_id == "bad"));
}

#[test]
fn failed_pass_keeps_earlier_cache_entries() {
    let remote = project_remote().with_binary_file(
        "bad",
        "broken.md",
        MARKDOWN_MIME_TYPE,
        "props",
        T0,
        vec![0xff],
    );
    let mut session = Session::new(&remote).with_root_policy(RootPolicy::TopLevelOnly);
    assert!(session.render("project").is_err());
    assert!(session.cache().contains("folder_contents_s1|intro.md"));
}

#[test]
fn session_caches_are_isolated() {
    let remote = project_remote();
    Session::new(&remote).render("project").unwrap();
    let reads = remote.content_reads();
    Session::new(&remote).render("project").unwrap();
    assert!(remote.content_reads() > reads);
}

#[test]
fn missing_remote_file_is_not_found() {
    let remote = MemoryDirectory::default();
    let err = Session::new(&remote)
        .record_history("ghost", "entry")
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
