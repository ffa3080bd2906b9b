use drivefold::frontmatter::aggregate;
use drivefold::session::Session;
use drivefold::tree::RootPolicy;
use serde_yaml::{Mapping, Value};

use super::support::project_remote;

fn yaml(s: &str) -> Mapping {
    serde_yaml::from_str(s).unwrap()
}

#[test]
fn render_merges_front_matter_across_tree() {
    let remote = project_remote();
    let mut session = Session::new(&remote).with_root_policy(RootPolicy::TopLevelOnly);
    let pass = session.render("project").unwrap();

    assert_eq!(
        pass.aggregate.config,
        yaml("{title: Intro, tags: [day, night], cast: {lead: Ana, extra: Bo}}")
    );
    // list.md has no front matter; it degrades to a warning
    assert_eq!(pass.aggregate.warnings.len(), 1);
    assert_eq!(pass.aggregate.warnings[0].index, 2);
}

#[test]
fn aggregate_is_idempotent_over_rendered_documents() {
    let remote = project_remote();
    let mut session = Session::new(&remote).with_root_policy(RootPolicy::TopLevelOnly);
    let pass = session.render("project").unwrap();
    let again = aggregate(&pass.collection.contents);
    assert_eq!(pass.aggregate, again);
}

#[test]
fn section_bullets_deduplicate_across_documents() {
    let remote = project_remote();
    let mut session = Session::new(&remote).with_root_policy(RootPolicy::TopLevelOnly);
    let pass = session.render("project").unwrap();
    assert_eq!(
        pass.bullets("shots"),
        vec!["- wide", "- close", "- insert"]
    );
}

#[test]
fn scalar_override_follows_document_order() {
    let docs = [
        "---\nstatus: draft\n---\n",
        "---\nstatus: final\nextra: [1]\n---\n",
    ];
    let merged = aggregate(docs);
    assert_eq!(
        merged.config.get("status"),
        Some(&Value::String("final".to_string()))
    );
}
