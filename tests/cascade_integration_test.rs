//! End-to-end cascade tests through the public API.

mod common;

use common::{alias_of, build_site, init_logging, seed_aliases};
use pathtree_core::{
    cascade::CascadeUpdater,
    config::PathConfig,
    event::PathEvent,
    hierarchy::HierarchyAudit,
    paths::{AncestryWalker, AnchorCleaner},
    properties::PageNode,
    source::{MemoryAliasStore, MemoryNodeStore, RecordingInvalidator},
};
use std::sync::mpsc::channel;

#[test]
fn test_docs_rename_scenario() {
    init_logging();
    let nodes = MemoryNodeStore::new();
    let aliases = MemoryAliasStore::new();
    let cache = RecordingInvalidator::new();

    let root = PageNode::new("Docs");
    let guide = PageNode::new("Guide").with_parent(root.id);
    let intro = PageNode::new("Intro")
        .with_parent(guide.id)
        .with_override("getting-started");
    for page in [&root, &guide, &intro] {
        nodes.insert(page.clone());
    }
    seed_aliases(&nodes, &aliases);
    assert_eq!(alias_of(&aliases, &intro.id), "docs/guide/getting-started");

    let root = nodes
        .update(&root.id, |page| page.title = "Documentation".to_string())
        .unwrap();
    let updater = CascadeUpdater::new(&nodes, &aliases, &cache, &AnchorCleaner);
    updater.cascade(&root).unwrap();

    assert_eq!(alias_of(&aliases, &guide.id), "documentation/guide");
    assert_eq!(
        alias_of(&aliases, &intro.id),
        "documentation/guide/getting-started"
    );
    assert_eq!(cache.count_for(&guide.id), 1);
    assert_eq!(cache.count_for(&intro.id), 1);
}

#[test]
fn test_wide_and_deep_site() {
    init_logging();
    let nodes = MemoryNodeStore::new();
    let aliases = MemoryAliasStore::new();
    let cache = RecordingInvalidator::new();

    let pages = build_site(
        &nodes,
        &[
            ("Handbook", None),        // 0
            ("Engineering", Some(0)),  // 1
            ("People", Some(0)),       // 2
            ("On-call", Some(1)),      // 3
            ("Code Review", Some(1)),  // 4
            ("Hiring", Some(2)),       // 5
            ("Escalation", Some(3)),   // 6
            ("Other Root", None),      // 7
            ("Unrelated", Some(7)),    // 8
        ],
    );
    seed_aliases(&nodes, &aliases);
    assert_eq!(
        alias_of(&aliases, &pages[6].id),
        "handbook/engineering/on-call/escalation"
    );

    let root = nodes
        .update(&pages[0].id, |page| {
            page.segment_override = Some("Company Handbook".to_string())
        })
        .unwrap();
    let (tx, rx) = channel();
    let report = CascadeUpdater::new(&nodes, &aliases, &cache, &AnchorCleaner)
        .with_events(tx)
        .cascade(&root)
        .unwrap();

    assert_eq!(report.writes(), 6);
    assert_eq!(
        alias_of(&aliases, &pages[6].id),
        "company-handbook/engineering/on-call/escalation"
    );
    assert_eq!(alias_of(&aliases, &pages[5].id), "company-handbook/people/hiring");
    assert_eq!(alias_of(&aliases, &pages[8].id), "other-root/unrelated");
    assert_eq!(cache.count_for(&pages[8].id), 0);

    let writes = rx.try_iter().filter(PathEvent::is_write).count();
    assert_eq!(writes, 6);

    let audit = HierarchyAudit::from_nodes(nodes.snapshot().iter());
    assert_eq!(audit.descendants(&pages[0].id).len(), 6);
    assert!(audit.report().is_clean());
}

#[test]
fn test_interrupted_cascade_is_repaired_by_rerun() {
    init_logging();
    let nodes = MemoryNodeStore::new();
    let aliases = MemoryAliasStore::new();
    let cache = RecordingInvalidator::new();
    let pages = build_site(
        &nodes,
        &[("Root", None), ("Child", Some(0)), ("Grandchild", Some(1))],
    );
    seed_aliases(&nodes, &aliases);

    // Simulate a crash after the child was written but before the grandchild.
    let root = nodes
        .update(&pages[0].id, |page| page.title = "Base".to_string())
        .unwrap();
    aliases.insert(pages[1].id, "base/child");

    let report = CascadeUpdater::new(&nodes, &aliases, &cache, &AnchorCleaner)
        .cascade(&root)
        .unwrap();
    assert_eq!(report.updated(), vec![pages[2].id]);
    assert_eq!(alias_of(&aliases, &pages[2].id), "base/child/grandchild");
}

#[test]
fn test_config_drives_cleaning() {
    init_logging();
    let config = PathConfig::from_toml_str(
        "[slug]\nseparator = \"_\"\nignore_words = [\"the\"]\n\n[alias]\nleading_slash = true\n",
    )
    .unwrap();
    let nodes = MemoryNodeStore::new();
    let aliases = MemoryAliasStore::new();
    let cache = RecordingInvalidator::new();
    let pages = build_site(
        &nodes,
        &[("The Library", None), ("Rare Books", Some(0))],
    );
    aliases.insert(pages[1].id, "/old");

    CascadeUpdater::new(&nodes, &aliases, &cache, &AnchorCleaner)
        .with_config(config.clone())
        .cascade(&pages[0])
        .unwrap();
    assert_eq!(alias_of(&aliases, &pages[1].id), "/library/rare_books");

    let walker = AncestryWalker::new(&nodes, &AnchorCleaner);
    assert_eq!(
        walker
            .build_ancestor_path(&pages[1], &config.slug)
            .unwrap(),
        "library"
    );
}
