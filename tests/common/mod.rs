//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use pathtree_core::{
    config::SlugOptions,
    paths::{AncestryWalker, AnchorCleaner},
    properties::{PageId, PageNode},
    source::{MemoryAliasStore, MemoryNodeStore},
};

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times; subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Build a site from `(title, parent index)` rows; the index refers to an earlier row.
///
/// Returns the stored pages in row order.
#[allow(dead_code)]
pub fn build_site(nodes: &MemoryNodeStore, rows: &[(&str, Option<usize>)]) -> Vec<PageNode> {
    let mut pages: Vec<PageNode> = Vec::new();
    for (title, parent) in rows {
        let mut page = PageNode::new(*title);
        page.parent = parent.map(|idx| pages[idx].id);
        nodes.insert(page.clone());
        pages.push(page);
    }
    pages
}

/// Store every page's current full path as its alias.
#[allow(dead_code)]
pub fn seed_aliases(nodes: &MemoryNodeStore, aliases: &MemoryAliasStore) {
    let walker = AncestryWalker::new(nodes, &AnchorCleaner);
    for page in nodes.snapshot() {
        let path = walker
            .full_path(&page, &SlugOptions::default())
            .unwrap();
        aliases.insert(page.id, path);
    }
}

#[allow(dead_code)]
pub fn alias_of(aliases: &MemoryAliasStore, page: &PageId) -> String {
    aliases.get(page).unwrap_or_default()
}
