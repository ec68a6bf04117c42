//! Shared test utilities for walk and cascade testing

use crate::{
    cascade::CascadeUpdater,
    config::{PathConfig, SlugOptions},
    error::PathError,
    paths::{AncestryWalker, AnchorCleaner},
    properties::{AliasRecord, PageId, PageNode},
    source::{AliasStore, MemoryAliasStore, MemoryNodeStore, NodeStore, RecordingInvalidator},
};

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// A page with a predictable id, so cycles can be wired up before both ends exist.
pub fn create_test_page(id: u128, title: &str, parent: Option<u128>) -> PageNode {
    let mut node = PageNode::new(title).with_id(PageId::from(id));
    node.parent = parent.map(PageId::from);
    node
}

pub fn id(n: u128) -> PageId {
    PageId::from(n)
}

/// In-memory stores bundled together.
#[derive(Default)]
pub struct TestSite {
    pub nodes: MemoryNodeStore,
    pub aliases: MemoryAliasStore,
    pub cache: RecordingInvalidator,
}

impl TestSite {
    pub fn new<I: IntoIterator<Item = PageNode>>(pages: I) -> Self {
        init_logging();
        TestSite {
            nodes: MemoryNodeStore::from_nodes(pages),
            ..Default::default()
        }
    }

    pub fn walker(&self) -> AncestryWalker<'_> {
        AncestryWalker::new(&self.nodes, &AnchorCleaner)
    }

    pub fn updater(&self) -> CascadeUpdater<'_> {
        CascadeUpdater::new(&self.nodes, &self.aliases, &self.cache, &AnchorCleaner)
    }

    pub fn updater_with(&self, config: PathConfig) -> CascadeUpdater<'_> {
        self.updater().with_config(config)
    }

    /// Seed every page's alias with its currently computed full path.
    pub fn seed_aliases(&self) {
        let walker = self.walker();
        for page in self.nodes.snapshot() {
            let path = walker
                .full_path(&page, &SlugOptions::default())
                .expect("memory store cannot fail");
            self.aliases.insert(page.id, path);
        }
    }

    pub fn page(&self, n: u128) -> PageNode {
        self.nodes.get(&id(n)).expect("test page exists")
    }

    pub fn alias(&self, n: u128) -> Option<String> {
        self.aliases.get(&id(n))
    }

    pub fn rename(&self, n: u128, title: &str) -> PageNode {
        self.nodes
            .update(&id(n), |page| page.title = title.to_string())
            .expect("test page exists")
    }
}

/// Root "Docs" (1) <- "Guide" (2) <- "Intro" (3, override "getting-started"), aliases seeded.
pub fn create_docs_site() -> TestSite {
    let site = TestSite::new([
        create_test_page(1, "Docs", None),
        create_test_page(2, "Guide", Some(1)),
        create_test_page(3, "Intro", Some(2)).with_override("getting-started"),
    ]);
    site.seed_aliases();
    site
}

/// Node store whose every call fails, standing in for an unreachable database.
pub struct FailingNodeStore;

impl NodeStore for FailingNodeStore {
    fn load_by_id(&self, _id: &PageId) -> Result<Option<PageNode>, PathError> {
        Err(PathError::Storage("node store offline".to_string()))
    }

    fn find_children(&self, _parent: &PageId) -> Result<Vec<PageNode>, PathError> {
        Err(PathError::Storage("node store offline".to_string()))
    }
}

/// Alias store that reads fine but rejects writes.
pub struct ReadOnlyAliasStore(pub MemoryAliasStore);

impl AliasStore for ReadOnlyAliasStore {
    fn load_alias(&self, page: &PageId) -> Result<Option<AliasRecord>, PathError> {
        self.0.load_alias(page)
    }

    fn save_alias(&self, page: &PageId, _path: &str) -> Result<(), PathError> {
        Err(PathError::Storage(format!("alias for {page} is read-only")))
    }
}
