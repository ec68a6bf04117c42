//! Collaborator interfaces consumed by the path engine, plus in-memory implementations.
//!
//! The engine never reaches for global services: every store and cache is handed in explicitly.
//! The `Memory*` types are complete, thread-safe implementations suitable for tests, benchmarks
//! and small embedded uses.
use parking_lot::{Mutex, RwLock};
use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::{
    error::PathError,
    properties::{tags_for_page, AliasRecord, CacheTag, PageId, PageNode},
};

pub trait NodeStore: Sync {
    /// `Ok(None)` when no page has this id.
    fn load_by_id(&self, id: &PageId) -> Result<Option<PageNode>, PathError>;

    /// Published pages whose parent is `parent`.
    fn find_children(&self, parent: &PageId) -> Result<Vec<PageNode>, PathError>;
}

pub trait AliasStore: Sync {
    fn load_alias(&self, page: &PageId) -> Result<Option<AliasRecord>, PathError>;

    fn save_alias(&self, page: &PageId, path: &str) -> Result<(), PathError>;
}

pub trait CacheInvalidator: Sync {
    fn invalidate(&self, tags: &[CacheTag]) -> Result<(), PathError>;

    fn tags_for_page(&self, page: &PageId) -> Vec<CacheTag> {
        tags_for_page(page)
    }
}

#[derive(Debug, Default)]
pub struct MemoryNodeStore {
    nodes: RwLock<BTreeMap<PageId, PageNode>>,
}

impl MemoryNodeStore {
    pub fn new() -> Self {
        MemoryNodeStore::default()
    }

    pub fn from_nodes<I: IntoIterator<Item = PageNode>>(nodes: I) -> Self {
        let store = MemoryNodeStore::new();
        for node in nodes {
            store.insert(node);
        }
        store
    }

    /// Insert or replace a page, returning the previous version.
    pub fn insert(&self, node: PageNode) -> Option<PageNode> {
        self.nodes.write().insert(node.id, node)
    }

    pub fn remove(&self, id: &PageId) -> Option<PageNode> {
        self.nodes.write().remove(id)
    }

    pub fn get(&self, id: &PageId) -> Option<PageNode> {
        self.nodes.read().get(id).cloned()
    }

    /// Apply `edit` to a stored page and return the updated copy.
    pub fn update<F: FnOnce(&mut PageNode)>(
        &self,
        id: &PageId,
        edit: F,
    ) -> Result<PageNode, PathError> {
        let mut nodes = self.nodes.write();
        let node = nodes
            .get_mut(id)
            .ok_or_else(|| PathError::NotFound(format!("page {id}")))?;
        edit(node);
        Ok(node.clone())
    }

    pub fn snapshot(&self) -> Vec<PageNode> {
        self.nodes.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }
}

impl NodeStore for MemoryNodeStore {
    fn load_by_id(&self, id: &PageId) -> Result<Option<PageNode>, PathError> {
        Ok(self.get(id))
    }

    fn find_children(&self, parent: &PageId) -> Result<Vec<PageNode>, PathError> {
        Ok(self
            .nodes
            .read()
            .values()
            .filter(|node| node.published && node.parent.as_ref() == Some(parent))
            .cloned()
            .collect())
    }
}

/// Alias store that counts writes made through [AliasStore::save_alias].
#[derive(Debug, Default)]
pub struct MemoryAliasStore {
    aliases: RwLock<BTreeMap<PageId, String>>,
    writes: AtomicUsize,
}

impl MemoryAliasStore {
    pub fn new() -> Self {
        MemoryAliasStore::default()
    }

    /// Seed an alias without counting it as a write.
    pub fn insert<P: Into<String>>(&self, page: PageId, path: P) {
        self.aliases.write().insert(page, path.into());
    }

    pub fn get(&self, page: &PageId) -> Option<String> {
        self.aliases.read().get(page).cloned()
    }

    pub fn remove(&self, page: &PageId) -> Option<String> {
        self.aliases.write().remove(page)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn reset_write_count(&self) {
        self.writes.store(0, Ordering::SeqCst);
    }
}

impl AliasStore for MemoryAliasStore {
    fn load_alias(&self, page: &PageId) -> Result<Option<AliasRecord>, PathError> {
        Ok(self.get(page).map(|path| AliasRecord::new(*page, path)))
    }

    fn save_alias(&self, page: &PageId, path: &str) -> Result<(), PathError> {
        self.aliases.write().insert(*page, path.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Cache invalidator that records every tag it is asked to drop, in order.
#[derive(Debug, Default)]
pub struct RecordingInvalidator {
    invalidated: Mutex<Vec<CacheTag>>,
}

impl RecordingInvalidator {
    pub fn new() -> Self {
        RecordingInvalidator::default()
    }

    pub fn tags(&self) -> Vec<CacheTag> {
        self.invalidated.lock().clone()
    }

    /// How many times tags for `page` were invalidated.
    pub fn count_for(&self, page: &PageId) -> usize {
        let page_tags = tags_for_page(page);
        self.invalidated
            .lock()
            .iter()
            .filter(|tag| page_tags.contains(tag))
            .count()
    }

    pub fn clear(&self) {
        self.invalidated.lock().clear();
    }
}

impl CacheInvalidator for RecordingInvalidator {
    fn invalidate(&self, tags: &[CacheTag]) -> Result<(), PathError> {
        tracing::debug!("invalidating {} cache tags", tags.len());
        self.invalidated.lock().extend_from_slice(tags);
        Ok(())
    }
}
