//! Downward propagation of path changes.
//!
//! When a page's segment changes, every published descendant that manages its alias
//! automatically needs its stored alias recomputed. [CascadeUpdater] does this depth first,
//! invalidating cached representations of each page it touches. A single visited set spans the
//! whole cascade, so malformed (cyclic) parent data cannot make it recurse forever.
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, sync::mpsc::Sender};

use crate::{
    config::PathConfig,
    error::PathError,
    event::{PathEvent, SkipReason},
    paths::{AncestryWalker, SlugCleaner},
    properties::{PageId, PageNode},
    source::{AliasStore, CacheInvalidator, NodeStore},
};

/// What happened to one page during a cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageOutcome {
    Updated { old: String, new: String },
    Unchanged(String),
    Skipped(SkipReason),
}

/// Per-page outcomes of one cascade, in visiting order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
    pub outcomes: Vec<(PageId, PageOutcome)>,
}

impl CascadeReport {
    pub fn outcome_for(&self, page: &PageId) -> Option<&PageOutcome> {
        self.outcomes
            .iter()
            .find(|(id, _)| id == page)
            .map(|(_, outcome)| outcome)
    }

    /// Number of alias writes performed.
    pub fn writes(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, PageOutcome::Updated { .. }))
            .count()
    }

    pub fn updated(&self) -> Vec<PageId> {
        self.pages_where(|outcome| matches!(outcome, PageOutcome::Updated { .. }))
    }

    pub fn skipped(&self) -> Vec<PageId> {
        self.pages_where(|outcome| matches!(outcome, PageOutcome::Skipped(_)))
    }

    /// Pages whose alias was checked, whether or not it changed.
    pub fn touched(&self) -> Vec<PageId> {
        self.pages_where(|outcome| !matches!(outcome, PageOutcome::Skipped(_)))
    }

    pub fn to_json(&self) -> Result<String, PathError> {
        Ok(serde_json::to_string(self)?)
    }

    fn pages_where<F: Fn(&PageOutcome) -> bool>(&self, pred: F) -> Vec<PageId> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| pred(outcome))
            .map(|(id, _)| *id)
            .collect()
    }
}

pub struct CascadeUpdater<'a> {
    nodes: &'a dyn NodeStore,
    aliases: &'a dyn AliasStore,
    cache: &'a dyn CacheInvalidator,
    walker: AncestryWalker<'a>,
    config: PathConfig,
    events: Option<Sender<PathEvent>>,
}

impl<'a> CascadeUpdater<'a> {
    pub fn new(
        nodes: &'a dyn NodeStore,
        aliases: &'a dyn AliasStore,
        cache: &'a dyn CacheInvalidator,
        cleaner: &'a dyn SlugCleaner,
    ) -> Self {
        CascadeUpdater {
            nodes,
            aliases,
            cache,
            walker: AncestryWalker::new(nodes, cleaner),
            config: PathConfig::default(),
            events: None,
        }
    }

    pub fn with_config(mut self, config: PathConfig) -> Self {
        self.config = config;
        self
    }

    /// Publish a [PathEvent] for every alias check, skip and invalidation.
    pub fn with_events(mut self, tx: Sender<PathEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn config(&self) -> &PathConfig {
        &self.config
    }

    pub fn walker(&self) -> &AncestryWalker<'a> {
        &self.walker
    }

    /// Recompute and persist the aliases of every descendant of `node`.
    ///
    /// Structural problems (manual aliases, missing alias records, broken ancestry, cycles) are
    /// recorded in the report. Store and cache failures abort the cascade and propagate; pages
    /// already written stay written, and running the cascade again completes the repair.
    pub fn cascade(&self, node: &PageNode) -> Result<CascadeReport, PathError> {
        let mut visited = BTreeSet::from([node.id]);
        let mut report = CascadeReport::default();
        self.cascade_children(&node.id, &mut visited, &mut report)?;
        tracing::info!(
            "cascade from {}: {} pages visited, {} aliases written, {} skipped",
            node.id,
            report.outcomes.len(),
            report.writes(),
            report.skipped().len()
        );
        Ok(report)
    }

    /// Update `node`'s own alias, then cascade to its descendants.
    ///
    /// Descendant paths are built from `node`'s segment rather than its stored alias, so the
    /// cascade runs even when `node` itself was skipped (manual alias, no alias record).
    pub fn refresh(&self, node: &PageNode) -> Result<CascadeReport, PathError> {
        let mut visited = BTreeSet::from([node.id]);
        let mut report = CascadeReport::default();
        self.update_page(node, &mut report)?;
        self.cascade_children(&node.id, &mut visited, &mut report)?;
        tracing::info!(
            "refresh of {}: {} pages visited, {} aliases written",
            node.id,
            report.outcomes.len(),
            report.writes()
        );
        Ok(report)
    }

    fn cascade_children(
        &self,
        parent: &PageId,
        visited: &mut BTreeSet<PageId>,
        report: &mut CascadeReport,
    ) -> Result<(), PathError> {
        for child in self.nodes.find_children(parent)? {
            if !visited.insert(child.id) {
                tracing::warn!(
                    "Page {} reached twice in one cascade (via {parent}); not descending again",
                    child.id
                );
                self.skip(&child.id, SkipReason::AlreadyVisited, report)?;
                continue;
            }
            let descend =
                self.update_page(&child, report)? || self.config.cascade.descend_past_skipped;
            if descend {
                self.cascade_children(&child.id, visited, report)?;
            }
        }
        Ok(())
    }

    /// Returns false when the page was skipped.
    ///
    /// Store and cache work for the page completes before any of its events are published.
    fn update_page(&self, page: &PageNode, report: &mut CascadeReport) -> Result<bool, PathError> {
        if !page.path_auto {
            tracing::debug!("Page {} has a manual alias; leaving it alone", page.id);
            self.skip(&page.id, SkipReason::ManualPath, report)?;
            return Ok(false);
        }

        let mut events = Vec::new();
        let resolved = self.walker.resolve(page, &self.config.slug)?;
        if resolved.ancestors.termination.is_truncated() {
            events.push(PathEvent::WalkTruncated(
                page.id,
                resolved.ancestors.termination,
            ));
        }
        let full = resolved.full();
        if full.is_empty() || (!page.is_root() && resolved.ancestors.path.is_empty()) {
            tracing::info!("Page {} resolved to an unusable path '{full}'", page.id);
            self.publish(events)?;
            self.skip(&page.id, SkipReason::EmptyAncestry, report)?;
            return Ok(false);
        }

        let Some(record) = self.aliases.load_alias(&page.id)? else {
            tracing::debug!("Page {} has no alias record", page.id);
            self.publish(events)?;
            self.skip(&page.id, SkipReason::NoAlias, report)?;
            return Ok(false);
        };

        let new_path = full.to_alias(&self.config.alias);
        let outcome = if record.path != new_path {
            tracing::debug!("alias {}: '{}' -> '{new_path}'", page.id, record.path);
            self.aliases.save_alias(&page.id, &new_path)?;
            events.push(PathEvent::AliasUpdated(
                page.id,
                record.path.clone(),
                new_path.clone(),
            ));
            PageOutcome::Updated {
                old: record.path,
                new: new_path,
            }
        } else {
            events.push(PathEvent::AliasUnchanged(page.id, new_path.clone()));
            PageOutcome::Unchanged(new_path)
        };

        let tags = self.cache.tags_for_page(&page.id);
        self.cache.invalidate(&tags)?;
        events.push(PathEvent::CacheInvalidated(page.id, tags));
        report.outcomes.push((page.id, outcome));

        self.publish(events)?;
        Ok(true)
    }

    fn skip(
        &self,
        page: &PageId,
        reason: SkipReason,
        report: &mut CascadeReport,
    ) -> Result<(), PathError> {
        report.outcomes.push((*page, PageOutcome::Skipped(reason)));
        self.emit(PathEvent::ChildSkipped(*page, reason))
    }

    fn publish(&self, events: Vec<PathEvent>) -> Result<(), PathError> {
        events.into_iter().try_for_each(|event| self.emit(event))
    }

    fn emit(&self, event: PathEvent) -> Result<(), PathError> {
        if let Some(tx) = &self.events {
            tx.send(event)?;
        }
        Ok(())
    }
}
