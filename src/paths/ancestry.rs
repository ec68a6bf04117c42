//! Upward walks over the parent relation.
//!
//! The parent relation is free-form user data, so it can dangle or loop. A walk keeps a visited
//! set for its own duration and stops at the first repeated id, returning whatever it collected
//! along with the reason it stopped ([Termination]).
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeSet,
    fmt::{Display, Formatter},
};

use crate::{
    config::{AliasOptions, SlugOptions},
    error::PathError,
    paths::{path::AliasPath, segment::SegmentResolver, SlugCleaner},
    properties::{PageId, PageNode},
    source::NodeStore,
};

/// Why an upward walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Reached a page without a parent.
    Root,
    /// The referenced parent does not exist.
    Missing(PageId),
    /// The referenced parent was already visited during this walk.
    Cycle(PageId),
}

impl Termination {
    pub fn is_truncated(&self) -> bool {
        !matches!(self, Termination::Root)
    }
}

impl Display for Termination {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::Root => write!(f, "root"),
            Termination::Missing(id) => write!(f, "missing parent {id}"),
            Termination::Cycle(id) => write!(f, "cycle at {id}"),
        }
    }
}

/// Ancestor segments of a page, root first, excluding the page itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncestorPath {
    pub path: AliasPath,
    pub termination: Termination,
    /// Number of ancestor pages loaded.
    pub hops: usize,
}

impl AncestorPath {
    fn root() -> Self {
        AncestorPath {
            path: AliasPath::new(),
            termination: Termination::Root,
            hops: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.termination.is_truncated()
    }
}

impl Display for AncestorPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// A page's full path: its ancestry plus its own segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPath {
    pub ancestors: AncestorPath,
    pub segment: String,
}

impl ResolvedPath {
    pub fn full(&self) -> AliasPath {
        self.ancestors.path.join(&self.segment)
    }

    pub fn to_alias(&self, options: &AliasOptions) -> String {
        self.full().to_alias(options)
    }
}

#[derive(Clone, Copy)]
pub struct AncestryWalker<'a> {
    nodes: &'a dyn NodeStore,
    segments: SegmentResolver<'a>,
}

impl<'a> AncestryWalker<'a> {
    pub fn new(nodes: &'a dyn NodeStore, cleaner: &'a dyn SlugCleaner) -> Self {
        AncestryWalker {
            nodes,
            segments: SegmentResolver::new(cleaner),
        }
    }

    pub fn segments(&self) -> &SegmentResolver<'a> {
        &self.segments
    }

    /// Walk from `node`'s parent up to the root.
    ///
    /// Store failures propagate; dangling references and cycles end the walk early and are
    /// reported through [AncestorPath::termination].
    pub fn walk(&self, node: &PageNode, options: &SlugOptions) -> Result<AncestorPath, PathError> {
        let Some(mut current) = node.parent else {
            return Ok(AncestorPath::root());
        };

        let mut visited = BTreeSet::from([node.id]);
        let mut ancestors = AncestorPath::root();
        if !visited.insert(current) {
            tracing::warn!("Page {} lists itself as its parent", node.id);
            ancestors.termination = Termination::Cycle(current);
            return Ok(ancestors);
        }

        loop {
            let Some(ancestor) = self.nodes.load_by_id(&current)? else {
                tracing::info!(
                    "Ancestry of {} truncated: parent {current} does not exist",
                    node.id
                );
                ancestors.termination = Termination::Missing(current);
                return Ok(ancestors);
            };
            ancestors.hops += 1;
            ancestors
                .path
                .prepend(self.segments.resolve_segment(Some(&ancestor), options));
            tracing::debug!(
                "walk {}: hop {} reached {} ('{}')",
                node.id,
                ancestors.hops,
                ancestor.id,
                ancestors.path
            );

            match ancestor.parent {
                None => return Ok(ancestors),
                Some(next) if !visited.insert(next) => {
                    tracing::warn!(
                        "Ancestry of {} truncated: cycle through {next} after {} hops",
                        node.id,
                        ancestors.hops
                    );
                    ancestors.termination = Termination::Cycle(next);
                    return Ok(ancestors);
                }
                Some(next) => current = next,
            }
        }
    }

    /// `/`-joined ancestor segments, root first; empty for root pages.
    pub fn build_ancestor_path(
        &self,
        node: &PageNode,
        options: &SlugOptions,
    ) -> Result<String, PathError> {
        Ok(self.walk(node, options)?.to_string())
    }

    /// Like [Self::build_ancestor_path], loading the page by id first. Unknown ids yield "".
    pub fn build_ancestor_path_for(
        &self,
        id: &PageId,
        options: &SlugOptions,
    ) -> Result<String, PathError> {
        match self.nodes.load_by_id(id)? {
            Some(node) => self.build_ancestor_path(&node, options),
            None => {
                tracing::info!("No page {id}; ancestor path is empty");
                Ok(String::new())
            }
        }
    }

    pub fn resolve(&self, node: &PageNode, options: &SlugOptions) -> Result<ResolvedPath, PathError> {
        Ok(ResolvedPath {
            ancestors: self.walk(node, options)?,
            segment: self.segments.resolve_segment(Some(node), options),
        })
    }

    /// Ancestor path joined with the page's own segment.
    pub fn full_path(&self, node: &PageNode, options: &SlugOptions) -> Result<String, PathError> {
        Ok(self.resolve(node, options)?.full().to_string())
    }
}
