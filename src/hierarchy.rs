//! Whole-hierarchy diagnostics.
//!
//! Walks and cascades tolerate broken parent data one page at a time. [HierarchyAudit] looks at a
//! snapshot of all pages at once and lists the problems, so they can be reported or repaired
//! before they truncate anyone's alias.
use petgraph::{
    algo::tarjan_scc,
    graphmap::DiGraphMap,
    visit::{Dfs, Reversed},
};
use serde::{Deserialize, Serialize};

use crate::{
    error::PathError,
    properties::{PageId, PageNode},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyReport {
    pub roots: Vec<PageId>,
    /// (page, missing parent) pairs
    pub dangling: Vec<(PageId, PageId)>,
    /// Each cycle's members, sorted
    pub cycles: Vec<Vec<PageId>>,
}

impl HierarchyReport {
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty() && self.cycles.is_empty()
    }

    pub fn to_json(&self) -> Result<String, PathError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Parent relation of a page snapshot, with edges pointing child → parent.
#[derive(Debug, Clone, Default)]
pub struct HierarchyAudit {
    graph: DiGraphMap<PageId, ()>,
    roots: Vec<PageId>,
    dangling: Vec<(PageId, PageId)>,
}

impl HierarchyAudit {
    pub fn from_nodes<'a, I: IntoIterator<Item = &'a PageNode>>(nodes: I) -> Self {
        let nodes = nodes.into_iter().collect::<Vec<_>>();
        let mut graph = DiGraphMap::new();
        for node in nodes.iter() {
            graph.add_node(node.id);
        }

        let mut roots = Vec::new();
        let mut dangling = Vec::new();
        for node in nodes.iter() {
            match node.parent {
                None => roots.push(node.id),
                Some(parent) if graph.contains_node(parent) => {
                    graph.add_edge(node.id, parent, ());
                }
                Some(parent) => dangling.push((node.id, parent)),
            }
        }
        roots.sort();
        dangling.sort();
        tracing::debug!(
            "hierarchy audit: {} pages, {} roots, {} dangling parents",
            graph.node_count(),
            roots.len(),
            dangling.len()
        );

        HierarchyAudit {
            graph,
            roots,
            dangling,
        }
    }

    pub fn roots(&self) -> &[PageId] {
        &self.roots
    }

    pub fn dangling(&self) -> &[(PageId, PageId)] {
        &self.dangling
    }

    /// Strongly connected groups of pages that are each other's ancestors, self-parenting pages
    /// included.
    pub fn cycles(&self) -> Vec<Vec<PageId>> {
        let mut cycles = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|id| self.graph.contains_edge(*id, *id))
            })
            .map(|mut component| {
                component.sort();
                component
            })
            .collect::<Vec<_>>();
        cycles.sort();
        cycles
    }

    /// Every page below `page`, in depth-first order. Cycles are visited once.
    pub fn descendants(&self, page: &PageId) -> Vec<PageId> {
        if !self.graph.contains_node(*page) {
            return Vec::new();
        }
        let reversed = Reversed(&self.graph);
        let mut dfs = Dfs::new(reversed, *page);
        let mut found = Vec::new();
        while let Some(next) = dfs.next(reversed) {
            if next != *page {
                found.push(next);
            }
        }
        found
    }

    pub fn report(&self) -> HierarchyReport {
        HierarchyReport {
            roots: self.roots.clone(),
            dangling: self.dangling.clone(),
            cycles: self.cycles(),
        }
    }
}
