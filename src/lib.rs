//! # pathtree-core
//!
//! Hierarchical, human-readable paths for tree-structured pages.
//!
//! Pages name an optional parent page. Each page contributes one cleaned segment (its segment
//! override if it has one, its title otherwise), and its full path is the chain of segments from
//! the root down to the page. When a page's segment changes, every descendant's stored alias is
//! stale; this crate recomputes and persists them.
//!
//! ## Architecture
//!
//! - **[`paths::SegmentResolver`]**: one page in, one cleaned segment out
//! - **[`paths::AncestryWalker`]**: walks the parent chain upward, stopping safely at the root,
//!   at a missing parent, or at the first repeated page (cycle)
//! - **[`cascade::CascadeUpdater`]**: pushes a change down to all descendants, updating aliases
//!   and invalidating caches
//! - **[`source`]**: the collaborator traits (`NodeStore`, `AliasStore`, `CacheInvalidator`) and
//!   in-memory implementations
//! - **[`hierarchy`]**: whole-snapshot diagnostics for cycles and dangling parents
//!
//! The parent relation is user-edited data. Nothing guarantees it is acyclic or that every
//! reference resolves, so broken ancestry degrades to a shorter path rather than an error. Only
//! failures of the injected stores are returned as [`PathError`].
//!
//! ## Quick Start
//!
//! ```rust
//! use pathtree_core::{
//!     cascade::CascadeUpdater,
//!     paths::AnchorCleaner,
//!     properties::PageNode,
//!     source::{MemoryAliasStore, MemoryNodeStore, RecordingInvalidator},
//! };
//!
//! # fn main() -> Result<(), pathtree_core::PathError> {
//! let docs = PageNode::new("Docs");
//! let guide = PageNode::new("Guide").with_parent(docs.id);
//! let nodes = MemoryNodeStore::from_nodes([docs.clone(), guide.clone()]);
//! let aliases = MemoryAliasStore::new();
//! aliases.insert(guide.id, "docs/guide");
//! let cache = RecordingInvalidator::new();
//!
//! let docs = nodes.update(&docs.id, |page| page.title = "Documentation".to_string())?;
//! let updater = CascadeUpdater::new(&nodes, &aliases, &cache, &AnchorCleaner);
//! updater.cascade(&docs)?;
//!
//! assert_eq!(aliases.get(&guide.id).as_deref(), Some("documentation/guide"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! Slug cleaning, alias formatting and cascade policy live in [`config::PathConfig`], which can
//! be loaded from TOML through [`config::TomlConfigProvider`].

pub mod cascade;
pub mod config;
pub mod error;
pub mod event;
pub mod hierarchy;
pub mod paths;
pub mod properties;
pub mod source;
#[cfg(test)]
mod tests;

pub use error::*;
