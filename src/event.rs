use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::{
    paths::Termination,
    properties::{CacheTag, PageId},
};

/// Why a cascade left a child page alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The page's alias is managed by hand.
    ManualPath,
    /// The alias store has no record for the page.
    NoAlias,
    /// The recomputed path was empty, or a non-root page had no resolvable ancestry.
    EmptyAncestry,
    /// The page was already handled earlier in the same cascade.
    AlreadyVisited,
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            SkipReason::ManualPath => write!(f, "manual path"),
            SkipReason::NoAlias => write!(f, "no alias"),
            SkipReason::EmptyAncestry => write!(f, "empty ancestry"),
            SkipReason::AlreadyVisited => write!(f, "already visited"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathEvent {
    /// Page, old path, new path
    AliasUpdated(PageId, String, String),
    /// Page, path that was already stored
    AliasUnchanged(PageId, String),
    CacheInvalidated(PageId, Vec<CacheTag>),
    ChildSkipped(PageId, SkipReason),
    /// Page whose ancestry walk stopped early, and why
    WalkTruncated(PageId, Termination),
}

impl PathEvent {
    /// The page this event is about.
    pub fn page(&self) -> PageId {
        match self {
            PathEvent::AliasUpdated(page, _, _) => *page,
            PathEvent::AliasUnchanged(page, _) => *page,
            PathEvent::CacheInvalidated(page, _) => *page,
            PathEvent::ChildSkipped(page, _) => *page,
            PathEvent::WalkTruncated(page, _) => *page,
        }
    }

    /// True for events that reflect a write to the alias store.
    pub fn is_write(&self) -> bool {
        matches!(self, PathEvent::AliasUpdated(..))
    }
}

impl Display for PathEvent {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            PathEvent::AliasUpdated(page, old, new) => {
                write!(f, "AliasUpdated({page}: '{old}' -> '{new}')")
            }
            PathEvent::AliasUnchanged(page, _) => write!(f, "AliasUnchanged({page})"),
            PathEvent::CacheInvalidated(page, tags) => {
                write!(f, "CacheInvalidated({page}, {} tags)", tags.len())
            }
            PathEvent::ChildSkipped(page, reason) => write!(f, "ChildSkipped({page}, {reason})"),
            PathEvent::WalkTruncated(page, termination) => {
                write!(f, "WalkTruncated({page}, {termination})")
            }
        }
    }
}
