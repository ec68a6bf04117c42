//! Page, alias and cache-tag value types shared by every part of the path engine.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

use crate::error::PathError;

/// Node bytes handed to [Uuid::now_v6] when minting fresh [PageId]s inside this process.
const PAGE_ID_NODE: [u8; 6] = [0x70, 0x61, 0x74, 0x68, 0x74, 0x72];

/// Page ID
///
/// Opaque, globally unique identifier of a page. Freshly minted ids are v6 UUIDs, so they are
/// `Ord` and sort chronologically within the generating process. Ids coming from an external
/// store can be wrapped with [From<Uuid>] or parsed with [TryFrom<&str>].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct PageId(Uuid);

impl PageId {
    pub fn new() -> Self {
        PageId(Uuid::now_v6(&PAGE_ID_NODE))
    }

    pub fn nil() -> Self {
        PageId(Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for PageId {
    fn default() -> Self {
        PageId::new()
    }
}

impl AsRef<Uuid> for PageId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for PageId {
    fn from(id: Uuid) -> Self {
        PageId(id)
    }
}

impl From<u128> for PageId {
    fn from(id: u128) -> Self {
        PageId(Uuid::from_u128(id))
    }
}

impl TryFrom<&str> for PageId {
    type Error = PathError;

    fn try_from(string: &str) -> Result<Self, Self::Error> {
        Ok(PageId(Uuid::parse_str(string)?))
    }
}

impl Display for PageId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.0.hyphenated().encode_lower(&mut Uuid::encode_buffer())
        )
    }
}

impl From<&PageId> for String {
    fn from(val: &PageId) -> Self {
        format!("{val}")
    }
}

/// A content item that may reference a parent page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageNode {
    pub id: PageId,
    pub title: String,
    /// Preferred over `title` when present and non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_override: Option<String>,
    /// `None` marks a root page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<PageId>,
    #[serde(default = "default_true")]
    pub published: bool,
    /// Whether this page's alias is managed automatically.
    #[serde(default = "default_true")]
    pub path_auto: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PageNode {
    fn default() -> Self {
        PageNode {
            id: PageId::default(),
            title: String::new(),
            segment_override: None,
            parent: None,
            published: true,
            path_auto: true,
        }
    }
}

impl PageNode {
    pub fn new<T: Into<String>>(title: T) -> Self {
        PageNode {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: PageId) -> Self {
        self.id = id;
        self
    }

    pub fn with_parent(mut self, parent: PageId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_override<T: Into<String>>(mut self, segment: T) -> Self {
        self.segment_override = Some(segment.into());
        self
    }

    pub fn unpublished(mut self) -> Self {
        self.published = false;
        self
    }

    pub fn manual_path(mut self) -> Self {
        self.path_auto = false;
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The override text when it carries anything other than whitespace.
    pub fn effective_override(&self) -> Option<&str> {
        self.segment_override
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

/// Persisted mapping from a page to its current full path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRecord {
    pub page: PageId,
    pub path: String,
}

impl AliasRecord {
    pub fn new<P: Into<String>>(page: PageId, path: P) -> Self {
        AliasRecord {
            page,
            path: path.into(),
        }
    }
}

/// Cache tag attached to rendered representations of a page.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CacheTag(String);

impl CacheTag {
    pub fn new<T: Into<String>>(tag: T) -> Self {
        CacheTag(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CacheTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tags that identify every cached representation of `page`.
pub fn tags_for_page(page: &PageId) -> Vec<CacheTag> {
    vec![CacheTag(format!("page:{page}"))]
}
