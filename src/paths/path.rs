use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::config::AliasOptions;

pub const PATH_SEPARATOR: char = '/';

/// An ordered, root-first list of cleaned segments.
///
/// Empty segments are dropped on construction, so joining never yields doubled, leading or
/// trailing separators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AliasPath {
    segments: Vec<String>,
}

impl AliasPath {
    pub fn new() -> Self {
        AliasPath::default()
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut path = AliasPath::new();
        for segment in segments {
            path.push(segment);
        }
        path
    }

    /// Split a stored alias string back into its segments.
    pub fn parse(alias: &str) -> Self {
        AliasPath::from_segments(alias.split(PATH_SEPARATOR))
    }

    /// Append a segment at the leaf end.
    pub fn push<S: AsRef<str>>(&mut self, segment: S) {
        let trimmed = segment.as_ref().trim_matches(PATH_SEPARATOR);
        if !trimmed.is_empty() {
            self.segments.push(trimmed.to_string());
        }
    }

    /// Insert a segment at the root end.
    pub fn prepend<S: AsRef<str>>(&mut self, segment: S) {
        let trimmed = segment.as_ref().trim_matches(PATH_SEPARATOR);
        if !trimmed.is_empty() {
            self.segments.insert(0, trimmed.to_string());
        }
    }

    pub fn join<S: AsRef<str>>(&self, leaf: S) -> AliasPath {
        let mut joined = self.clone();
        joined.push(leaf);
        joined
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn parent(&self) -> Option<AliasPath> {
        if self.segments.is_empty() {
            return None;
        }
        Some(AliasPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn starts_with(&self, prefix: &AliasPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// The string persisted in the alias store.
    pub fn to_alias(&self, options: &AliasOptions) -> String {
        let joined = self.to_string();
        if options.leading_slash {
            format!("{PATH_SEPARATOR}{joined}")
        } else {
            joined
        }
    }
}

impl Display for AliasPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}
