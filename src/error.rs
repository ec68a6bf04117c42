use std::{io, sync::mpsc::SendError};

use regex::Error as RegexError;
use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;

use crate::event::PathEvent;

/// Errors surfaced by the path engine.
///
/// Structural anomalies in the page hierarchy (dangling parents, cycles, pages without an alias)
/// are never errors. Only failures of the injected collaborators and of configuration loading
/// end up here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum PathError {
    #[error("Event channel error: {0}")]
    Channel(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl PathError {
    /// True when the error originates from a store or cache collaborator rather than from this
    /// crate's own configuration handling.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, PathError::Storage(_) | PathError::Io(_))
    }
}

impl From<toml::de::Error> for PathError {
    fn from(src: toml::de::Error) -> PathError {
        PathError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for PathError {
    fn from(src: toml::ser::Error) -> PathError {
        PathError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for PathError {
    fn from(src: JsonError) -> PathError {
        PathError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<uuid::Error> for PathError {
    fn from(src: uuid::Error) -> PathError {
        PathError::Serialization(format!("UUID conversion failed: {src}"))
    }
}

impl From<io::Error> for PathError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => PathError::NotFound(format!("{x}")),
            _ => PathError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<RegexError> for PathError {
    fn from(x: RegexError) -> Self {
        PathError::Config(format!("Regex parse failed: {x}"))
    }
}

impl From<SendError<PathEvent>> for PathError {
    fn from(x: SendError<PathEvent>) -> Self {
        PathError::Channel(format!(
            "Channel update send Error, could not transmit path event {:?}",
            x.0
        ))
    }
}
