//! Result model for command output
//!
//! Every command of the front end maps what it did to a list of result items
//! before rendering.

use serde::{Deserialize, Serialize};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Library,
    Unit,
    Path,
    Error,
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Number of cached units (libraries)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<usize>,

    /// Whether the unit still has to be saved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dirty: Option<bool>,

    /// Library has no backing directory
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub temporary: bool,
}

/// Error information for a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreError {
    pub code: String,
    pub message: String,
}

impl StoreError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    pub kind: Kind,

    /// Library or unit name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Owning library of a unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library: Option<String>,

    /// Filesystem path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Serialized unit payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    pub meta: Meta,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<StoreError>,
}

impl ResultItem {
    fn bare(kind: Kind) -> Self {
        Self {
            kind,
            name: None,
            library: None,
            path: None,
            data: None,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    pub fn library(name: impl Into<String>, path: impl Into<String>) -> Self {
        let mut item = Self::bare(Kind::Library);
        item.name = Some(name.into());
        item.path = Some(path.into());
        item
    }

    pub fn unit(library: impl Into<String>, name: impl Into<String>) -> Self {
        let mut item = Self::bare(Kind::Unit);
        item.library = Some(library.into());
        item.name = Some(name.into());
        item
    }

    pub fn path(path: impl Into<String>) -> Self {
        let mut item = Self::bare(Kind::Path);
        item.path = Some(path.into());
        item
    }

    pub fn error(error: StoreError) -> Self {
        let mut item = Self::bare(Kind::Error);
        item.errors.push(error);
        item
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// A collection of result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }
}
