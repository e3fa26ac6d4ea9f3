//! Compilation units as seen by the store
//!
//! The store treats units as opaque values that know their own identifier
//! and can be serialized. `DesignUnit` is the concrete unit used by the
//! command-line front end.

pub mod frame;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::ident::Ident;

/// A value that can live in a library.
pub trait Unit: Serialize + DeserializeOwned {
    /// Identifier of the unit; its text is also the unit's file name.
    fn ident(&self) -> Ident;
}

/// The kind of a design unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Entity,
    Architecture,
    Package,
    PackageBody,
    Configuration,
}

impl std::str::FromStr for UnitKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "entity" => Ok(UnitKind::Entity),
            "architecture" | "arch" => Ok(UnitKind::Architecture),
            "package" => Ok(UnitKind::Package),
            "package_body" | "package-body" | "body" => Ok(UnitKind::PackageBody),
            "configuration" | "config" => Ok(UnitKind::Configuration),
            _ => Err(format!("Unknown unit kind: {}", s)),
        }
    }
}

/// A named design unit with its dependencies and optional source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignUnit {
    pub name: Ident,
    pub kind: UnitKind,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends: Vec<Ident>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl DesignUnit {
    pub fn new(name: impl Into<Ident>, kind: UnitKind) -> Self {
        Self {
            name: name.into(),
            kind,
            depends: Vec::new(),
            source: None,
        }
    }

    pub fn with_depends(mut self, depends: Vec<Ident>) -> Self {
        self.depends = depends;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Unit for DesignUnit {
    fn ident(&self) -> Ident {
        self.name
    }
}
