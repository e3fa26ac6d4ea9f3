//! Identifier normalization
//!
//! Library names are compared through an upper-cased interned key, while the
//! directory that holds a library is always named with the lower-cased form.
//! The two are deliberately separate functions.

use internment::Intern;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Interned identifier; equality and hashing are by interned identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ident(Intern<String>);

impl Ident {
    /// Intern `text` verbatim.
    pub fn new(text: &str) -> Self {
        Ident(Intern::new(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ident({:?})", self.as_str())
    }
}

impl From<&str> for Ident {
    fn from(text: &str) -> Self {
        Ident::new(text)
    }
}

impl Serialize for Ident {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Ident {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Ident::new(&text))
    }
}

/// Comparison key for a library name: ASCII upper-cased, then interned.
pub fn upcase_name(name: &str) -> Ident {
    Ident::new(&name.to_ascii_uppercase())
}

/// Directory segment for a library name. Only used to build paths.
pub fn lib_dir_name(name: &str) -> String {
    name.to_ascii_lowercase()
}
