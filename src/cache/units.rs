//! In-memory unit cache with dirty tracking
//!
//! Entries keep insertion order for iteration; an ident index makes lookups
//! constant time. Nothing is ever evicted.

use std::collections::HashMap;
use std::rc::Rc;

use crate::core::ident::Ident;
use crate::unit::Unit;

#[derive(Debug)]
pub struct CacheEntry<U> {
    pub unit: Rc<U>,
    pub dirty: bool,
}

/// Returned when a bounded cache has no room left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheFull {
    pub capacity: usize,
}

#[derive(Debug)]
pub struct UnitCache<U> {
    entries: Vec<CacheEntry<U>>,
    index: HashMap<Ident, usize>,
    capacity: Option<usize>,
}

impl<U: Unit> UnitCache<U> {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            capacity,
        }
    }

    pub fn lookup(&self, ident: &Ident) -> Option<&Rc<U>> {
        self.index.get(ident).map(|&pos| &self.entries[pos].unit)
    }

    /// Append an entry. Duplicate idents are appended too; lookups keep
    /// resolving to the first one.
    pub fn insert(&mut self, unit: Rc<U>, dirty: bool) -> Result<(), CacheFull> {
        if let Some(capacity) = self.capacity {
            if self.entries.len() >= capacity {
                return Err(CacheFull { capacity });
            }
        }

        let pos = self.entries.len();
        self.index.entry(unit.ident()).or_insert(pos);
        self.entries.push(CacheEntry { unit, dirty });
        Ok(())
    }

    pub fn is_dirty(&self, ident: &Ident) -> Option<bool> {
        self.index.get(ident).map(|&pos| self.entries[pos].dirty)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CacheEntry<U>> {
        self.entries.iter()
    }

    pub fn iter_dirty_mut(&mut self) -> impl Iterator<Item = &mut CacheEntry<U>> {
        self.entries.iter_mut().filter(|e| e.dirty)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
