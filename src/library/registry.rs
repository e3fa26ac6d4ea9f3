//! Registry of open libraries
//!
//! Newest libraries sit at the head. The registry does not enforce unique
//! names; callers look a name up before registering a new library.

use crate::core::ident::Ident;
use crate::library::Library;
use crate::unit::Unit;

/// Opaque handle to a library registered in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LibraryId(u64);

#[derive(Debug)]
pub struct Registry<U> {
    next_id: u64,
    // Stored oldest first; the head is the end of the vector.
    libraries: Vec<(LibraryId, Library<U>)>,
}

impl<U: Unit> Default for Registry<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: Unit> Registry<U> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            libraries: Vec::new(),
        }
    }

    pub fn register(&mut self, library: Library<U>) -> LibraryId {
        let id = LibraryId(self.next_id);
        self.next_id += 1;
        self.libraries.push((id, library));
        id
    }

    pub fn find_by_name(&self, name: &Ident) -> Option<LibraryId> {
        self.iter()
            .find(|(_, library)| library.name() == *name)
            .map(|(id, _)| id)
    }

    /// Remove a library; unknown ids are ignored.
    pub fn unregister(&mut self, id: LibraryId) -> Option<Library<U>> {
        let pos = self.libraries.iter().position(|(i, _)| *i == id)?;
        Some(self.libraries.remove(pos).1)
    }

    pub fn get(&self, id: LibraryId) -> Option<&Library<U>> {
        self.libraries
            .iter()
            .find(|(i, _)| *i == id)
            .map(|(_, library)| library)
    }

    pub fn get_mut(&mut self, id: LibraryId) -> Option<&mut Library<U>> {
        self.libraries
            .iter_mut()
            .find(|(i, _)| *i == id)
            .map(|(_, library)| library)
    }

    /// Libraries from the head (most recently registered) down.
    pub fn iter(&self) -> impl Iterator<Item = (LibraryId, &Library<U>)> {
        self.libraries.iter().rev().map(|(id, library)| (*id, library))
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}
