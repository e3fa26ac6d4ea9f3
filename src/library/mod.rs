//! Library handles
//!
//! A library is a named directory of units plus the in-memory cache of the
//! units touched so far. A temporary library has no directory at all; every
//! filesystem operation on it is a no-op or a miss.

mod persist;
pub mod registry;
pub mod session;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::cache::store::{DirStore, OpenMode};
use crate::cache::units::UnitCache;
use crate::core::error::{LibError, Result};
use crate::core::ident::{upcase_name, Ident};
use crate::core::paths::{is_plain_file_name, is_reserved};
use crate::unit::Unit;

#[derive(Debug)]
pub struct Library<U> {
    name: Ident,
    path: PathBuf,
    store: Option<DirStore>,
    units: UnitCache<U>,
}

impl<U: Unit> Library<U> {
    /// Build a library record. An empty `path` makes it temporary; any other
    /// path is resolved to its canonical form.
    pub(crate) fn init(name: &str, path: &Path, capacity: Option<usize>) -> Result<Self> {
        let (path, store) = if path.as_os_str().is_empty() {
            (PathBuf::new(), None)
        } else {
            let real = path
                .canonicalize()
                .map_err(|source| LibError::io(path, source))?;
            (real.clone(), Some(DirStore::open(real)))
        };

        Ok(Self {
            name: upcase_name(name),
            path,
            store,
            units: UnitCache::new(capacity),
        })
    }

    pub fn name(&self) -> Ident {
        self.name
    }

    /// Canonical directory, empty for a temporary library.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_temporary(&self) -> bool {
        self.store.is_none()
    }

    /// Path of the library directory, or of `name` inside it.
    pub fn realpath(&self, name: Option<&str>) -> Result<PathBuf> {
        match name {
            Some(name) if !is_plain_file_name(name) => Err(LibError::InvalidName(name.to_string())),
            Some(name) => Ok(self.path.join(name)),
            None => Ok(self.path.clone()),
        }
    }

    /// Open a file inside the library directory.
    pub fn open_file(&self, name: &str, mode: OpenMode) -> Result<File> {
        match &self.store {
            Some(store) => store.open_file(name, mode),
            None => Err(LibError::io(
                name,
                std::io::Error::new(std::io::ErrorKind::NotFound, "temporary library"),
            )),
        }
    }

    /// Look a unit up, loading it from the directory on a cache miss.
    pub fn get(&mut self, ident: &Ident) -> Result<Option<Rc<U>>> {
        if let Some(unit) = self.units.lookup(ident) {
            tracing::debug!("cache hit {} in {}", ident, self.name);
            return Ok(Some(Rc::clone(unit)));
        }

        let Some(store) = &self.store else {
            return Ok(None);
        };

        let Some(unit) = store.read_unit::<U>(ident)? else {
            tracing::debug!("{} not found in {}", ident, self.name);
            return Ok(None);
        };

        let unit = Rc::new(unit);
        self.insert(Rc::clone(&unit), false)?;
        Ok(Some(unit))
    }

    /// Add a unit produced in this session; it is written on the next save.
    pub fn put(&mut self, unit: U) -> Result<Rc<U>> {
        let unit = Rc::new(unit);
        self.put_shared(Rc::clone(&unit))?;
        Ok(unit)
    }

    /// The unit's identifier becomes its file name, so it must name a file
    /// directly inside the library directory.
    pub fn put_shared(&mut self, unit: Rc<U>) -> Result<()> {
        let ident = unit.ident();
        if !is_plain_file_name(ident.as_str()) {
            return Err(LibError::InvalidName(ident.as_str().to_string()));
        }
        self.insert(unit, true)
    }

    fn insert(&mut self, unit: Rc<U>, dirty: bool) -> Result<()> {
        let library = self.name;
        self.units
            .insert(unit, dirty)
            .map_err(|full| LibError::CacheFull {
                library,
                capacity: full.capacity,
            })
    }

    /// Pull every unit file of the directory into the cache.
    pub fn load_all(&mut self) -> Result<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };

        let names = store.entry_names()?;
        for name in names.iter().filter(|name| !is_reserved(name)) {
            self.get(&Ident::new(name))?;
        }
        Ok(())
    }

    /// Visit every cached unit in insertion order.
    pub fn for_each<F: FnMut(&U)>(&self, mut visit: F) {
        for entry in self.units.iter() {
            visit(&entry.unit);
        }
    }

    pub fn units(&self) -> impl Iterator<Item = &Rc<U>> {
        self.units.iter().map(|entry| &entry.unit)
    }

    /// `Some(true)` if the cached unit still has to be written.
    pub fn is_dirty(&self, ident: &Ident) -> Option<bool> {
        self.units.is_dirty(ident)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub(crate) fn into_store(self) -> Option<DirStore> {
        self.store
    }
}
