//! Sessions: the set of open libraries and the designated work library
//!
//! A session owns every library it opens. Libraries are addressed through
//! `LibraryId` handles; at most one open library exists per normalized name.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::cache::store::{DestroyReport, DirStore};
use crate::core::config::StoreConfig;
use crate::core::error::{LibError, Result};
use crate::core::ident::upcase_name;
use crate::core::paths::{is_plain_file_name, library_dir, probe, search_candidates};
use crate::library::registry::{LibraryId, Registry};
use crate::library::Library;
use crate::unit::Unit;

/// Flags for `Session::find`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Report the searched directories when nothing matches.
    pub verbose: bool,
    /// Look beyond the current directory.
    pub search: bool,
}

/// Outcome of resolving a library name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(LibraryId),
    Missing { name: String, searched: Vec<PathBuf> },
}

pub struct Session<U> {
    config: StoreConfig,
    registry: Registry<U>,
    work: Option<LibraryId>,
    diagnostics: Box<dyn Write>,
}

impl<U: Unit> Session<U> {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            registry: Registry::new(),
            work: None,
            diagnostics: Box::new(io::stderr()),
        }
    }

    /// Send verbose lookup reports somewhere other than stderr.
    pub fn with_diagnostics(mut self, sink: impl Write + 'static) -> Self {
        self.diagnostics = Box::new(sink);
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn open(&mut self, name: &str, path: &Path) -> Result<LibraryId> {
        let library = Library::init(name, path, self.config.unit_capacity)?;
        Ok(self.registry.register(library))
    }

    fn ensure_closed(&self, name: &str) -> Result<()> {
        let ident = upcase_name(name);
        match self.registry.find_by_name(&ident) {
            Some(_) => Err(LibError::AlreadyOpen(ident)),
            None => Ok(()),
        }
    }

    /// Create a library in the current directory.
    pub fn new_library(&mut self, name: &str) -> Result<LibraryId> {
        if !is_plain_file_name(name) {
            return Err(LibError::InvalidName(name.to_string()));
        }
        let path = library_dir(&self.config.current_dir, name);
        self.new_library_at(name, &path)
    }

    /// Create a library directory at an explicit path.
    pub fn new_library_at(&mut self, name: &str, path: &Path) -> Result<LibraryId> {
        self.ensure_closed(name)?;
        DirStore::create(path, &self.config.marker_tag)?;
        tracing::info!("created library {} at {}", name, path.display());
        self.open(name, path)
    }

    /// Open a library with no backing directory.
    pub fn temporary(&mut self, name: &str) -> Result<LibraryId> {
        self.ensure_closed(name)?;
        self.open(name, Path::new(""))
    }

    /// Resolve `name` against open libraries, then the search path.
    pub fn resolve(&mut self, name: &str, search: bool) -> Result<Resolution> {
        if let Some(id) = self.registry.find_by_name(&upcase_name(name)) {
            return Ok(Resolution::Found(id));
        }

        let searched = search_candidates(&self.config, search);
        for candidate in &searched {
            if let Some(dir) = probe(candidate, name) {
                tracing::debug!("found library {} at {}", name, dir.display());
                return self.open(name, &dir).map(Resolution::Found);
            }
        }

        Ok(Resolution::Missing {
            name: name.to_string(),
            searched,
        })
    }

    /// Find an existing library, or `None` once every location is exhausted.
    pub fn find(&mut self, name: &str, options: FindOptions) -> Result<Option<LibraryId>> {
        match self.resolve(name, options.search)? {
            Resolution::Found(id) => Ok(Some(id)),
            Resolution::Missing { name, searched } => {
                if options.verbose {
                    self.report_missing(&name, &searched);
                }
                Ok(None)
            }
        }
    }

    /// Like `find`, but a missing library is an error.
    pub fn require(&mut self, name: &str, options: FindOptions) -> Result<LibraryId> {
        match self.resolve(name, options.search)? {
            Resolution::Found(id) => Ok(id),
            Resolution::Missing { name, searched } => {
                if options.verbose {
                    self.report_missing(&name, &searched);
                }
                Err(LibError::NotFound { name, searched })
            }
        }
    }

    fn report_missing(&mut self, name: &str, searched: &[PathBuf]) {
        if let Err(e) = self.write_missing(name, searched) {
            tracing::warn!("failed to write diagnostics: {}", e);
        }
    }

    fn write_missing(&mut self, name: &str, searched: &[PathBuf]) -> io::Result<()> {
        writeln!(self.diagnostics, "library {} not found in:", name)?;
        for dir in searched {
            writeln!(self.diagnostics, "  {}", dir.display())?;
        }
        self.diagnostics.flush()
    }

    pub fn library(&self, id: LibraryId) -> Result<&Library<U>> {
        self.registry.get(id).ok_or(LibError::UnknownLibrary(id))
    }

    pub fn library_mut(&mut self, id: LibraryId) -> Result<&mut Library<U>> {
        self.registry.get_mut(id).ok_or(LibError::UnknownLibrary(id))
    }

    /// Open libraries, most recently opened first.
    pub fn libraries(&self) -> impl Iterator<Item = (LibraryId, &Library<U>)> {
        self.registry.iter()
    }

    /// Close a library and drop its cache. Unsaved units are lost.
    pub fn free(&mut self, id: LibraryId) -> Result<()> {
        self.take(id).map(drop)
    }

    fn take(&mut self, id: LibraryId) -> Result<Library<U>> {
        let library = self
            .registry
            .unregister(id)
            .ok_or(LibError::UnknownLibrary(id))?;
        if self.work == Some(id) {
            self.work = None;
        }
        Ok(library)
    }

    /// Close a library and delete its directory from disk.
    pub fn destroy(&mut self, id: LibraryId) -> Result<DestroyReport> {
        let library = self.take(id)?;
        let name = library.name();

        let Some(store) = library.into_store() else {
            return Ok(DestroyReport::default());
        };

        let report = store.remove_all();
        tracing::info!(
            "destroyed library {} ({} removed, {} failed)",
            name,
            report.removed,
            report.failures
        );
        Ok(report)
    }

    pub fn set_work(&mut self, id: LibraryId) -> Result<()> {
        self.library(id)?;
        self.work = Some(id);
        Ok(())
    }

    /// The designated work library.
    pub fn work(&self) -> Result<LibraryId> {
        self.work.ok_or(LibError::NoWorkLibrary)
    }
}
