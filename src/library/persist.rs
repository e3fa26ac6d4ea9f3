//! Writing dirty units back to the library directory

use crate::core::error::Result;
use crate::library::Library;
use crate::unit::Unit;

impl<U: Unit> Library<U> {
    /// Write every dirty unit to its file and mark it clean.
    ///
    /// Returns the number of files written; clean units cost nothing, so a
    /// repeated save is free. A temporary library writes nothing and keeps
    /// its units dirty.
    pub fn save(&mut self) -> Result<usize> {
        let Some(store) = &self.store else {
            return Ok(0);
        };

        let mut written = 0;
        for entry in self.units.iter_dirty_mut() {
            store.write_unit(&*entry.unit)?;
            entry.dirty = false;
            written += 1;
        }

        if written > 0 {
            tracing::debug!("saved {} unit(s) to {}", written, store.root().display());
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use crate::cache::store::DirStore;
    use crate::core::error::LibError;
    use crate::core::ident::Ident;
    use crate::library::Library;
    use crate::unit::{DesignUnit, Unit, UnitKind};
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn test_save_writes_dirty_units_once() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("work");
        DirStore::create(&path, "tag").unwrap();

        let mut lib: Library<DesignUnit> = Library::init("work", &path, None).unwrap();
        lib.put(DesignUnit::new("WORK.A", UnitKind::Entity)).unwrap();
        lib.put(DesignUnit::new("WORK.B", UnitKind::Package)).unwrap();

        assert_eq!(lib.save().unwrap(), 2);
        assert!(path.join("WORK.A").is_file());
        assert!(path.join("WORK.B").is_file());
        assert_eq!(lib.is_dirty(&Ident::new("WORK.A")), Some(false));

        assert_eq!(lib.save().unwrap(), 0);
    }

    #[test]
    fn test_second_save_does_not_touch_files() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("work");
        DirStore::create(&path, "tag").unwrap();

        let mut lib: Library<DesignUnit> = Library::init("work", &path, None).unwrap();
        lib.put(DesignUnit::new("WORK.A", UnitKind::Entity)).unwrap();
        lib.save().unwrap();

        std::fs::remove_file(path.join("WORK.A")).unwrap();
        assert_eq!(lib.save().unwrap(), 0);
        assert!(!path.join("WORK.A").exists());
    }

    #[test]
    fn test_loaded_units_are_not_rewritten() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("work");
        let store = DirStore::create(&path, "tag").unwrap();
        let unit = DesignUnit::new("WORK.PKG", UnitKind::Package);
        store.write_unit(&unit).unwrap();

        let mut lib: Library<DesignUnit> = Library::init("work", &path, None).unwrap();
        lib.get(&unit.ident()).unwrap().unwrap();
        assert_eq!(lib.save().unwrap(), 0);
    }

    #[test]
    fn test_saved_unit_reloads_in_new_handle() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("work");
        DirStore::create(&path, "tag").unwrap();

        let unit = DesignUnit::new("WORK.TOP", UnitKind::Architecture)
            .with_depends(vec![Ident::new("WORK.PKG")]);
        let mut lib: Library<DesignUnit> = Library::init("work", &path, None).unwrap();
        lib.put(unit.clone()).unwrap();
        lib.save().unwrap();
        drop(lib);

        let mut reopened: Library<DesignUnit> = Library::init("work", &path, None).unwrap();
        let loaded = reopened.get(&Ident::new("WORK.TOP")).unwrap().unwrap();
        assert_eq!(*loaded, unit);
    }

    #[test]
    fn test_temporary_save_is_noop() {
        let mut lib: Library<DesignUnit> = Library::init("work", Path::new(""), None).unwrap();
        lib.put(DesignUnit::new("WORK.A", UnitKind::Entity)).unwrap();

        assert_eq!(lib.save().unwrap(), 0);
        assert_eq!(lib.is_dirty(&Ident::new("WORK.A")), Some(true));
    }

    #[test]
    fn test_unit_names_cannot_escape_library() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("work");
        DirStore::create(&path, "tag").unwrap();
        let outside = temp.path().join("outside");

        let mut lib: Library<DesignUnit> = Library::init("work", &path, None).unwrap();
        for name in [outside.to_string_lossy().to_string(), "../outside".to_string(), "..".to_string()] {
            let err = lib
                .put(DesignUnit::new(name.as_str(), UnitKind::Entity))
                .unwrap_err();
            assert!(matches!(err, LibError::InvalidName(_)), "{name}: {err}");
        }

        assert!(lib.is_empty());
        assert_eq!(lib.save().unwrap(), 0);
        assert!(!outside.exists());
    }
}
