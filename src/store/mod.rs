//! Registry and per-record handles for cached settings.
//!
//! The registry owns one cached instance per record type for the lifetime of
//! the process. First access loads the backing file (or falls back to the
//! type's defaults); afterwards the in-memory instance is authoritative until
//! a handle or form binding writes it back.
//!
//! All access is expected on the host GUI thread; handles are `Rc`-based and
//! deliberately not `Send`.

pub mod persistence;

pub use persistence::{LoadError, PersistError};

use std::any::{Any, TypeId};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use directories::ProjectDirs;
use thiserror::Error;

use crate::record::SettingsRecord;
use persistence::{load_record, persist_record, record_path};

/// Errors from registry construction.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Could not determine a platform config directory")]
    NoConfigDir,
}

struct Entry {
    instance: Rc<dyn Any>,
    flush: Box<dyn Fn() -> Result<(), PersistError>>,
}

/// Application-owned registry of cached settings records, keyed by type.
///
/// Construct one registry at startup and keep it for the process lifetime.
/// [`flush_all`](Self::flush_all) is the matching teardown hook.
pub struct SettingsRegistry {
    root: PathBuf,
    entries: RefCell<HashMap<TypeId, Entry>>,
}

impl SettingsRegistry {
    /// Creates a registry whose backing files live under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// Creates a registry rooted at the platform config directory for the
    /// given application, e.g. `~/.config/<application>/settings` on Linux.
    pub fn for_app(
        qualifier: &str,
        organization: &str,
        application: &str,
    ) -> Result<Self, RegistryError> {
        let dirs = ProjectDirs::from(qualifier, organization, application)
            .ok_or(RegistryError::NoConfigDir)?;
        Ok(Self::new(dirs.config_dir().join("settings")))
    }

    /// The directory backing files are stored under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the cached handle for `T`, loading or creating the record on
    /// first access.
    ///
    /// Never fails outwardly: a missing backing file yields `T::default()`,
    /// and a malformed one is logged and replaced by `T::default()` in
    /// memory (the file itself is left untouched until the next persist).
    /// Repeated calls for the same type share a single cached instance.
    pub fn get_or_create<T: SettingsRecord>(&self) -> SettingsHandle<T> {
        let type_id = TypeId::of::<T>();
        let path = record_path(&self.root, T::key());

        if let Some(entry) = self.entries.borrow().get(&type_id) {
            if let Ok(record) = Rc::downcast::<RefCell<T>>(Rc::clone(&entry.instance)) {
                return SettingsHandle { record, path };
            }
        }

        let initial = match load_record::<T>(&path) {
            Ok(Some(record)) => {
                tracing::debug!(key = T::key(), "Loaded settings record from disk");
                record
            }
            Ok(None) => {
                tracing::debug!(key = T::key(), "No backing file, using defaults");
                T::default()
            }
            Err(e) => {
                tracing::warn!(
                    key = T::key(),
                    error = %e,
                    "Unreadable backing file, falling back to defaults"
                );
                T::default()
            }
        };

        let record = Rc::new(RefCell::new(initial));
        let flush = {
            let record = Rc::clone(&record);
            let path = path.clone();
            Box::new(move || persist_record(&path, &*record.borrow()))
                as Box<dyn Fn() -> Result<(), PersistError>>
        };
        self.entries.borrow_mut().insert(
            type_id,
            Entry {
                instance: Rc::clone(&record) as Rc<dyn Any>,
                flush,
            },
        );

        SettingsHandle { record, path }
    }

    /// Writes every cached record back to its backing file.
    ///
    /// Intended as a process-exit teardown hook; records persisted through
    /// their handles are already on disk, so this only matters for records
    /// mutated outside a persisting call. Every record is attempted even
    /// when one write fails; the first failure is logged and returned after
    /// the loop completes.
    pub fn flush_all(&self) -> Result<(), PersistError> {
        let mut first_error = None;
        for entry in self.entries.borrow().values() {
            if let Err(e) = (entry.flush)() {
                tracing::warn!(error = %e, "Failed to flush settings record");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Cloneable handle to one cached settings record and its backing file.
///
/// Clones share the same in-memory instance; mutating through any clone is
/// visible to all of them.
pub struct SettingsHandle<T> {
    record: Rc<RefCell<T>>,
    path: PathBuf,
}

impl<T> Clone for SettingsHandle<T> {
    fn clone(&self) -> Self {
        Self {
            record: Rc::clone(&self.record),
            path: self.path.clone(),
        }
    }
}

impl<T: SettingsRecord> SettingsHandle<T> {
    /// Immutable access to the cached record.
    ///
    /// Panics if the record is currently mutably borrowed, like `RefCell`.
    pub fn get(&self) -> Ref<'_, T> {
        self.record.borrow()
    }

    /// Mutable access to the cached record. Does not persist; call
    /// [`persist`](Self::persist) afterwards, or use
    /// [`update`](Self::update) to do both.
    pub fn get_mut(&self) -> RefMut<'_, T> {
        self.record.borrow_mut()
    }

    /// Replaces the cached record and persists the new value.
    pub fn set(&self, value: T) -> Result<(), PersistError> {
        *self.record.borrow_mut() = value;
        self.persist()
    }

    /// Mutates the cached record through `f`, then persists.
    ///
    /// On write failure the error propagates but the in-memory record keeps
    /// the mutated value; caching and persistence are decoupled.
    pub fn update<R>(
        &self,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, PersistError> {
        let result = f(&mut self.record.borrow_mut());
        self.persist()?;
        Ok(result)
    }

    /// Writes the cached record to its backing file, creating parent
    /// directories as needed.
    pub fn persist(&self) -> Result<(), PersistError> {
        persist_record(&self.path, &*self.record.borrow())
    }

    /// The backing file path for this record.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether two handles share the same cached instance.
    pub fn is_same_instance(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.record, &other.record)
    }
}
