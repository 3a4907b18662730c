//! prefstore - typed, file-backed settings records for desktop apps
//!
//! This crate provides a per-type registry of persisted settings records,
//! change-detecting form bindings for a host GUI's settings window, and the
//! JSON file persistence behind them. Records load lazily on first access,
//! stay cached for the process lifetime, and are written back exactly when
//! a form draw pass detects an edit.

pub mod form;
pub mod provider;
pub mod record;
pub mod store;

pub use form::{ChangeScope, FormBinding, FormOutcome};
pub use provider::{FieldRenderer, SettingsProvider};
pub use record::SettingsRecord;
pub use store::{
    LoadError, PersistError, RegistryError, SettingsHandle, SettingsRegistry,
};
