//! The record trait implemented by persistable settings types.
//!
//! A settings record is a plain aggregate of fields with sensible defaults.
//! Implementing [`SettingsRecord`] opts a type into registry caching and
//! file-backed persistence; the trait itself has no required items.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Capability bound for a persistable settings aggregate.
///
/// Records must be default-constructible (first run, corrupt-file fallback),
/// serializable in both directions, and cheaply comparable so a form draw
/// pass can detect edits by diffing against a pre-render snapshot.
///
/// ```
/// use prefstore::SettingsRecord;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
/// struct EditorSettings {
///     tab_width: u8,
///     show_whitespace: bool,
/// }
///
/// impl SettingsRecord for EditorSettings {}
///
/// assert_eq!(EditorSettings::key(), "EditorSettings");
/// ```
pub trait SettingsRecord:
    Serialize + DeserializeOwned + Clone + PartialEq + Default + 'static
{
    /// File stem for this record's backing file.
    ///
    /// Defaults to the bare type name with any generic arguments stripped,
    /// so `my_app::EditorSettings` persists to `EditorSettings.json`.
    /// Override when renaming the type must not orphan existing files, or
    /// when distinct instantiations of a generic record need distinct files.
    fn key() -> &'static str {
        let full = std::any::type_name::<Self>();
        // Drop the generic-argument list before splitting on `::`, so
        // `my_app::Labeled<my_app::Inner>` yields `Labeled`, not `Inner>`.
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base)
    }
}
