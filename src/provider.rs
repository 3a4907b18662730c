//! Renderable providers handed to the host GUI.
//!
//! The host registers one menu entry per provider in its settings window.
//! Activating the entry calls [`SettingsProvider::draw`] once per frame with
//! the host's field renderer; the provider runs the change-scoped pass and
//! persists edits. Menu paths and window chrome belong to the host.

use crate::form::FormBinding;
use crate::record::SettingsRecord;
use crate::store::{PersistError, SettingsHandle};

/// Host-side form renderer: draws one field per record field and applies
/// user edits to `record` during the pass.
pub trait FieldRenderer<T> {
    fn draw_fields(&mut self, record: &mut T);
}

/// A named, searchable settings page backed by one record type.
pub struct SettingsProvider<T: SettingsRecord> {
    label: String,
    keywords: Vec<String>,
    binding: FormBinding<T>,
}

impl<T: SettingsRecord> SettingsProvider<T> {
    /// Creates a provider with a display label.
    pub fn new(label: impl Into<String>, handle: SettingsHandle<T>) -> Self {
        Self {
            label: label.into(),
            keywords: Vec::new(),
            binding: FormBinding::new(handle),
        }
    }

    /// Adds search keywords the host settings window filters by.
    pub fn with_keywords(mut self, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Display label for the host's settings menu entry.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Search keywords for the host's settings window filter.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Whether `query` matches the label or any keyword, case-insensitively.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.label.to_lowercase().contains(&query)
            || self
                .keywords
                .iter()
                .any(|k| k.to_lowercase().contains(&query))
    }

    /// The change-scoped form binding behind this provider.
    pub fn binding(&self) -> &FormBinding<T> {
        &self.binding
    }

    /// Runs one draw pass with the host's renderer.
    ///
    /// Returns whether the pass changed the record (and therefore wrote it
    /// back to disk).
    pub fn draw(&self, renderer: &mut dyn FieldRenderer<T>) -> Result<bool, PersistError> {
        let outcome = self.binding.draw_with(|record| renderer.draw_fields(record))?;
        Ok(outcome.changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SettingsRegistry;
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    struct ShortcutSettings {
        open_palette: String,
    }

    impl SettingsRecord for ShortcutSettings {}

    /// Renderer that simulates the user typing a new shortcut on the first
    /// pass and leaving the form untouched afterwards.
    struct TypeOnce {
        typed: bool,
    }

    impl FieldRenderer<ShortcutSettings> for TypeOnce {
        fn draw_fields(&mut self, record: &mut ShortcutSettings) {
            if !self.typed {
                record.open_palette = "ctrl+k".to_string();
                self.typed = true;
            }
        }
    }

    #[test]
    fn draw_persists_only_on_the_changed_pass() {
        let dir = tempfile::tempdir().unwrap();
        let registry = SettingsRegistry::new(dir.path());
        let provider = SettingsProvider::new(
            "Shortcuts",
            registry.get_or_create::<ShortcutSettings>(),
        );
        let mut renderer = TypeOnce { typed: false };

        assert!(provider.draw(&mut renderer).unwrap());
        let path = provider.binding().handle().path().to_path_buf();
        let written = std::fs::metadata(&path).unwrap().modified().unwrap();

        // Second pass draws the same values; nothing is rewritten.
        assert!(!provider.draw(&mut renderer).unwrap());
        assert_eq!(
            std::fs::metadata(&path).unwrap().modified().unwrap(),
            written
        );
    }

    #[test]
    fn matches_label_and_keywords() {
        let dir = tempfile::tempdir().unwrap();
        let registry = SettingsRegistry::new(dir.path());
        let provider = SettingsProvider::new(
            "Shortcuts",
            registry.get_or_create::<ShortcutSettings>(),
        )
        .with_keywords(["keyboard", "bindings"]);

        assert!(provider.matches("short"));
        assert!(provider.matches("KEYBOARD"));
        assert!(!provider.matches("audio"));
    }

    #[test]
    fn provider_shares_the_registry_instance() {
        let dir = tempfile::tempdir().unwrap();
        let registry = SettingsRegistry::new(dir.path());
        let handle = registry.get_or_create::<ShortcutSettings>();
        let provider = SettingsProvider::new("Shortcuts", handle.clone());

        provider
            .binding()
            .draw_with(|r| r.open_palette = "ctrl+p".to_string())
            .unwrap();
        assert_eq!(handle.get().open_palette, "ctrl+p");
    }
}
