//! Change detection for settings forms.
//!
//! The host GUI draws one form field per record field and applies edits in
//! place. Detection is a two-phase sequence driven by the host: snapshot the
//! record before drawing, diff after. [`FormBinding`] packages the sequence
//! so a changed draw pass persists the record and an unchanged one does not
//! touch the disk.

use crate::record::SettingsRecord;
use crate::store::{PersistError, SettingsHandle};

/// Pre-render snapshot of a settings record.
pub struct ChangeScope<T: SettingsRecord> {
    before: T,
}

impl<T: SettingsRecord> ChangeScope<T> {
    /// Snapshots `record` before a draw pass.
    pub fn begin(record: &T) -> Self {
        Self {
            before: record.clone(),
        }
    }

    /// Whether `current` differs from the snapshot.
    pub fn changed(&self, current: &T) -> bool {
        *current != self.before
    }
}

/// Result of one change-scoped draw pass.
pub struct FormOutcome<R> {
    /// Whether any field differed from its pre-render value.
    pub changed: bool,
    /// Whatever the drawing closure returned.
    pub output: R,
}

/// Binds a cached settings record to a host-drawn form.
pub struct FormBinding<T: SettingsRecord> {
    handle: SettingsHandle<T>,
}

impl<T: SettingsRecord> FormBinding<T> {
    /// Creates a binding around a registry handle.
    pub fn new(handle: SettingsHandle<T>) -> Self {
        Self { handle }
    }

    /// The underlying record handle.
    pub fn handle(&self) -> &SettingsHandle<T> {
        &self.handle
    }

    /// Runs one draw pass: snapshot, draw via `f`, diff, and persist exactly
    /// when the pass changed the record.
    ///
    /// A write failure propagates, but the in-memory record keeps the edited
    /// values; the next changed pass retries the write.
    pub fn draw_with<R>(
        &self,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<FormOutcome<R>, PersistError> {
        let (scope, output) = {
            let mut record = self.handle.get_mut();
            let scope = ChangeScope::begin(&*record);
            let output = f(&mut record);
            (scope, output)
        };

        let changed = scope.changed(&*self.handle.get());
        if changed {
            self.handle.persist()?;
        }
        Ok(FormOutcome { changed, output })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SettingsRegistry;
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    struct ThemeSettings {
        dark_mode: bool,
        accent: String,
    }

    impl SettingsRecord for ThemeSettings {}

    #[test]
    fn change_scope_detects_field_edits() {
        let mut record = ThemeSettings::default();
        let scope = ChangeScope::begin(&record);

        assert!(!scope.changed(&record));
        record.dark_mode = true;
        assert!(scope.changed(&record));
    }

    #[test]
    fn unchanged_pass_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let registry = SettingsRegistry::new(dir.path());
        let binding = FormBinding::new(registry.get_or_create::<ThemeSettings>());

        let outcome = binding.draw_with(|_record| {}).unwrap();
        assert!(!outcome.changed);
        assert!(!binding.handle().path().exists());
    }

    #[test]
    fn changed_pass_persists_the_record() {
        let dir = tempfile::tempdir().unwrap();
        let registry = SettingsRegistry::new(dir.path());
        let binding = FormBinding::new(registry.get_or_create::<ThemeSettings>());

        let outcome = binding
            .draw_with(|record| {
                record.accent = "teal".to_string();
            })
            .unwrap();
        assert!(outcome.changed);

        let on_disk: ThemeSettings =
            serde_json::from_str(&std::fs::read_to_string(binding.handle().path()).unwrap())
                .unwrap();
        assert_eq!(on_disk.accent, "teal");
    }

    #[test]
    fn draw_pass_returns_the_closure_output() {
        let dir = tempfile::tempdir().unwrap();
        let registry = SettingsRegistry::new(dir.path());
        let binding = FormBinding::new(registry.get_or_create::<ThemeSettings>());

        let outcome = binding.draw_with(|record| record.accent.clone()).unwrap();
        assert_eq!(outcome.output, String::new());
    }

    #[test]
    fn edit_then_revert_within_one_pass_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let registry = SettingsRegistry::new(dir.path());
        let binding = FormBinding::new(registry.get_or_create::<ThemeSettings>());

        let outcome = binding
            .draw_with(|record| {
                record.dark_mode = true;
                record.dark_mode = false;
            })
            .unwrap();
        assert!(!outcome.changed);
        assert!(!binding.handle().path().exists());
    }
}
