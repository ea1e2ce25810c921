//! User-selected field service.
//!
//! Narrows a [`CandidateFields`] set to the columns the user wants to see.
//! The service is authoritative: the table renders exactly the sequence it
//! returns. The default implementation reads the per-resource toggles kept
//! in the settings file and never writes them back.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    config::SettingsManager,
    ui::fields::{CandidateFields, FieldDescriptor},
};

/// Chooses which candidate fields are displayed, and in what order.
pub trait FieldSelection {
    /// Returns the displayed subset of `candidates` for `resource`.
    fn select(&self, resource: &str, candidates: &CandidateFields) -> Vec<FieldDescriptor>;
}

impl<T: FieldSelection + ?Sized> FieldSelection for Box<T> {
    fn select(&self, resource: &str, candidates: &CandidateFields) -> Vec<FieldDescriptor> {
        (**self).select(resource, candidates)
    }
}

/// Shows every candidate in declaration order.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllFields;

impl FieldSelection for AllFields {
    fn select(&self, _resource: &str, candidates: &CandidateFields) -> Vec<FieldDescriptor> {
        candidates.iter().copied().collect()
    }
}

/// Reads column toggles from the user settings.
///
/// A field with an explicit toggle follows it. A field without one is shown
/// unless it is listed in the resource's default-off fields. Toggles for
/// fields that are not currently candidates are ignored but left in place,
/// so re-enabling a feature restores the user's earlier choice.
#[derive(Debug, Clone)]
pub struct SettingsFieldSelection {
    settings_manager: Arc<RwLock<SettingsManager>>,
}

impl SettingsFieldSelection {
    #[must_use]
    pub fn new(settings_manager: Arc<RwLock<SettingsManager>>) -> Self {
        Self { settings_manager }
    }
}

impl FieldSelection for SettingsFieldSelection {
    fn select(&self, resource: &str, candidates: &CandidateFields) -> Vec<FieldDescriptor> {
        let manager = self.settings_manager.read();
        let settings = manager.get_settings();
        let toggles = settings.toggleable_fields.get(resource);
        let default_off = settings.default_off_fields.get(resource);

        candidates
            .iter()
            .filter(|descriptor| {
                let key = descriptor.key();
                toggles
                    .and_then(|fields| fields.get(key))
                    .copied()
                    .unwrap_or_else(|| {
                        default_off.is_none_or(|keys| !keys.iter().any(|off| off == key))
                    })
            })
            .copied()
            .collect()
    }
}
