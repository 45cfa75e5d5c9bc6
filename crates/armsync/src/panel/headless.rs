//! A control panel without rendering.
//!
//! `HeadlessPanel` keeps the toolkit semantics that matter to the sync loop:
//! user edits are stepped and clamped before they reach the bound field, the
//! change callback fires after the write, and [`HeadlessPanel::refresh`] is one
//! frame of the `listen()` refresh loop.

use thiserror::Error;
use tracing::{trace, warn};

use super::{ControlPanel, NumberControl, PanelFolder};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PanelError {
    #[error("no control '{label}' in folder '{folder}'")]
    UnknownControl { folder: String, label: String },

    #[error("rejected non-finite input {value} for '{label}'")]
    NonFiniteInput { label: String, value: f64 },
}

/// A control plus the value the panel currently shows for it.
#[derive(Debug)]
pub struct HeadlessControl {
    control: NumberControl,
    displayed: f64,
}

impl HeadlessControl {
    pub fn label(&self) -> &str {
        self.control.label()
    }

    /// Value currently shown. Lags the field until the next refresh unless
    /// the change came from a user edit.
    pub fn displayed(&self) -> f64 {
        self.displayed
    }

    pub fn range(&self) -> (Option<f64>, Option<f64>) {
        self.control.range()
    }

    pub fn step(&self) -> Option<f64> {
        self.control.step_size()
    }

    pub fn is_listening(&self) -> bool {
        self.control.is_listening()
    }
}

#[derive(Debug, Default)]
pub struct HeadlessFolder {
    name: String,
    controls: Vec<HeadlessControl>,
}

impl HeadlessFolder {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn controls(&self) -> &[HeadlessControl] {
        &self.controls
    }

    pub fn control(&self, label: &str) -> Option<&HeadlessControl> {
        self.controls.iter().find(|c| c.label() == label)
    }

    fn control_mut(&mut self, label: &str) -> Option<&mut HeadlessControl> {
        self.controls.iter_mut().find(|c| c.label() == label)
    }
}

impl PanelFolder for HeadlessFolder {
    fn add(&mut self, control: NumberControl) {
        let displayed = control.field().get();
        trace!(
            "[armsync] folder '{}' added control '{}' = {displayed}",
            self.name,
            control.label()
        );
        self.controls.push(HeadlessControl { control, displayed });
    }
}

#[derive(Debug, Default)]
pub struct HeadlessPanel {
    folders: Vec<HeadlessFolder>,
}

impl HeadlessPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn folder(&self, name: &str) -> Option<&HeadlessFolder> {
        self.folders.iter().find(|f| f.name == name)
    }

    pub fn folders(&self) -> &[HeadlessFolder] {
        &self.folders
    }

    pub fn control(&self, folder: &str, label: &str) -> Option<&HeadlessControl> {
        self.folder(folder).and_then(|f| f.control(label))
    }

    pub fn displayed(&self, folder: &str, label: &str) -> Option<f64> {
        self.control(folder, label).map(HeadlessControl::displayed)
    }

    /// Apply a user edit: step and clamp `value`, write it to the bound
    /// field, show it, then fire the change callback.
    ///
    /// Returns the value that was actually applied.
    pub fn user_edit(&mut self, folder: &str, label: &str, value: f64) -> Result<f64, PanelError> {
        let unknown = || PanelError::UnknownControl {
            folder: folder.to_string(),
            label: label.to_string(),
        };
        let entry = self
            .folders
            .iter_mut()
            .find(|f| f.name == folder)
            .and_then(|f| f.control_mut(label))
            .ok_or_else(unknown)?;

        if !value.is_finite() {
            warn!("[armsync] ignoring non-finite edit {value} on '{label}'");
            return Err(PanelError::NonFiniteInput {
                label: label.to_string(),
                value,
            });
        }

        let applied = entry.control.constrain(value);
        entry.control.field().set(applied);
        entry.displayed = applied;
        trace!("[armsync] edit '{folder}/{label}': requested {value}, applied {applied}");

        entry.control.notify_change();
        Ok(applied)
    }

    /// Re-read every listening control from its field.
    ///
    /// Returns how many displayed values changed.
    pub fn refresh(&mut self) -> usize {
        let mut changed = 0;
        for entry in self
            .folders
            .iter_mut()
            .flat_map(|f| f.controls.iter_mut())
            .filter(|c| c.control.is_listening())
        {
            let current = entry.control.field().get();
            if current != entry.displayed {
                entry.displayed = current;
                changed += 1;
            }
        }
        changed
    }
}

impl ControlPanel for HeadlessPanel {
    type Folder = HeadlessFolder;

    fn add_folder(&mut self, name: &str) -> &mut HeadlessFolder {
        let index = match self.folders.iter().position(|f| f.name == name) {
            Some(index) => index,
            None => {
                self.folders.push(HeadlessFolder {
                    name: name.to_string(),
                    controls: Vec::new(),
                });
                self.folders.len() - 1
            }
        };
        &mut self.folders[index]
    }
}
