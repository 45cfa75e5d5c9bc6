//! Control panel toolkit contract.
//!
//! A panel groups numeric controls into named folders. Each control is bound
//! to a [`NumericField`], declares an optional range and step, and may ask to
//! be refreshed from its field continuously (`listen`). The toolkit calls the
//! control's change callback after it has written a user edit to the field.
//!
//! ```rust,ignore
//! let folder = panel.add_folder("angles");
//! folder.add(
//!     NumberControl::new("A0", field)
//!         .min(-190.0)
//!         .max(190.0)
//!         .step(1.0)
//!         .listen()
//!         .on_change(|| commit()),
//! );
//! ```

use std::fmt;
use std::rc::Rc;

pub mod headless;

pub use headless::{HeadlessControl, HeadlessFolder, HeadlessPanel, PanelError};

/// A value a control reads from and writes user edits to.
pub trait NumericField {
    fn get(&self) -> f64;
    fn set(&self, value: f64);
}

/// Declarative description of one numeric control.
pub struct NumberControl {
    label: String,
    field: Rc<dyn NumericField>,
    min: Option<f64>,
    max: Option<f64>,
    step: Option<f64>,
    listen: bool,
    on_change: Option<Box<dyn FnMut()>>,
}

impl NumberControl {
    pub fn new(label: impl Into<String>, field: Rc<dyn NumericField>) -> Self {
        Self {
            label: label.into(),
            field,
            min: None,
            max: None,
            step: None,
            listen: false,
            on_change: None,
        }
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Re-read the bound field on every refresh, not only after user edits.
    pub fn listen(mut self) -> Self {
        self.listen = true;
        self
    }

    pub fn on_change(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn field(&self) -> &Rc<dyn NumericField> {
        &self.field
    }

    pub fn range(&self) -> (Option<f64>, Option<f64>) {
        (self.min, self.max)
    }

    pub fn step_size(&self) -> Option<f64> {
        self.step
    }

    pub fn is_listening(&self) -> bool {
        self.listen
    }

    /// Snap `value` to the step grid, then clamp it into the declared range.
    pub fn constrain(&self, value: f64) -> f64 {
        let mut value = value;
        if let Some(step) = self.step {
            value = (value / step).round() * step;
        }
        if let Some(min) = self.min {
            value = value.max(min);
        }
        if let Some(max) = self.max {
            value = value.min(max);
        }
        value
    }

    /// Invoke the change callback, if any.
    pub fn notify_change(&mut self) {
        if let Some(callback) = self.on_change.as_mut() {
            callback();
        }
    }
}

impl fmt::Debug for NumberControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumberControl")
            .field("label", &self.label)
            .field("value", &self.field.get())
            .field("min", &self.min)
            .field("max", &self.max)
            .field("step", &self.step)
            .field("listen", &self.listen)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

/// A named group of controls.
pub trait PanelFolder {
    fn add(&mut self, control: NumberControl);
}

/// The control panel itself.
pub trait ControlPanel {
    type Folder: PanelFolder;

    /// Create a folder, or return the existing one with this name.
    fn add_folder(&mut self, name: &str) -> &mut Self::Folder;
}
