//! armsync
//!
//! Live synchronization between a robot's joint-angle store (radians) and
//! a panel of bounded numeric controls (degrees).
//!
//! This crate exposes:
//!
//! - [`StateStore`]: the store contract (`state` / `listen` / `dispatch`),
//!   with [`RobotStore`] as a synchronous in-process implementation.
//! - [`ControlPanel`] / [`PanelFolder`] / [`NumberControl`]: the panel toolkit
//!   contract, with [`HeadlessPanel`] as a render-free implementation.
//! - [`SyncController`]: owns the display mirror and wires both directions.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use armsync::{HeadlessPanel, PanelSettings, RobotStore, SyncController};
//!
//! let store = RobotStore::default();
//! let mut panel = HeadlessPanel::new();
//! let controller = SyncController::attach(store.clone(), &mut panel, &PanelSettings::default())?;
//!
//! // An operator drags A2 to 45 degrees; the store receives all six joints.
//! panel.user_edit("angles", "A2", 45.0)?;
//! assert!(controller.is_consistent());
//!
//! // Controls created with `listen()` re-read the mirror every frame.
//! panel.refresh();
//! # Ok::<(), armsync::Error>(())
//! ```

mod controller;
mod error;
mod mirror;
pub mod panel;
mod settings;
mod store;

pub use controller::SyncController;
pub use error::Error;
pub use mirror::{DisplayMirror, MirrorField};
pub use panel::{
    ControlPanel, HeadlessControl, HeadlessFolder, HeadlessPanel, NumberControl, NumericField,
    PanelError, PanelFolder,
};
pub use settings::PanelSettings;
pub use store::{RobotStore, StateStore, StoreError, SubscriptionId};

// Re-export the shared types so callers need a single dependency.
pub use armsync_common::*;
