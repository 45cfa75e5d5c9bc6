//! armsync_common
//!
//! Types shared between the armsync store, the sync controller and any
//! control panel implementation:
//!
//! - [`JointId`] / [`JointMap`]: keyed, total per-joint storage.
//! - [`Radians`] / [`Degrees`]: unit newtypes for canonical and display angles.
//! - [`adapter`]: pure conversion between the two units, including limits.
//! - [`JointLimitTable`]: validated per-joint travel limits.
//! - [`RobotState`] / [`RobotAction`]: store state and its update actions.

pub mod adapter;
pub mod error;
pub mod joint;
pub mod limits;
pub mod messages;
pub mod units;

pub use adapter::{angles_to_canonical, angles_to_display, display_limits, to_canonical, to_display};
pub use error::ConfigError;
pub use joint::{JOINT_COUNT, JointId, JointMap};
pub use limits::{JointLimit, JointLimitTable};
pub use messages::{CanonicalAngles, RobotAction, RobotState};
pub use units::{Degrees, Radians};
