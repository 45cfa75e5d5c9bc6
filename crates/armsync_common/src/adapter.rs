//! Radian/degree conversion between the store and the control panel.
//!
//! Every function here is pure and total over finite input. Values outside a
//! joint's limits convert like any other value; enforcing limits is the job
//! of the bound control, not of the conversion.

use std::f64::consts::PI;

use crate::joint::JointMap;
use crate::limits::JointLimit;
use crate::units::{Degrees, Radians};

/// Convert a canonical angle to display units. No rounding is applied.
pub fn to_display(angle: Radians) -> Degrees {
    Degrees(angle.0 * 180.0 / PI)
}

/// Convert a display angle back to canonical units.
pub fn to_canonical(angle: Degrees) -> Radians {
    Radians(angle.0 * PI / 180.0)
}

/// Express a canonical joint limit as a display-unit range.
///
/// The conversion is strictly increasing, so `min < max` is preserved.
pub fn display_limits(limit: JointLimit<Radians>) -> JointLimit<Degrees> {
    JointLimit {
        min: to_display(limit.min),
        max: to_display(limit.max),
    }
}

pub fn angles_to_display(angles: &JointMap<Radians>) -> JointMap<Degrees> {
    angles.map(|angle| to_display(*angle))
}

pub fn angles_to_canonical(angles: &JointMap<Degrees>) -> JointMap<Radians> {
    angles.map(|angle| to_canonical(*angle))
}
