use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// An angle in the store's native unit.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[serde(transparent)]
pub struct Radians(pub f64);

/// An angle in the control panel's display unit.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[serde(transparent)]
pub struct Degrees(pub f64);

impl Radians {
    pub const fn value(self) -> f64 {
        self.0
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl Degrees {
    pub const fn value(self) -> f64 {
        self.0
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl From<f64> for Radians {
    fn from(value: f64) -> Self {
        Radians(value)
    }
}

impl From<f64> for Degrees {
    fn from(value: f64) -> Self {
        Degrees(value)
    }
}

impl Display for Radians {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rad", self.0)
    }
}

impl Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}
