use serde::{Deserialize, Serialize};

use crate::adapter::to_canonical;
use crate::error::ConfigError;
use crate::joint::{JointId, JointMap};
use crate::units::{Degrees, Radians};

/// A joint's lower and upper travel bound, in unit `U`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct JointLimit<U> {
    pub min: U,
    pub max: U,
}

impl<U> JointLimit<U> {
    pub const fn new(min: U, max: U) -> Self {
        Self { min, max }
    }
}

impl JointLimit<Degrees> {
    pub fn contains(&self, angle: Degrees) -> bool {
        self.min <= angle && angle <= self.max
    }
}

/// Physical travel limits of the arm, in radians, keyed by joint.
///
/// The table is validated on construction: every bound is finite and every
/// joint has `min < max`. It has no mutating API.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(transparent)]
pub struct JointLimitTable {
    limits: JointMap<JointLimit<Radians>>,
}

/// Travel of the six-axis arm as documented by the robot model, in degrees.
const fn default_limit_deg(joint: JointId) -> (f64, f64) {
    match joint {
        JointId::J0 => (-190.0, 190.0),
        JointId::J1 => (-58.0, 90.0),
        JointId::J2 => (-135.0, 40.0),
        JointId::J3 => (-90.0, 75.0),
        JointId::J4 => (-139.0, 20.0),
        JointId::J5 => (-188.0, 181.0),
    }
}

impl JointLimitTable {
    pub fn new(limits: JointMap<JointLimit<Radians>>) -> Result<Self, ConfigError> {
        for (joint, limit) in limits.iter() {
            let (min, max) = (limit.min.0, limit.max.0);
            if !min.is_finite() || !max.is_finite() || min >= max {
                return Err(ConfigError::InvalidLimit { joint, min, max });
            }
        }
        Ok(Self { limits })
    }

    /// Build a table from bounds given in degrees.
    pub fn from_degrees(limits: JointMap<JointLimit<Degrees>>) -> Result<Self, ConfigError> {
        Self::new(limits.map(|limit| JointLimit {
            min: to_canonical(limit.min),
            max: to_canonical(limit.max),
        }))
    }

    /// Parse a radian table such as `{"J0": {"min": -3.3, "max": 3.3}, ...}`.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let limits: JointMap<JointLimit<Radians>> = serde_json::from_str(json)?;
        Self::new(limits)
    }

    pub fn get(&self, joint: JointId) -> JointLimit<Radians> {
        self.limits[joint]
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointId, JointLimit<Radians>)> {
        self.limits.iter().map(|(joint, limit)| (joint, *limit))
    }

    pub fn as_map(&self) -> &JointMap<JointLimit<Radians>> {
        &self.limits
    }
}

impl Default for JointLimitTable {
    fn default() -> Self {
        let limits = JointMap::from_fn(|joint| {
            let (min, max) = default_limit_deg(joint);
            JointLimit {
                min: to_canonical(Degrees(min)),
                max: to_canonical(Degrees(max)),
            }
        });
        Self { limits }
    }
}

impl<'de> Deserialize<'de> for JointLimitTable {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let limits = JointMap::<JointLimit<Radians>>::deserialize(deserializer)?;
        JointLimitTable::new(limits).map_err(serde::de::Error::custom)
    }
}
