use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::ops::{Index, IndexMut};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;

/// Number of rotational joints on the arm.
pub const JOINT_COUNT: usize = 6;

/// One rotational degree of freedom of the arm.
///
/// The store addresses joints by their store key (`J0`..`J5`); the control
/// panel labels them `A0`..`A5`. Both names derive from the same variant so
/// the two sides can never disagree on which joint is which.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JointId {
    J0,
    J1,
    J2,
    J3,
    J4,
    J5,
}

impl JointId {
    /// Every joint, in the stable order used for iteration and control layout.
    pub const ALL: [JointId; JOINT_COUNT] = [
        JointId::J0,
        JointId::J1,
        JointId::J2,
        JointId::J3,
        JointId::J4,
        JointId::J5,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Key used by the state store.
    pub const fn store_key(self) -> &'static str {
        match self {
            JointId::J0 => "J0",
            JointId::J1 => "J1",
            JointId::J2 => "J2",
            JointId::J3 => "J3",
            JointId::J4 => "J4",
            JointId::J5 => "J5",
        }
    }

    /// Label shown on the control panel.
    pub const fn display_label(self) -> &'static str {
        match self {
            JointId::J0 => "A0",
            JointId::J1 => "A1",
            JointId::J2 => "A2",
            JointId::J3 => "A3",
            JointId::J4 => "A4",
            JointId::J5 => "A5",
        }
    }

    /// Resolve a panel label (`A0`..`A5`) back to its joint.
    pub fn from_display_label(label: &str) -> Option<JointId> {
        JointId::ALL
            .into_iter()
            .find(|joint| joint.display_label() == label)
    }
}

impl Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.store_key())
    }
}

/// A total mapping from every [`JointId`] to a value.
///
/// Lookups are keyed, never positional: `map[JointId::J2]` is the only way to
/// reach a joint's entry. All six joints are always present.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct JointMap<T> {
    values: [T; JOINT_COUNT],
}

impl<T> JointMap<T> {
    /// Build a map by evaluating `f` once per joint, in [`JointId::ALL`] order.
    pub fn from_fn(mut f: impl FnMut(JointId) -> T) -> Self {
        Self {
            values: JointId::ALL.map(&mut f),
        }
    }

    pub fn get(&self, joint: JointId) -> &T {
        &self.values[joint.index()]
    }

    pub fn set(&mut self, joint: JointId, value: T) {
        self.values[joint.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointId, &T)> {
        JointId::ALL.into_iter().zip(self.values.iter())
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> JointMap<U> {
        JointMap::from_fn(|joint| f(self.get(joint)))
    }
}

impl<T: Clone> JointMap<T> {
    pub fn splat(value: T) -> Self {
        Self::from_fn(|_| value.clone())
    }
}

impl<T> Index<JointId> for JointMap<T> {
    type Output = T;

    fn index(&self, joint: JointId) -> &T {
        self.get(joint)
    }
}

impl<T> IndexMut<JointId> for JointMap<T> {
    fn index_mut(&mut self, joint: JointId) -> &mut T {
        &mut self.values[joint.index()]
    }
}

impl<T> TryFrom<BTreeMap<JointId, T>> for JointMap<T> {
    type Error = ConfigError;

    fn try_from(mut entries: BTreeMap<JointId, T>) -> Result<Self, Self::Error> {
        let values = JointId::ALL
            .into_iter()
            .map(|joint| entries.remove(&joint).ok_or(ConfigError::MissingJoint(joint)))
            .collect::<Result<Vec<_>, _>>()?;
        // One entry per joint by construction.
        let values = <[T; JOINT_COUNT]>::try_from(values)
            .map_err(|_| ConfigError::MissingJoint(JointId::J0))?;
        Ok(Self { values })
    }
}

impl<T: Serialize> Serialize for JointMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for JointMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<JointId, T>::deserialize(deserializer)?;
        JointMap::try_from(entries).map_err(D::Error::custom)
    }
}
