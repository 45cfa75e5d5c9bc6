use serde::{Deserialize, Serialize};

use crate::joint::JointMap;
use crate::limits::JointLimitTable;
use crate::units::Radians;

/// Canonical joint angles as held by the store.
pub type CanonicalAngles = JointMap<Radians>;

/// Snapshot of the robot store.
///
/// `joint_limits` is fixed when the store is created; no [`RobotAction`]
/// touches it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RobotState {
    pub angles: CanonicalAngles,
    pub joint_limits: JointLimitTable,
}

impl RobotState {
    pub fn new(angles: CanonicalAngles, joint_limits: JointLimitTable) -> Self {
        Self {
            angles,
            joint_limits,
        }
    }
}

impl Default for RobotState {
    fn default() -> Self {
        Self::new(JointMap::default(), JointLimitTable::default())
    }
}

/// Updates accepted by the robot store.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum RobotAction {
    /// Replace every joint angle at once. There is no per-joint variant: the
    /// payload always carries the complete set.
    ChangeAngles(CanonicalAngles),
}

impl RobotAction {
    pub const CHANGE_ANGLES: &'static str = "ROBOT_CHANGE_ANGLES";

    /// Stable action name, as used by string-keyed dispatch.
    pub fn name(&self) -> &'static str {
        match self {
            RobotAction::ChangeAngles(_) => Self::CHANGE_ANGLES,
        }
    }
}
