use std::cell::RefCell;
use std::rc::Rc;

use armsync_common::{CanonicalAngles, Degrees, JointId, JointMap, to_display};

use crate::panel::NumericField;

/// Display-unit copy of the canonical joint angles, shared with the panel
/// controls bound to it.
#[derive(Clone, Debug)]
pub struct DisplayMirror {
    angles: Rc<RefCell<JointMap<Degrees>>>,
}

impl DisplayMirror {
    pub fn new(angles: JointMap<Degrees>) -> Self {
        Self {
            angles: Rc::new(RefCell::new(angles)),
        }
    }

    pub fn from_canonical(angles: &CanonicalAngles) -> Self {
        Self::new(angles.map(|angle| to_display(*angle)))
    }

    pub fn get(&self, joint: JointId) -> Degrees {
        self.angles.borrow()[joint]
    }

    pub fn set(&self, joint: JointId, angle: Degrees) {
        self.angles.borrow_mut()[joint] = angle;
    }

    pub fn snapshot(&self) -> JointMap<Degrees> {
        *self.angles.borrow()
    }

    /// Overwrite every joint with the display value of `canonical`.
    pub fn refresh_from(&self, canonical: &CanonicalAngles) {
        let mut angles = self.angles.borrow_mut();
        for (joint, angle) in canonical.iter() {
            angles[joint] = to_display(*angle);
        }
    }

    /// A panel binding for one joint of this mirror.
    pub fn field(&self, joint: JointId) -> MirrorField {
        MirrorField {
            mirror: self.clone(),
            joint,
        }
    }
}

/// One joint of a [`DisplayMirror`], exposed as a panel field in degrees.
#[derive(Clone, Debug)]
pub struct MirrorField {
    mirror: DisplayMirror,
    joint: JointId,
}

impl NumericField for MirrorField {
    fn get(&self) -> f64 {
        self.mirror.get(self.joint).value()
    }

    fn set(&self, value: f64) {
        self.mirror.set(self.joint, Degrees(value));
    }
}
