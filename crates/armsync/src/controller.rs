//! Two-way synchronization between the robot store and the joint controls.
//!
//! Store to panel: a store listener rewrites the whole display mirror from the
//! canonical angles; listening controls pick the new values up on their next
//! refresh.
//!
//! Panel to store: every control's change callback converts the *entire*
//! mirror back to radians and dispatches one `ChangeAngles`, because the
//! store only accepts complete angle sets.
//!
//! The store notifies the controller about its own dispatches too. That write
//! converges immediately, and both directions run to completion
//! synchronously, so no guard flag is needed to stop the loop. After every
//! dispatch, accepted or not, the mirror is re-read from the store: an edit
//! that lands on the angles the store already holds triggers no notification,
//! and the mirror must still show the stored value.

use std::rc::Rc;

use armsync_common::{
    CanonicalAngles, Degrees, JointId, JointLimit, JointMap, RobotAction, angles_to_canonical,
    angles_to_display, display_limits,
};
use tracing::{debug, trace, warn};

use crate::error::Error;
use crate::mirror::DisplayMirror;
use crate::panel::{ControlPanel, NumberControl, PanelFolder};
use crate::settings::PanelSettings;
use crate::store::{StateStore, StoreError, SubscriptionId};

pub struct SyncController<S: StateStore> {
    store: S,
    mirror: DisplayMirror,
    ranges: JointMap<JointLimit<Degrees>>,
    subscription: SubscriptionId,
}

impl<S> SyncController<S>
where
    S: StateStore + Clone + 'static,
{
    /// Build the mirror from the store, subscribe to angle changes and add
    /// one control per joint to `panel`.
    ///
    /// Joint limits are read once here; later store updates never change the
    /// control ranges.
    pub fn attach<P: ControlPanel>(
        store: S,
        panel: &mut P,
        settings: &PanelSettings,
    ) -> Result<Self, Error> {
        settings.validate()?;

        let state = store.state();
        let ranges = state.joint_limits.as_map().map(|limit| display_limits(*limit));
        let mirror = DisplayMirror::from_canonical(&state.angles);

        let subscription = {
            let mirror = mirror.clone();
            store.listen(
                |state| state.angles,
                move |angles: &CanonicalAngles| {
                    mirror.refresh_from(angles);
                    trace!("[armsync] mirror refreshed from store");
                },
            )
        };

        let folder = panel.add_folder(&settings.folder_name);
        for joint in JointId::ALL {
            let range = ranges[joint];
            let mut control =
                NumberControl::new(joint.display_label(), Rc::new(mirror.field(joint)))
                    .min(range.min.value())
                    .max(range.max.value())
                    .step(settings.step);
            if settings.continuous_refresh {
                control = control.listen();
            }

            let store = store.clone();
            let mirror = mirror.clone();
            folder.add(control.on_change(move || {
                if let Err(err) = commit_mirror(&store, &mirror) {
                    warn!(
                        "[armsync] store rejected edit on {joint}: {err}; restored mirror from store"
                    );
                }
            }));
        }

        debug!(
            "[armsync] attached {} joint controls to folder '{}' ({subscription})",
            JointId::ALL.len(),
            settings.folder_name
        );

        Ok(Self {
            store,
            mirror,
            ranges,
            subscription,
        })
    }

    /// Push the current mirror to the store as one complete angle set.
    ///
    /// The mirror is re-read from the store afterwards, so a rejected commit
    /// leaves it showing the store's angles.
    pub fn commit(&self) -> Result<(), StoreError> {
        commit_mirror(&self.store, &self.mirror)
    }
}

impl<S: StateStore> SyncController<S> {
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn mirror(&self) -> &DisplayMirror {
        &self.mirror
    }

    pub fn display_range(&self, joint: JointId) -> JointLimit<Degrees> {
        self.ranges[joint]
    }

    pub fn display_ranges(&self) -> &JointMap<JointLimit<Degrees>> {
        &self.ranges
    }

    pub fn subscription(&self) -> SubscriptionId {
        self.subscription
    }

    /// Whether the mirror equals the display value of the store's angles.
    pub fn is_consistent(&self) -> bool {
        self.mirror.snapshot() == angles_to_display(&self.store.state().angles)
    }
}

fn commit_mirror<S: StateStore>(store: &S, mirror: &DisplayMirror) -> Result<(), StoreError> {
    let canonical = angles_to_canonical(&mirror.snapshot());
    let result = store.dispatch(RobotAction::ChangeAngles(canonical));
    if result.is_ok() {
        trace!("[armsync] dispatched {}", RobotAction::CHANGE_ANGLES);
    }
    mirror.refresh_from(&store.state().angles);
    result
}
