use std::cell::RefCell;
use std::f64::consts::{FRAC_PI_2, PI};
use std::rc::Rc;

use armsync::{
    CanonicalAngles, ConfigError, Degrees, Error, HeadlessPanel, JointId, JointLimit,
    JointLimitTable, JointMap, PanelSettings, Radians, RobotAction, RobotState, RobotStore,
    StateStore, StoreError, SubscriptionId, SyncController, to_canonical, to_display,
};

const TOLERANCE: f64 = 1e-9;

/// Forwards to a `RobotStore` and records every dispatched action.
#[derive(Clone, Default)]
struct RecordingStore {
    inner: RobotStore,
    dispatched: Rc<RefCell<Vec<RobotAction>>>,
}

impl RecordingStore {
    fn payloads(&self) -> Vec<CanonicalAngles> {
        self.dispatched
            .borrow()
            .iter()
            .map(|action| match action {
                RobotAction::ChangeAngles(angles) => *angles,
            })
            .collect()
    }
}

impl StateStore for RecordingStore {
    fn state(&self) -> RobotState {
        self.inner.state()
    }

    fn listen<T, S, F>(&self, selector: S, callback: F) -> SubscriptionId
    where
        T: PartialEq + 'static,
        S: Fn(&RobotState) -> T + 'static,
        F: FnMut(&T) + 'static,
    {
        self.inner.listen(selector, callback)
    }

    fn dispatch(&self, action: RobotAction) -> Result<(), StoreError> {
        self.dispatched.borrow_mut().push(action.clone());
        self.inner.dispatch(action)
    }
}

/// A store that refuses every update.
#[derive(Clone, Default)]
struct LockedStore {
    inner: RobotStore,
}

impl StateStore for LockedStore {
    fn state(&self) -> RobotState {
        self.inner.state()
    }

    fn listen<T, S, F>(&self, selector: S, callback: F) -> SubscriptionId
    where
        T: PartialEq + 'static,
        S: Fn(&RobotState) -> T + 'static,
        F: FnMut(&T) + 'static,
    {
        self.inner.listen(selector, callback)
    }

    fn dispatch(&self, action: RobotAction) -> Result<(), StoreError> {
        Err(StoreError::Rejected {
            action: action.name(),
            reason: "robot is locked".to_string(),
        })
    }
}

fn angles(values: [f64; 6]) -> CanonicalAngles {
    JointMap::from_fn(|joint| Radians(values[joint.index()]))
}

/// Every joint free to travel a full half turn each way.
fn wide_limits() -> JointLimitTable {
    JointLimitTable::from_degrees(JointMap::splat(JointLimit::new(Degrees(-180.0), Degrees(180.0))))
        .expect("symmetric limits are valid")
}

fn attach<S: StateStore + Clone + 'static>(store: &S) -> (SyncController<S>, HeadlessPanel) {
    let mut panel = HeadlessPanel::new();
    let controller = SyncController::attach(store.clone(), &mut panel, &PanelSettings::default())
        .expect("default settings are valid");
    (controller, panel)
}

#[test]
fn test_store_update_propagates_to_mirror_and_panel() {
    let store = RobotStore::default();
    let (controller, mut panel) = attach(&store);

    store
        .dispatch(RobotAction::ChangeAngles(angles([FRAC_PI_2, 0.0, 0.0, 0.0, 0.0, 0.0])))
        .unwrap();

    let mirror = controller.mirror();
    assert!((mirror.get(JointId::J0).0 - 90.0).abs() < TOLERANCE);
    assert_eq!(mirror.get(JointId::J1), Degrees(0.0));

    // Listening controls show the new value after the next refresh.
    assert_eq!(panel.displayed("angles", "A0"), Some(0.0));
    assert_eq!(panel.refresh(), 1);
    let shown = panel.displayed("angles", "A0").unwrap();
    assert!((shown - 90.0).abs() < TOLERANCE);
}

#[test]
fn test_mirror_initialized_from_current_store_state() {
    let store = RobotStore::default();
    store
        .dispatch(RobotAction::ChangeAngles(angles([0.0, 0.0, 0.0, -PI / 4.0, 0.0, 0.0])))
        .unwrap();

    let (controller, panel) = attach(&store);

    assert!((controller.mirror().get(JointId::J3).0 + 45.0).abs() < TOLERANCE);
    let shown = panel.displayed("angles", "A3").unwrap();
    assert!((shown + 45.0).abs() < TOLERANCE);
    assert!(controller.is_consistent());
}

#[test]
fn test_single_edit_dispatches_complete_angle_set() {
    let store = RecordingStore {
        inner: RobotStore::with_limits(wide_limits()),
        ..RecordingStore::default()
    };
    let (controller, mut panel) = attach(&store);

    let mirror = controller.mirror();
    mirror.set(JointId::J0, Degrees(10.0));
    mirror.set(JointId::J1, Degrees(20.0));

    assert_eq!(panel.user_edit("angles", "A2", 45.0), Ok(45.0));

    let payloads = store.payloads();
    assert_eq!(payloads.len(), 1, "one edit must produce exactly one dispatch");

    let payload = payloads[0];
    assert_eq!(payload[JointId::J0], to_canonical(Degrees(10.0)));
    assert_eq!(payload[JointId::J1], to_canonical(Degrees(20.0)));
    assert_eq!(payload[JointId::J2], Radians(45.0 * PI / 180.0));
    for joint in [JointId::J3, JointId::J4, JointId::J5] {
        assert_eq!(payload[joint], Radians(0.0));
    }

    assert_eq!(store.state().angles, payload);
    assert!(controller.is_consistent());
}

#[test]
fn test_self_caused_notification_settles_without_redispatch() {
    let store = RecordingStore::default();
    let (controller, mut panel) = attach(&store);

    for (label, value) in [("A0", 12.0), ("A5", -33.0), ("A0", 13.0)] {
        panel.user_edit("angles", label, value).unwrap();
        assert!(controller.is_consistent());
    }

    assert_eq!(store.payloads().len(), 3);
    let shown = panel.displayed("angles", "A5").unwrap();
    assert!((shown + 33.0).abs() < TOLERANCE);
}

#[test]
fn test_repeated_edit_keeps_mirror_on_stored_value() {
    let store = RecordingStore::default();
    let (controller, mut panel) = attach(&store);

    // -120 degrees does not survive the trip through radians exactly, so the
    // second edit converts to the angles the store already holds.
    for _ in 0..2 {
        assert_eq!(panel.user_edit("angles", "A0", -120.0), Ok(-120.0));
        assert!(controller.is_consistent());
    }

    assert_eq!(store.payloads().len(), 2);
    let stored = to_display(store.state().angles[JointId::J0]);
    assert_eq!(controller.mirror().get(JointId::J0), stored);

    panel.refresh();
    assert_eq!(panel.displayed("angles", "A0"), Some(stored.value()));
}

#[test]
fn test_reapplying_same_angles_is_idempotent() {
    let store = RobotStore::default();
    let (controller, mut panel) = attach(&store);
    let set = angles([0.3, -0.2, 0.1, 0.0, -1.0, 2.5]);

    store.dispatch(RobotAction::ChangeAngles(set)).unwrap();
    panel.refresh();
    let mirror_before = controller.mirror().snapshot();
    let ranges_before = *controller.display_ranges();

    store.dispatch(RobotAction::ChangeAngles(set)).unwrap();
    assert_eq!(panel.refresh(), 0);

    assert_eq!(controller.mirror().snapshot(), mirror_before);
    assert_eq!(*controller.display_ranges(), ranges_before);
}

#[test]
fn test_controls_follow_joint_order_and_limits() {
    let store = RobotStore::default();
    let (controller, panel) = attach(&store);

    let folder = panel.folder("angles").expect("angles folder");
    let labels: Vec<_> = folder.controls().iter().map(|c| c.label().to_string()).collect();
    assert_eq!(labels, ["A0", "A1", "A2", "A3", "A4", "A5"]);

    for joint in JointId::ALL {
        let control = folder.control(joint.display_label()).unwrap();
        let range = controller.display_range(joint);
        assert_eq!(control.range(), (Some(range.min.value()), Some(range.max.value())));
        assert_eq!(control.step(), Some(1.0));
        assert!(control.is_listening());
    }

    let j1 = controller.display_range(JointId::J1);
    assert!((j1.min.0 + 58.0).abs() < TOLERANCE);
    assert!((j1.max.0 - 90.0).abs() < TOLERANCE);
}

#[test]
fn test_edit_beyond_limit_is_clamped_before_dispatch() {
    let store = RobotStore::default();
    let (controller, mut panel) = attach(&store);
    let max = controller.display_range(JointId::J4).max;

    let applied = panel.user_edit("angles", "A4", 500.0).unwrap();

    assert_eq!(applied, max.value());
    assert!(controller.display_range(JointId::J4).contains(Degrees(applied)));
    assert_eq!(store.state().angles[JointId::J4], to_canonical(max));
    assert!((controller.mirror().get(JointId::J4).0 - max.0).abs() < TOLERANCE);
}

#[test]
fn test_limits_never_change_after_attach() {
    let store = RobotStore::default();
    let limits = store.state().joint_limits;
    let (controller, mut panel) = attach(&store);
    let ranges = *controller.display_ranges();

    panel.user_edit("angles", "A0", 100.0).unwrap();
    store
        .dispatch(RobotAction::ChangeAngles(angles([1.0, 1.0, -1.0, 1.0, -1.0, 1.0])))
        .unwrap();

    assert_eq!(store.state().joint_limits, limits);
    assert_eq!(*controller.display_ranges(), ranges);
}

#[test]
fn test_rejected_dispatch_restores_mirror_from_store() {
    let store = LockedStore::default();
    let (controller, mut panel) = attach(&store);

    // The panel accepts the edit, but the store refuses it.
    assert_eq!(panel.user_edit("angles", "A0", 30.0), Ok(30.0));

    assert_eq!(controller.mirror().get(JointId::J0), Degrees(0.0));
    assert!(controller.is_consistent());

    panel.refresh();
    assert_eq!(panel.displayed("angles", "A0"), Some(0.0));

    assert!(matches!(controller.commit(), Err(StoreError::Rejected { .. })));
}

#[test]
fn test_commit_pushes_mirror_programmatically() {
    let store = RobotStore::default();
    let (controller, _panel) = attach(&store);

    controller.mirror().set(JointId::J2, Degrees(-90.0));
    controller.commit().unwrap();

    assert!((store.state().angles[JointId::J2].0 + FRAC_PI_2).abs() < TOLERANCE);
}

#[test]
fn test_custom_settings() {
    let store = RobotStore::default();
    let mut panel = HeadlessPanel::new();
    let settings = PanelSettings {
        folder_name: "joints".to_string(),
        step: 5.0,
        continuous_refresh: false,
    };
    let _controller = SyncController::attach(store.clone(), &mut panel, &settings).unwrap();

    assert!(panel.folder("angles").is_none());
    let control = panel.control("joints", "A1").unwrap();
    assert_eq!(control.step(), Some(5.0));
    assert!(!control.is_listening());

    assert_eq!(panel.user_edit("joints", "A1", 12.0), Ok(10.0));

    // Without continuous refresh, store-driven changes do not reach the panel.
    store
        .dispatch(RobotAction::ChangeAngles(angles([0.5; 6])))
        .unwrap();
    assert_eq!(panel.refresh(), 0);
    assert_eq!(panel.displayed("joints", "A1"), Some(10.0));
}

#[test]
fn test_invalid_step_fails_attach() {
    let store = RobotStore::default();
    let mut panel = HeadlessPanel::new();
    let settings = PanelSettings {
        step: 0.0,
        ..PanelSettings::default()
    };

    let result = SyncController::attach(store.clone(), &mut panel, &settings);

    assert!(matches!(result, Err(Error::Config(ConfigError::InvalidStep(_)))));
    assert!(panel.folders().is_empty());
    assert_eq!(store.listener_count(), 0);
}
