//! armsync demo
//!
//! A headless Bevy app that:
//! - Builds an in-process robot store and attaches a joint panel to it
//! - Drifts joint J0 every frame, the way a live robot feed would
//! - Replays scripted operator edits on the panel at fixed frames
//! - Runs the panel refresh loop and logs what the operator would see
//!
//! Run with: cargo run -p armsync_demo -- [config.json]

use std::time::Duration;

use armsync::{
    ConfigError, Degrees, Error, HeadlessPanel, JointId, JointLimit, JointLimitTable, JointMap,
    PanelSettings, RobotAction, RobotState, RobotStore, StateStore, SyncController, to_canonical,
};
use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use serde::Deserialize;

/// Demo configuration, read from the JSON file given as the first argument.
#[derive(Resource, Deserialize, Clone, Debug)]
#[serde(default, deny_unknown_fields)]
struct DemoConfig {
    panel: PanelSettings,
    /// Joint limits in degrees; the robot model's limits when absent.
    limits_deg: Option<JointMap<JointLimit<Degrees>>>,
    /// Number of frames to run before exiting.
    frames: u32,
    tick_ms: u64,
    /// Peak J0 excursion of the simulated robot, in degrees.
    drift_deg: f64,
    edits: Vec<ScriptedEdit>,
}

/// An operator edit replayed on the panel at `frame`.
#[derive(Deserialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
struct ScriptedEdit {
    frame: u32,
    control: String,
    value: f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        let edit = |frame, control: &str, value| ScriptedEdit {
            frame,
            control: control.to_string(),
            value,
        };
        Self {
            panel: PanelSettings::default(),
            limits_deg: None,
            frames: 120,
            tick_ms: 16,
            drift_deg: 30.0,
            edits: vec![
                edit(30, "A2", -20.4),
                // Far outside J4's travel; the panel clamps it.
                edit(60, "A4", 500.0),
                edit(90, "A1", 33.0),
            ],
        }
    }
}

impl DemoConfig {
    fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let config: DemoConfig = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        config.panel.validate()?;
        Ok(config)
    }

    fn joint_limits(&self) -> Result<JointLimitTable, ConfigError> {
        match self.limits_deg {
            Some(limits) => JointLimitTable::from_degrees(limits),
            None => Ok(JointLimitTable::default()),
        }
    }
}

/// Store, panel and controller for the running demo. Holds `Rc` handles, so
/// it lives in the app as a non-send resource.
struct DemoSession {
    store: RobotStore,
    panel: HeadlessPanel,
    controller: SyncController<RobotStore>,
    frame: u32,
}

impl DemoSession {
    fn new(config: &DemoConfig) -> Result<Self, Error> {
        let store = RobotStore::with_limits(config.joint_limits()?);
        let mut panel = HeadlessPanel::new();
        let controller = SyncController::attach(store.clone(), &mut panel, &config.panel)?;
        Ok(Self {
            store,
            panel,
            controller,
            frame: 0,
        })
    }
}

fn main() -> AppExit {
    let mut app = App::new();
    app.add_plugins(bevy::log::LogPlugin::default());

    let config_path = std::env::args().nth(1);
    let config = match DemoConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid demo configuration: {err}");
            return AppExit::error();
        }
    };
    let session = match DemoSession::new(&config) {
        Ok(session) => session,
        Err(err) => {
            error!("Failed to attach the joint panel: {err}");
            return AppExit::error();
        }
    };

    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(
        Duration::from_millis(config.tick_ms),
    )));

    info!(
        "Starting armsync demo: {} frames, {} operator edits",
        config.frames,
        config.edits.len()
    );

    app.insert_resource(config);
    app.insert_non_send_resource(session);
    app.add_systems(
        Update,
        (
            drive_robot,
            apply_operator_edits,
            refresh_panel,
            stop_after_frame_budget,
        )
            .chain(),
    );

    app.run()
}

/// Simulated robot feed: swings J0 sinusoidally inside its travel and
/// publishes the full angle set by action name, as an external driver would.
fn drive_robot(mut session: NonSendMut<DemoSession>, config: Res<DemoConfig>, time: Res<Time>) {
    session.frame += 1;

    let range = session.controller.display_range(JointId::J0);
    let target = (config.drift_deg * (time.elapsed_secs_f64() * 0.5).sin())
        .clamp(range.min.value(), range.max.value());

    let mut angles = session.store.state().angles;
    angles[JointId::J0] = to_canonical(Degrees(target));

    let result = serde_json::to_value(angles)
        .map_err(|err| err.to_string())
        .and_then(|payload| {
            session
                .store
                .dispatch_named(RobotAction::CHANGE_ANGLES, payload)
                .map_err(|err| err.to_string())
        });
    if let Err(err) = result {
        warn!("Robot feed update dropped: {err}");
    }
}

fn apply_operator_edits(mut session: NonSendMut<DemoSession>, config: Res<DemoConfig>) {
    let frame = session.frame;
    for edit in config.edits.iter().filter(|edit| edit.frame == frame) {
        match session
            .panel
            .user_edit(&config.panel.folder_name, &edit.control, edit.value)
        {
            Ok(applied) => info!(
                "Frame {frame}: operator set {} to {applied} (requested {})",
                edit.control, edit.value
            ),
            Err(err) => warn!("Frame {frame}: {err}"),
        }
    }
}

fn refresh_panel(mut session: NonSendMut<DemoSession>, config: Res<DemoConfig>) {
    let changed = session.panel.refresh();
    if changed > 0 {
        if let Some(folder) = session.panel.folder(&config.panel.folder_name) {
            let shown: Vec<String> = folder
                .controls()
                .iter()
                .map(|control| format!("{}={:.1}", control.label(), control.displayed()))
                .collect();
            debug!(
                "Frame {}: {changed} control(s) updated [{}]",
                session.frame,
                shown.join(" ")
            );
        }
    }

    if !session.controller.is_consistent() {
        warn!("Frame {}: panel mirror diverged from the store", session.frame);
    }
}

fn stop_after_frame_budget(
    session: NonSend<DemoSession>,
    config: Res<DemoConfig>,
    mut exit: MessageWriter<AppExit>,
) {
    if session.frame < config.frames {
        return;
    }

    let RobotState { angles, .. } = session.store.state();
    let summary: Vec<String> = session
        .controller
        .mirror()
        .snapshot()
        .iter()
        .map(|(joint, angle)| format!("{}={:.2}° ({:.4} rad)", joint, angle.value(), angles[joint].value()))
        .collect();
    info!("Finished after {} frames: {}", session.frame, summary.join(", "));
    exit.write(AppExit::Success);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_attaches() {
        let session = DemoSession::new(&DemoConfig::default()).unwrap();
        assert_eq!(session.store.listener_count(), 1);
        assert!(session.panel.folder("angles").is_some());
    }

    #[test]
    fn test_config_json_with_degree_limits() {
        let json = r#"{
            "frames": 10,
            "panel": { "folder_name": "joints", "step": 0.5 },
            "limits_deg": {
                "J0": { "min": -10.0, "max": 10.0 },
                "J1": { "min": -10.0, "max": 10.0 },
                "J2": { "min": -10.0, "max": 10.0 },
                "J3": { "min": -10.0, "max": 10.0 },
                "J4": { "min": -10.0, "max": 10.0 },
                "J5": { "min": -10.0, "max": 10.0 }
            },
            "edits": [{ "frame": 2, "control": "A3", "value": 42.0 }]
        }"#;
        let config: DemoConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.tick_ms, 16);

        let mut session = DemoSession::new(&config).unwrap();
        let max = session.controller.display_range(JointId::J3).max.value();
        assert_eq!(session.panel.user_edit("joints", "A3", 42.0), Ok(max));
    }

    #[test]
    fn test_missing_joint_limit_is_rejected() {
        let json = r#"{ "limits_deg": { "J0": { "min": -10.0, "max": 10.0 } } }"#;
        assert!(serde_json::from_str::<DemoConfig>(json).is_err());
    }

    #[test]
    fn test_runs_frame_budget_and_exits() {
        let config = DemoConfig {
            frames: 5,
            edits: vec![ScriptedEdit {
                frame: 3,
                control: "A2".to_string(),
                value: -20.0,
            }],
            ..DemoConfig::default()
        };
        let session = DemoSession::new(&config).unwrap();

        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(config);
        app.insert_non_send_resource(session);
        app.add_systems(
            Update,
            (drive_robot, apply_operator_edits, refresh_panel, stop_after_frame_budget).chain(),
        );

        for _ in 0..5 {
            app.update();
        }

        let session = app.world().non_send_resource::<DemoSession>();
        assert_eq!(session.frame, 5);
        assert!(session.controller.is_consistent());
        assert!((session.controller.mirror().get(JointId::J2).value() + 20.0).abs() < 1e-9);
    }
}
