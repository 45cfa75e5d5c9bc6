use armsync_common::ConfigError;
use serde::{Deserialize, Serialize};

/// How the joint controls are laid out on the panel.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PanelSettings {
    /// Folder that holds one control per joint.
    pub folder_name: String,
    /// Step granularity of each control, in degrees.
    pub step: f64,
    /// Whether controls re-read the mirror on every panel refresh.
    pub continuous_refresh: bool,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            folder_name: "angles".to_string(),
            step: 1.0,
            continuous_refresh: true,
        }
    }
}

impl PanelSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(ConfigError::InvalidStep(self.step));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let settings: PanelSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }
}
