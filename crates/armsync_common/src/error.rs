use thiserror::Error;

use crate::joint::JointId;

/// Errors raised while building configuration that must be valid at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A joint-keyed table has no entry for this joint.
    #[error("joint table has no entry for {0}")]
    MissingJoint(JointId),

    /// A joint's limits are non-finite or not strictly ordered.
    #[error("invalid limits for {joint}: min {min} must be finite and below max {max}")]
    InvalidLimit { joint: JointId, min: f64, max: f64 },

    /// Control step granularity must be a positive, finite number.
    #[error("invalid control step {0}: must be positive and finite")]
    InvalidStep(f64),

    /// The configuration document could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}
