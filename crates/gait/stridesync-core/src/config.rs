//! Tool configuration for reference building and transplantation.

use serde::{Deserialize, Serialize};

use crate::error::GaitError;
use crate::notify::TrackColor;

/// Tunables shared by the builder and the transplanter.
/// Every field has a default so partial JSON documents are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum per-frame height drop that keeps the stabilization walk going.
    pub stabilization_threshold: f32,
    /// Markers/events closer than this to a computed time suppress insertion.
    pub duplicate_tolerance: f32,

    /// Track that receives the raw contact markers.
    pub default_track_name: String,
    pub left_marker_name: String,
    pub right_marker_name: String,
    /// Color for tracks created by the tool.
    pub track_color: TrackColor,

    /// Root-motion translations shorter than this are treated as stationary.
    pub root_motion_epsilon: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stabilization_threshold: 0.25,
            duplicate_tolerance: 0.01,
            default_track_name: "Default Track".to_string(),
            left_marker_name: "Marker_l".to_string(),
            right_marker_name: "Marker_r".to_string(),
            track_color: TrackColor::WHITE,
            root_motion_epsilon: 0.1,
        }
    }
}

impl Config {
    pub fn from_json(s: &str) -> Result<Self, GaitError> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = Config::from_json(r#"{ "duplicate_tolerance": 0.05 }"#).unwrap();
        assert_eq!(cfg.duplicate_tolerance, 0.05);
        assert_eq!(cfg.stabilization_threshold, 0.25);
        assert_eq!(cfg.default_track_name, "Default Track");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Config::from_json("{ nope").unwrap_err();
        assert!(matches!(err, GaitError::Parse(_)));
    }
}
