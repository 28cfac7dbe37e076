//! Recognized configuration options and their validation.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Fallback document name when neither a destination nor a script name is
/// available.
pub const DEFAULT_DOCUMENT_NAME: &str = "json.json";

/// Configuration for one pipeline instance.
///
/// Invalid values are rejected by [`InterfaceConfig::validate`] before the
/// run starts; nothing here is re-checked per event.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InterfaceConfig {
    /// Named reference frame for all exported states.
    pub target_frame: String,
    /// Emit the `att` quaternion block per body.
    pub export_attitude: bool,
    /// Emit the `color` attribute per body.
    pub export_colors: bool,
    /// Fixed-stride decimation factor (1 = keep every eligible event).
    pub sample_stride: u32,
    /// Maximum samples per body before the overflow policy engages.
    pub capacity: usize,
    /// Fallback display radius for movers.
    pub min_body_radius: f64,
    /// Derive mover radii from mass instead of using the fallback.
    pub derive_radii: bool,
    /// Output document path; empty derives a default from the script name.
    pub destination_path: String,
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            target_frame: "EarthMJ2000Eq".into(),
            export_attitude: true,
            export_colors: true,
            sample_stride: 1,
            capacity: 20_000,
            min_body_radius: 50.0,
            derive_radii: true,
            destination_path: String::new(),
        }
    }
}

impl InterfaceConfig {
    /// Reject invalid option values before the run starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_stride < 1 {
            return Err(ConfigError::InvalidStride(self.sample_stride));
        }
        if self.capacity < 1 {
            return Err(ConfigError::InvalidCapacity(self.capacity));
        }
        if !(self.min_body_radius > 0.0) {
            return Err(ConfigError::InvalidMinRadius(self.min_body_radius));
        }
        if !self.destination_path.is_empty() && !self.destination_path.ends_with(".json") {
            return Err(ConfigError::InvalidDestination(
                self.destination_path.clone(),
            ));
        }
        Ok(())
    }

    /// Destination to write, deriving `<script-stem>.json` when none was
    /// configured and falling back to a fixed name when there is no script.
    pub fn resolved_destination(&self, script_name: Option<&str>) -> String {
        if !self.destination_path.is_empty() {
            return self.destination_path.clone();
        }
        match script_name {
            Some(script) if !script.is_empty() => {
                let stem = script.strip_suffix(".script").unwrap_or(script);
                format!("{stem}.json")
            }
            _ => DEFAULT_DOCUMENT_NAME.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(InterfaceConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_stride_and_capacity_are_rejected() {
        let cfg = InterfaceConfig {
            sample_stride: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidStride(0))));

        let cfg = InterfaceConfig {
            capacity: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidCapacity(0))));
    }

    #[test]
    fn non_positive_radius_is_rejected() {
        let cfg = InterfaceConfig {
            min_body_radius: 0.0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidMinRadius(_))));
    }

    #[test]
    fn destination_must_be_a_json_file() {
        let cfg = InterfaceConfig {
            destination_path: "orbits.txt".into(),
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidDestination(_))
        ));
    }

    #[test]
    fn destination_derivation() {
        let cfg = InterfaceConfig::default();
        assert_eq!(
            cfg.resolved_destination(Some("mission.script")),
            "mission.json"
        );
        assert_eq!(cfg.resolved_destination(None), DEFAULT_DOCUMENT_NAME);
        assert_eq!(cfg.resolved_destination(Some("")), DEFAULT_DOCUMENT_NAME);

        let explicit = InterfaceConfig {
            destination_path: "out/run.json".into(),
            ..Default::default()
        };
        assert_eq!(
            explicit.resolved_destination(Some("mission.script")),
            "out/run.json"
        );
    }

    #[test]
    fn config_round_trips_through_serde() {
        let cfg = InterfaceConfig {
            sample_stride: 4,
            capacity: 500,
            destination_path: "run.json".into(),
            ..Default::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: InterfaceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sample_stride, 4);
        assert_eq!(back.capacity, 500);
        assert_eq!(back.destination_path, "run.json");
    }
}
