//! Fundamental types used across the entire workspace.

use nalgebra::Vector6;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Epoch of a sample, in the time scale of the publisher stream.
pub type Epoch = f64;

/// 6-DOF state vector: [x, y, z, vx, vy, vz]
pub type State6 = Vector6<f64>;

/// Orientation quaternion in (x, y, z, w) component order.
pub type Quat = [f64; 4];

/// The attitude of a body without an orientation model.
pub const IDENTITY_QUAT: Quat = [0.0, 0.0, 0.0, 1.0];

// ---------------------------------------------------------------------------
// Sample
// ---------------------------------------------------------------------------

/// One timestep's data for one body. A step where a body had no usable data
/// is represented as `None` at the extraction boundary, never as a partially
/// filled `Sample`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub state: State6,
    pub quat: Quat,
}

impl Sample {
    pub fn new(state: State6, quat: Quat) -> Self {
        Self { state, quat }
    }
}

// ---------------------------------------------------------------------------
// PublishEvent
// ---------------------------------------------------------------------------

/// One publish event from the sample source: a flat numeric vector plus the
/// label array mapping named fields (`"BodyName.X"`) to offsets.
///
/// By convention `values[0]` is the epoch and `labels[0]` names it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublishEvent {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl PublishEvent {
    pub fn new(labels: Vec<String>, values: Vec<f64>) -> Self {
        Self { labels, values }
    }

    /// Number of numeric fields carried by this event.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Epoch of the event (first element of the data vector).
    pub fn epoch(&self) -> Option<Epoch> {
        self.values.first().copied()
    }

    /// Offset of a labelled field, or `None` if the label is not present.
    pub fn field_index(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Value of a labelled field.
    pub fn field(&self, label: &str) -> Option<f64> {
        self.field_index(label).and_then(|i| self.values.get(i)).copied()
    }
}

// ---------------------------------------------------------------------------
// RgbColor
// ---------------------------------------------------------------------------

/// A display color, exported as an `"R,G,B"` triple of 0–255 integers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const WHITE: RgbColor = RgbColor { r: 255, g: 255, b: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpack a 0x00RRGGBB integer color.
    pub fn from_packed(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xff) as u8,
            g: ((packed >> 8) & 0xff) as u8,
            b: (packed & 0xff) as u8,
        }
    }

    pub fn to_packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Document form: `"R,G,B"`.
    pub fn to_rgb_string(self) -> String {
        format!("{},{},{}", self.r, self.g, self.b)
    }
}

// ---------------------------------------------------------------------------
// DisplayMode
// ---------------------------------------------------------------------------

/// How the client should draw a body's trajectory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Trajectory line plus a point marker at the body.
    #[default]
    LinePoint,
    Line,
    Point,
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::LinePoint => write!(f, "line,point"),
            DisplayMode::Line => write!(f, "line"),
            DisplayMode::Point => write!(f, "point"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> PublishEvent {
        PublishEvent::new(
            vec![
                "All.epoch".into(),
                "Sat1.X".into(),
                "Sat1.Y".into(),
                "Sat1.Z".into(),
            ],
            vec![21545.0, 7000.0, 0.0, 42.0],
        )
    }

    #[test]
    fn field_lookup_by_label() {
        let e = event();
        assert_eq!(e.field_index("Sat1.X"), Some(1));
        assert_eq!(e.field("Sat1.Z"), Some(42.0));
        assert_eq!(e.field_index("Sat2.X"), None);
        assert_eq!(e.epoch(), Some(21545.0));
    }

    #[test]
    fn rgb_string_and_packed_round_trip() {
        let c = RgbColor::new(250, 0, 128);
        assert_eq!(c.to_rgb_string(), "250,0,128");
        assert_eq!(RgbColor::from_packed(c.to_packed()), c);
    }

    #[test]
    fn display_mode_tags() {
        assert_eq!(DisplayMode::LinePoint.to_string(), "line,point");
        assert_eq!(DisplayMode::Line.to_string(), "line");
    }
}
