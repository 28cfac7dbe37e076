//! Reference frames and the frame-conversion seam.
//!
//! A frame is a set of axes with a fixed orientation relative to a common
//! inertial base. Converting a state between frames rotates position and
//! velocity by the relative rotation; the converter also reports that
//! rotation so callers can compose it with a body attitude.
//!
//! Rotating axes (true-of-date, body-fixed) are not modelled here — the
//! `FrameConverter` trait is the seam where such a converter would plug in.

use nalgebra::{Rotation3, Vector3, Vector6};

/// Epoch of a state, in the time scale of the sample stream.
pub type Epoch = f64;

/// 6-DOF state: [x, y, z, vx, vy, vz]
pub type State6 = Vector6<f64>;

/// Mean obliquity of the ecliptic at J2000 (degrees).
const OBLIQUITY_J2000_DEG: f64 = 23.439281;

/// A named set of axes, oriented relative to the inertial base frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceFrame {
    pub name: String,
    /// Rotation taking base-frame coordinates into this frame's coordinates.
    pub rotation: Rotation3<f64>,
}

impl ReferenceFrame {
    pub fn new(name: impl Into<String>, rotation: Rotation3<f64>) -> Self {
        Self {
            name: name.into(),
            rotation,
        }
    }

    /// Earth mean-equator-of-J2000 axes — the inertial base frame.
    pub fn equatorial() -> Self {
        Self::new("EarthMJ2000Eq", Rotation3::identity())
    }

    /// Ecliptic-of-J2000 axes: equatorial rotated about +X by the obliquity.
    pub fn ecliptic() -> Self {
        Self::new(
            "EarthMJ2000Ec",
            Rotation3::from_axis_angle(&Vector3::x_axis(), OBLIQUITY_J2000_DEG.to_radians()),
        )
    }

    /// Look up a catalogued frame by name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "EarthMJ2000Eq" => Some(Self::equatorial()),
            "EarthMJ2000Ec" => Some(Self::ecliptic()),
            _ => None,
        }
    }
}

/// Converts a 6-DOF state between two frames at a given epoch.
pub trait FrameConverter {
    /// Returns the converted state and the rotation that was applied, for
    /// composing with a body attitude matrix.
    fn convert(
        &self,
        epoch: Epoch,
        state: &State6,
        from: &ReferenceFrame,
        to: &ReferenceFrame,
    ) -> (State6, Rotation3<f64>);
}

/// Pure axes conversion between catalogued frames.
///
/// The applied rotation is `R_to⁻¹ · R_from`; applying A→B then B→A
/// reproduces the input exactly up to floating-point rounding.
#[derive(Clone, Copy, Debug, Default)]
pub struct AxesConverter;

impl FrameConverter for AxesConverter {
    fn convert(
        &self,
        _epoch: Epoch,
        state: &State6,
        from: &ReferenceFrame,
        to: &ReferenceFrame,
    ) -> (State6, Rotation3<f64>) {
        let rot = to.rotation.inverse() * from.rotation;
        let pos = rot * Vector3::new(state[0], state[1], state[2]);
        let vel = rot * Vector3::new(state[3], state[4], state[5]);
        (
            Vector6::new(pos[0], pos[1], pos[2], vel[0], vel[1], vel[2]),
            rot,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_conversion_between_same_frame() {
        let eq = ReferenceFrame::equatorial();
        let state = Vector6::new(7000.0, 0.0, 0.0, 0.0, 7.5, 0.0);
        let (out, rot) = AxesConverter.convert(0.0, &state, &eq, &eq);
        assert_eq!(out, state);
        assert_eq!(rot, Rotation3::identity());
    }

    #[test]
    fn round_trip_reproduces_state() {
        let eq = ReferenceFrame::equatorial();
        let ec = ReferenceFrame::ecliptic();
        let state = Vector6::new(7000.0, -1234.5, 42.0, -1.1, 7.5, 0.3);

        let (fwd, _) = AxesConverter.convert(0.0, &state, &eq, &ec);
        let (back, _) = AxesConverter.convert(0.0, &fwd, &ec, &eq);

        for i in 0..6 {
            let rel = (back[i] - state[i]).abs() / state[i].abs().max(1.0);
            assert!(rel < 1e-9, "component {i}: {} vs {}", back[i], state[i]);
        }
    }

    #[test]
    fn ecliptic_tilts_about_x() {
        let eq = ReferenceFrame::equatorial();
        let ec = ReferenceFrame::ecliptic();
        // A point on the +X axis is invariant under the obliquity rotation.
        let state = Vector6::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        let (out, _) = AxesConverter.convert(0.0, &state, &eq, &ec);
        assert!((out[0] - 1.0).abs() < 1e-12);
        assert!(out[1].abs() < 1e-12 && out[2].abs() < 1e-12);

        // A point on +Z picks up a -Y component when viewed in ecliptic axes.
        let state = Vector6::new(0.0, 0.0, 1.0, 0.0, 0.0, 0.0);
        let (out, _) = AxesConverter.convert(0.0, &state, &eq, &ec);
        assert!(out[1] < 0.0);
        assert!((out.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn frame_catalogue_lookup() {
        assert!(ReferenceFrame::by_name("EarthMJ2000Eq").is_some());
        assert!(ReferenceFrame::by_name("EarthMJ2000Ec").is_some());
        assert!(ReferenceFrame::by_name("B1950").is_none());
    }
}
