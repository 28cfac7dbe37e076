//! Simulated bodies with closed-form states.
//!
//! Each body has a `MotionSpec` giving its 6-DOF state at any epoch and an
//! optional `AttitudeSpec` giving its orientation. States are closed-form —
//! no integration — so any epoch can be queried directly, which is exactly
//! what reference bodies need.

use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};
use viz_core::body::{BodyKind, BodyModel};
use viz_core::error::ExtractError;
use viz_core::types::{Epoch, RgbColor, State6};

/// How a simulated body moves. Epochs are seconds from scenario start.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum MotionSpec {
    /// Pinned to a constant state (central bodies).
    Fixed { state: [f64; 6] },
    /// Circular orbit of `radius_km` about the origin, in a plane inclined
    /// about +X.
    Circular {
        radius_km: f64,
        period_s: f64,
        phase_rad: f64,
        inclination_rad: f64,
    },
}

/// How a simulated body is oriented.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum AttitudeSpec {
    /// No orientation model: the pipeline emits the identity quaternion.
    None,
    /// Constant-rate spin about +Z.
    Spin { rate_rad_s: f64 },
}

/// One simulated body: a mover published through the sample stream, or a
/// reference body queried directly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimBody {
    pub name: String,
    pub kind: BodyKind,
    pub motion: MotionSpec,
    pub attitude: AttitudeSpec,
    pub mass_kg: f64,
    pub equatorial_radius_km: f64,
    pub color: RgbColor,
}

impl SimBody {
    /// An orbiting spacecraft (mover).
    pub fn spacecraft(
        name: &str,
        radius_km: f64,
        period_s: f64,
        phase_rad: f64,
        inclination_rad: f64,
        mass_kg: f64,
        color: RgbColor,
    ) -> Self {
        Self {
            name: name.into(),
            kind: BodyKind::Mover,
            motion: MotionSpec::Circular {
                radius_km,
                period_s,
                phase_rad,
                inclination_rad,
            },
            attitude: AttitudeSpec::None,
            mass_kg,
            equatorial_radius_km: 0.0,
            color,
        }
    }

    /// A central body pinned at the origin (reference body).
    pub fn planet(name: &str, equatorial_radius_km: f64, color: RgbColor) -> Self {
        Self {
            name: name.into(),
            kind: BodyKind::Reference,
            motion: MotionSpec::Fixed { state: [0.0; 6] },
            attitude: AttitudeSpec::None,
            mass_kg: 0.0,
            equatorial_radius_km,
            color,
        }
    }

    /// An orbiting reference body (e.g. a moon).
    pub fn moon(
        name: &str,
        radius_km: f64,
        period_s: f64,
        equatorial_radius_km: f64,
        color: RgbColor,
    ) -> Self {
        Self {
            name: name.into(),
            kind: BodyKind::Reference,
            motion: MotionSpec::Circular {
                radius_km,
                period_s,
                phase_rad: 0.0,
                inclination_rad: 0.0,
            },
            attitude: AttitudeSpec::None,
            mass_kg: 0.0,
            equatorial_radius_km,
            color,
        }
    }

    pub fn with_spin(mut self, rate_rad_s: f64) -> Self {
        self.attitude = AttitudeSpec::Spin { rate_rad_s };
        self
    }

    /// Closed-form state at `epoch` (seconds).
    pub fn state(&self, epoch: Epoch) -> State6 {
        match &self.motion {
            MotionSpec::Fixed { state } => State6::from_row_slice(state),
            MotionSpec::Circular {
                radius_km,
                period_s,
                phase_rad,
                inclination_rad,
            } => {
                let omega = std::f64::consts::TAU / period_s;
                let theta = phase_rad + omega * epoch;
                let tilt = Rotation3::from_axis_angle(&Vector3::x_axis(), *inclination_rad);
                let pos =
                    tilt * Vector3::new(radius_km * theta.cos(), radius_km * theta.sin(), 0.0);
                let vel = tilt
                    * Vector3::new(
                        -radius_km * omega * theta.sin(),
                        radius_km * omega * theta.cos(),
                        0.0,
                    );
                State6::new(pos[0], pos[1], pos[2], vel[0], vel[1], vel[2])
            }
        }
    }
}

impl BodyModel for SimBody {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> BodyKind {
        self.kind
    }

    fn mass_kg(&self) -> f64 {
        self.mass_kg
    }

    fn equatorial_radius_km(&self) -> f64 {
        self.equatorial_radius_km
    }

    fn default_color(&self) -> RgbColor {
        self.color
    }

    fn has_attitude(&self) -> bool {
        !matches!(self.attitude, AttitudeSpec::None)
    }

    fn attitude_at(&self, epoch: Epoch) -> Rotation3<f64> {
        match &self.attitude {
            AttitudeSpec::None => Rotation3::identity(),
            AttitudeSpec::Spin { rate_rad_s } => {
                Rotation3::from_axis_angle(&Vector3::z_axis(), rate_rad_s * epoch)
            }
        }
    }

    fn state_at(&self, epoch: Epoch) -> Result<State6, ExtractError> {
        Ok(self.state(epoch))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn leo_sat() -> SimBody {
        SimBody::spacecraft("Sat1", 6778.0, 5554.0, 0.0, 0.9, 11000.0, RgbColor::WHITE)
    }

    #[test]
    fn circular_orbit_keeps_constant_radius_and_speed() {
        let sat = leo_sat();
        let expected_speed = std::f64::consts::TAU * 6778.0 / 5554.0;
        for epoch in [0.0, 123.0, 2777.0, 5000.0] {
            let s = sat.state(epoch);
            let r = (s[0] * s[0] + s[1] * s[1] + s[2] * s[2]).sqrt();
            let v = (s[3] * s[3] + s[4] * s[4] + s[5] * s[5]).sqrt();
            assert!((r - 6778.0).abs() < 1e-6, "radius at {epoch}: {r}");
            assert!((v - expected_speed).abs() < 1e-6, "speed at {epoch}: {v}");
        }
    }

    #[test]
    fn orbit_closes_after_one_period() {
        let sat = leo_sat();
        let s0 = sat.state(0.0);
        let s1 = sat.state(5554.0);
        for i in 0..6 {
            assert!((s0[i] - s1[i]).abs() < 1e-6, "component {i}");
        }
    }

    #[test]
    fn fixed_body_never_moves() {
        let earth = SimBody::planet("Earth", 6378.14, RgbColor::new(0, 0, 250));
        assert_eq!(earth.state(0.0), State6::zeros());
        assert_eq!(earth.state(1e6), State6::zeros());
        assert_eq!(earth.equatorial_radius_km(), 6378.14);
    }

    #[test]
    fn spin_attitude_advances_with_epoch() {
        let sat = leo_sat().with_spin(0.01);
        assert!(sat.has_attitude());
        let r0 = sat.attitude_at(0.0);
        let r1 = sat.attitude_at(100.0);
        assert_eq!(r0, Rotation3::identity());
        // 1 radian about z after 100 s.
        let angle = r1.angle();
        assert!((angle - 1.0).abs() < 1e-9, "angle {angle}");
    }
}
