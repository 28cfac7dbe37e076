//! Scenario definitions.
//!
//! Each scenario is a named body set plus a publish cadence. All scenarios
//! are deterministic given the same seed.

use crate::mover::SimBody;
use serde::{Deserialize, Serialize};
use viz_core::types::RgbColor;

const EARTH_RADIUS_KM: f64 = 6378.14;
const MOON_RADIUS_KM: f64 = 1737.4;
const MOON_ORBIT_KM: f64 = 384_400.0;
const MOON_PERIOD_S: f64 = 27.32 * 86_400.0;

/// Which pre-defined scenario to run.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
pub enum ScenarioKind {
    /// One spacecraft in low Earth orbit + Earth
    Leo,
    /// Three phased spacecraft + Earth
    Constellation,
    /// One spinning spacecraft + Earth + Moon
    EarthMoon,
}

/// A fully configured simulation scenario.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Total simulated span (seconds).
    pub duration_s: f64,
    /// Publish interval (seconds).
    pub step_s: f64,
    /// Per-event probability that a mover's fields are dropped.
    pub p_absent: f64,
    pub bodies: Vec<SimBody>,
}

impl Scenario {
    pub fn build(kind: &ScenarioKind) -> Self {
        match kind {
            ScenarioKind::Leo => Self::leo(),
            ScenarioKind::Constellation => Self::constellation(),
            ScenarioKind::EarthMoon => Self::earth_moon(),
        }
    }

    /// Movers only — what the publisher feeds on.
    pub fn movers(&self) -> Vec<SimBody> {
        self.bodies
            .iter()
            .filter(|b| matches!(b.kind, viz_core::body::BodyKind::Mover))
            .cloned()
            .collect()
    }

    fn leo() -> Self {
        Self {
            name: "leo".into(),
            duration_s: 5554.0,
            step_s: 60.0,
            p_absent: 0.0,
            bodies: vec![
                SimBody::spacecraft(
                    "Sat1",
                    6778.0,
                    5554.0,
                    0.0,
                    0.9,
                    11_000.0,
                    RgbColor::new(250, 50, 50),
                ),
                SimBody::planet("Earth", EARTH_RADIUS_KM, RgbColor::new(50, 100, 250)),
            ],
        }
    }

    fn constellation() -> Self {
        let third = std::f64::consts::TAU / 3.0;
        let mut bodies: Vec<SimBody> = (0..3)
            .map(|i| {
                SimBody::spacecraft(
                    &format!("Bird{}", i + 1),
                    7178.0,
                    6052.0,
                    i as f64 * third,
                    0.96,
                    850.0,
                    RgbColor::new(250, 120 + 40 * i as u8, 50),
                )
            })
            .collect();
        bodies.push(SimBody::planet(
            "Earth",
            EARTH_RADIUS_KM,
            RgbColor::new(50, 100, 250),
        ));
        Self {
            name: "constellation".into(),
            duration_s: 12_104.0,
            step_s: 30.0,
            p_absent: 0.0,
            bodies,
        }
    }

    fn earth_moon() -> Self {
        Self {
            name: "earth-moon".into(),
            duration_s: 3.0 * 86_400.0,
            step_s: 600.0,
            p_absent: 0.0,
            bodies: vec![
                SimBody::spacecraft(
                    "Cruiser",
                    100_000.0,
                    5.0 * 86_400.0,
                    0.3,
                    0.1,
                    28_000.0,
                    RgbColor::new(250, 250, 100),
                )
                .with_spin(0.001),
                SimBody::planet("Earth", EARTH_RADIUS_KM, RgbColor::new(50, 100, 250)),
                SimBody::moon(
                    "Luna",
                    MOON_ORBIT_KM,
                    MOON_PERIOD_S,
                    MOON_RADIUS_KM,
                    RgbColor::new(200, 200, 200),
                ),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
