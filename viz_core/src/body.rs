//! Body roster: the fixed set of tracked entities for one run.
//!
//! Bodies are identified by a 0-based integer index assigned once at setup
//! and immutable for the run. Movers (state arrives via the sample stream)
//! precede reference bodies (state queried directly) in index space. Display
//! metadata (name, radius, color, draw flag) is frozen into a `BodyEntry`
//! attached to that index — never keyed by a mutable name.

use crate::error::{ConfigError, ExtractError};
use crate::types::{DisplayMode, Epoch, RgbColor, State6};
use nalgebra::Rotation3;
use serde::{Deserialize, Serialize};

/// Approximate density of a spacecraft bus (kg/m³, Hubble-like).
const MOVER_DENSITY_KG_M3: f64 = 610.0;

/// Visibility scaler applied to derived mover radii.
const MOVER_RADIUS_SCALER: f64 = 200.0;

/// Derived radii above this are clamped back to the configured minimum.
const MOVER_RADIUS_MAX: f64 = 1000.0;

/// Which of the two tracked-entity classes a body belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// State arrives via the streaming sample source.
    Mover,
    /// State is queried directly at a given epoch.
    Reference,
}

// ---------------------------------------------------------------------------
// Host object model seam
// ---------------------------------------------------------------------------

/// The host object model's view of one body.
///
/// The pipeline only ever reads through this trait: identity and scope flags
/// for visibility gating, mass/radius for display sizing, and the attitude
/// and state queries used during extraction.
pub trait BodyModel {
    fn name(&self) -> &str;
    fn kind(&self) -> BodyKind;

    /// Scope flags used by in-function visibility gating.
    fn is_global(&self) -> bool {
        true
    }
    fn is_local(&self) -> bool {
        false
    }

    /// Total mass (kg); only meaningful for movers.
    fn mass_kg(&self) -> f64 {
        0.0
    }

    /// Equatorial radius (km); only meaningful for reference bodies.
    fn equatorial_radius_km(&self) -> f64 {
        0.0
    }

    fn default_color(&self) -> RgbColor {
        RgbColor::WHITE
    }

    /// Whether the body exposes an orientation model.
    fn has_attitude(&self) -> bool {
        false
    }

    /// Rotation matrix of the body's attitude at `epoch`. Only called when
    /// `has_attitude()` is true.
    fn attitude_at(&self, _epoch: Epoch) -> Rotation3<f64> {
        Rotation3::identity()
    }

    /// Direct state query at `epoch`. Used for reference bodies, where a
    /// failure is a hard per-event error rather than an absence.
    fn state_at(&self, epoch: Epoch) -> Result<State6, ExtractError>;
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// Frozen per-run metadata for one body index.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BodyEntry {
    pub index: usize,
    pub name: String,
    pub kind: BodyKind,
    pub radius: f64,
    pub color: RgbColor,
    pub display: DisplayMode,
    pub draw: bool,
}

/// Radius policy knobs, taken from the interface configuration.
#[derive(Clone, Copy, Debug)]
pub struct RadiusPolicy {
    pub min_body_radius: f64,
    pub derive_radii: bool,
}

/// The validated, index-ordered body set for one run.
pub struct Roster {
    entries: Vec<BodyEntry>,
    bodies: Vec<Box<dyn BodyModel>>,
    mover_count: usize,
}

impl std::fmt::Debug for Roster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Roster")
            .field("entries", &self.entries)
            .field("bodies", &format_args!("[{} bodies]", self.bodies.len()))
            .field("mover_count", &self.mover_count)
            .finish()
    }
}

impl Roster {
    /// Freeze a body list into a roster: movers first, then reference
    /// bodies, each with derived display metadata. Index order never changes
    /// afterwards.
    pub fn build(
        bodies: Vec<Box<dyn BodyModel>>,
        policy: RadiusPolicy,
    ) -> Result<Self, ConfigError> {
        if bodies.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }

        let mut ordered: Vec<Box<dyn BodyModel>> = Vec::with_capacity(bodies.len());
        let mut rest: Vec<Box<dyn BodyModel>> = Vec::new();
        for body in bodies {
            match body.kind() {
                BodyKind::Mover => ordered.push(body),
                BodyKind::Reference => rest.push(body),
            }
        }
        let mover_count = ordered.len();
        ordered.extend(rest);

        let entries = ordered
            .iter()
            .enumerate()
            .map(|(index, body)| BodyEntry {
                index,
                name: body.name().to_string(),
                kind: body.kind(),
                radius: match body.kind() {
                    BodyKind::Mover => mover_radius(body.mass_kg(), policy),
                    BodyKind::Reference => body.equatorial_radius_km(),
                },
                color: body.default_color(),
                display: DisplayMode::LinePoint,
                draw: true,
            })
            .collect();

        Ok(Self {
            entries,
            bodies: ordered,
            mover_count,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn mover_count(&self) -> usize {
        self.mover_count
    }

    pub fn entries(&self) -> &[BodyEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> &BodyEntry {
        &self.entries[index]
    }

    pub fn body(&self, index: usize) -> &dyn BodyModel {
        self.bodies[index].as_ref()
    }

    /// Iterate (entry, model) pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&BodyEntry, &dyn BodyModel)> {
        self.entries
            .iter()
            .zip(self.bodies.iter().map(|b| b.as_ref()))
    }

    /// Flip the draw flag for a named body; display metadata is the one
    /// mutable attribute and never affects index identity.
    pub fn set_draw(&mut self, name: &str, draw: bool) {
        for entry in &mut self.entries {
            if entry.name == name {
                entry.draw = draw;
            }
        }
    }
}

/// Display radius for a mover, assuming a homogeneous sphere at bus density,
/// scaled for visibility and clamped to [min, MOVER_RADIUS_MAX].
fn mover_radius(mass_kg: f64, policy: RadiusPolicy) -> f64 {
    if !policy.derive_radii {
        return policy.min_body_radius;
    }
    let volume = mass_kg / MOVER_DENSITY_KG_M3;
    let radius =
        (volume * (3.0 / 4.0) / std::f64::consts::PI).powf(1.0 / 3.0) * MOVER_RADIUS_SCALER;
    if radius < policy.min_body_radius || radius > MOVER_RADIUS_MAX {
        policy.min_body_radius
    } else {
        radius
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
