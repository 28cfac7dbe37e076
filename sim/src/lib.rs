//! `sim` — Synthetic publisher: simulated bodies, publish events, scenarios.

pub mod mover;
pub mod publisher;
pub mod scenarios;

pub use mover::{AttitudeSpec, MotionSpec, SimBody};
pub use publisher::EventPublisher;
pub use scenarios::{Scenario, ScenarioKind};
