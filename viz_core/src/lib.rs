//! `viz_core` — Trajectory buffering and export for visualization clients.
//!
//! # Module layout
//! - [`types`]    — Fundamental types (states, samples, publish events, colors)
//! - [`body`]     — Body roster: movers + reference bodies with frozen indices
//! - [`selector`] — Per-event gating (run state, solver, visibility, stride)
//! - [`extract`]  — Field lookup, frame conversion, attitude derivation
//! - [`store`]    — Parallel-array time series with bounded capacity
//! - [`export`]   — Trajectory document serialization + idempotence guard
//! - [`config`]   — Recognized options and validation
//! - [`pipeline`] — Full publish → select → extract → append orchestrator
//! - [`error`]    — Named error kinds

pub mod body;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod pipeline;
pub mod selector;
pub mod store;
pub mod types;

pub use body::{BodyEntry, BodyKind, BodyModel, RadiusPolicy, Roster};
pub use config::InterfaceConfig;
pub use error::{ConfigError, ExportError, ExtractError, PublishError};
pub use export::{DocumentExporter, ExportOutcome, OrbitEntry, TrajectoryDocument};
pub use extract::{ExtractOutput, FieldExtractor};
pub use pipeline::{PublishDisposition, VizInterface};
pub use selector::{EventContext, RunState, SampleSelector, Selection, SolverIterOption};
pub use store::{DecimateByTwo, OverflowPolicy, SeriesStore};
pub use types::{Epoch, PublishEvent, Quat, RgbColor, Sample, State6};
