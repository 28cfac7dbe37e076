//! Pipeline orchestrator: one publish event through gate, extraction and
//! buffering; terminal export at end of run.
//!
//! # Processing steps per event (single-threaded, run-to-completion)
//! 1. Gate the event (run state, solver policy, visibility, stride)
//! 2. Extract per-body samples (field lookup, frame conversion, attitude)
//! 3. Append to the series store (one time value, one 10-tuple per present body)
//! 4. On the terminal trigger: emit deferred advisories, export once

use crate::body::{BodyModel, RadiusPolicy, Roster};
use crate::config::InterfaceConfig;
use crate::error::{ConfigError, ExportError, PublishError};
use crate::export::{DocumentExporter, ExportOutcome};
use crate::extract::FieldExtractor;
use crate::selector::{SampleSelector, Selection, SolverIterOption};
use crate::store::SeriesStore;
use crate::types::PublishEvent;
use frame_models::{FrameConverter, ReferenceFrame};

pub use crate::selector::{EventContext, RunState};

/// What happened to one published event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublishDisposition {
    /// Selected, extracted and appended.
    Buffered,
    /// Gated out; the verdict says why.
    Skipped(Selection),
    /// Terminal trigger: the export ran (or was suppressed).
    Exported(ExportOutcome),
}

/// One run's buffering-and-export pipeline.
///
/// Owns the roster, the series store and the export guard; allocated once
/// per run and reusable across runs via [`VizInterface::reset`].
pub struct VizInterface {
    config: InterfaceConfig,
    roster: Roster,
    selector: SampleSelector,
    converter: Box<dyn FrameConverter>,
    data_frame: ReferenceFrame,
    view_frame: ReferenceFrame,
    store: SeriesStore,
    exporter: DocumentExporter,
    /// Latched when any mover had missing fields; reported once at end of run.
    absent_data: bool,
    advisories_emitted: bool,
}

impl std::fmt::Debug for VizInterface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VizInterface")
            .field("config", &self.config)
            .field("roster", &self.roster)
            .field("selector", &self.selector)
            .field("converter", &format_args!("<dyn FrameConverter>"))
            .field("data_frame", &self.data_frame)
            .field("view_frame", &self.view_frame)
            .field("store", &format_args!("<SeriesStore>"))
            .field("exporter", &format_args!("<DocumentExporter>"))
            .field("absent_data", &self.absent_data)
            .field("advisories_emitted", &self.advisories_emitted)
            .finish()
    }
}

impl VizInterface {
    /// Build a pipeline for a host that publishes in `data_frame`.
    pub fn new(
        config: InterfaceConfig,
        bodies: Vec<Box<dyn BodyModel>>,
        converter: Box<dyn FrameConverter>,
        data_frame: ReferenceFrame,
    ) -> Result<Self, ConfigError> {
        Self::with_host(config, bodies, converter, data_frame, None, false)
    }

    /// Build a pipeline with host-script context: the script name feeds the
    /// default destination, the global flag feeds visibility gating.
    pub fn with_host(
        config: InterfaceConfig,
        bodies: Vec<Box<dyn BodyModel>>,
        converter: Box<dyn FrameConverter>,
        data_frame: ReferenceFrame,
        script_name: Option<&str>,
        interface_global: bool,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let view_frame = ReferenceFrame::by_name(&config.target_frame)
            .ok_or_else(|| ConfigError::UnknownFrame(config.target_frame.clone()))?;

        let roster = Roster::build(
            bodies,
            RadiusPolicy {
                min_body_radius: config.min_body_radius,
                derive_radii: config.derive_radii,
            },
        )?;

        let store = SeriesStore::new(roster.len(), config.capacity);
        let selector =
            SampleSelector::new(config.sample_stride, SolverIterOption::None, interface_global);
        let exporter = DocumentExporter::new(
            config.resolved_destination(script_name),
            config.export_attitude,
            config.export_colors,
        );

        Ok(Self {
            config,
            roster,
            selector,
            converter,
            data_frame,
            view_frame,
            store,
            exporter,
            absent_data: false,
            advisories_emitted: false,
        })
    }

    /// Process one publish event. Extraction failures abandon the event but
    /// leave the run intact; only export I/O failures are resource-level.
    pub fn publish(
        &mut self,
        event: &PublishEvent,
        ctx: &EventContext,
    ) -> Result<PublishDisposition, PublishError> {
        let verdict = self.selector.accept(event, ctx, &self.roster);
        match verdict {
            Selection::TriggerExport => Ok(PublishDisposition::Exported(self.finish()?)),
            Selection::Reject | Selection::NoOp => {
                tracing::trace!(?verdict, "event not buffered");
                Ok(PublishDisposition::Skipped(verdict))
            }
            Selection::Buffer => {
                let extractor = FieldExtractor::new(
                    &self.roster,
                    self.converter.as_ref(),
                    &self.data_frame,
                    &self.view_frame,
                );
                let out = extractor.extract(event)?;
                if out.any_absent {
                    self.absent_data = true;
                }
                self.store.append(out.epoch, &out.samples);
                Ok(PublishDisposition::Buffered)
            }
        }
    }

    /// The terminal export. Safe to call more than once: the first success
    /// writes the document and clears the store, later calls report
    /// `AlreadyExported`. Deferred advisories are emitted exactly once.
    pub fn finish(&mut self) -> Result<ExportOutcome, ExportError> {
        if !self.advisories_emitted && !self.store.cleared() {
            if self.absent_data {
                tracing::warn!(
                    "absent data occurred during the run; did all movers publish every step?"
                );
            }
            if self.store.truncated() {
                tracing::warn!(
                    capacity = self.store.capacity(),
                    "sample capacity was reached; older points were thinned out"
                );
            }
            self.advisories_emitted = true;
        }
        self.exporter.export_once(&mut self.store, &self.roster)
    }

    /// Re-arm for a fresh run on the same allocation.
    pub fn reset(&mut self) {
        self.store.clear();
        self.selector.reset();
        self.absent_data = false;
        self.advisories_emitted = false;
    }

    pub fn config(&self) -> &InterfaceConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn store(&self) -> &SeriesStore {
        &self.store
    }

    /// True if any mover has had missing fields so far this run.
    pub fn absent_data(&self) -> bool {
        self.absent_data
    }

    pub fn destination(&self) -> &std::path::Path {
        self.exporter.path()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
