//! Per-body extraction: field lookup, frame conversion, attitude derivation.
//!
//! Movers read `{name}.X .Y .Z .Vx .Vy .Vz` out of the event's flat vector;
//! a missing field makes that body absent for the step without touching the
//! others. Reference bodies are queried directly and a retrieval failure is
//! a hard per-event error.
//!
//! Frame conversion always happens at the event's own epoch — converting an
//! origin-relative state later, with a different epoch, gives wrong results.

use crate::body::{BodyKind, BodyModel, Roster};
use crate::error::ExtractError;
use crate::types::{Epoch, PublishEvent, Quat, Sample, State6, IDENTITY_QUAT};
use frame_models::{composed_attitude, quat_from_rotation, FrameConverter, ReferenceFrame};
use nalgebra::Rotation3;

/// Result of extracting one event for the whole roster.
#[derive(Debug)]
pub struct ExtractOutput {
    pub epoch: Epoch,
    /// One slot per roster index; `None` = absent this step.
    pub samples: Vec<Option<Sample>>,
    /// True if any mover was missing fields in this event.
    pub any_absent: bool,
}

/// Extracts per-body samples from publish events for a fixed roster and
/// frame pair.
pub struct FieldExtractor<'a> {
    roster: &'a Roster,
    converter: &'a dyn FrameConverter,
    data_frame: &'a ReferenceFrame,
    view_frame: &'a ReferenceFrame,
}

impl<'a> FieldExtractor<'a> {
    pub fn new(
        roster: &'a Roster,
        converter: &'a dyn FrameConverter,
        data_frame: &'a ReferenceFrame,
        view_frame: &'a ReferenceFrame,
    ) -> Self {
        Self {
            roster,
            converter,
            data_frame,
            view_frame,
        }
    }

    /// Extract every body's sample for one event.
    pub fn extract(&self, event: &PublishEvent) -> Result<ExtractOutput, ExtractError> {
        let epoch = match event.epoch() {
            Some(e) => e,
            None => {
                return Ok(ExtractOutput {
                    epoch: 0.0,
                    samples: vec![None; self.roster.len()],
                    any_absent: true,
                })
            }
        };

        let mut samples = Vec::with_capacity(self.roster.len());
        let mut any_absent = false;

        for (entry, body) in self.roster.iter() {
            match entry.kind {
                BodyKind::Mover => {
                    let sample = self.extract_mover(event, epoch, &entry.name, body);
                    if sample.is_none() {
                        any_absent = true;
                    }
                    samples.push(sample);
                }
                BodyKind::Reference => {
                    samples.push(Some(self.extract_reference(epoch, body)?));
                }
            }
        }

        Ok(ExtractOutput {
            epoch,
            samples,
            any_absent,
        })
    }

    /// Mover path: field lookup, then conversion and attitude. Any missing
    /// field makes the body absent for this step.
    fn extract_mover(
        &self,
        event: &PublishEvent,
        epoch: Epoch,
        name: &str,
        body: &dyn BodyModel,
    ) -> Option<Sample> {
        let x = event.field(&format!("{name}.X"))?;
        let y = event.field(&format!("{name}.Y"))?;
        let z = event.field(&format!("{name}.Z"))?;
        let vx = event.field(&format!("{name}.Vx"))?;
        let vy = event.field(&format!("{name}.Vy"))?;
        let vz = event.field(&format!("{name}.Vz"))?;

        let state = State6::new(x, y, z, vx, vy, vz);
        let (state, conversion) = self.view_state(epoch, state);
        let quat = self.derive_quat(body, epoch, conversion.as_ref());
        Some(Sample::new(state, quat))
    }

    /// Reference path: direct state query; failure is a hard per-event error.
    fn extract_reference(
        &self,
        epoch: Epoch,
        body: &dyn BodyModel,
    ) -> Result<Sample, ExtractError> {
        let state = body.state_at(epoch)?;
        let (state, conversion) = self.view_state(epoch, state);
        let quat = self.derive_quat(body, epoch, conversion.as_ref());
        Ok(Sample::new(state, quat))
    }

    /// Convert into the view frame when it differs from the data frame,
    /// reporting the applied rotation for attitude composition.
    fn view_state(&self, epoch: Epoch, state: State6) -> (State6, Option<Rotation3<f64>>) {
        if self.data_frame.name == self.view_frame.name {
            (state, None)
        } else {
            let (out, rot) =
                self.converter
                    .convert(epoch, &state, self.data_frame, self.view_frame);
            (out, Some(rot))
        }
    }

    fn derive_quat(
        &self,
        body: &dyn BodyModel,
        epoch: Epoch,
        conversion: Option<&Rotation3<f64>>,
    ) -> Quat {
        if !body.has_attitude() {
            return IDENTITY_QUAT;
        }
        let rot = body.attitude_at(epoch);
        match conversion {
            Some(conv) => quat_from_rotation(&composed_attitude(&rot, conv)),
            None => quat_from_rotation(&rot),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
