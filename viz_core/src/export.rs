//! Trajectory document serialization and the terminal export guard.
//!
//! The terminal trigger fires at least twice per run, so `export_once` is
//! idempotent: the store's cleared flag doubles as the guard, set only after
//! a fully successful write. A failed write leaves the flag down so the
//! export can be retried.

use crate::body::Roster;
use crate::error::ExportError;
use crate::store::SeriesStore;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Document model
// ---------------------------------------------------------------------------

/// Coordinate convention and units of every state in the document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub coordinates: String,
    pub units: String,
}

impl Default for DocumentInfo {
    fn default() -> Self {
        Self {
            coordinates: "cartesian".into(),
            units: "km".into(),
        }
    }
}

/// One body's trajectory plus display metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrbitEntry {
    pub name: String,
    pub display: String,
    pub radius: f64,
    /// `"R,G,B"`; present only when color export is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// [x, y, z, vx, vy, vz] per retained sample.
    pub eph: Vec<[f64; 6]>,
    /// [q1, q2, q3, q4] per retained sample; present only when attitude
    /// export is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub att: Option<Vec<[f64; 4]>>,
    /// The shared time axis, repeated per entry.
    pub time: Vec<f64>,
}

/// The complete exported document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrajectoryDocument {
    pub info: DocumentInfo,
    pub orbits: Vec<OrbitEntry>,
}

// ---------------------------------------------------------------------------
// Exporter
// ---------------------------------------------------------------------------

/// Outcome of a terminal export attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    Exported,
    /// A previous trigger already wrote this run's document.
    AlreadyExported,
    /// Nothing to write; a diagnostic was surfaced instead.
    NoData,
}

/// Writes the accumulated series as a trajectory document.
pub struct DocumentExporter {
    path: PathBuf,
    export_attitude: bool,
    export_colors: bool,
}

impl DocumentExporter {
    pub fn new(path: impl Into<PathBuf>, export_attitude: bool, export_colors: bool) -> Self {
        Self {
            path: path.into(),
            export_attitude,
            export_colors,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build the document in memory; exposed for tests and inspection.
    pub fn build_document(&self, store: &SeriesStore, roster: &Roster) -> TrajectoryDocument {
        let time = store.time().to_vec();
        let orbits = roster
            .entries()
            .iter()
            .map(|entry| OrbitEntry {
                name: entry.name.clone(),
                display: entry.display.to_string(),
                radius: entry.radius,
                color: self
                    .export_colors
                    .then(|| entry.color.to_rgb_string()),
                eph: store.eph(entry.index),
                att: self.export_attitude.then(|| store.att(entry.index)),
                time: time.clone(),
            })
            .collect();

        TrajectoryDocument {
            info: DocumentInfo::default(),
            orbits,
        }
    }

    /// The single terminal export. Writes at most one document per run:
    /// a second call after success reports `AlreadyExported` without
    /// touching the destination.
    pub fn export_once(
        &self,
        store: &mut SeriesStore,
        roster: &Roster,
    ) -> Result<ExportOutcome, ExportError> {
        if store.cleared() {
            return Ok(ExportOutcome::AlreadyExported);
        }

        if roster.is_empty() {
            tracing::error!(
                "there is no data to write; no bodies were selected for this run"
            );
            return Ok(ExportOutcome::NoData);
        }

        let document = self.build_document(store, roster);
        self.write_document(&document)?;

        store.clear();
        tracing::info!(path = %self.path.display(), "trajectory document exported");
        Ok(ExportOutcome::Exported)
    }

    /// Truncating create, buffered write, explicit flush. Serde emits f64
    /// with full round-trip precision, which covers the minimum
    /// significant-digit requirement of the format.
    fn write_document(&self, document: &TrajectoryDocument) -> Result<(), ExportError> {
        let io_err = |source| ExportError::Io {
            path: self.path.clone(),
            source,
        };

        let file = File::create(&self.path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, document).map_err(|source| {
            ExportError::Encode {
                path: self.path.clone(),
                source,
            }
        })?;
        writer.flush().map_err(io_err)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
