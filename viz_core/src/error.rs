//! Named error kinds for the buffering-and-export pipeline.
//!
//! Absence of data for one body at one step is not an error — it is modelled
//! as `None` at the extraction boundary and aggregated into a single
//! end-of-run advisory.

use std::path::PathBuf;
use thiserror::Error;

/// Rejected at configuration time; the run does not start.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("sample stride must be an integer >= 1, got {0}")]
    InvalidStride(u32),

    #[error("capacity must be an integer >= 1, got {0}")]
    InvalidCapacity(usize),

    #[error("minimum body radius must be > 0, got {0}")]
    InvalidMinRadius(f64),

    #[error("destination `{0}` is not a .json file")]
    InvalidDestination(String),

    #[error("unknown reference frame `{0}`")]
    UnknownFrame(String),

    #[error("no bodies selected for export")]
    EmptyRoster,
}

/// Per-event extraction failure. The event is abandoned; the run continues.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("state retrieval failed for reference body `{body}`: {reason}")]
    StateRetrieval { body: String, reason: String },
}

/// Failure surfaced by the pipeline for one publish event.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Export-time failure. The store is left intact so a retry is possible.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write trajectory document to `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode trajectory document for `{path}`")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
