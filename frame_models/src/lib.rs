//! `frame_models` — Reference frames, frame conversion, attitude utilities.

pub mod attitude;
pub mod frame;

pub use attitude::{composed_attitude, quat_from_rotation};
pub use frame::{AxesConverter, FrameConverter, ReferenceFrame};
