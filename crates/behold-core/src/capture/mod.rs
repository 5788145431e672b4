//! Capture
//!
//! Framing the capture window over the arena and rendering what it saw.

pub mod judge;
pub mod render;

pub use judge::{frame_capture, CaptureWindow, Snapshot};
pub use render::{render_snapshot, PeepVisual};
