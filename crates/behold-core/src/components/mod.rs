//! Simulation Components
//!
//! Geometry primitives and the peep (agent) model.

pub mod geometry;
pub mod peep;

pub use geometry::*;
pub use peep::*;
