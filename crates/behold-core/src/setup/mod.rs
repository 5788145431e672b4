//! Session Setup
//!
//! Population bootstrap for a fresh arena.

pub mod population;

pub use population::*;
