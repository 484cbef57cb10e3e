//! Shared types for the mixed reality toolkit crates.
//!
//! # Invariants
//! - Ids are plain values; nothing here owns scene objects.

pub mod types;

pub use types::{Handedness, HotSpotId, InputAction, InputSourceId, PointerId, Transform};
