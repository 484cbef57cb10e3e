//! Input events: digital, single-axis and dual-axis samples in one tagged union.
//!
//! # Invariants
//! - Every handler receives input through a single `InputEvent` type.
//! - An event always names the source and action that produced it.

pub mod event;

pub use event::{InputData, InputEvent};

pub fn crate_info() -> &'static str {
    "mrkit-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
