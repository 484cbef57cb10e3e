//! Manipulation gesture arbitration for held objects.
//!
//! Hosts feed [`mrkit_input::InputEvent`]s to a [`ManipulationHandler`] along
//! with a [`ManipulationTarget`]; the handler decides which gesture, if any,
//! the sample drives.

pub mod config;
pub mod handler;
pub mod target;

pub use config::{
    ManipulationActions, ManipulationConfig, ManipulationConfigError, SelectMode, Zone,
};
pub use handler::{ManipulationGesture, ManipulationHandler, signed_angle};
pub use target::{HeldObject, ManipulationTarget};

pub fn crate_info() -> &'static str {
    "mrkit-manipulation v0.1.0"
}
