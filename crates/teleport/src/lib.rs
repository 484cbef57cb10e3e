//! Teleportation: the teleport pointer state machine, target validation,
//! line feedback and cross-pointer arbitration.
//!
//! # Invariants
//! - Per-tick calls never fail; missing collaborators make a tick a no-op.
//! - Configuration is validated once, at pointer construction.
//! - Validation for a render tick completes before the next input can
//!   commit or cancel on it.

pub mod angle;
pub mod config;
pub mod event;
pub mod hotspot;
pub mod hub;
pub mod line;
pub mod pointer;
pub mod rig;
pub mod validation;

pub use angle::{StickBand, classify_angle, stick_angle, wrap_degrees};
pub use config::{TeleportConfig, TeleportConfigError};
pub use event::{TeleportEvent, TeleportEventData, TeleportHandler, TeleportSystem};
pub use hotspot::HotSpot;
pub use hub::{HandlerId, TeleportHub};
pub use line::{ParabolicArc, RayStep, RaycastResult, TargetId};
pub use pointer::{
    LineFeedback, PointerBinding, PointerContext, PointerTransition, TeleportPhase,
    TeleportPointer,
};
pub use rig::{CameraRig, PlayspaceRig};
pub use validation::{
    LineGradient, SurfaceValidationConfig, SurfaceValidationProvider, TeleportValidationResult,
    ValidationProvider, line_gradient,
};

pub fn crate_info() -> &'static str {
    "mrkit-teleport v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("teleport"));
    }
}
