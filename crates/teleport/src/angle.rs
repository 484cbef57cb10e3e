//! Thumbstick angle classification.
//!
//! The stick angle is measured clockwise from "up" on the stick
//! (`atan2(x, y)`), so 0° is forward, +90° is right and ±180° is back.

use glam::Vec2;

use crate::config::TeleportConfig;

/// Tolerance for the inclusive band edges. Sticks at exact diagonals
/// produce angles a few ulps off the nominal value.
const EDGE_TOLERANCE: f32 = 1e-3;

/// The band a stick angle falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickBand {
    /// Forward: start a teleport request.
    Teleport,
    /// Left or right: turn the camera rig.
    Rotate,
    /// Back: step the camera rig backwards.
    BackStrafe,
    /// Between bands.
    Dead,
}

/// Wrap an angle in degrees into `(-180, 180]`.
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 { wrapped + 360.0 } else { wrapped }
}

/// Stick angle in degrees, offset and wrapped into `(-180, 180]`.
pub fn stick_angle(position: Vec2, angle_offset: f32) -> f32 {
    wrap_degrees(position.x.atan2(position.y).to_degrees() + angle_offset)
}

/// Classify a wrapped stick angle.
///
/// - `|a| < teleport_activation_angle` is Teleport (the edge itself is not).
/// - `|a|` within `rotate_activation_angle / 2` of 90° is Rotate (edges included).
/// - `|a| >= 180 - back_strafe_activation_angle` is BackStrafe (edge included).
///
/// Bands are tested in that order, so overlapping bands resolve to the
/// earlier one.
pub fn classify_angle(angle: f32, config: &TeleportConfig) -> StickBand {
    let abs = wrap_degrees(angle).abs();

    if abs < config.teleport_activation_angle {
        return StickBand::Teleport;
    }
    if (abs - 90.0).abs() <= config.rotate_activation_angle * 0.5 + EDGE_TOLERANCE {
        return StickBand::Rotate;
    }
    if abs >= 180.0 - config.back_strafe_activation_angle - EDGE_TOLERANCE {
        return StickBand::BackStrafe;
    }
    StickBand::Dead
}

/// Whether a stick sample sits inside the dead zone on both axes.
pub fn is_neutral(position: Vec2, input_threshold: f32) -> bool {
    position.x.abs() <= input_threshold && position.y.abs() <= input_threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TeleportConfig {
        TeleportConfig::default()
    }

    #[test]
    fn wrap_keeps_range() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(180.0), 180.0);
        assert_eq!(wrap_degrees(-180.0), 180.0);
        assert_eq!(wrap_degrees(270.0), -90.0);
        assert_eq!(wrap_degrees(-270.0), 90.0);
        assert_eq!(wrap_degrees(540.0), 180.0);
    }

    #[test]
    fn stick_angle_cardinals() {
        assert_eq!(stick_angle(Vec2::new(0.0, 1.0), 0.0), 0.0);
        assert!((stick_angle(Vec2::new(1.0, 0.0), 0.0) - 90.0).abs() < 1e-4);
        assert!((stick_angle(Vec2::new(-1.0, 0.0), 0.0) + 90.0).abs() < 1e-4);
        assert!((stick_angle(Vec2::new(0.0, -1.0), 0.0).abs() - 180.0).abs() < 1e-4);
    }

    #[test]
    fn stick_angle_applies_offset() {
        let a = stick_angle(Vec2::new(0.0, 1.0), 350.0);
        assert!((a + 10.0).abs() < 1e-4);
    }

    #[test]
    fn diagonal_back_right_is_135() {
        let a = stick_angle(Vec2::new(0.6, -0.6), 0.0);
        assert!((a - 135.0).abs() < 1e-3);
        assert_eq!(classify_angle(a, &config()), StickBand::BackStrafe);
    }

    #[test]
    fn forward_is_teleport() {
        assert_eq!(classify_angle(0.0, &config()), StickBand::Teleport);
        assert_eq!(classify_angle(-44.9, &config()), StickBand::Teleport);
    }

    #[test]
    fn teleport_edge_is_not_teleport() {
        let c = config();
        assert_eq!(classify_angle(45.0, &c), StickBand::Dead);
        assert_eq!(classify_angle(-45.0, &c), StickBand::Dead);
    }

    #[test]
    fn teleport_edge_falls_into_adjacent_rotate_band() {
        // Rotate band 60..=120 shares its lower edge with a 60° teleport band.
        let c = TeleportConfig {
            teleport_activation_angle: 60.0,
            rotate_activation_angle: 60.0,
            ..config()
        };
        assert_eq!(classify_angle(59.9, &c), StickBand::Teleport);
        assert_eq!(classify_angle(60.0, &c), StickBand::Rotate);
    }

    #[test]
    fn rotate_band_edges_are_inclusive() {
        let c = config();
        // 90 ± 11.25
        assert_eq!(classify_angle(78.75, &c), StickBand::Rotate);
        assert_eq!(classify_angle(101.25, &c), StickBand::Rotate);
        assert_eq!(classify_angle(-78.75, &c), StickBand::Rotate);
        assert_eq!(classify_angle(78.0, &c), StickBand::Dead);
        assert_eq!(classify_angle(102.0, &c), StickBand::Dead);
    }

    #[test]
    fn back_strafe_edge_is_inclusive() {
        let c = config();
        assert_eq!(classify_angle(135.0, &c), StickBand::BackStrafe);
        assert_eq!(classify_angle(-135.0, &c), StickBand::BackStrafe);
        assert_eq!(classify_angle(180.0, &c), StickBand::BackStrafe);
        assert_eq!(classify_angle(134.0, &c), StickBand::Dead);
    }

    #[test]
    fn rotate_wins_over_overlapping_strafe() {
        let c = TeleportConfig {
            rotate_activation_angle: 90.0,
            back_strafe_activation_angle: 90.0,
            ..config()
        };
        assert_eq!(classify_angle(130.0, &c), StickBand::Rotate);
        assert_eq!(classify_angle(140.0, &c), StickBand::BackStrafe);
    }

    #[test]
    fn neutral_zone_is_inclusive() {
        assert!(is_neutral(Vec2::new(0.5, -0.5), 0.5));
        assert!(is_neutral(Vec2::ZERO, 0.5));
        assert!(!is_neutral(Vec2::new(0.0, 0.51), 0.5));
    }
}
