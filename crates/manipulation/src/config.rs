use mrkit_common::InputAction;
use serde::{Deserialize, Serialize};

/// Errors from validating a manipulation configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ManipulationConfigError {
    #[error("{field} zone needs 0 <= min < max, got ({min}, {max})")]
    InvalidZone {
        field: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

/// A band of absolute input magnitudes (or of allowed values).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub min: f32,
    pub max: f32,
}

impl Zone {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Strictly between the bounds.
    pub fn contains(&self, value: f32) -> bool {
        value > self.min && value < self.max
    }

    /// Within the bounds, edges included.
    pub fn admits(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, field: &'static str) -> Result<(), ManipulationConfigError> {
        // Written so NaN bounds are rejected.
        if self.min >= 0.0 && self.min < self.max {
            Ok(())
        } else {
            Err(ManipulationConfigError::InvalidZone {
                field,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// How the select action grabs and releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectMode {
    /// Press grabs, release lets go.
    PressAndHold,
    /// Each release toggles between grabbed and released.
    #[default]
    Toggle,
}

/// The actions a manipulation handler listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManipulationActions {
    pub select: InputAction,
    pub touchpad_press: InputAction,
    pub rotate: InputAction,
    pub scale: InputAction,
    pub nudge: InputAction,
    pub cancel: InputAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManipulationConfig {
    pub actions: ManipulationActions,
    pub select_mode: SelectMode,
    /// Touchpad value at which scale/nudge become available.
    pub press_threshold: f32,
    pub scale_zone: Zone,
    /// Factor applied per scale step; shrinking multiplies, growing divides.
    pub scale_amount: f32,
    /// Allowed uniform scale.
    pub scale_constraints: Zone,
    pub rotation_zone: Zone,
    /// Degrees of circular travel between two samples that start rotating.
    pub rotation_activation_angle: f32,
    pub nudge_zone: Zone,
    /// Metres added to or removed from the pointer extent per nudge.
    pub nudge_amount: f32,
    /// Allowed pointer extent.
    pub nudge_constraints: Zone,
}

impl Default for ManipulationConfig {
    fn default() -> Self {
        Self {
            actions: ManipulationActions::default(),
            select_mode: SelectMode::default(),
            press_threshold: 0.25,
            scale_zone: Zone::new(0.25, 1.0),
            scale_amount: 0.5,
            scale_constraints: Zone::new(0.01, 1.0),
            rotation_zone: Zone::new(0.25, 1.0),
            rotation_activation_angle: 11.25,
            nudge_zone: Zone::new(0.25, 1.0),
            nudge_amount: 0.01,
            nudge_constraints: Zone::new(0.25, 10.0),
        }
    }
}

impl ManipulationConfig {
    pub fn validate(&self) -> Result<(), ManipulationConfigError> {
        self.scale_zone.validate("scale_zone")?;
        self.rotation_zone.validate("rotation_zone")?;
        self.nudge_zone.validate("nudge_zone")?;
        self.scale_constraints.validate("scale_constraints")?;
        self.nudge_constraints.validate("nudge_constraints")?;
        in_range("press_threshold", self.press_threshold, 0.0, 1.0)?;
        in_range(
            "rotation_activation_angle",
            self.rotation_activation_angle,
            2.8125,
            45.0,
        )?;
        if !(self.scale_amount > 0.0 && self.scale_amount < 1.0) {
            return Err(ManipulationConfigError::OutOfRange {
                field: "scale_amount",
                value: self.scale_amount,
                min: 0.0,
                max: 1.0,
            });
        }
        in_range("nudge_amount", self.nudge_amount, f32::MIN_POSITIVE, f32::MAX)?;
        Ok(())
    }
}

fn in_range(
    field: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<(), ManipulationConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ManipulationConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ManipulationConfig::default();
        assert_eq!(config.select_mode, SelectMode::Toggle);
        assert_eq!(config.scale_zone, Zone::new(0.25, 1.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zone_contains_is_exclusive_admits_is_inclusive() {
        let zone = Zone::new(0.25, 1.0);
        assert!(!zone.contains(0.25));
        assert!(zone.contains(0.5));
        assert!(!zone.contains(1.0));
        assert!(zone.admits(0.25));
        assert!(zone.admits(1.0));
        assert!(!zone.admits(0.2));
    }

    #[test]
    fn inverted_zone_is_rejected() {
        let config = ManipulationConfig {
            nudge_zone: Zone::new(0.8, 0.3),
            ..ManipulationConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ManipulationConfigError::InvalidZone {
                field: "nudge_zone",
                min: 0.8,
                max: 0.3
            })
        );
    }

    #[test]
    fn empty_zone_is_rejected() {
        let config = ManipulationConfig {
            scale_zone: Zone::new(0.5, 0.5),
            ..ManipulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn scale_amount_must_shrink() {
        let config = ManipulationConfig {
            scale_amount: 1.0,
            ..ManipulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ManipulationConfigError::OutOfRange {
                field: "scale_amount",
                ..
            })
        ));
    }

    #[test]
    fn rotation_activation_range() {
        let config = ManipulationConfig {
            rotation_activation_angle: 1.0,
            ..ManipulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_loads_from_partial_json() {
        let config: ManipulationConfig =
            serde_json::from_str(r#"{"select_mode":"PressAndHold","actions":{"select":4}}"#)
                .unwrap();
        assert_eq!(config.select_mode, SelectMode::PressAndHold);
        assert_eq!(config.actions.select, InputAction(4));
        assert_eq!(config.press_threshold, 0.25);
    }
}
