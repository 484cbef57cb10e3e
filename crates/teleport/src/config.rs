use serde::{Deserialize, Serialize};

/// Errors from validating a teleport pointer configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TeleportConfigError {
    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("{field} = {value} must be finite and non-negative")]
    Negative { field: &'static str, value: f32 },
    #[error("line cast resolution must be at least 1")]
    ZeroResolution,
}

/// Thresholds and bands for the teleport pointer.
///
/// Angles are in degrees. Accepted once by `TeleportPointer::new` and
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleportConfig {
    /// Dead zone for single- and dual-axis input.
    pub input_threshold: f32,
    /// Added to the raw stick angle so "forward" feels forward.
    pub angle_offset: f32,
    /// Half-width of the forward band that starts a teleport request.
    pub teleport_activation_angle: f32,
    /// Width of the rotate band centred on ±90°.
    pub rotate_activation_angle: f32,
    /// How far the camera rig turns on one rotate.
    pub rotation_amount: f32,
    /// Width of the back-strafe band ending at 180°.
    pub back_strafe_activation_angle: f32,
    /// How far (metres) the camera rig moves back on one strafe.
    pub strafe_amount: f32,
    /// Number of ray steps the teleport arc is cut into.
    pub line_cast_resolution: usize,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            input_threshold: 0.5,
            angle_offset: 0.0,
            teleport_activation_angle: 45.0,
            rotate_activation_angle: 22.5,
            rotation_amount: 90.0,
            back_strafe_activation_angle: 45.0,
            strafe_amount: 0.25,
            line_cast_resolution: 10,
        }
    }
}

impl TeleportConfig {
    /// Check every field against its accepted range.
    pub fn validate(&self) -> Result<(), TeleportConfigError> {
        in_range("input_threshold", self.input_threshold, 0.0, 1.0)?;
        in_range("angle_offset", self.angle_offset, 0.0, 360.0)?;
        in_range(
            "teleport_activation_angle",
            self.teleport_activation_angle,
            5.0,
            90.0,
        )?;
        in_range(
            "rotate_activation_angle",
            self.rotate_activation_angle,
            5.0,
            90.0,
        )?;
        in_range("rotation_amount", self.rotation_amount, 5.0, 180.0)?;
        in_range(
            "back_strafe_activation_angle",
            self.back_strafe_activation_angle,
            5.0,
            90.0,
        )?;
        if !self.strafe_amount.is_finite() || self.strafe_amount < 0.0 {
            return Err(TeleportConfigError::Negative {
                field: "strafe_amount",
                value: self.strafe_amount,
            });
        }
        if self.line_cast_resolution == 0 {
            return Err(TeleportConfigError::ZeroResolution);
        }
        Ok(())
    }
}

fn in_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), TeleportConfigError> {
    // NaN fails both comparisons, so test for containment rather than exclusion.
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(TeleportConfigError::OutOfRange {
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
        let config = TeleportConfig::default();
        assert_eq!(config.input_threshold, 0.5);
        assert_eq!(config.teleport_activation_angle, 45.0);
        assert_eq!(config.rotate_activation_angle, 22.5);
        assert_eq!(config.back_strafe_activation_angle, 45.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_threshold_above_one() {
        let config = TeleportConfig {
            input_threshold: 1.5,
            ..TeleportConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TeleportConfigError::OutOfRange {
                field: "input_threshold",
                ..
            })
        ));
    }

    #[test]
    fn rejects_nan_angle() {
        let config = TeleportConfig {
            rotate_activation_angle: f32::NAN,
            ..TeleportConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_negative_strafe() {
        let config = TeleportConfig {
            strafe_amount: -0.1,
            ..TeleportConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TeleportConfigError::Negative { .. })
        ));
    }

    #[test]
    fn rejects_zero_resolution() {
        let config = TeleportConfig {
            line_cast_resolution: 0,
            ..TeleportConfig::default()
        };
        assert_eq!(config.validate(), Err(TeleportConfigError::ZeroResolution));
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config: TeleportConfig =
            serde_yaml::from_str("input_threshold: 0.3\nstrafe_amount: 0.5\n").unwrap();
        assert_eq!(config.input_threshold, 0.3);
        assert_eq!(config.strafe_amount, 0.5);
        assert_eq!(config.rotation_amount, 90.0);
    }
}
