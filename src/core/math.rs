// Math utilities and helper functions

/// Normalize a raw signed 16-bit axis reading to [-1, 1]
pub fn axis_to_unit(raw: i16) -> f32 {
    (raw as f32 / 32767.0).clamp(-1.0, 1.0)
}

/// Normalize a raw trigger reading to [0, 1]
pub fn trigger_to_unit(raw: i16) -> f32 {
    (raw as f32 / 32767.0).clamp(0.0, 1.0)
}

/// Convert a unit magnitude to the native 16-bit motor scale,
/// clamping out-of-range input first
pub fn magnitude_to_raw(value: f32) -> u16 {
    (value.clamp(0.0, 1.0) * 65535.0) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_to_unit_range() {
        assert_relative_eq!(axis_to_unit(0), 0.0);
        assert_relative_eq!(axis_to_unit(32767), 1.0);
        assert_relative_eq!(axis_to_unit(-32767), -1.0);
        // i16::MIN overshoots the divisor and must clamp
        assert_relative_eq!(axis_to_unit(i16::MIN), -1.0);
    }

    #[test]
    fn test_trigger_to_unit_floors_negative() {
        assert_relative_eq!(trigger_to_unit(-5000), 0.0);
        assert_relative_eq!(trigger_to_unit(32767), 1.0);
    }

    #[test]
    fn test_magnitude_to_raw_clamps() {
        assert_eq!(magnitude_to_raw(0.0), 0);
        assert_eq!(magnitude_to_raw(1.0), 65535);
        assert_eq!(magnitude_to_raw(1.5), 65535);
        assert_eq!(magnitude_to_raw(-0.2), 0);
        assert_eq!(magnitude_to_raw(0.5), 32767);
    }
}
