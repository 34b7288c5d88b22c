//! Clamp

use num_traits::Num;
use std::fmt::Display;

/// Clamps a value x to [min, max].
///
/// * `x` - The number to clamp.
/// * `min` - Minimum value.
/// * `max` - Maximum value.
pub fn clamp<T>(x: T, min: T, max: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}

/// Clamps a configuration value to [min, max] and logs a warning naming the
/// setting when the value had to be corrected.
///
/// * `name` - Name of the setting for the log message.
/// * `x`    - The requested value.
/// * `min`  - Minimum value.
/// * `max`  - Maximum value.
pub fn clamp_setting<T>(name: &str, x: T, min: T, max: T) -> T
where
    T: Num + PartialOrd + Copy + Display,
{
    let v = clamp(x, min, max);
    if v != x {
        warn!("{name} {x} is out of range [{min}, {max}]; using {v}");
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_int() {
        assert_eq!(clamp(-5, -4, 5), -4);
        assert_eq!(clamp(7, -4, 5), 5);
        assert_eq!(clamp(3, -4, 5), 3);
    }

    #[test]
    fn clamp_setting_returns_corrected_value() {
        assert_eq!(clamp_setting("bucket size", 0, 16, 512), 16);
        assert_eq!(clamp_setting("bucket size", 1024, 16, 512), 512);
        assert_eq!(clamp_setting("bucket size", 64, 16, 512), 64);
    }
}
