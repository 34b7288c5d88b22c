//! RGB Color.

use crate::common::*;
use std::fmt;
use std::ops::{Add, AddAssign, Index, Mul, MulAssign};

/// Linear RGB color used for radiance samples and filtered pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Color {
    /// Red component.
    pub r: Float,

    /// Green component.
    pub g: Float,

    /// Blue component.
    pub b: Float,
}

impl Color {
    /// Black.
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0 };

    /// White.
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0 };

    /// Create a new `Color`.
    ///
    /// * `r` - Red component.
    /// * `g` - Green component.
    /// * `b` - Blue component.
    pub const fn new(r: Float, g: Float, b: Float) -> Self {
        Self { r, g, b }
    }

    /// Create a grey `Color` with the same value in all channels.
    ///
    /// * `v` - Value.
    pub const fn gray(v: Float) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Returns true if every channel is a finite number.
    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// Multiply-add: `self += s * c`.
    ///
    /// * `s` - Scale factor.
    /// * `c` - Color to scale and add.
    #[inline]
    pub fn madd(&mut self, s: Float, c: &Color) {
        self.r += s * c.r;
        self.g += s * c.g;
        self.b += s * c.b;
    }

    /// Returns true if any channel's relative difference `|c1 - c2| / (c1 + c2)`
    /// exceeds the threshold. Channels that are zero in both colors never have
    /// contrast.
    ///
    /// * `other`  - The other color.
    /// * `thresh` - Contrast threshold.
    pub fn has_contrast(&self, other: &Color, thresh: Float) -> bool {
        (0..3).any(|i| {
            let (a, b) = (self[i], other[i]);
            // 0/0 yields NaN which compares false.
            abs(a - b) / (a + b) > thresh
        })
    }

    /// Returns the channels as an array.
    pub fn to_array(&self) -> [Float; 3] {
        [self.r, self.g, self.b]
    }

    /// Returns gamma corrected 8-bit values.
    pub fn to_srgb8(&self) -> [u8; 3] {
        let to_byte = |v: Float| clamp(255.0 * gamma_correct(v) + 0.5, 0.0, 255.0) as u8;
        [to_byte(self.r), to_byte(self.g), to_byte(self.b)]
    }
}

impl Add for Color {
    type Output = Self;

    /// Adds the given color and returns the result.
    ///
    /// * `other` - The color to add.
    fn add(self, other: Self) -> Self::Output {
        Self::new(self.r + other.r, self.g + other.g, self.b + other.b)
    }
}

impl AddAssign for Color {
    /// Performs the `+=` operation.
    ///
    /// * `other` - The color to add.
    fn add_assign(&mut self, other: Self) {
        self.r += other.r;
        self.g += other.g;
        self.b += other.b;
    }
}

impl Mul<Float> for Color {
    type Output = Self;

    /// Scale the color.
    ///
    /// * `s` - The scaling factor.
    fn mul(self, s: Float) -> Self::Output {
        Self::new(s * self.r, s * self.g, s * self.b)
    }
}

impl Mul<Color> for Float {
    type Output = Color;

    /// Scale the color.
    ///
    /// * `c` - The color.
    fn mul(self, c: Color) -> Self::Output {
        c * self
    }
}

impl MulAssign<Float> for Color {
    /// Scale the color in place.
    ///
    /// * `s` - The scaling factor.
    fn mul_assign(&mut self, s: Float) {
        self.r *= s;
        self.g *= s;
        self.b *= s;
    }
}

impl Index<usize> for Color {
    type Output = Float;

    /// Index the color channels by red = 0, green = 1, blue = 2.
    ///
    /// * `i` - The channel index.
    fn index(&self, i: usize) -> &Self::Output {
        match i {
            0 => &self.r,
            1 => &self.g,
            2 => &self.b,
            _ => panic!("Invalid index for color channel"),
        }
    }
}

impl fmt::Display for Color {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contrast_uses_relative_difference() {
        let a = Color::gray(0.5);
        assert!(!a.has_contrast(&Color::gray(0.52), 0.1));
        assert!(a.has_contrast(&Color::gray(1.0), 0.1));
        assert!(Color::new(0.5, 0.5, 0.0).has_contrast(&Color::new(0.5, 0.5, 0.3), 0.1));
    }

    #[test]
    fn black_has_no_contrast_with_black() {
        assert!(!Color::BLACK.has_contrast(&Color::BLACK, 0.0));
        assert!(Color::BLACK.has_contrast(&Color::gray(0.01), 0.5));
    }

    #[test]
    fn madd_accumulates() {
        let mut c = Color::BLACK;
        c.madd(0.5, &Color::new(1.0, 2.0, 4.0));
        c.madd(0.25, &Color::new(4.0, 0.0, 0.0));
        assert_eq!(c, Color::new(1.5, 1.0, 2.0));
    }

    #[test]
    fn srgb8_is_clamped() {
        assert_eq!(Color::BLACK.to_srgb8(), [0, 0, 0]);
        assert_eq!(Color::gray(10.0).to_srgb8(), [255, 255, 255]);
        assert_eq!(Color::gray(-1.0).to_srgb8(), [0, 0, 0]);
    }

    #[test]
    fn finite_check() {
        assert!(Color::WHITE.is_finite());
        assert!(!Color::new(Float::NAN, 0.0, 0.0).is_finite());
        assert!(!Color::new(0.0, Float::INFINITY, 0.0).is_finite());
    }
}
