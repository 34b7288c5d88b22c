//! 2-D Points

use crate::common::*;
use num_traits::{Num, Zero};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A 2-D point containing numeric values.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point2<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,
}

/// 2-D point containing `Float` values.
pub type Point2f = Point2<Float>;

/// 2-D point containing `Int` values.
pub type Point2i = Point2<Int>;

impl<T: Num> Point2<T> {
    /// Creates a new 2-D point.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Creates a new 2-D zero point.
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Self::new(T::zero(), T::zero())
    }

    /// Return the component-wise minimum coordinate values with another point.
    ///
    /// * `other` - The other point.
    pub fn min(&self, other: &Self) -> Self
    where
        T: PartialOrd + Copy,
    {
        Self::new(min(self.x, other.x), min(self.y, other.y))
    }

    /// Return the component-wise maximum coordinate values with another point.
    ///
    /// * `other` - The other point.
    pub fn max(&self, other: &Self) -> Self
    where
        T: PartialOrd + Copy,
    {
        Self::new(max(self.x, other.x), max(self.y, other.y))
    }
}

impl<T: Num> Add for Point2<T> {
    type Output = Self;

    /// Adds the given point and returns the result.
    ///
    /// * `other` - The point to add.
    fn add(self, other: Self) -> Self::Output {
        Self::Output::new(self.x + other.x, self.y + other.y)
    }
}

impl<T: Num> Sub for Point2<T> {
    type Output = Self;

    /// Subtracts the given point and returns the result.
    ///
    /// * `other` - The point to subtract.
    fn sub(self, other: Self) -> Self::Output {
        Self::Output::new(self.x - other.x, self.y - other.y)
    }
}

impl<T: Num + Copy> Mul<T> for Point2<T> {
    type Output = Self;

    /// Scale the point.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: T) -> Self::Output {
        Self::Output::new(f * self.x, f * self.y)
    }
}

impl From<Point2i> for Point2f {
    /// Convert a 2-D point containing `Int` values to `Float` values.
    ///
    /// * `p` - The point.
    fn from(p: Point2i) -> Self {
        Self::new(p.x as Float, p.y as Float)
    }
}

impl From<Point2<usize>> for Point2i {
    /// Convert a 2-D point of grid indices to `Int` values.
    ///
    /// * `p` - The point.
    fn from(p: Point2<usize>) -> Self {
        Self::new(p.x as Int, p.y as Int)
    }
}

impl<T: fmt::Display> fmt::Display for Point2<T> {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_point() {
        assert!(Point2::new(0, 0) == Point2::zero());
        assert!(Point2::new(0.0, 0.0) == Point2::zero());
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Point2i::new(3, -4)), "[3, -4]");
    }

    proptest! {
        #[test]
        fn add_sub_i32(x1 in -100..100i32, y1 in -100..100i32, x2 in -100..100i32, y2 in -100..100i32) {
            let p1 = Point2i::new(x1, y1);
            let p2 = Point2i::new(x2, y2);
            prop_assert_eq!((p1 + p2) - p2, p1);
        }

        #[test]
        fn min_max_f32(x1 in -100.0..100.0f32, y1 in -100.0..100.0f32, x2 in -100.0..100.0f32, y2 in -100.0..100.0f32) {
            let p1 = Point2f::new(x1, y1);
            let p2 = Point2f::new(x2, y2);
            prop_assert_eq!(p1.min(&p2), Point2::new(x1.min(x2), y1.min(y2)));
            prop_assert_eq!(p1.max(&p2), Point2::new(x1.max(x2), y1.max(y2)));
        }
    }
}
