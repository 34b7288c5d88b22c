//! 2D Axis Aligned Bounding Boxes.

use crate::common::*;
use crate::geometry::*;
use itertools::{iproduct, Product};
use num_traits::Num;
use std::fmt;
use std::ops::Range;

/// 2D Axis Aligned Bounding Box. The maximum bounds are exclusive when used
/// for pixel rectangles.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bounds2<T> {
    /// Minimum bounds.
    pub p_min: Point2<T>,

    /// Maximum bounds.
    pub p_max: Point2<T>,
}

/// 2-D bounding box containing `Int` points.
pub type Bounds2i = Bounds2<Int>;

impl<T: Num + PartialOrd + Copy> Bounds2<T> {
    /// Creates a new 2D bounding box from 2 points. The minimum and maximum bounds
    /// are used for each coordinate axis.
    ///
    /// * `p1` - First point.
    /// * `p2` - Second point.
    pub fn new(p1: Point2<T>, p2: Point2<T>) -> Self {
        Self {
            p_min: p1.min(&p2),
            p_max: p1.max(&p2),
        }
    }

    /// Returns true if the bounding box covers no area.
    pub fn is_empty(&self) -> bool {
        self.p_max.x <= self.p_min.x || self.p_max.y <= self.p_min.y
    }

    /// Returns the vector along the box diagonal from the minimum point to
    /// the maximum point.
    pub fn diagonal(&self) -> Point2<T> {
        self.p_max - self.p_min
    }

    /// Returns the width of the bounding box.
    pub fn width(&self) -> T {
        self.p_max.x - self.p_min.x
    }

    /// Returns the height of the bounding box.
    pub fn height(&self) -> T {
        self.p_max.y - self.p_min.y
    }

    /// Returns the area of the bounding box.
    pub fn area(&self) -> T {
        if self.is_empty() {
            T::zero()
        } else {
            let d = self.diagonal();
            d.x * d.y
        }
    }

    /// Return a bounding box containing the intersection of both bounding boxes.
    ///
    /// * `other` - The other bounding box.
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            p_min: self.p_min.max(&other.p_min),
            p_max: self.p_max.min(&other.p_max),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Bounds2<T> {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bounds2")
            .field("p_min", &self.p_min)
            .field("p_max", &self.p_max)
            .finish()
    }
}

impl<T: fmt::Display> fmt::Display for Bounds2<T> {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.p_min, self.p_max)
    }
}

/// An iterator that can step through integer coordinates in a bounding box
/// in a left-to-right (x-axis) and top-to-bottom (y-axis) scan order.
pub struct Bounds2iIterator {
    /// The iterator that will supply points.
    p: Product<Range<Int>, Range<Int>>,
}

impl IntoIterator for Bounds2i {
    type Item = Point2i;
    type IntoIter = Bounds2iIterator;

    /// Create an iterator for `Bounds2i`.
    fn into_iter(self) -> Self::IntoIter {
        Bounds2iIterator {
            p: iproduct!(self.p_min.y..self.p_max.y, self.p_min.x..self.p_max.x),
        }
    }
}

impl Iterator for Bounds2iIterator {
    type Item = Point2i;

    /// Get the next point.
    fn next(&mut self) -> Option<Self::Item> {
        self.p.next().map(|(y, x)| Point2i::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_orders_corners() {
        let b = Bounds2i::new(Point2i::new(4, 1), Point2i::new(0, 3));
        assert_eq!(b.p_min, Point2i::new(0, 1));
        assert_eq!(b.p_max, Point2i::new(4, 3));
        assert_eq!(b.width(), 4);
        assert_eq!(b.height(), 2);
        assert_eq!(b.area(), 8);
    }

    #[test]
    fn iterates_in_scan_order() {
        let b = Bounds2i::new(Point2i::new(1, 1), Point2i::new(3, 3));
        let points: Vec<Point2i> = b.into_iter().collect();
        assert_eq!(
            points,
            vec![
                Point2i::new(1, 1),
                Point2i::new(2, 1),
                Point2i::new(1, 2),
                Point2i::new(2, 2)
            ]
        );
    }

    #[test]
    fn degenerate_box_is_empty() {
        let b = Bounds2i::new(Point2i::new(2, 0), Point2i::new(2, 5));
        assert!(b.is_empty());
        assert_eq!(b.area(), 0);
        assert_eq!(b.into_iter().count(), 0);
    }

    #[test]
    fn intersection_clips_to_shared_area() {
        let a = Bounds2i::new(Point2i::new(0, 0), Point2i::new(16, 16));
        let b = Bounds2i::new(Point2i::new(16, 0), Point2i::new(32, 16));
        assert!(a.intersect(&b).is_empty());
        let c = a.intersect(&Bounds2i::new(Point2i::new(15, 12), Point2i::new(20, 20)));
        assert_eq!(c.p_min, Point2i::new(15, 12));
        assert_eq!(c.p_max, Point2i::new(16, 16));
        assert_eq!(c.area(), 4);
    }

    proptest! {
        #[test]
        fn iterator_visits_area_points(x0 in -20..20i32, y0 in -20..20i32, w in 0..12i32, h in 0..12i32) {
            let b = Bounds2i::new(Point2i::new(x0, y0), Point2i::new(x0 + w, y0 + h));
            prop_assert_eq!(b.into_iter().count() as i32, b.area());
            prop_assert!(b.into_iter().all(|p| p.x >= x0 && p.x < x0 + w && p.y >= y0 && p.y < y0 + h));
        }
    }
}
