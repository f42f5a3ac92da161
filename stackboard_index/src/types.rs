// Copyright 2025 the Stackboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::fmt::Debug;

/// Axis-aligned bounding box in 2D.
///
/// Edges are part of the box: a box whose right edge sits exactly on the
/// right edge of another is still contained by it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bounds<T> {
    /// Minimum x (left)
    pub min_x: T,
    /// Minimum y (top)
    pub min_y: T,
    /// Maximum x (right)
    pub max_x: T,
    /// Maximum y (bottom)
    pub max_y: T,
}

impl<T> Bounds<T> {
    /// Create a new box from min/max corners.
    #[inline(always)]
    pub const fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl<T: Copy + PartialOrd> Bounds<T> {
    /// Whether `other` lies entirely inside this box.
    ///
    /// # Examples
    ///
    /// ```
    /// use stackboard_index::Bounds;
    ///
    /// let area = Bounds::new(0, 0, 100, 150);
    /// assert!(area.contains(&Bounds::new(50, 100, 100, 150)));
    /// assert!(!area.contains(&Bounds::new(20, 20, 100, 200)));
    /// ```
    #[inline]
    pub fn contains(&self, other: &Self) -> bool {
        self.min_x <= other.min_x
            && other.max_x <= self.max_x
            && self.min_y <= other.min_y
            && other.max_y <= self.max_y
    }

    /// Return true if the box is empty or inverted (no area).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max_x <= self.min_x || self.max_y <= self.min_y
    }
}

impl<T: Scalar> Bounds<T> {
    /// Create a box from origin and size.
    #[inline]
    pub fn from_xywh(x: T, y: T, w: T, h: T) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: T::add(x, w),
            max_y: T::add(y, h),
        }
    }
}

/// Numeric scalar abstraction for integer boxes.
///
/// Addition saturates, so a box built near the edge of the numeric range is
/// clamped rather than wrapped. Callers that need exact far edges should widen
/// first (e.g. store `i32` geometry as `Bounds<i64>`).
pub trait Scalar: Copy + Ord + Debug {
    /// Add two scalar values.
    fn add(a: Self, b: Self) -> Self;
}

impl Scalar for i32 {
    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a.saturating_add(b)
    }
}

impl Scalar for i64 {
    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a.saturating_add(b)
    }
}

#[cfg(test)]
mod tests {
    use super::Bounds;

    #[test]
    fn containment_includes_edges() {
        let outer = Bounds::new(1000_i64, 1000, 1100, 1150);
        assert!(outer.contains(&Bounds::from_xywh(1000, 1050, 100, 100)));
        assert!(!outer.contains(&Bounds::from_xywh(1050, 1100, 100, 100)));
        assert!(outer.contains(&outer));
    }

    #[test]
    fn empty_and_inverted() {
        assert!(Bounds::new(5, 5, 5, 10).is_empty());
        assert!(Bounds::new(5, 5, 4, 10).is_empty());
        assert!(!Bounds::from_xywh(5, 5, 1, 1).is_empty());
    }

    #[test]
    fn from_xywh_saturates() {
        let b = Bounds::from_xywh(i32::MAX - 1, 0, 10, 10);
        assert_eq!(b.max_x, i32::MAX);
    }
}
