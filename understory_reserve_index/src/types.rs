// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::fmt::Debug;

/// Axis-aligned bounding box in 2D.
///
/// The max edges are exclusive for overlap purposes: two boxes that only share an edge
/// do not [overlap](Self::overlaps).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Aabb2D<T> {
    /// Minimum x (left)
    pub min_x: T,
    /// Minimum y (top)
    pub min_y: T,
    /// Maximum x (right)
    pub max_x: T,
    /// Maximum y (bottom)
    pub max_y: T,
}

impl<T> Aabb2D<T> {
    /// Create a new AABB from min/max corners.
    pub const fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl<T: Copy + Ord> Aabb2D<T> {
    /// Whether the two boxes share positive area.
    ///
    /// Touching edges do not count, and a zero-area box overlaps nothing (itself included).
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }

    /// Whether the two closed boxes share at least one point.
    ///
    /// Used for pruning where zero-area entries must still be reachable.
    pub fn touches(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// The intersection of two AABBs, or `None` if they do not [overlap](Self::overlaps).
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Self {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        })
    }

    /// True if the box has no area (zero width or height) or is inverted.
    pub fn is_empty(&self) -> bool {
        self.max_x <= self.min_x || self.max_y <= self.min_y
    }

    /// Smallest box containing both inputs.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

impl Aabb2D<i32> {
    /// Create an AABB from origin and size in i32. Saturates on overflow.
    pub const fn from_xywh(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x.saturating_add(w),
            max_y: y.saturating_add(h),
        }
    }
}

impl Aabb2D<i64> {
    /// Create an AABB from origin and size in i64. Saturates on overflow.
    pub const fn from_xywh(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x.saturating_add(w),
            max_y: y.saturating_add(h),
        }
    }
}

/// Integer scalar abstraction for 2D AABBs used by backends.
///
/// Coordinates are totally ordered. Area and split costs are computed in a widened
/// accumulator (`i128` for both scalars). Products and sums saturate, so boxes spanning
/// the whole coordinate plane still yield an ordered (if clamped) cost.
pub trait Scalar: Copy + Ord + Debug {
    /// Widened accumulator type suitable for area/cost computations.
    type Acc: Copy
        + Ord
        + core::ops::Add<Output = Self::Acc>
        + core::ops::Sub<Output = Self::Acc>
        + core::ops::Mul<Output = Self::Acc>
        + Debug;

    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// Midpoint between a and b (used for centroid ordering).
    fn mid(a: Self, b: Self) -> Self;

    /// Convert a scalar to the accumulator type.
    fn widen(v: Self) -> Self::Acc;

    /// Convert a `usize` to the accumulator type (for SAH weighting).
    fn acc_from_usize(n: usize) -> Self::Acc;

    /// Saturating accumulator sum.
    fn acc_add(a: Self::Acc, b: Self::Acc) -> Self::Acc;

    /// Saturating accumulator product.
    fn acc_mul(a: Self::Acc, b: Self::Acc) -> Self::Acc;
}

impl Scalar for i32 {
    type Acc = i128;

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        // Average without overflow: (a & b) + ((a ^ b) >> 1)
        (a & b) + ((a ^ b) >> 1)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        Self::Acc::from(v)
    }

    #[inline]
    fn acc_from_usize(n: usize) -> Self::Acc {
        Self::Acc::try_from(n).unwrap_or(Self::Acc::MAX)
    }

    #[inline]
    fn acc_add(a: Self::Acc, b: Self::Acc) -> Self::Acc {
        a.saturating_add(b)
    }

    #[inline]
    fn acc_mul(a: Self::Acc, b: Self::Acc) -> Self::Acc {
        a.saturating_mul(b)
    }
}

impl Scalar for i64 {
    type Acc = i128;

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        (a & b) + ((a ^ b) >> 1)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        Self::Acc::from(v)
    }

    #[inline]
    fn acc_from_usize(n: usize) -> Self::Acc {
        Self::Acc::try_from(n).unwrap_or(Self::Acc::MAX)
    }

    #[inline]
    fn acc_add(a: Self::Acc, b: Self::Acc) -> Self::Acc {
        a.saturating_add(b)
    }

    #[inline]
    fn acc_mul(a: Self::Acc, b: Self::Acc) -> Self::Acc {
        a.saturating_mul(b)
    }
}

/// Compute the area of an AABB using the scalar's widened accumulator type.
///
/// Inverted boxes have zero area. The product saturates at the accumulator's maximum.
#[inline]
pub fn area<T: Scalar>(a: &Aabb2D<T>) -> T::Acc {
    let zero = T::widen(T::zero());
    let w = (T::widen(a.max_x) - T::widen(a.min_x)).max(zero);
    let h = (T::widen(a.max_y) - T::widen(a.min_y)).max(zero);
    T::acc_mul(w, h)
}

/// Helper alias for the widened accumulator type associated with a scalar `T`.
pub type ScalarAcc<T> = <T as Scalar>::Acc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_strict() {
        let a = Aabb2D::new(0, 0, 10, 10);
        assert!(a.overlaps(&Aabb2D::new(9, 9, 20, 20)));
        // Shared edge only.
        assert!(!a.overlaps(&Aabb2D::new(10, 0, 20, 10)));
        assert!(a.touches(&Aabb2D::new(10, 0, 20, 10)));
        // Shared corner only.
        assert!(!a.overlaps(&Aabb2D::new(10, 10, 20, 20)));
    }

    #[test]
    fn zero_area_overlaps_nothing() {
        let line = Aabb2D::<i32>::new(5, 0, 5, 10);
        let cover = Aabb2D::<i32>::new(0, 0, 10, 10);
        assert!(line.is_empty());
        assert!(!line.overlaps(&line));
        assert!(!line.overlaps(&cover));
        assert!(!cover.overlaps(&line));
        assert_eq!(cover.intersection(&line), None);
        assert!(line.touches(&line));
        assert!(line.touches(&cover));
        // A degenerate point in the middle of a box.
        let point = Aabb2D::<i32>::new(4, 4, 4, 4);
        assert!(!cover.overlaps(&point));
    }

    #[test]
    fn intersection_of_overlapping_boxes() {
        let a = Aabb2D::<i32>::from_xywh(0, 0, 10, 10);
        let b = Aabb2D::<i32>::from_xywh(5, 5, 10, 10);
        assert_eq!(a.intersection(&b), Some(Aabb2D::new(5, 5, 10, 10)));
        assert_eq!(a.intersection(&Aabb2D::new(20, 20, 30, 30)), None);
    }

    #[test]
    fn area_uses_widened_accumulator() {
        let big = Aabb2D::<i32>::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        let side = i128::from(i32::MAX) - i128::from(i32::MIN);
        assert_eq!(area(&big), side * side);
        assert_eq!(area(&Aabb2D::<i32>::new(10, 10, 0, 0)), 0_i128);
    }

    #[test]
    fn i64_area_saturates() {
        let big = Aabb2D::<i64>::new(i64::MIN, i64::MIN, i64::MAX, i64::MAX);
        assert_eq!(area(&big), i128::MAX);
        assert_eq!(
            <i64 as Scalar>::acc_mul(area(&big), <i64 as Scalar>::acc_from_usize(8)),
            i128::MAX
        );
    }

    #[test]
    fn midpoint_does_not_overflow() {
        assert_eq!(<i32 as Scalar>::mid(i32::MAX, i32::MAX - 2), i32::MAX - 1);
        assert_eq!(<i64 as Scalar>::mid(-4, 4), 0);
    }
}
