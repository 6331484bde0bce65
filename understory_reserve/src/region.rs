// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen regions: validated, integer, axis-aligned rectangles.

use std::fmt;

use understory_reserve_index::Aabb2D;

/// Why a set of coordinates does not describe a [`Region`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegionError {
    /// The max corner lies left of or above the min corner.
    #[error("inverted corners: ({x1}, {y1}) to ({x2}, {y2})")]
    InvertedCorners {
        /// Left edge as given.
        x1: i32,
        /// Top edge as given.
        y1: i32,
        /// Right edge as given.
        x2: i32,
        /// Bottom edge as given.
        y2: i32,
    },
    /// Width or height is negative.
    #[error("negative size: {width}x{height}")]
    NegativeSize {
        /// Width as given.
        width: i32,
        /// Height as given.
        height: i32,
    },
    /// An edge or extent does not fit the `i32` coordinate space (or is not a finite number).
    #[error("coordinates out of range")]
    OutOfRange,
}

/// An axis-aligned rectangle in screen space.
///
/// A region covers `x1..x2` horizontally and `y1..y2` vertically, so its right and bottom
/// edges are exclusive. Construction always validates, which means every `Region` has
/// `x1 <= x2`, `y1 <= y2`, and a width and height that fit in `i32`.
///
/// Two regions [overlap](Self::overlaps) only when they share area: regions that merely
/// touch along an edge do not collide, and a zero-area region collides with nothing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
}

impl Region {
    /// Create a region from its min and max corners.
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Result<Self, RegionError> {
        if x2 < x1 || y2 < y1 {
            return Err(RegionError::InvertedCorners { x1, y1, x2, y2 });
        }
        if x2.checked_sub(x1).is_none() || y2.checked_sub(y1).is_none() {
            return Err(RegionError::OutOfRange);
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    /// Create a region from its origin and size.
    pub fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Result<Self, RegionError> {
        if width < 0 || height < 0 {
            return Err(RegionError::NegativeSize { width, height });
        }
        match (x.checked_add(width), y.checked_add(height)) {
            (Some(x2), Some(y2)) => Ok(Self {
                x1: x,
                y1: y,
                x2,
                y2,
            }),
            _ => Err(RegionError::OutOfRange),
        }
    }

    /// Left edge.
    pub const fn x1(&self) -> i32 {
        self.x1
    }

    /// Top edge.
    pub const fn y1(&self) -> i32 {
        self.y1
    }

    /// Right edge (exclusive).
    pub const fn x2(&self) -> i32 {
        self.x2
    }

    /// Bottom edge (exclusive).
    pub const fn y2(&self) -> i32 {
        self.y2
    }

    /// Origin x; same as [`x1`](Self::x1).
    pub const fn x(&self) -> i32 {
        self.x1
    }

    /// Origin y; same as [`y1`](Self::y1).
    pub const fn y(&self) -> i32 {
        self.y1
    }

    /// Horizontal extent.
    pub const fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    /// Vertical extent.
    pub const fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// True if the region has no area and can therefore never collide.
    pub const fn is_zero_area(&self) -> bool {
        self.x1 == self.x2 || self.y1 == self.y2
    }

    /// Whether the two regions share positive area.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.to_aabb().overlaps(&other.to_aabb())
    }

    /// The shared area of two overlapping regions.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        self.to_aabb()
            .intersection(&other.to_aabb())
            .map(Self::from_aabb)
    }

    /// Whether `other` lies entirely within this region.
    pub fn contains(&self, other: &Self) -> bool {
        self.x1 <= other.x1 && self.y1 <= other.y1 && other.x2 <= self.x2 && other.y2 <= self.y2
    }

    pub(crate) const fn to_aabb(self) -> Aabb2D<i32> {
        Aabb2D::new(self.x1, self.y1, self.x2, self.y2)
    }

    /// Only for boxes derived from valid regions (e.g. intersections).
    const fn from_aabb(a: Aabb2D<i32>) -> Self {
        Self {
            x1: a.min_x,
            y1: a.min_y,
            x2: a.max_x,
            y2: a.max_y,
        }
    }
}

impl From<Region> for Aabb2D<i32> {
    fn from(region: Region) -> Self {
        region.to_aabb()
    }
}

impl TryFrom<Aabb2D<i32>> for Region {
    type Error = RegionError;

    fn try_from(a: Aabb2D<i32>) -> Result<Self, Self::Error> {
        Self::new(a.min_x, a.min_y, a.max_x, a.max_y)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{} {}x{}",
            self.x1,
            self.y1,
            self.width(),
            self.height()
        )
    }
}

#[cfg(feature = "kurbo")]
impl Region {
    /// Convert a `kurbo::Rect`, rounding outward to whole pixels.
    ///
    /// The rectangle is normalized first, so a rect with negative width is accepted.
    pub fn from_kurbo_rect(rect: kurbo::Rect) -> Result<Self, RegionError> {
        let r = rect.abs().expand();
        Self::new(
            to_coord(r.x0)?,
            to_coord(r.y0)?,
            to_coord(r.x1)?,
            to_coord(r.y1)?,
        )
    }

    /// The region as a `kurbo::Rect`.
    pub fn to_kurbo_rect(&self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.x1),
            f64::from(self.y1),
            f64::from(self.x2),
            f64::from(self.y2),
        )
    }
}

#[cfg(feature = "kurbo")]
#[allow(
    clippy::cast_possible_truncation,
    reason = "Value is integral and range-checked before the cast."
)]
fn to_coord(v: f64) -> Result<i32, RegionError> {
    if v.is_finite() && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX) {
        Ok(v as i32)
    } else {
        Err(RegionError::OutOfRange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_and_origin_forms_agree() {
        let a = Region::new(3, 4, 13, 24).unwrap();
        let b = Region::from_xywh(3, 4, 10, 20).unwrap();
        assert_eq!(a, b);
        assert_eq!((b.x(), b.y(), b.width(), b.height()), (3, 4, 10, 20));
        assert_eq!((b.x1(), b.y1(), b.x2(), b.y2()), (3, 4, 13, 24));
    }

    #[test]
    fn invalid_input_is_rejected() {
        assert_eq!(
            Region::from_xywh(0, 0, -1, 5),
            Err(RegionError::NegativeSize {
                width: -1,
                height: 5
            })
        );
        assert!(matches!(
            Region::new(10, 0, 0, 10),
            Err(RegionError::InvertedCorners { .. })
        ));
        assert_eq!(
            Region::from_xywh(i32::MAX, 0, 1, 1),
            Err(RegionError::OutOfRange)
        );
        assert_eq!(
            Region::new(i32::MIN, 0, i32::MAX, 1),
            Err(RegionError::OutOfRange)
        );
    }

    #[test]
    fn adjacent_regions_do_not_overlap() {
        let left = Region::from_xywh(0, 0, 10, 10).unwrap();
        let right = Region::from_xywh(10, 0, 10, 10).unwrap();
        assert!(!left.overlaps(&right));
        assert_eq!(left.intersection(&right), None);
    }

    #[test]
    fn zero_area_region_overlaps_nothing() {
        let empty = Region::from_xywh(5, 5, 0, 10).unwrap();
        assert!(empty.is_zero_area());
        assert!(!empty.overlaps(&empty));
        assert!(!empty.overlaps(&Region::from_xywh(0, 0, 20, 20).unwrap()));
    }

    #[test]
    fn intersection_is_the_shared_area() {
        let a = Region::from_xywh(0, 0, 10, 10).unwrap();
        let b = Region::from_xywh(5, 5, 10, 10).unwrap();
        let shared = a.intersection(&b).unwrap();
        assert_eq!(shared, Region::from_xywh(5, 5, 5, 5).unwrap());
        assert!(a.contains(&shared) && b.contains(&shared));
    }

    #[test]
    fn display_uses_origin_and_size() {
        let r = Region::from_xywh(-2, 7, 30, 4).unwrap();
        assert_eq!(r.to_string(), "-2,7 30x4");
    }

    #[test]
    fn aabb_round_trip_validates() {
        let r = Region::from_xywh(1, 2, 3, 4).unwrap();
        let a: Aabb2D<i32> = r.into();
        assert_eq!(Region::try_from(a), Ok(r));
        assert!(Region::try_from(Aabb2D::new(5, 5, 0, 0)).is_err());
    }

    #[cfg(feature = "kurbo")]
    #[test]
    fn kurbo_rects_round_outward() {
        let r = Region::from_kurbo_rect(kurbo::Rect::new(0.5, 1.2, 9.1, 9.9)).unwrap();
        assert_eq!(r, Region::new(0, 1, 10, 10).unwrap());
        assert_eq!(r.to_kurbo_rect(), kurbo::Rect::new(0.0, 1.0, 10.0, 10.0));
        assert_eq!(
            Region::from_kurbo_rect(kurbo::Rect::new(0.0, 0.0, f64::NAN, 1.0)),
            Err(RegionError::OutOfRange)
        );
    }
}
