//! Integer rectangles in window coordinates.
//!
//! Unlike a bounding box, a `Rect` is never normalized: `min` may lie past
//! `max`. Such a rectangle is degenerate and never produced by `Rect::new`, but
//! it is a handy sentinel that compares unequal to every real rectangle,
//! including zero-sized ones.

use std::fmt;

use cgmath::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// A two-dimensional rectangle in pixels, `min` inclusive and `max` exclusive.
#[derive(Serialize, Deserialize, Copy, Clone, PartialEq, Eq)]
pub struct Rect {
    /// Minimum point of the rectangle.
    pub min: Point2<i32>,
    /// Maximum point of the rectangle.
    pub max: Point2<i32>,
}

impl Rect {
    /// Construct a rectangle from two corners.
    #[inline]
    pub fn new(p1: Point2<i32>, p2: Point2<i32>) -> Self {
        Rect {
            min: Point2::new(p1.x.min(p2.x), p1.y.min(p2.y)),
            max: Point2::new(p1.x.max(p2.x), p1.y.max(p2.y)),
        }
    }

    /// Construct a rectangle from its position and size.
    #[inline]
    pub fn from_size<P, S>(position: P, size: S) -> Self
    where
        P: Into<Point2<i32>>,
        S: Into<Vector2<i32>>,
    {
        let position = position.into();
        let size = size.into();
        let corner = Point2::new(
            position.x.saturating_add(size.x),
            position.y.saturating_add(size.y),
        );

        Rect::new(position, corner)
    }

    /// Construct a rectangle at origin.
    #[inline]
    pub fn with_size<S: Into<Vector2<i32>>>(size: S) -> Self {
        Rect::from_size(Point2::new(0, 0), size)
    }

    #[inline]
    pub fn zero() -> Self {
        Rect {
            min: Point2::new(0, 0),
            max: Point2::new(0, 0),
        }
    }

    #[inline]
    pub fn position(&self) -> Point2<i32> {
        self.min
    }

    /// Return the dimensions of this rectangle, saturated to the range of
    /// `i32`.
    #[inline]
    pub fn size(&self) -> Vector2<i32> {
        Vector2::new(
            self.max.x.saturating_sub(self.min.x),
            self.max.y.saturating_sub(self.min.y),
        )
    }

    /// Return the number of pixels covered, zero for degenerate rectangles.
    #[inline]
    pub fn area(&self) -> usize {
        let size = self.size();
        if size.x <= 0 || size.y <= 0 {
            0
        } else {
            size.x as usize * size.y as usize
        }
    }

    /// Checks if `other` lies completely inside this rectangle.
    #[inline]
    pub fn contains(&self, other: &Rect) -> bool {
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }
}

impl Default for Rect {
    fn default() -> Self {
        Rect::zero()
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[({}, {}) - ({}, {})]",
            self.min.x, self.min.y, self.max.x, self.max.y
        )
    }
}
