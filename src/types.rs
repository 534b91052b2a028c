//! Strongly-typed geometric primitives shared by the engine.
//!
//! Coordinates are `glam::DVec2`. The newtypes here cover the places where a
//! bare `f64` would be ambiguous: DrawingML angles and the target box.

use std::fmt;

use glam::{DVec2, dvec2};

/// Error type for invalid numeric input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is negative when a size is required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

fn check_finite(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else {
        Ok(val)
    }
}

/// Angle in 60,000ths of a degree (the DrawingML `ST_Angle` unit)
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Angle(pub f64);

impl Angle {
    pub const UNITS_PER_DEGREE: f64 = 60_000.0;

    #[inline]
    pub fn from_degrees(deg: f64) -> Angle {
        Angle(deg * Self::UNITS_PER_DEGREE)
    }

    #[inline]
    pub fn from_radians(rad: f64) -> Angle {
        Angle::from_degrees(rad.to_degrees())
    }

    #[inline]
    pub fn degrees(self) -> f64 {
        self.0 / Self::UNITS_PER_DEGREE
    }

    #[inline]
    pub fn radians(self) -> f64 {
        self.degrees().to_radians()
    }

    /// Raw value in 60,000ths of a degree
    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Target rectangle a preset is materialized into, in rendering units.
///
/// A zero width or height is valid: geometry collapses onto the box edge
/// instead of failing.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Create a box with validation (rejects NaN, infinite, negative sizes)
    pub fn try_new(left: f64, top: f64, width: f64, height: f64) -> Result<Self, NumericError> {
        let width = check_finite(width)?;
        let height = check_finite(height)?;
        if width < 0.0 || height < 0.0 {
            return Err(NumericError::Negative);
        }
        Ok(BoundingBox {
            left: check_finite(left)?,
            top: check_finite(top)?,
            width,
            height,
        })
    }

    /// Top-left corner
    #[inline]
    pub fn origin(&self) -> DVec2 {
        dvec2(self.left, self.top)
    }

    #[inline]
    pub fn size(&self) -> DVec2 {
        dvec2(self.width, self.height)
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> DVec2 {
        self.origin() + self.size() / 2.0
    }

    /// True when the box has no area
    pub fn is_degenerate(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}

/// Axis-aligned bounds accumulated from points
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

impl Bounds {
    /// Create empty bounds (will expand on first point)
    pub fn new() -> Self {
        Bounds {
            min: DVec2::splat(f64::MAX),
            max: DVec2::splat(f64::MIN),
        }
    }

    /// Bounds spanning two corners, in any order
    pub fn from_corners(a: DVec2, b: DVec2) -> Self {
        Bounds {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Check if the bounds are empty (never expanded)
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Expand to include a point
    pub fn expand_point(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Angle tests ====================

    #[test]
    fn angle_units() {
        assert_eq!(Angle(5_400_000.0).degrees(), 90.0);
        assert_eq!(Angle::from_degrees(45.0), Angle(2_700_000.0));
        assert!((Angle(10_800_000.0).radians() - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn angle_from_radians_round_trips_quarter_turn() {
        let a = Angle::from_radians(std::f64::consts::FRAC_PI_2);
        assert!((a.raw() - 5_400_000.0).abs() < 1e-6);
    }

    // ==================== BoundingBox tests ====================

    #[test]
    fn bounding_box_try_new_valid() {
        let b = BoundingBox::try_new(10.0, 20.0, 100.0, 50.0).unwrap();
        assert_eq!(b.right(), 110.0);
        assert_eq!(b.bottom(), 70.0);
        assert_eq!(b.center(), dvec2(60.0, 45.0));
        assert!(!b.is_degenerate());
    }

    #[test]
    fn bounding_box_accepts_zero_area() {
        let b = BoundingBox::try_new(5.0, 5.0, 0.0, 40.0).unwrap();
        assert!(b.is_degenerate());
    }

    #[test]
    fn bounding_box_rejects_negative_size() {
        assert_eq!(
            BoundingBox::try_new(0.0, 0.0, -1.0, 1.0),
            Err(NumericError::Negative)
        );
    }

    #[test]
    fn bounding_box_rejects_nan_and_infinity() {
        assert_eq!(
            BoundingBox::try_new(f64::NAN, 0.0, 1.0, 1.0),
            Err(NumericError::NaN)
        );
        assert_eq!(
            BoundingBox::try_new(0.0, 0.0, f64::INFINITY, 1.0),
            Err(NumericError::Infinite)
        );
    }

    // ==================== Bounds tests ====================

    #[test]
    fn bounds_new_is_empty() {
        assert!(Bounds::new().is_empty());
    }

    #[test]
    fn bounds_expand_point() {
        let mut bb = Bounds::new();
        bb.expand_point(dvec2(1.0, 2.0));
        bb.expand_point(dvec2(5.0, 8.0));

        assert!(!bb.is_empty());
        assert_eq!(bb.min, dvec2(1.0, 2.0));
        assert_eq!(bb.max, dvec2(5.0, 8.0));
        assert_eq!(bb.width(), 4.0);
        assert_eq!(bb.height(), 6.0);
        assert_eq!(bb.center(), dvec2(3.0, 5.0));
    }

    #[test]
    fn bounds_from_corners_orders_them() {
        let bb = Bounds::from_corners(dvec2(4.0, 1.0), dvec2(0.0, 3.0));
        assert_eq!(bb.min, dvec2(0.0, 1.0));
        assert_eq!(bb.max, dvec2(4.0, 3.0));
    }
}
