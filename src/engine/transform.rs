//! Mapping from path space (or shape space) into the target box

use glam::{DVec2, dvec2};

use crate::types::BoundingBox;

/// Independent X/Y scale followed by a translation. No rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathTransform {
    scale: DVec2,
    offset: DVec2,
}

impl PathTransform {
    /// Shape space: guides are already in box units, only the origin moves.
    pub fn shape(bbox: &BoundingBox) -> Self {
        Self {
            scale: DVec2::ONE,
            offset: bbox.origin(),
        }
    }

    /// Path space of a path authored at `nominal` size (zero = undeclared).
    ///
    /// A zero nominal dimension keeps scale 1 on that axis, so a path without
    /// a declared size is interpreted in shape space and nothing ever divides
    /// by zero.
    pub fn for_path(nominal: DVec2, bbox: &BoundingBox) -> Self {
        Self {
            scale: dvec2(
                axis_scale(bbox.width, nominal.x),
                axis_scale(bbox.height, nominal.y),
            ),
            offset: bbox.origin(),
        }
    }

    #[inline]
    pub fn apply(&self, p: DVec2) -> DVec2 {
        p * self.scale + self.offset
    }

    /// Scale a pair of radii (no translation)
    #[inline]
    pub fn scale_radii(&self, radii: DVec2) -> DVec2 {
        (radii * self.scale).abs()
    }

    pub fn scale(&self) -> DVec2 {
        self.scale
    }
}

fn axis_scale(target: f64, nominal: f64) -> f64 {
    if nominal == 0.0 { 1.0 } else { target / nominal }
}
