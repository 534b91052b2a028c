//! Path builder for preset paths.
//!
//! Tracks the pen in path space while commands are emitted, and writes the
//! transformed commands into an [`OutlinePath`].
//!
//! # Key Concepts
//!
//! - **Pen**: the current point in path space. Arcs are defined relative to
//!   it, so it must be kept untransformed.
//! - **Contour start**: set by `move_to`; `close` returns the pen there
//!   without emitting a coordinate.

use std::f64::consts::TAU;

use glam::{DVec2, dvec2};

use super::outline::{ArcSegment, FillMode, OutlineCommand, OutlinePath};
use super::transform::PathTransform;
use crate::types::Angle;

#[derive(Debug)]
pub struct PathBuilder {
    transform: PathTransform,
    /// Current point, path space
    pen: DVec2,
    /// Start of the current contour, path space
    contour_start: DVec2,
    commands: Vec<OutlineCommand>,
}

impl PathBuilder {
    /// Create a builder with the pen at the path-space origin.
    pub fn new(transform: PathTransform) -> Self {
        Self {
            transform,
            pen: DVec2::ZERO,
            contour_start: DVec2::ZERO,
            commands: Vec::new(),
        }
    }

    /// Current pen position in path space
    pub fn pen(&self) -> DVec2 {
        self.pen
    }

    pub fn move_to(&mut self, p: DVec2) {
        self.pen = p;
        self.contour_start = p;
        self.commands.push(OutlineCommand::MoveTo(self.transform.apply(p)));
    }

    pub fn line_to(&mut self, p: DVec2) {
        self.pen = p;
        self.commands.push(OutlineCommand::LineTo(self.transform.apply(p)));
    }

    pub fn quad_to(&mut self, ctrl: DVec2, to: DVec2) {
        self.pen = to;
        self.commands.push(OutlineCommand::QuadTo {
            ctrl: self.transform.apply(ctrl),
            to: self.transform.apply(to),
        });
    }

    pub fn cubic_to(&mut self, ctrl1: DVec2, ctrl2: DVec2, to: DVec2) {
        self.pen = to;
        self.commands.push(OutlineCommand::CubicTo {
            ctrl1: self.transform.apply(ctrl1),
            ctrl2: self.transform.apply(ctrl2),
            to: self.transform.apply(to),
        });
    }

    /// Elliptical arc starting at the pen.
    ///
    /// `start` and `sweep` are visual angles: the pen lies on the ellipse in
    /// direction `start` from its centre, and the arc ends in direction
    /// `start + sweep`. Positive sweeps run clockwise (y down).
    pub fn arc_to(&mut self, radii: DVec2, start: Angle, sweep: Angle) {
        let radii = radii.abs();
        let st = start.radians();
        let sw = sweep.radians();

        let t1 = parametric_angle(radii, st);
        let t2 = parametric_angle(radii, st + sw);
        // Visual and parametric angles agree on every quadrant boundary, so
        // the parametric sweep is the whole-turn shift of t2 - t1 closest to sw.
        let mut dt = t2 - t1;
        dt += ((sw - dt) / TAU).round() * TAU;

        let center = self.pen - on_ellipse(radii, t1);
        let end = center + on_ellipse(radii, t1 + dt);

        self.commands.push(OutlineCommand::ArcTo(ArcSegment {
            center: self.transform.apply(center),
            radii: self.transform.scale_radii(radii),
            start_angle: t1.to_degrees(),
            sweep_angle: dt.to_degrees(),
            to: self.transform.apply(end),
        }));
        self.pen = end;
    }

    /// End the current contour. No coordinate is emitted.
    pub fn close(&mut self) {
        self.commands.push(OutlineCommand::Close);
        self.pen = self.contour_start;
    }

    pub fn finish(self, fill: FillMode, stroke: bool) -> OutlinePath {
        OutlinePath {
            fill,
            stroke,
            commands: self.commands,
        }
    }
}

/// Parametric angle of the ellipse point lying in direction `visual`.
fn parametric_angle(radii: DVec2, visual: f64) -> f64 {
    (radii.x * visual.sin()).atan2(radii.y * visual.cos())
}

fn on_ellipse(radii: DVec2, t: f64) -> DVec2 {
    dvec2(radii.x * t.cos(), radii.y * t.sin())
}
