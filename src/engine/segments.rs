//! Compiled path commands
//!
//! Each command is its own type that knows how to resolve its operands
//! against a value table and feed the path builder. `PathCommand` dispatches
//! over them without boxing.

use enum_dispatch::enum_dispatch;
use glam::{DVec2, dvec2};

use super::path_builder::PathBuilder;
use crate::ast::Operand;
use crate::types::Angle;

/// A coordinate pair of resolved operands
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointRef {
    pub x: Operand,
    pub y: Operand,
}

impl PointRef {
    pub fn new(x: Operand, y: Operand) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn resolve(&self, values: &[f64]) -> DVec2 {
        dvec2(self.x.value(values), self.y.value(values))
    }
}

/// Common behavior for all path commands
#[enum_dispatch]
pub trait Segment {
    /// Resolve operands against `values` and append to `builder`
    fn emit(&self, values: &[f64], builder: &mut PathBuilder);
}

/// Start a new contour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveTo {
    pub to: PointRef,
}

impl Segment for MoveTo {
    fn emit(&self, values: &[f64], builder: &mut PathBuilder) {
        builder.move_to(self.to.resolve(values));
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineTo {
    pub to: PointRef,
}

impl Segment for LineTo {
    fn emit(&self, values: &[f64], builder: &mut PathBuilder) {
        builder.line_to(self.to.resolve(values));
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadBezTo {
    pub ctrl: PointRef,
    pub to: PointRef,
}

impl Segment for QuadBezTo {
    fn emit(&self, values: &[f64], builder: &mut PathBuilder) {
        builder.quad_to(self.ctrl.resolve(values), self.to.resolve(values));
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezTo {
    pub ctrl1: PointRef,
    pub ctrl2: PointRef,
    pub to: PointRef,
}

impl Segment for CubicBezTo {
    fn emit(&self, values: &[f64], builder: &mut PathBuilder) {
        builder.cubic_to(
            self.ctrl1.resolve(values),
            self.ctrl2.resolve(values),
            self.to.resolve(values),
        );
    }
}

/// Elliptical arc from the pen: radii, start angle and sweep angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcTo {
    pub w_r: Operand,
    pub h_r: Operand,
    pub st_ang: Operand,
    pub sw_ang: Operand,
}

impl Segment for ArcTo {
    fn emit(&self, values: &[f64], builder: &mut PathBuilder) {
        builder.arc_to(
            dvec2(self.w_r.value(values), self.h_r.value(values)),
            Angle(self.st_ang.value(values)),
            Angle(self.sw_ang.value(values)),
        );
    }
}

/// End the current contour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Close;

impl Segment for Close {
    fn emit(&self, _values: &[f64], builder: &mut PathBuilder) {
        builder.close();
    }
}

/// Any path command
#[enum_dispatch(Segment)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo,
    LineTo,
    QuadBezTo,
    CubicBezTo,
    ArcTo,
    Close,
}
