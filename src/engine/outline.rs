//! Materialized geometry handed to the rendering layer
//!
//! Everything here is in absolute target-box coordinates.

use std::fmt::Write as _;

use glam::{DVec2, dvec2};

use super::defaults::SVG_FULL_SWEEP_DEGREES;
use crate::types::Bounds;

/// How a path is filled (DrawingML `ST_PathFillMode`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    None,
    #[default]
    Norm,
    Lighten,
    LightenLess,
    Darken,
    DarkenLess,
}

/// Elliptical arc in absolute coordinates.
///
/// Angles are parametric angles of the ellipse in degrees, measured
/// clockwise from the positive x axis (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    pub center: DVec2,
    pub radii: DVec2,
    pub start_angle: f64,
    pub sweep_angle: f64,
    /// Where the arc ends; the pen position afterwards
    pub to: DVec2,
}

impl ArcSegment {
    /// Point on the ellipse at a parametric angle in degrees
    pub fn point_at(&self, degrees: f64) -> DVec2 {
        let t = degrees.to_radians();
        self.center + dvec2(self.radii.x * t.cos(), self.radii.y * t.sin())
    }
}

/// One drawing command of the outline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutlineCommand {
    MoveTo(DVec2),
    LineTo(DVec2),
    QuadTo { ctrl: DVec2, to: DVec2 },
    CubicTo {
        ctrl1: DVec2,
        ctrl2: DVec2,
        to: DVec2,
    },
    ArcTo(ArcSegment),
    Close,
}

impl OutlineCommand {
    /// Points this command contributes to the bounds (control points included)
    fn points(&self) -> impl Iterator<Item = DVec2> {
        let pts: [Option<DVec2>; 3] = match *self {
            OutlineCommand::MoveTo(p) | OutlineCommand::LineTo(p) => [Some(p), None, None],
            OutlineCommand::QuadTo { ctrl, to } => [Some(ctrl), Some(to), None],
            OutlineCommand::CubicTo { ctrl1, ctrl2, to } => [Some(ctrl1), Some(ctrl2), Some(to)],
            OutlineCommand::ArcTo(arc) => [
                Some(arc.center - arc.radii),
                Some(arc.center + arc.radii),
                None,
            ],
            OutlineCommand::Close => [None, None, None],
        };
        pts.into_iter().flatten()
    }
}

/// One path of the preset, materialized
#[derive(Debug, Clone, PartialEq)]
pub struct OutlinePath {
    pub fill: FillMode,
    pub stroke: bool,
    pub commands: Vec<OutlineCommand>,
}

impl OutlinePath {
    /// Number of contours (each `MoveTo` starts one)
    pub fn contour_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, OutlineCommand::MoveTo(_)))
            .count()
    }
}

/// The full outline: every path of the preset, in declaration order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outline {
    pub paths: Vec<OutlinePath>,
}

impl Outline {
    /// All commands of all paths, in order
    pub fn commands(&self) -> impl Iterator<Item = &OutlineCommand> {
        self.paths.iter().flat_map(|p| p.commands.iter())
    }

    /// Bounds of every emitted point; arcs contribute their full ellipse box.
    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::new();
        for point in self.commands().flat_map(OutlineCommand::points) {
            bounds.expand_point(point);
        }
        bounds
    }

    /// SVG path data for the whole outline (all paths concatenated).
    pub fn to_svg_path_data(&self) -> String {
        let mut out = String::new();
        for path in &self.paths {
            write_path_data(&mut out, &path.commands);
        }
        out
    }
}

fn num(v: f64) -> String {
    // Avoid "-0" in output
    let v = if v == 0.0 { 0.0 } else { v };
    format!("{v}")
}

fn pt(p: DVec2) -> String {
    format!("{},{}", num(p.x), num(p.y))
}

fn write_path_data(out: &mut String, commands: &[OutlineCommand]) {
    for cmd in commands {
        if !out.is_empty() {
            out.push(' ');
        }
        // Writing into a String cannot fail
        let _ = match *cmd {
            OutlineCommand::MoveTo(p) => write!(out, "M{}", pt(p)),
            OutlineCommand::LineTo(p) => write!(out, "L{}", pt(p)),
            OutlineCommand::QuadTo { ctrl, to } => write!(out, "Q{} {}", pt(ctrl), pt(to)),
            OutlineCommand::CubicTo { ctrl1, ctrl2, to } => {
                write!(out, "C{} {} {}", pt(ctrl1), pt(ctrl2), pt(to))
            }
            OutlineCommand::ArcTo(arc) => write_arc(out, &arc),
            OutlineCommand::Close => write!(out, "Z"),
        };
    }
}

fn write_arc(out: &mut String, arc: &ArcSegment) -> std::fmt::Result {
    let sweep_flag = u8::from(arc.sweep_angle > 0.0);
    let radii = format!("{},{}", num(arc.radii.x), num(arc.radii.y));

    // A single SVG arc cannot describe a full turn: go through the midpoint.
    if arc.sweep_angle.abs() >= SVG_FULL_SWEEP_DEGREES {
        let mid = arc.point_at(arc.start_angle + arc.sweep_angle / 2.0);
        let large = u8::from(arc.sweep_angle.abs() / 2.0 > 180.0);
        write!(out, "A{radii} 0 {large} {sweep_flag} {} ", pt(mid))?;
        return write!(out, "A{radii} 0 {large} {sweep_flag} {}", pt(arc.to));
    }

    let large = u8::from(arc.sweep_angle.abs() > 180.0);
    write!(out, "A{radii} 0 {large} {sweep_flag} {}", pt(arc.to))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Outline {
        Outline {
            paths: vec![OutlinePath {
                fill: FillMode::Norm,
                stroke: true,
                commands: vec![
                    OutlineCommand::MoveTo(dvec2(0.0, 0.0)),
                    OutlineCommand::LineTo(dvec2(10.0, 0.0)),
                    OutlineCommand::LineTo(dvec2(10.0, 10.0)),
                    OutlineCommand::LineTo(dvec2(0.0, 10.0)),
                    OutlineCommand::Close,
                ],
            }],
        }
    }

    #[test]
    fn svg_path_data_for_square() {
        assert_eq!(square().to_svg_path_data(), "M0,0 L10,0 L10,10 L0,10 Z");
    }

    #[test]
    fn bounds_cover_points() {
        let b = square().bounds();
        assert_eq!(b.min, dvec2(0.0, 0.0));
        assert_eq!(b.max, dvec2(10.0, 10.0));
    }

    #[test]
    fn negative_zero_is_printed_as_zero() {
        assert_eq!(num(-0.0), "0");
        assert_eq!(num(-1.5), "-1.5");
    }

    #[test]
    fn quarter_arc_path_data() {
        let arc = ArcSegment {
            center: dvec2(10.0, 10.0),
            radii: dvec2(10.0, 10.0),
            start_angle: 180.0,
            sweep_angle: 90.0,
            to: dvec2(10.0, 0.0),
        };
        let mut out = String::new();
        write_arc(&mut out, &arc).unwrap();
        assert_eq!(out, "A10,10 0 0 1 10,0");
    }

    #[test]
    fn full_turn_arc_is_split() {
        let arc = ArcSegment {
            center: dvec2(0.0, 0.0),
            radii: dvec2(5.0, 5.0),
            start_angle: 0.0,
            sweep_angle: 360.0,
            to: dvec2(5.0, 0.0),
        };
        let mut out = String::new();
        write_arc(&mut out, &arc).unwrap();
        assert_eq!(out.matches('A').count(), 2);
        assert!(out.ends_with("A5,5 0 0 1 5,0"), "{out}");
    }

    #[test]
    fn contour_count_counts_moves() {
        let mut outline = square();
        outline.paths[0].commands.push(OutlineCommand::MoveTo(dvec2(2.0, 2.0)));
        outline.paths[0].commands.push(OutlineCommand::LineTo(dvec2(3.0, 3.0)));
        assert_eq!(outline.paths[0].contour_count(), 2);
    }
}
