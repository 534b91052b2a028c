//! Fixed conventions of the preset geometry language

/// Angles are expressed in 60,000ths of a degree.
pub const ANGLE_UNITS_PER_DEGREE: f64 = crate::types::Angle::UNITS_PER_DEGREE;

/// A full turn in angle units.
pub const FULL_TURN: f64 = 360.0 * ANGLE_UNITS_PER_DEGREE;

/// Sweeps at or beyond this many degrees are split in two when written as SVG arcs.
pub const SVG_FULL_SWEEP_DEGREES: f64 = 359.999;
