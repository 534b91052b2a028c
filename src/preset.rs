//! Preset definitions: the deserialized source form and the compiled form
//!
//! A [`PresetSource`] is what the document layer hands over: names and
//! formula text. [`PresetDefinition::compile`] parses every formula and
//! reference once and replaces each name with a slot index into the value
//! table, so evaluation never looks a name up and never fails.
//!
//! Slot layout of a value table:
//!
//! | slots                    | contents                          |
//! |--------------------------|-----------------------------------|
//! | `0..BUILTIN_COUNT`       | builtins (`w`, `hc`, `cd4`, ...)  |
//! | next `adjust_values.len()` | adjustable values               |
//! | next `guides.len()`      | guides, in declaration order      |

use std::collections::HashMap;

use glam::{DVec2, dvec2};
use miette::NamedSource;

use crate::ast::{Arg, Formula, Operand};
use crate::engine::builtins::{BUILTIN_COUNT, Builtin};
use crate::engine::outline::FillMode;
use crate::engine::segments::{
    ArcTo, Close, CubicBezTo, LineTo, MoveTo, PathCommand, PointRef, QuadBezTo,
};
use crate::errors::{FormulaError, PresetError};
use crate::parse::{parse_formula, parse_reference};

// ============================================================================
// Source form
// ============================================================================

/// Adjustable-value declaration
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustSource {
    pub name: String,
    pub default: f64,
    /// Declared `(min, max)`; inferred from handles when absent
    pub range: Option<(f64, f64)>,
}

/// Guide declaration: name plus formula text
#[derive(Debug, Clone, PartialEq)]
pub struct GuideSource {
    pub name: String,
    pub formula: String,
}

/// A pair of references (literal or name)
#[derive(Debug, Clone, PartialEq)]
pub struct PointSource {
    pub x: String,
    pub y: String,
}

impl PointSource {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandSource {
    MoveTo(PointSource),
    LineTo(PointSource),
    QuadBezTo(PointSource, PointSource),
    CubicBezTo(PointSource, PointSource, PointSource),
    ArcTo {
        w_r: String,
        h_r: String,
        st_ang: String,
        sw_ang: String,
    },
    Close,
}

/// One path: optional nominal size, fill/stroke flags and commands
#[derive(Debug, Clone, PartialEq)]
pub struct PathSource {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub fill: FillMode,
    pub stroke: bool,
    pub commands: Vec<CommandSource>,
}

impl Default for PathSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PathSource {
    pub fn new() -> Self {
        Self {
            width: None,
            height: None,
            fill: FillMode::Norm,
            stroke: true,
            commands: Vec::new(),
        }
    }

    /// Declare the nominal path-space size
    pub fn sized(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn fill(mut self, fill: FillMode) -> Self {
        self.fill = fill;
        self
    }

    pub fn no_stroke(mut self) -> Self {
        self.stroke = false;
        self
    }

    pub fn move_to(mut self, x: &str, y: &str) -> Self {
        self.commands.push(CommandSource::MoveTo(PointSource::new(x, y)));
        self
    }

    pub fn line_to(mut self, x: &str, y: &str) -> Self {
        self.commands.push(CommandSource::LineTo(PointSource::new(x, y)));
        self
    }

    pub fn quad_to(mut self, ctrl: (&str, &str), to: (&str, &str)) -> Self {
        self.commands.push(CommandSource::QuadBezTo(
            PointSource::new(ctrl.0, ctrl.1),
            PointSource::new(to.0, to.1),
        ));
        self
    }

    pub fn cubic_to(mut self, ctrl1: (&str, &str), ctrl2: (&str, &str), to: (&str, &str)) -> Self {
        self.commands.push(CommandSource::CubicBezTo(
            PointSource::new(ctrl1.0, ctrl1.1),
            PointSource::new(ctrl2.0, ctrl2.1),
            PointSource::new(to.0, to.1),
        ));
        self
    }

    pub fn arc_to(mut self, w_r: &str, h_r: &str, st_ang: &str, sw_ang: &str) -> Self {
        self.commands.push(CommandSource::ArcTo {
            w_r: w_r.to_string(),
            h_r: h_r.to_string(),
            st_ang: st_ang.to_string(),
            sw_ang: sw_ang.to_string(),
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.commands.push(CommandSource::Close);
        self
    }
}

/// Connection site: angle reference and position
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSource {
    pub angle: String,
    pub pos: PointSource,
}

/// One draggable axis of a handle: the adjustable value it writes and its range
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSource {
    pub target: String,
    pub min: String,
    pub max: String,
}

impl AxisSource {
    pub fn new(target: &str, min: &str, max: &str) -> Self {
        Self {
            target: target.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HandleSource {
    Xy {
        x: Option<AxisSource>,
        y: Option<AxisSource>,
        pos: PointSource,
    },
    Polar {
        radius: Option<AxisSource>,
        angle: Option<AxisSource>,
        pos: PointSource,
    },
}

impl HandleSource {
    pub fn xy(x: &str, y: &str) -> Self {
        HandleSource::Xy {
            x: None,
            y: None,
            pos: PointSource::new(x, y),
        }
    }

    pub fn polar(x: &str, y: &str) -> Self {
        HandleSource::Polar {
            radius: None,
            angle: None,
            pos: PointSource::new(x, y),
        }
    }

    /// Horizontal axis of an XY handle, or the radial axis of a polar one
    pub fn first_axis(mut self, target: &str, min: &str, max: &str) -> Self {
        let axis = Some(AxisSource::new(target, min, max));
        match &mut self {
            HandleSource::Xy { x, .. } => *x = axis,
            HandleSource::Polar { radius, .. } => *radius = axis,
        }
        self
    }

    /// Vertical axis of an XY handle, or the angular axis of a polar one
    pub fn second_axis(mut self, target: &str, min: &str, max: &str) -> Self {
        let axis = Some(AxisSource::new(target, min, max));
        match &mut self {
            HandleSource::Xy { y, .. } => *y = axis,
            HandleSource::Polar { angle, .. } => *angle = axis,
        }
        self
    }
}

/// A complete preset as delivered by the document layer
#[derive(Debug, Clone, PartialEq)]
pub struct PresetSource {
    pub name: String,
    pub adjust_values: Vec<AdjustSource>,
    pub guides: Vec<GuideSource>,
    /// left, top, right, bottom
    pub text_rect: Option<[String; 4]>,
    pub paths: Vec<PathSource>,
    pub connections: Vec<ConnectionSource>,
    pub handles: Vec<HandleSource>,
}

impl PresetSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            adjust_values: Vec::new(),
            guides: Vec::new(),
            text_rect: None,
            paths: Vec::new(),
            connections: Vec::new(),
            handles: Vec::new(),
        }
    }

    pub fn adjust(mut self, name: &str, default: f64) -> Self {
        self.adjust_values.push(AdjustSource {
            name: name.to_string(),
            default,
            range: None,
        });
        self
    }

    pub fn adjust_in(mut self, name: &str, default: f64, min: f64, max: f64) -> Self {
        self.adjust_values.push(AdjustSource {
            name: name.to_string(),
            default,
            range: Some((min, max)),
        });
        self
    }

    pub fn guide(mut self, name: &str, formula: &str) -> Self {
        self.guides.push(GuideSource {
            name: name.to_string(),
            formula: formula.to_string(),
        });
        self
    }

    pub fn text_rect(mut self, l: &str, t: &str, r: &str, b: &str) -> Self {
        self.text_rect = Some([l, t, r, b].map(str::to_string));
        self
    }

    pub fn path(mut self, path: PathSource) -> Self {
        self.paths.push(path);
        self
    }

    pub fn connection(mut self, angle: &str, x: &str, y: &str) -> Self {
        self.connections.push(ConnectionSource {
            angle: angle.to_string(),
            pos: PointSource::new(x, y),
        });
        self
    }

    pub fn handle(mut self, handle: HandleSource) -> Self {
        self.handles.push(handle);
        self
    }
}

// ============================================================================
// Compiled form
// ============================================================================

/// Closed interval used for clamping; always `min <= max`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const UNBOUNDED: Range = Range {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    /// Interval between `a` and `b`, in either order
    pub fn new(a: f64, b: f64) -> Self {
        Range {
            min: a.min(b),
            max: a.max(b),
        }
    }

    #[inline]
    pub fn clamp(&self, v: f64) -> f64 {
        self.min.max(v.min(self.max))
    }

    pub fn contains(&self, v: f64) -> bool {
        self.min <= v && v <= self.max
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdjustableValue {
    pub name: String,
    pub default: f64,
    pub range: Range,
}

impl AdjustableValue {
    /// Override (or default) clamped into range. NaN overrides are ignored.
    pub fn effective(&self, value: Option<f64>) -> f64 {
        let value = value.filter(|v| !v.is_nan()).unwrap_or(self.default);
        self.range.clamp(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Guide {
    pub name: String,
    pub formula: Formula<Operand>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionSite {
    /// 60,000ths of a degree
    pub angle: Operand,
    pub position: PointRef,
}

/// An adjustable value written by one handle axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBinding {
    /// Index into the preset's adjustable values
    pub adjust: usize,
    pub min: Operand,
    pub max: Operand,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandleMotion {
    Xy {
        x: Option<AxisBinding>,
        y: Option<AxisBinding>,
    },
    Polar {
        radius: Option<AxisBinding>,
        angle: Option<AxisBinding>,
    },
}

impl HandleMotion {
    /// (x, y) or (radius, angle)
    pub fn axes(&self) -> [Option<&AxisBinding>; 2] {
        match self {
            HandleMotion::Xy { x, y } => [x.as_ref(), y.as_ref()],
            HandleMotion::Polar { radius, angle } => [radius.as_ref(), angle.as_ref()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustHandle {
    pub motion: HandleMotion,
    pub position: PointRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Nominal path-space size; zero on an axis means undeclared
    pub size: DVec2,
    pub fill: FillMode,
    pub stroke: bool,
    pub commands: Vec<PathCommand>,
}

/// Text rectangle corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRect {
    pub top_left: PointRef,
    pub bottom_right: PointRef,
}

/// Immutable, validated preset. Shared between shape instances via `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetDefinition {
    name: String,
    adjust_values: Vec<AdjustableValue>,
    guides: Vec<Guide>,
    text_rect: TextRect,
    paths: Vec<Path>,
    connections: Vec<ConnectionSite>,
    handles: Vec<AdjustHandle>,
}

impl PresetDefinition {
    /// Parse and resolve every formula and reference of `source`.
    ///
    /// Fails on the first malformed formula, unresolved name (including
    /// forward and self references between guides) or handle that writes
    /// something other than an adjustable value.
    pub fn compile(source: &PresetSource) -> Result<Self, PresetError> {
        let mut c = Compiler::new(source);

        let mut guides = Vec::with_capacity(source.guides.len());
        for (k, g) in source.guides.iter().enumerate() {
            let formula = c
                .formula(&g.formula)
                .map_err(|e| c.malformed(format!("guide `{}`", g.name), e))?;
            c.scope.insert(g.name.as_str(), c.guide_base + k);
            guides.push(Guide {
                name: g.name.clone(),
                formula,
            });
        }

        let text_rect = match &source.text_rect {
            Some([l, t, r, b]) => {
                let item = || "text rectangle".to_string();
                TextRect {
                    top_left: c
                        .point(&PointSource::new(l.as_str(), t.as_str()))
                        .map_err(|e| c.malformed(item(), e))?,
                    bottom_right: c
                        .point(&PointSource::new(r.as_str(), b.as_str()))
                        .map_err(|e| c.malformed(item(), e))?,
                }
            }
            None => TextRect {
                top_left: PointRef::new(
                    Operand::Slot(Builtin::L.slot()),
                    Operand::Slot(Builtin::T.slot()),
                ),
                bottom_right: PointRef::new(
                    Operand::Slot(Builtin::R.slot()),
                    Operand::Slot(Builtin::B.slot()),
                ),
            },
        };

        let paths = source
            .paths
            .iter()
            .enumerate()
            .map(|(i, p)| c.path(i, p))
            .collect::<Result<Vec<_>, _>>()?;

        let connections = source
            .connections
            .iter()
            .enumerate()
            .map(|(i, cxn)| c.connection(i, cxn))
            .collect::<Result<Vec<_>, _>>()?;

        let handles = source
            .handles
            .iter()
            .enumerate()
            .map(|(i, h)| c.handle(i, h))
            .collect::<Result<Vec<_>, _>>()?;

        let adjust_values = source
            .adjust_values
            .iter()
            .enumerate()
            .map(|(i, av)| AdjustableValue {
                name: av.name.clone(),
                default: av.default,
                range: av
                    .range
                    .map(|(a, b)| Range::new(a, b))
                    .or_else(|| literal_range(&handles, i))
                    .unwrap_or(Range::UNBOUNDED),
            })
            .collect();

        crate::log::debug!(
            preset = %source.name,
            guides = guides.len(),
            paths = paths.len(),
            "compiled preset"
        );

        Ok(PresetDefinition {
            name: source.name.clone(),
            adjust_values,
            guides,
            text_rect,
            paths,
            connections,
            handles,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn adjust_values(&self) -> &[AdjustableValue] {
        &self.adjust_values
    }

    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    pub fn text_rect(&self) -> &TextRect {
        &self.text_rect
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn connections(&self) -> &[ConnectionSite] {
        &self.connections
    }

    pub fn handles(&self) -> &[AdjustHandle] {
        &self.handles
    }

    /// Index of the adjustable value called `name`
    pub fn adjust_index(&self, name: &str) -> Option<usize> {
        self.adjust_values.iter().rposition(|av| av.name == name)
    }

    /// Value-table slot holding the adjustable value at `index`
    pub fn adjust_slot(&self, index: usize) -> usize {
        BUILTIN_COUNT + index
    }

    /// Slot a name resolves to once every guide is defined
    pub fn slot_of(&self, name: &str) -> Option<usize> {
        if let Some(k) = self.guides.iter().rposition(|g| g.name == name) {
            return Some(BUILTIN_COUNT + self.adjust_values.len() + k);
        }
        if let Some(i) = self.adjust_index(name) {
            return Some(self.adjust_slot(i));
        }
        Builtin::from_name(name).map(Builtin::slot)
    }

    /// Size of a value table for this preset
    pub fn slot_count(&self) -> usize {
        BUILTIN_COUNT + self.adjust_values.len() + self.guides.len()
    }
}

/// Range from the first handle axis that writes `adjust` with literal bounds
fn literal_range(handles: &[AdjustHandle], adjust: usize) -> Option<Range> {
    handles
        .iter()
        .flat_map(|h| h.motion.axes())
        .flatten()
        .filter(|axis| axis.adjust == adjust)
        .find_map(|axis| match (axis.min, axis.max) {
            (Operand::Literal(a), Operand::Literal(b)) => Some(Range::new(a, b)),
            _ => None,
        })
}

// ============================================================================
// Name resolution
// ============================================================================

struct Compiler<'s> {
    source: &'s PresetSource,
    /// Visible names; later insertions shadow earlier ones
    scope: HashMap<&'s str, usize>,
    guide_base: usize,
}

impl<'s> Compiler<'s> {
    fn new(source: &'s PresetSource) -> Self {
        let mut scope = HashMap::new();
        for b in Builtin::ALL {
            scope.insert(b.name(), b.slot());
        }
        for (i, av) in source.adjust_values.iter().enumerate() {
            scope.insert(av.name.as_str(), BUILTIN_COUNT + i);
        }
        Self {
            source,
            scope,
            guide_base: BUILTIN_COUNT + source.adjust_values.len(),
        }
    }

    fn malformed(&self, item: String, source: FormulaError) -> PresetError {
        PresetError::MalformedFormula {
            preset: self.source.name.clone(),
            item,
            source,
        }
    }

    fn resolve(&self, arg: Arg, text: &str) -> Result<Operand, FormulaError> {
        match arg {
            Arg::Literal(v) => Ok(Operand::Literal(v)),
            Arg::Name { name, span } => match self.scope.get(name.as_str()) {
                Some(&slot) => Ok(Operand::Slot(slot)),
                None => Err(FormulaError::UnresolvedName {
                    suggestion: self.hint(&name),
                    name,
                    src: NamedSource::new("formula", text.to_string()),
                    span,
                }),
            },
        }
    }

    fn hint(&self, name: &str) -> Option<String> {
        let pos = self.source.guides.iter().position(|g| g.name == name)?;
        Some(format!(
            "`{name}` is guide #{pos}; a guide may only use builtins, \
             adjustable values and guides declared before it"
        ))
    }

    fn formula(&self, text: &str) -> Result<Formula<Operand>, FormulaError> {
        parse_formula(text)?.try_map(|arg| self.resolve(arg, text))
    }

    fn reference(&self, text: &str) -> Result<Operand, FormulaError> {
        let arg = parse_reference(text)?;
        self.resolve(arg, text)
    }

    fn point(&self, p: &PointSource) -> Result<PointRef, FormulaError> {
        Ok(PointRef::new(self.reference(&p.x)?, self.reference(&p.y)?))
    }

    fn path(&self, index: usize, source: &PathSource) -> Result<Path, PresetError> {
        let commands = source
            .commands
            .iter()
            .enumerate()
            .map(|(j, cmd)| {
                self.command(cmd)
                    .map_err(|e| self.malformed(format!("path #{index}, command #{j}"), e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Path {
            size: dvec2(source.width.unwrap_or(0.0), source.height.unwrap_or(0.0)),
            fill: source.fill,
            stroke: source.stroke,
            commands,
        })
    }

    fn command(&self, cmd: &CommandSource) -> Result<PathCommand, FormulaError> {
        Ok(match cmd {
            CommandSource::MoveTo(p) => MoveTo { to: self.point(p)? }.into(),
            CommandSource::LineTo(p) => LineTo { to: self.point(p)? }.into(),
            CommandSource::QuadBezTo(ctrl, to) => QuadBezTo {
                ctrl: self.point(ctrl)?,
                to: self.point(to)?,
            }
            .into(),
            CommandSource::CubicBezTo(ctrl1, ctrl2, to) => CubicBezTo {
                ctrl1: self.point(ctrl1)?,
                ctrl2: self.point(ctrl2)?,
                to: self.point(to)?,
            }
            .into(),
            CommandSource::ArcTo {
                w_r,
                h_r,
                st_ang,
                sw_ang,
            } => ArcTo {
                w_r: self.reference(w_r)?,
                h_r: self.reference(h_r)?,
                st_ang: self.reference(st_ang)?,
                sw_ang: self.reference(sw_ang)?,
            }
            .into(),
            CommandSource::Close => Close.into(),
        })
    }

    fn connection(
        &self,
        index: usize,
        source: &ConnectionSource,
    ) -> Result<ConnectionSite, PresetError> {
        let item = || format!("connection site #{index}");
        Ok(ConnectionSite {
            angle: self.reference(&source.angle).map_err(|e| self.malformed(item(), e))?,
            position: self.point(&source.pos).map_err(|e| self.malformed(item(), e))?,
        })
    }

    fn axis(
        &self,
        index: usize,
        axis: &Option<AxisSource>,
    ) -> Result<Option<AxisBinding>, PresetError> {
        let Some(axis) = axis else {
            return Ok(None);
        };
        let adjust = self
            .source
            .adjust_values
            .iter()
            .rposition(|av| av.name == axis.target)
            .ok_or_else(|| PresetError::InvalidHandleTarget {
                preset: self.source.name.clone(),
                name: axis.target.clone(),
            })?;
        let item = || format!("adjust handle #{index}");
        Ok(Some(AxisBinding {
            adjust,
            min: self.reference(&axis.min).map_err(|e| self.malformed(item(), e))?,
            max: self.reference(&axis.max).map_err(|e| self.malformed(item(), e))?,
        }))
    }

    fn handle(&self, index: usize, source: &HandleSource) -> Result<AdjustHandle, PresetError> {
        let (motion, pos) = match source {
            HandleSource::Xy { x, y, pos } => (
                HandleMotion::Xy {
                    x: self.axis(index, x)?,
                    y: self.axis(index, y)?,
                },
                pos,
            ),
            HandleSource::Polar { radius, angle, pos } => (
                HandleMotion::Polar {
                    radius: self.axis(index, radius)?,
                    angle: self.axis(index, angle)?,
                },
                pos,
            ),
        };
        let position = self
            .point(pos)
            .map_err(|e| self.malformed(format!("adjust handle #{index}"), e))?;
        Ok(AdjustHandle { motion, position })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star4_source() -> PresetSource {
        crate::presets::star4()
    }

    #[test]
    fn compile_assigns_slots_in_order() {
        let def = PresetDefinition::compile(&star4_source()).unwrap();
        assert_eq!(def.slot_of("w"), Some(Builtin::W.slot()));
        assert_eq!(def.slot_of("adj"), Some(BUILTIN_COUNT));
        assert_eq!(def.slot_of("a"), Some(BUILTIN_COUNT + 1));
        assert_eq!(def.slot_of("yAdj"), Some(def.slot_count() - 1));
        assert_eq!(def.slot_of("missing"), None);
    }

    #[test]
    fn compile_resolves_guide_operands_to_slots() {
        let def = PresetDefinition::compile(&star4_source()).unwrap();
        let a = &def.guides()[0];
        assert_eq!(a.name, "a");
        assert_eq!(
            a.formula,
            Formula::Pin(
                Operand::Literal(0.0),
                Operand::Slot(BUILTIN_COUNT),
                Operand::Literal(50000.0)
            )
        );
    }

    #[test]
    fn forward_reference_is_rejected() {
        let src = PresetSource::new("fwd")
            .guide("g1", "+- g2 0 0")
            .guide("g2", "val 1");
        let err = PresetDefinition::compile(&src).unwrap_err();
        let PresetError::MalformedFormula {
            preset,
            item,
            source,
        } = err
        else {
            panic!("expected MalformedFormula");
        };
        assert_eq!(preset, "fwd");
        assert_eq!(item, "guide `g1`");
        let FormulaError::UnresolvedName {
            name, suggestion, ..
        } = source
        else {
            panic!("expected UnresolvedName");
        };
        assert_eq!(name, "g2");
        assert!(suggestion.unwrap().contains("guide #1"));
    }

    #[test]
    fn builtin_is_visible_until_a_guide_shadows_it() {
        let src = PresetSource::new("shadow-later")
            .guide("before", "+- b 0 0")
            .guide("b", "val 1")
            .guide("after", "+- b 0 0");
        let def = PresetDefinition::compile(&src).unwrap();
        let b_guide = BUILTIN_COUNT + 1;
        assert_eq!(
            def.guides()[0].formula,
            Formula::AddSub(
                Operand::Slot(Builtin::B.slot()),
                Operand::Literal(0.0),
                Operand::Literal(0.0)
            )
        );
        assert_eq!(
            def.guides()[2].formula,
            Formula::AddSub(
                Operand::Slot(b_guide),
                Operand::Literal(0.0),
                Operand::Literal(0.0)
            )
        );
        assert_eq!(def.slot_of("b"), Some(b_guide));
    }

    #[test]
    fn self_reference_is_rejected() {
        let src = PresetSource::new("self").guide("a", "+- a 1 0");
        assert!(matches!(
            PresetDefinition::compile(&src),
            Err(PresetError::MalformedFormula { .. })
        ));
    }

    #[test]
    fn guide_may_shadow_builtin() {
        let src = PresetSource::new("shadow")
            .guide("w", "val 7")
            .guide("x", "+- w 0 0");
        let def = PresetDefinition::compile(&src).unwrap();
        assert_eq!(def.guides()[1].formula, Formula::AddSub(
            Operand::Slot(BUILTIN_COUNT),
            Operand::Literal(0.0),
            Operand::Literal(0.0)
        ));
    }

    #[test]
    fn unresolved_path_reference_names_the_command() {
        let src = PresetSource::new("bad-path")
            .path(PathSource::new().move_to("l", "t").line_to("nowhere", "b"));
        let err = PresetDefinition::compile(&src).unwrap_err();
        assert!(
            err.to_string().contains("path #0, command #1"),
            "{err}"
        );
    }

    #[test]
    fn handle_must_write_an_adjustable_value() {
        let src = PresetSource::new("bad-handle")
            .guide("g", "val 1")
            .handle(HandleSource::xy("l", "t").first_axis("g", "0", "1"));
        assert!(matches!(
            PresetDefinition::compile(&src),
            Err(PresetError::InvalidHandleTarget { name, .. }) if name == "g"
        ));
    }

    #[test]
    fn range_is_inferred_from_literal_handle_bounds() {
        let def = PresetDefinition::compile(&star4_source()).unwrap();
        assert_eq!(def.adjust_values()[0].range, Range::new(0.0, 50000.0));
    }

    #[test]
    fn declared_range_wins_and_guide_bounds_are_not_inferred() {
        let src = PresetSource::new("ranges")
            .adjust_in("a1", 5.0, 0.0, 10.0)
            .adjust("a2", 5.0)
            .guide("hi", "val 20")
            .handle(
                HandleSource::xy("l", "t")
                    .first_axis("a1", "0", "99")
                    .second_axis("a2", "0", "hi"),
            );
        let def = PresetDefinition::compile(&src).unwrap();
        assert_eq!(def.adjust_values()[0].range, Range::new(0.0, 10.0));
        assert_eq!(def.adjust_values()[1].range, Range::UNBOUNDED);
    }

    #[test]
    fn missing_text_rect_covers_the_box() {
        let def = PresetDefinition::compile(&PresetSource::new("empty")).unwrap();
        assert_eq!(def.text_rect().top_left.x, Operand::Slot(Builtin::L.slot()));
        assert_eq!(
            def.text_rect().bottom_right.y,
            Operand::Slot(Builtin::B.slot())
        );
    }

    #[test]
    fn range_clamp_and_order() {
        let r = Range::new(10.0, 0.0);
        assert_eq!(r.min, 0.0);
        assert_eq!(r.clamp(-5.0), 0.0);
        assert_eq!(r.clamp(15.0), 10.0);
        assert_eq!(r.clamp(5.0), 5.0);
        assert!(r.contains(10.0));
        assert_eq!(Range::UNBOUNDED.clamp(1e12), 1e12);
    }

    #[test]
    fn effective_value_ignores_nan() {
        let av = AdjustableValue {
            name: "adj".into(),
            default: 3.0,
            range: Range::new(0.0, 10.0),
        };
        assert_eq!(av.effective(None), 3.0);
        assert_eq!(av.effective(Some(f64::NAN)), 3.0);
        assert_eq!(av.effective(Some(42.0)), 10.0);
    }
}
