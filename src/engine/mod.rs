//! Preset evaluation and geometry construction
//!
//! `evaluate` turns a definition, a box and adjustments into a value table;
//! `build` turns that table into absolute geometry. Both are pure.

pub mod builtins;
pub mod defaults;
pub mod eval;
pub mod handles;
pub mod outline;
pub mod path_builder;
pub mod segments;
pub mod transform;

use glam::DVec2;

pub use builtins::Builtin;
pub use eval::{Adjustments, ValueTable, evaluate, evaluate_into};
pub use handles::{HandleAxis, HandleDescriptor, HandleKind};
pub use outline::{ArcSegment, FillMode, Outline, OutlineCommand, OutlinePath};
pub use path_builder::PathBuilder;
pub use segments::{PathCommand, PointRef, Segment};
pub use transform::PathTransform;

use crate::preset::PresetDefinition;
use crate::types::{Angle, BoundingBox, Bounds};

/// Attachment point for connectors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionPoint {
    pub index: usize,
    pub position: DVec2,
    /// Direction a connector leaves in, degrees clockwise from +x
    pub angle: f64,
}

/// Everything a preset produces for one box and set of adjustments
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeGeometry {
    pub outline: Outline,
    pub connections: Vec<ConnectionPoint>,
    pub handles: Vec<HandleDescriptor>,
    pub text_rect: Bounds,
}

/// Project an evaluated value table into absolute geometry
pub fn build(def: &PresetDefinition, values: &ValueTable, bbox: &BoundingBox) -> ShapeGeometry {
    let slots = values.as_slice();
    let shape = PathTransform::shape(bbox);

    let paths = def
        .paths()
        .iter()
        .map(|path| {
            let mut builder = PathBuilder::new(PathTransform::for_path(path.size, bbox));
            for cmd in &path.commands {
                cmd.emit(slots, &mut builder);
            }
            builder.finish(path.fill, path.stroke)
        })
        .collect();

    let connections = def
        .connections()
        .iter()
        .enumerate()
        .map(|(index, site)| ConnectionPoint {
            index,
            position: shape.apply(site.position.resolve(slots)),
            angle: Angle(values.get(site.angle)).degrees(),
        })
        .collect();

    let text = def.text_rect();
    let text_rect = Bounds::from_corners(
        shape.apply(text.top_left.resolve(slots)),
        shape.apply(text.bottom_right.resolve(slots)),
    );

    ShapeGeometry {
        outline: Outline { paths },
        connections,
        handles: handles::describe(def, values, &shape),
        text_rect,
    }
}

/// `evaluate` followed by `build`
pub fn materialize(
    def: &PresetDefinition,
    bbox: &BoundingBox,
    adjustments: &Adjustments,
) -> ShapeGeometry {
    build(def, &evaluate(def, bbox, adjustments), bbox)
}
