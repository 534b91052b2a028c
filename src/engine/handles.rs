//! Adjust-handle descriptors for the editing layer

use glam::DVec2;

use super::eval::ValueTable;
use super::transform::PathTransform;
use crate::preset::{AxisBinding, HandleMotion, PresetDefinition, Range};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Xy,
    Polar,
}

/// One adjustable value a handle writes, with its current value and range
#[derive(Debug, Clone, PartialEq)]
pub struct HandleAxis {
    pub adjust: String,
    pub adjust_index: usize,
    pub value: f64,
    /// Evaluated handle range intersected with the declared range
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandleDescriptor {
    pub index: usize,
    pub kind: HandleKind,
    /// Absolute position in the target box
    pub position: DVec2,
    /// x / y for `Xy`, radius / angle for `Polar`
    pub axes: [Option<HandleAxis>; 2],
}

impl HandleDescriptor {
    /// Axes that write a value, in order
    pub fn writable(&self) -> impl Iterator<Item = &HandleAxis> {
        self.axes.iter().flatten()
    }
}

/// Range an axis may move in: the evaluated bounds clamped by the declared range
pub(crate) fn axis_range(
    def: &PresetDefinition,
    binding: &AxisBinding,
    values: &ValueTable,
) -> Range {
    let handle = Range::new(values.get(binding.min), values.get(binding.max));
    let declared = def.adjust_values()[binding.adjust].range;
    let min = declared.clamp(handle.min);
    let max = declared.clamp(handle.max);
    Range { min, max }
}

/// Describe every handle of `def` at its evaluated position
pub fn describe(
    def: &PresetDefinition,
    values: &ValueTable,
    transform: &PathTransform,
) -> Vec<HandleDescriptor> {
    def.handles()
        .iter()
        .enumerate()
        .map(|(index, handle)| {
            let kind = match handle.motion {
                HandleMotion::Xy { .. } => HandleKind::Xy,
                HandleMotion::Polar { .. } => HandleKind::Polar,
            };
            let axes = handle.motion.axes().map(|binding| {
                binding.map(|b| HandleAxis {
                    adjust: def.adjust_values()[b.adjust].name.clone(),
                    adjust_index: b.adjust,
                    value: values.as_slice()[def.adjust_slot(b.adjust)],
                    range: axis_range(def, b, values),
                })
            });
            HandleDescriptor {
                index,
                kind,
                position: transform.apply(handle.position.resolve(values.as_slice())),
                axes,
            }
        })
        .collect()
}
