//! A preset placed in a box, with its own adjustments and cached geometry

use std::sync::Arc;

use crate::engine::eval::{Adjustments, ValueTable, evaluate_into, unknown_adjustment};
use crate::engine::handles::axis_range;
use crate::engine::{ShapeGeometry, build};
use crate::errors::PresetError;
use crate::preset::PresetDefinition;
use crate::registry::PresetRegistry;
use crate::types::BoundingBox;

#[derive(Debug)]
struct Cached {
    values: ValueTable,
    geometry: Arc<ShapeGeometry>,
}

/// One shape on a slide or canvas.
///
/// Geometry is recomputed lazily: mutators only mark the cache stale, and
/// [`geometry`](Self::geometry) rebuilds it on the next read. Callers holding
/// an earlier `Arc<ShapeGeometry>` keep a complete snapshot.
#[derive(Debug)]
pub struct ShapeInstance {
    definition: Arc<PresetDefinition>,
    bbox: BoundingBox,
    adjustments: Adjustments,
    cache: Option<Cached>,
    /// Table kept from the last rebuild so its allocation is reused
    spare: ValueTable,
}

impl ShapeInstance {
    pub fn new(definition: Arc<PresetDefinition>, bbox: BoundingBox) -> Self {
        Self {
            definition,
            bbox,
            adjustments: Adjustments::new(),
            cache: None,
            spare: ValueTable::default(),
        }
    }

    /// Instance of the preset registered as `id`
    pub fn from_registry(
        registry: &PresetRegistry,
        id: &str,
        bbox: BoundingBox,
    ) -> Result<Self, PresetError> {
        Ok(Self::new(registry.lookup(id)?, bbox))
    }

    pub fn definition(&self) -> &Arc<PresetDefinition> {
        &self.definition
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    pub fn set_bounding_box(&mut self, bbox: BoundingBox) {
        if bbox != self.bbox {
            self.bbox = bbox;
            self.invalidate();
        }
    }

    /// Effective value of the adjustable value `name`
    pub fn adjustment(&self, name: &str) -> Result<f64, PresetError> {
        let index = self.adjust_index(name)?;
        Ok(self.effective(index))
    }

    /// Override `name`, clamped into its declared range. NaN restores the default.
    pub fn set_adjustment(&mut self, name: &str, value: f64) -> Result<(), PresetError> {
        let index = self.adjust_index(name)?;
        if value.is_nan() {
            return self.reset_index(index);
        }
        let clamped = self.definition.adjust_values()[index].range.clamp(value);
        self.write(index, clamped);
        Ok(())
    }

    /// Drop the override of `name`
    pub fn reset_adjustment(&mut self, name: &str) -> Result<(), PresetError> {
        let index = self.adjust_index(name)?;
        self.reset_index(index)
    }

    /// Move handle `index` by `(dx, dy)`.
    ///
    /// The delta is in the units of the values the handle writes: for an XY
    /// handle `dx` moves the horizontal value and `dy` the vertical one; for a
    /// polar handle `dx` moves the radius and `dy` the angle. Each result is
    /// clamped into the handle's current range. Axes the handle does not
    /// write ignore their delta.
    pub fn drag_handle(&mut self, index: usize, dx: f64, dy: f64) -> Result<(), PresetError> {
        let definition = Arc::clone(&self.definition);
        let handle = definition
            .handles()
            .get(index)
            .ok_or_else(|| PresetError::UnknownHandle {
                preset: definition.name().to_string(),
                index,
                count: definition.handles().len(),
            })?;

        let values = &self.refresh().values;
        let ranges = handle.motion.axes().map(|axis| {
            axis.map(|axis| (axis.adjust, axis_range(&definition, axis, values)))
        });

        for (axis, delta) in ranges.into_iter().zip([dx, dy]) {
            if let Some((adjust, range)) = axis {
                let value = range.clamp(self.effective(adjust) + delta);
                self.write(adjust, value);
            }
        }
        Ok(())
    }

    /// Current geometry, rebuilt only if something changed since the last call
    pub fn geometry(&mut self) -> Arc<ShapeGeometry> {
        Arc::clone(&self.refresh().geometry)
    }

    pub fn is_stale(&self) -> bool {
        self.cache.is_none()
    }

    fn refresh(&mut self) -> &Cached {
        let Self {
            definition,
            bbox,
            adjustments,
            cache,
            spare,
        } = self;
        cache.get_or_insert_with(|| {
            let mut values = std::mem::take(spare);
            evaluate_into(definition, bbox, adjustments, &mut values);
            let geometry = Arc::new(build(definition, &values, bbox));
            crate::log::debug!(preset = definition.name(), "rebuilt shape geometry");
            Cached { values, geometry }
        })
    }

    fn invalidate(&mut self) {
        if let Some(cached) = self.cache.take() {
            self.spare = cached.values;
        }
    }

    fn adjust_index(&self, name: &str) -> Result<usize, PresetError> {
        self.definition
            .adjust_index(name)
            .ok_or_else(|| unknown_adjustment(&self.definition, name))
    }

    fn effective(&self, index: usize) -> f64 {
        self.definition.adjust_values()[index].effective(self.adjustments.get(index))
    }

    fn write(&mut self, index: usize, value: f64) {
        if self.adjustments.get(index) != Some(value) {
            let before = self.effective(index);
            self.adjustments.set(index, value);
            if self.effective(index) != before {
                self.invalidate();
            }
        }
    }

    fn reset_index(&mut self, index: usize) -> Result<(), PresetError> {
        let before = self.effective(index);
        self.adjustments.clear(index);
        if self.effective(index) != before {
            self.invalidate();
        }
        Ok(())
    }
}
