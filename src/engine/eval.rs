//! Guide evaluation
//!
//! Fills a flat table of values, one slot per builtin, adjustable value and
//! guide, in that order. Guides are evaluated strictly in declaration order,
//! so every slot a guide reads is already final.
//!
//! Evaluation of a compiled definition cannot fail. Arithmetic that has no
//! meaningful result falls back to 0:
//!
//! - `*/` and `+/` with a zero divisor
//! - `sqrt` of a negative number
//! - any guide whose result is NaN or infinite

use super::builtins::{BUILTIN_COUNT, Builtin, push_builtins};
use crate::ast::{Formula, Operand};
use crate::errors::{PresetError, declared_hint};
use crate::preset::PresetDefinition;
use crate::types::{Angle, BoundingBox};

/// Evaluated slots for one (definition, box, adjustments) triple
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueTable {
    values: Vec<f64>,
}

impl ValueTable {
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn get(&self, operand: Operand) -> f64 {
        operand.value(&self.values)
    }

    pub fn slot(&self, slot: usize) -> Option<f64> {
        self.values.get(slot).copied()
    }

    pub fn builtin(&self, builtin: Builtin) -> f64 {
        self.values[builtin.slot()]
    }

    /// Value of `name` as seen after the last guide
    pub fn lookup(&self, def: &PresetDefinition, name: &str) -> Option<f64> {
        def.slot_of(name).and_then(|slot| self.slot(slot))
    }
}

/// Per-instance overrides of a preset's adjustable values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Adjustments {
    overrides: Vec<Option<f64>>,
}

impl Adjustments {
    /// No overrides: every value takes its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Build overrides from `(name, value)` pairs
    pub fn from_named(def: &PresetDefinition, pairs: &[(&str, f64)]) -> Result<Self, PresetError> {
        let mut adj = Self::new();
        for &(name, value) in pairs {
            let index = def
                .adjust_index(name)
                .ok_or_else(|| unknown_adjustment(def, name))?;
            adj.set(index, value);
        }
        Ok(adj)
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.overrides.get(index).copied().flatten()
    }

    /// Override the value at `index`. Clamping happens at evaluation.
    pub fn set(&mut self, index: usize, value: f64) {
        if self.overrides.len() <= index {
            self.overrides.resize(index + 1, None);
        }
        self.overrides[index] = Some(value);
    }

    /// Drop the override at `index`; returns whether one was set
    pub fn clear(&mut self, index: usize) -> bool {
        self.overrides
            .get_mut(index)
            .and_then(Option::take)
            .is_some()
    }
}

pub(crate) fn unknown_adjustment(def: &PresetDefinition, name: &str) -> PresetError {
    PresetError::UnknownAdjustment {
        preset: def.name().to_string(),
        name: name.to_string(),
        suggestion: declared_hint(
            "adjustable values",
            def.adjust_values().iter().map(|av| av.name.as_str()),
        ),
    }
}

/// Evaluate every slot of `def` for `bbox`
pub fn evaluate(
    def: &PresetDefinition,
    bbox: &BoundingBox,
    adjustments: &Adjustments,
) -> ValueTable {
    let mut table = ValueTable::default();
    evaluate_into(def, bbox, adjustments, &mut table);
    table
}

/// Like [`evaluate`], reusing the allocation of `table`
pub fn evaluate_into(
    def: &PresetDefinition,
    bbox: &BoundingBox,
    adjustments: &Adjustments,
    table: &mut ValueTable,
) {
    let values = &mut table.values;
    values.clear();
    values.reserve(def.slot_count());

    push_builtins(values, bbox.width, bbox.height);
    debug_assert_eq!(values.len(), BUILTIN_COUNT);

    for (i, av) in def.adjust_values().iter().enumerate() {
        values.push(av.effective(adjustments.get(i)));
    }

    for guide in def.guides() {
        let v = apply(&guide.formula, values);
        let v = if v.is_finite() {
            v
        } else {
            crate::log::debug!(
                preset = def.name(),
                guide = %guide.name,
                value = v,
                "non-finite guide, using 0"
            );
            0.0
        };
        values.push(v);
    }
}

/// Value of one formula against the slots evaluated so far
pub fn apply(formula: &Formula<Operand>, values: &[f64]) -> f64 {
    let v = |o: &Operand| o.value(values);
    match formula {
        Formula::Val(x) => v(x),
        Formula::Abs(x) => v(x).abs(),
        Formula::Sqrt(x) => {
            let x = v(x);
            if x < 0.0 { 0.0 } else { x.sqrt() }
        }
        Formula::AddSub(x, y, z) => v(x) + v(y) - v(z),
        Formula::MulDiv(x, y, z) => div(v(x) * v(y), v(z)),
        Formula::AddDiv(x, y, z) => div(v(x) + v(y), v(z)),
        Formula::IfElse(x, y, z) => {
            if v(x) > 0.0 {
                v(y)
            } else {
                v(z)
            }
        }
        Formula::Pin(x, y, z) => v(x).max(v(y).min(v(z))),
        Formula::Mod(x, y, z) => {
            let (x, y, z) = (v(x), v(y), v(z));
            (x * x + y * y + z * z).sqrt()
        }
        Formula::Cat2(x, y, z) => v(x) * v(z).atan2(v(y)).cos(),
        Formula::Sat2(x, y, z) => v(x) * v(z).atan2(v(y)).sin(),
        Formula::At2(x, y) => Angle::from_radians(v(y).atan2(v(x))).raw(),
        Formula::Cos(x, y) => v(x) * Angle(v(y)).radians().cos(),
        Formula::Sin(x, y) => v(x) * Angle(v(y)).radians().sin(),
        Formula::Tan(x, y) => v(x) * Angle(v(y)).radians().tan(),
        Formula::Max(x, y) => v(x).max(v(y)),
        Formula::Min(x, y) => v(x).min(v(y)),
    }
}

#[inline]
fn div(n: f64, d: f64) -> f64 {
    if d == 0.0 { 0.0 } else { n / d }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::PresetSource;

    const EPS: f64 = 1e-9;

    fn lit(x: f64) -> Operand {
        Operand::Literal(x)
    }

    fn eval_text(text: &str) -> f64 {
        let f = crate::parse::parse_formula(text)
            .unwrap()
            .try_map(|arg| match arg {
                crate::ast::Arg::Literal(v) => Ok::<_, ()>(lit(v)),
                crate::ast::Arg::Name { .. } => Err(()),
            })
            .unwrap();
        apply(&f, &[])
    }

    fn bbox(w: f64, h: f64) -> BoundingBox {
        BoundingBox::try_new(0.0, 0.0, w, h).unwrap()
    }

    #[test]
    fn operator_values() {
        assert_eq!(eval_text("val 7"), 7.0);
        assert_eq!(eval_text("abs -3"), 3.0);
        assert_eq!(eval_text("sqrt 16"), 4.0);
        assert_eq!(eval_text("+- 1 2 4"), -1.0);
        assert_eq!(eval_text("*/ 6 5 3"), 10.0);
        assert_eq!(eval_text("+/ 6 4 5"), 2.0);
        assert_eq!(eval_text("?: 1 10 20"), 10.0);
        assert_eq!(eval_text("?: 0 10 20"), 20.0);
        assert_eq!(eval_text("?: -1 10 20"), 20.0);
        assert_eq!(eval_text("mod 3 4 0"), 5.0);
        assert_eq!(eval_text("max 3 9"), 9.0);
        assert_eq!(eval_text("min 3 9"), 3.0);
    }

    #[test]
    fn pin_clamps_middle_operand() {
        assert_eq!(eval_text("pin 0 -5 10"), 0.0);
        assert_eq!(eval_text("pin 0 15 10"), 10.0);
        assert_eq!(eval_text("pin 0 5 10"), 5.0);
    }

    #[test]
    fn division_by_zero_yields_zero() {
        assert_eq!(eval_text("*/ 5 5 0"), 0.0);
        assert_eq!(eval_text("+/ 5 5 0"), 0.0);
    }

    #[test]
    fn sqrt_of_negative_yields_zero() {
        assert_eq!(eval_text("sqrt -4"), 0.0);
    }

    #[test]
    fn trig_uses_sixty_thousandths_of_a_degree() {
        assert!((eval_text("cos 10 0") - 10.0).abs() < EPS);
        assert!((eval_text("sin 10 5400000") - 10.0).abs() < EPS);
        assert!(eval_text("cos 10 5400000").abs() < EPS);
        assert!((eval_text("tan 10 2700000") - 10.0).abs() < EPS);
        assert!((eval_text("at2 1 1") - 2_700_000.0).abs() < 1e-6);
        assert!((eval_text("at2 -1 0") - 10_800_000.0).abs() < 1e-6);
    }

    #[test]
    fn cat2_and_sat2_project_onto_direction() {
        assert!((eval_text("cat2 10 3 4") - 6.0).abs() < EPS);
        assert!((eval_text("sat2 10 3 4") - 8.0).abs() < EPS);
    }

    #[test]
    fn guides_see_builtins_and_adjustments() {
        let def = PresetDefinition::compile(
            &PresetSource::new("t")
                .adjust("adj", 25000.0)
                .guide("x1", "*/ w adj 100000")
                .guide("x2", "+- r 0 x1"),
        )
        .unwrap();
        let table = evaluate(&def, &bbox(200.0, 100.0), &Adjustments::new());
        assert_eq!(table.len(), def.slot_count());
        assert_eq!(table.lookup(&def, "x1"), Some(50.0));
        assert_eq!(table.lookup(&def, "x2"), Some(150.0));
        assert_eq!(table.builtin(Builtin::Hc), 100.0);
    }

    #[test]
    fn later_guide_shadows_earlier_one() {
        let def = PresetDefinition::compile(
            &PresetSource::new("t")
                .guide("g", "val 1")
                .guide("h", "+- g 1 0")
                .guide("g", "val 10")
                .guide("k", "+- g 1 0"),
        )
        .unwrap();
        let table = evaluate(&def, &bbox(1.0, 1.0), &Adjustments::new());
        assert_eq!(table.lookup(&def, "h"), Some(2.0));
        assert_eq!(table.lookup(&def, "k"), Some(11.0));
        assert_eq!(table.lookup(&def, "g"), Some(10.0));
    }

    #[test]
    fn overrides_are_clamped_into_range() {
        let def = PresetDefinition::compile(
            &PresetSource::new("t").adjust_in("adj", 10.0, 0.0, 50.0),
        )
        .unwrap();
        let mut adj = Adjustments::new();
        adj.set(0, 80.0);
        assert_eq!(
            evaluate(&def, &bbox(1.0, 1.0), &adj).lookup(&def, "adj"),
            Some(50.0)
        );
        assert!(adj.clear(0));
        assert!(!adj.clear(0));
        assert_eq!(
            evaluate(&def, &bbox(1.0, 1.0), &adj).lookup(&def, "adj"),
            Some(10.0)
        );
    }

    #[test]
    fn overflow_is_replaced_by_zero() {
        let big = "9".repeat(200);
        let def = PresetDefinition::compile(
            &PresetSource::new("t").guide("g", &format!("*/ {big} {big} 1")),
        )
        .unwrap();
        let table = evaluate(&def, &bbox(1.0, 1.0), &Adjustments::new());
        assert_eq!(table.lookup(&def, "g"), Some(0.0));
    }

    #[test]
    fn from_named_rejects_undeclared_names() {
        let def = PresetDefinition::compile(&PresetSource::new("t").adjust("adj", 1.0)).unwrap();
        let err = Adjustments::from_named(&def, &[("nope", 1.0)]).unwrap_err();
        assert!(matches!(
            err,
            PresetError::UnknownAdjustment { ref name, ref suggestion, .. }
                if name == "nope" && suggestion.as_deref() == Some("adjustable values: adj")
        ));
        let adj = Adjustments::from_named(&def, &[("adj", 4.0)]).unwrap();
        assert_eq!(adj.get(0), Some(4.0));
        assert_eq!(adj.get(3), None);
    }

    #[test]
    fn evaluate_into_reuses_table() {
        let def = PresetDefinition::compile(&crate::presets::star4()).unwrap();
        let mut table = evaluate(&def, &bbox(100.0, 100.0), &Adjustments::new());
        evaluate_into(&def, &bbox(200.0, 100.0), &Adjustments::new(), &mut table);
        assert_eq!(
            table,
            evaluate(&def, &bbox(200.0, 100.0), &Adjustments::new())
        );
    }
}
