//! Formula engine for DrawingML-style preset shape geometry.
//!
//! A preset describes a shape as data: adjustable values, guides written as
//! prefix formulas (`"*/ wd2 a 50000"`), paths, connection sites, adjust
//! handles and a text rectangle. This crate compiles such a description once
//! and evaluates it against any target box.
//!
//! ```
//! use prstgeom::{BoundingBox, PresetRegistry, ShapeInstance};
//!
//! let bbox = BoundingBox::try_new(0.0, 0.0, 100.0, 80.0).unwrap();
//! let mut shape =
//!     ShapeInstance::from_registry(PresetRegistry::builtin(), "triangle", bbox).unwrap();
//! assert_eq!(shape.geometry().outline.to_svg_path_data(), "M0,80 L50,0 L100,80 Z");
//! ```

use pest_derive::Parser;

pub mod ast;
pub mod engine;
pub mod errors;
pub mod log;
pub mod parse;
pub mod preset;
pub mod presets;
pub mod registry;
pub mod shape;
pub mod types;

#[derive(Parser)]
#[grammar = "formula.pest"]
pub struct FormulaParser;

pub use engine::{
    Adjustments, ConnectionPoint, FillMode, HandleDescriptor, HandleKind, Outline, OutlineCommand,
    ShapeGeometry, ValueTable, build, evaluate, materialize,
};
pub use errors::{FormulaError, PresetError};
pub use parse::{parse_formula, parse_reference};
pub use preset::{PathSource, PresetDefinition, PresetSource};
pub use registry::PresetRegistry;
pub use shape::ShapeInstance;
pub use types::{Angle, BoundingBox, Bounds, NumericError};

#[cfg(test)]
mod tests {
    use super::*;
    use pest::Parser;

    #[test]
    fn grammar_accepts_ternary() {
        let result = FormulaParser::parse(Rule::formula, "*/ wd2 a 50000");
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
    }

    #[test]
    fn grammar_accepts_builtin_angle_name() {
        let result = FormulaParser::parse(Rule::formula, "+- 3cd4 cd8 0");
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
    }

    #[test]
    fn grammar_rejects_missing_operand() {
        assert!(FormulaParser::parse(Rule::formula, "cos 10").is_err());
    }

    #[test]
    fn grammar_accepts_reference() {
        for text in ["hc", "21600", "-5", "3cd4"] {
            let result = FormulaParser::parse(Rule::reference, text);
            assert!(result.is_ok(), "{text}: {:?}", result.err());
        }
    }

    #[test]
    fn grammar_rejects_two_references() {
        assert!(FormulaParser::parse(Rule::reference, "hc vc").is_err());
    }

    #[test]
    fn shared_types_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PresetDefinition>();
        assert_send_sync::<ShapeGeometry>();
        assert_send_sync::<ShapeInstance>();
        assert_send_sync::<PresetRegistry>();
    }
}
