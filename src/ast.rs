//! Formula syntax tree
//!
//! A formula is one operator with a fixed number of operands. The operand type
//! is a parameter: the parser produces `Formula<Arg>` (names still as text),
//! and preset compilation turns that into `Formula<Operand>` (names replaced
//! by slot indices into the value table).

use miette::SourceSpan;

/// An operand as written in the formula text
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Literal(f64),
    /// A name plus its location in the formula text, for diagnostics
    Name { name: String, span: SourceSpan },
}

/// A resolved operand: a literal or a slot in the value table
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    Literal(f64),
    Slot(usize),
}

impl Operand {
    #[inline]
    pub fn value(self, values: &[f64]) -> f64 {
        match self {
            Operand::Literal(v) => v,
            Operand::Slot(i) => values[i],
        }
    }
}

/// A parsed formula. Variant names follow the operator they stand for.
#[derive(Debug, Clone, PartialEq)]
pub enum Formula<T> {
    /// `val x`
    Val(T),
    /// `abs x`
    Abs(T),
    /// `sqrt x`
    Sqrt(T),
    /// `+- x y z` = x + y - z
    AddSub(T, T, T),
    /// `*/ x y z` = x * y / z
    MulDiv(T, T, T),
    /// `+/ x y z` = (x + y) / z
    AddDiv(T, T, T),
    /// `?: x y z` = x > 0 ? y : z
    IfElse(T, T, T),
    /// `pin x y z` = y clamped into [x, z]
    Pin(T, T, T),
    /// `mod x y z` = sqrt(x² + y² + z²)
    Mod(T, T, T),
    /// `cat2 x y z` = x * cos(atan2(z, y))
    Cat2(T, T, T),
    /// `sat2 x y z` = x * sin(atan2(z, y))
    Sat2(T, T, T),
    /// `at2 x y` = atan2(y, x)
    At2(T, T),
    /// `cos x y` = x * cos(y)
    Cos(T, T),
    /// `sin x y` = x * sin(y)
    Sin(T, T),
    /// `tan x y` = x * tan(y)
    Tan(T, T),
    /// `max x y`
    Max(T, T),
    /// `min x y`
    Min(T, T),
}

impl<T> Formula<T> {
    /// The operator keyword as it appears in formula text
    pub fn operator(&self) -> &'static str {
        match self {
            Formula::Val(..) => "val",
            Formula::Abs(..) => "abs",
            Formula::Sqrt(..) => "sqrt",
            Formula::AddSub(..) => "+-",
            Formula::MulDiv(..) => "*/",
            Formula::AddDiv(..) => "+/",
            Formula::IfElse(..) => "?:",
            Formula::Pin(..) => "pin",
            Formula::Mod(..) => "mod",
            Formula::Cat2(..) => "cat2",
            Formula::Sat2(..) => "sat2",
            Formula::At2(..) => "at2",
            Formula::Cos(..) => "cos",
            Formula::Sin(..) => "sin",
            Formula::Tan(..) => "tan",
            Formula::Max(..) => "max",
            Formula::Min(..) => "min",
        }
    }

    /// Convert every operand, stopping at the first failure.
    ///
    /// Operands are visited left to right.
    pub fn try_map<U, E>(self, mut f: impl FnMut(T) -> Result<U, E>) -> Result<Formula<U>, E> {
        Ok(match self {
            Formula::Val(x) => Formula::Val(f(x)?),
            Formula::Abs(x) => Formula::Abs(f(x)?),
            Formula::Sqrt(x) => Formula::Sqrt(f(x)?),
            Formula::AddSub(x, y, z) => Formula::AddSub(f(x)?, f(y)?, f(z)?),
            Formula::MulDiv(x, y, z) => Formula::MulDiv(f(x)?, f(y)?, f(z)?),
            Formula::AddDiv(x, y, z) => Formula::AddDiv(f(x)?, f(y)?, f(z)?),
            Formula::IfElse(x, y, z) => Formula::IfElse(f(x)?, f(y)?, f(z)?),
            Formula::Pin(x, y, z) => Formula::Pin(f(x)?, f(y)?, f(z)?),
            Formula::Mod(x, y, z) => Formula::Mod(f(x)?, f(y)?, f(z)?),
            Formula::Cat2(x, y, z) => Formula::Cat2(f(x)?, f(y)?, f(z)?),
            Formula::Sat2(x, y, z) => Formula::Sat2(f(x)?, f(y)?, f(z)?),
            Formula::At2(x, y) => Formula::At2(f(x)?, f(y)?),
            Formula::Cos(x, y) => Formula::Cos(f(x)?, f(y)?),
            Formula::Sin(x, y) => Formula::Sin(f(x)?, f(y)?),
            Formula::Tan(x, y) => Formula::Tan(f(x)?, f(y)?),
            Formula::Max(x, y) => Formula::Max(f(x)?, f(y)?),
            Formula::Min(x, y) => Formula::Min(f(x)?, f(y)?),
        })
    }

    /// Number of operands the operator takes
    pub fn arity(&self) -> usize {
        match self {
            Formula::Val(..) | Formula::Abs(..) | Formula::Sqrt(..) => 1,
            Formula::At2(..)
            | Formula::Cos(..)
            | Formula::Sin(..)
            | Formula::Tan(..)
            | Formula::Max(..)
            | Formula::Min(..) => 2,
            _ => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_map_visits_operands_in_order() {
        let f = Formula::AddSub(1, 2, 3);
        let mut seen = Vec::new();
        let mapped: Result<Formula<i32>, ()> = f.try_map(|x| {
            seen.push(x);
            Ok(x * 10)
        });
        assert_eq!(mapped, Ok(Formula::AddSub(10, 20, 30)));
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn try_map_stops_at_first_error() {
        let f = Formula::Pin(0, 5, 10);
        let mut calls = 0;
        let mapped: Result<Formula<i32>, &str> = f.try_map(|x| {
            calls += 1;
            if x == 5 { Err("bad") } else { Ok(x) }
        });
        assert_eq!(mapped, Err("bad"));
        assert_eq!(calls, 2);
    }

    #[test]
    fn operand_reads_slots() {
        let values = [1.5, 2.5];
        assert_eq!(Operand::Slot(1).value(&values), 2.5);
        assert_eq!(Operand::Literal(7.0).value(&values), 7.0);
    }

    #[test]
    fn arity_matches_operator_family() {
        assert_eq!(Formula::Val(()).arity(), 1);
        assert_eq!(Formula::Cos((), ()).arity(), 2);
        assert_eq!(Formula::MulDiv((), (), ()).arity(), 3);
        assert_eq!(Formula::MulDiv((), (), ()).operator(), "*/");
    }
}
