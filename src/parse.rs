//! Parse pest pairs into formula AST nodes

use miette::{NamedSource, SourceSpan};
use pest::Parser;
use pest::error::{ErrorVariant, InputLocation};
use pest::iterators::Pair;

use crate::ast::{Arg, Formula};
use crate::errors::FormulaError;
use crate::{FormulaParser, Rule};

/// Parse one formula string, e.g. `"*/ wd2 a 50000"`.
///
/// Only the shape of the formula is checked here; names are left unresolved.
pub fn parse_formula(text: &str) -> Result<Formula<Arg>, FormulaError> {
    let pairs = FormulaParser::parse(Rule::formula, text)
        .map_err(|e| syntax_error(text, e))?;

    let operation = pairs
        .flat_map(|pair| pair.into_inner())
        .find(|pair| matches!(pair.as_rule(), Rule::unary | Rule::binary | Rule::ternary))
        .ok_or_else(|| custom_error(text, "expected operator"))?;

    let mut inner = operation.into_inner();
    let op = inner
        .next()
        .ok_or_else(|| custom_error(text, "expected operator"))?
        .as_str();
    let args = inner
        .map(|pair| parse_arg(text, pair))
        .collect::<Result<Vec<_>, _>>()?;

    assemble(op, args)
        .ok_or_else(|| custom_error(text, &format!("wrong operand count for `{op}`")))
}

/// Parse a single reference such as `"hc"`, `"3cd4"` or `"21600"`.
pub fn parse_reference(text: &str) -> Result<Arg, FormulaError> {
    let pairs = FormulaParser::parse(Rule::reference, text)
        .map_err(|e| syntax_error(text, e))?;

    let arg = pairs
        .flat_map(|pair| pair.into_inner())
        .find(|pair| matches!(pair.as_rule(), Rule::number | Rule::name))
        .ok_or_else(|| custom_error(text, "expected operand"))?;

    parse_arg(text, arg)
}

fn parse_arg(text: &str, pair: Pair<Rule>) -> Result<Arg, FormulaError> {
    match pair.as_rule() {
        Rule::number => pair
            .as_str()
            .parse::<f64>()
            .map(Arg::Literal)
            .map_err(|e| custom_error(text, &format!("invalid number: {e}"))),
        Rule::name => {
            let span = pair.as_span();
            Ok(Arg::Name {
                name: pair.as_str().to_string(),
                span: (span.start(), span.end() - span.start()).into(),
            })
        }
        other => Err(custom_error(
            text,
            &format!("unexpected {}", rule_name(&other)),
        )),
    }
}

/// Build the node for `op`; `None` when the operand count does not fit.
fn assemble(op: &str, args: Vec<Arg>) -> Option<Formula<Arg>> {
    let expected = match op {
        "val" | "abs" | "sqrt" => 1,
        "at2" | "cos" | "sin" | "tan" | "max" | "min" => 2,
        _ => 3,
    };
    if args.len() != expected {
        return None;
    }

    let mut it = args.into_iter();
    let mut next = move || it.next();
    Some(match op {
        "val" => Formula::Val(next()?),
        "abs" => Formula::Abs(next()?),
        "sqrt" => Formula::Sqrt(next()?),
        "+-" => Formula::AddSub(next()?, next()?, next()?),
        "*/" => Formula::MulDiv(next()?, next()?, next()?),
        "+/" => Formula::AddDiv(next()?, next()?, next()?),
        "?:" => Formula::IfElse(next()?, next()?, next()?),
        "pin" => Formula::Pin(next()?, next()?, next()?),
        "mod" => Formula::Mod(next()?, next()?, next()?),
        "cat2" => Formula::Cat2(next()?, next()?, next()?),
        "sat2" => Formula::Sat2(next()?, next()?, next()?),
        "at2" => Formula::At2(next()?, next()?),
        "cos" => Formula::Cos(next()?, next()?),
        "sin" => Formula::Sin(next()?, next()?),
        "tan" => Formula::Tan(next()?, next()?),
        "max" => Formula::Max(next()?, next()?),
        "min" => Formula::Min(next()?, next()?),
        _ => return None,
    })
}

fn rule_name(rule: &Rule) -> &'static str {
    match rule {
        Rule::number | Rule::name | Rule::reference => "operand",
        Rule::op_unary
        | Rule::op_binary
        | Rule::op_ternary
        | Rule::unary
        | Rule::binary
        | Rule::ternary
        | Rule::formula => "operator",
        Rule::EOI => "end of formula",
        _ => "token",
    }
}

fn source(text: &str) -> NamedSource<String> {
    NamedSource::new("formula", text.to_string())
}

fn custom_error(text: &str, message: &str) -> FormulaError {
    FormulaError::Syntax {
        message: message.to_string(),
        src: source(text),
        span: (0, text.len()).into(),
    }
}

fn syntax_error(text: &str, err: pest::error::Error<Rule>) -> FormulaError {
    let span: SourceSpan = match err.location {
        InputLocation::Pos(pos) => (pos, 0).into(),
        InputLocation::Span((start, end)) => (start, end - start).into(),
    };

    let message = match &err.variant {
        ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => {
            let mut expected: Vec<&str> = positives.iter().map(rule_name).collect();
            expected.sort_unstable();
            expected.dedup();
            format!("expected {}", expected.join(" or "))
        }
        ErrorVariant::CustomError { message } => message.clone(),
        _ => "unexpected token".to_string(),
    };

    FormulaError::Syntax {
        message,
        src: source(text),
        span,
    }
}
