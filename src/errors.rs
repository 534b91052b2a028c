//! Error types with rich diagnostics using miette
//!
//! Formula errors carry the offending formula text and a span into it, so a
//! rejected preset points at the exact operand that broke it.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// Formula Errors
// ============================================================================

/// Errors raised while parsing or resolving a single formula or reference
#[derive(Error, Diagnostic, Debug)]
pub enum FormulaError {
    #[error("malformed formula: {message}")]
    #[diagnostic(code(prstgeom::formula::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
    },

    #[error("unresolved name `{name}`")]
    #[diagnostic(code(prstgeom::formula::unresolved_name))]
    UnresolvedName {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not defined at this point")]
        span: SourceSpan,
        #[help]
        suggestion: Option<String>,
    },
}

// ============================================================================
// Preset Errors
// ============================================================================

/// Errors surfaced by the registry and by shape instances
#[derive(Error, Diagnostic, Debug)]
pub enum PresetError {
    #[error("preset `{preset}`: malformed formula in {item}")]
    #[diagnostic(code(prstgeom::preset::malformed_formula))]
    MalformedFormula {
        preset: String,
        item: String,
        #[source]
        #[diagnostic_source]
        source: FormulaError,
    },

    #[error("preset `{preset}`: adjust handle writes `{name}`, which is not an adjustable value")]
    #[diagnostic(code(prstgeom::preset::invalid_handle_target))]
    InvalidHandleTarget { preset: String, name: String },

    #[error("unknown preset: {id}")]
    #[diagnostic(code(prstgeom::registry::unknown_preset))]
    UnknownPreset {
        id: String,
        #[help]
        suggestion: Option<String>,
    },

    #[error("preset `{preset}` has no adjustable value named `{name}`")]
    #[diagnostic(code(prstgeom::shape::unknown_adjustment))]
    UnknownAdjustment {
        preset: String,
        name: String,
        #[help]
        suggestion: Option<String>,
    },

    #[error("preset `{preset}` has no adjust handle #{index}")]
    #[diagnostic(
        code(prstgeom::shape::unknown_handle),
        help("this preset declares {count} adjust handle(s)")
    )]
    UnknownHandle {
        preset: String,
        index: usize,
        count: usize,
    },
}

/// Render a "declared here: a, b, c" hint, or nothing for an empty list.
pub(crate) fn declared_hint<'a>(
    label: &str,
    names: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    let names: Vec<&str> = names.into_iter().collect();
    if names.is_empty() {
        None
    } else {
        Some(format!("{label}: {}", names.join(", ")))
    }
}
