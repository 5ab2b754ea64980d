//! Error types for footprint rendering.
//!
//! Unrecognized geometry under a renderer is deliberately *not* an error:
//! a pad renderer meeting a bare group contributes no records and the walk
//! continues. Only contract violations abort a render pass.

use miette::Diagnostic;
use thiserror::Error;

/// Fatal conditions that abort a render pass.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("duplicate {kind} metadata: at most one {kind} may be captured per render")]
    #[diagnostic(code(padru::render::duplicate_metadata))]
    DuplicateMetadata { kind: &'static str },

    #[error("{kind} geometry carries {count} points, expected exactly one")]
    #[diagnostic(code(padru::render::multiple_points))]
    MultiplePoints { kind: &'static str, count: usize },

    #[error("no naming scope in effect")]
    #[diagnostic(
        code(padru::render::no_name_scope),
        help("pads and pins resolve designators from their own name or an enclosing named group")
    )]
    NoNameScope,
}
