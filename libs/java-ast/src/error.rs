//! # AST Errors
//!
//! Error types for AST construction and rendering.
//!
//! Construction errors describe malformed input (a parse node without a
//! mandatory part, an unsupported construct). Rendering errors describe a
//! mismatch between the AST contract and the Go templates: they are tool
//! defects, never properties of the input program.

use crate::diagnostic::Diagnostic;
use crate::span::Location;
use thiserror::Error;

/// Errors raised while building the AST from parse nodes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AstError {
    /// A mandatory sub-node is absent.
    #[error("{node} is missing its {part}{}", at_suffix(.at))]
    MissingNode {
        node: &'static str,
        part: &'static str,
        at: Option<Location>,
    },

    /// The construct has no Go translation.
    #[error("unsupported {kind}{}", at_suffix(.at))]
    Unsupported { kind: String, at: Option<Location> },

    /// The parser reported syntax errors; construction was not attempted.
    #[error("{source_name}: {} syntax error(s)", .diagnostics.len())]
    SyntaxErrors {
        source_name: String,
        diagnostics: Vec<Diagnostic>,
    },

    /// One or more malformed constructs were found in a file.
    #[error("{source_name}: {} malformed construct(s){}", .diagnostics.len(), first_message(.diagnostics))]
    Diagnostics {
        source_name: String,
        diagnostics: Vec<Diagnostic>,
    },

    /// The native front end failed before producing a tree.
    #[error("parser failure: {0}")]
    Parser(String),
}

impl AstError {
    pub fn missing(node: &'static str, part: &'static str) -> Self {
        AstError::MissingNode { node, part, at: None }
    }

    pub fn unsupported(kind: impl Into<String>) -> Self {
        AstError::Unsupported { kind: kind.into(), at: None }
    }

    /// Attaches a source location unless one is already present.
    pub fn located(self, location: Location) -> Self {
        match self {
            AstError::MissingNode { node, part, at: None } => AstError::MissingNode {
                node,
                part,
                at: Some(location),
            },
            AstError::Unsupported { kind, at: None } => AstError::Unsupported {
                kind,
                at: Some(location),
            },
            other => other,
        }
    }

    /// Source location of a single-construct error.
    pub fn location(&self) -> Option<Location> {
        match self {
            AstError::MissingNode { at, .. } | AstError::Unsupported { at, .. } => *at,
            _ => None,
        }
    }

    /// All diagnostics carried by this error.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            AstError::SyntaxErrors { diagnostics, .. } | AstError::Diagnostics { diagnostics, .. } => {
                diagnostics.clone()
            }
            other => vec![Diagnostic::from_error(other)],
        }
    }
}

fn at_suffix(at: &Option<Location>) -> String {
    match at {
        Some(location) => format!(" at {location}"),
        None => String::new(),
    }
}

fn first_message(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .first()
        .map(|d| format!("; first: {}", d.message))
        .unwrap_or_default()
}

/// Errors raised while rendering a class with the Go templates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// The class does not satisfy the invariant its template relies on.
    #[error("class {class}: {reason}")]
    Contract { class: String, reason: String },

    /// Writing into the output buffer failed.
    #[error("formatting failed while rendering {0}")]
    Format(String),
}
