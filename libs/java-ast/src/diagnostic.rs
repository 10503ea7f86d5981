use crate::error::AstError;
use crate::span::{Location, Position, Span};
use serde::{Deserialize, Serialize};

/// An error message with its source location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    pub span: Span,
    pub position: Position,
    pub hint: Option<String>,
}

impl Diagnostic {
    pub fn error(message: String, location: Location) -> Self {
        Self {
            message,
            span: location.span,
            position: location.position,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: String) -> Self {
        self.hint = Some(hint);
        self
    }

    /// Converts a single-construct error into an error diagnostic.
    pub fn from_error(error: &AstError) -> Self {
        let diagnostic = Self::error(error.to_string(), error.location().unwrap_or_default());
        match error {
            AstError::Unsupported { kind, .. } => {
                diagnostic.with_hint(format!("rewrite the {kind} with supported constructs"))
            }
            _ => diagnostic,
        }
    }
}
