//! Error types for emitting and for the whole pipeline.

use java_ast::{AstError, RenderError};
use java_hier::ResolveError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmitError {
    #[error("failed to render {class}: {source}")]
    Render {
        class: String,
        #[source]
        source: RenderError,
    },
}

/// Failure of a translation run. `Build` and `Resolve` mean the input
/// program is bad; `Render` means the translator itself is at fault.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("build error: {0}")]
    Build(#[from] AstError),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("internal render error: {0}")]
    Render(#[from] EmitError),
}

impl TranslateError {
    /// Whether the failure is a defect of the translator rather than of
    /// its input.
    pub fn is_tool_defect(&self) -> bool {
        matches!(self, TranslateError::Render(_))
    }
}
