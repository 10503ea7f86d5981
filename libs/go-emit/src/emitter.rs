//! # Emitter
//!
//! Turns every class of a resolved [`Hierarchy`] into one Go file.
//!
//! ```text
//! Hierarchy ──par_iter──▶ render_class ──▶ EmittedFile { path, text }
//!                                            <pkg path>/<Class>/<Class>.go
//! ```

use crate::error::EmitError;
use crate::settings::EmitConfig;
use config::constants::QUALIFIED_NAME_SEPARATOR;
use java_ast::render::render_class;
use java_ast::{Class, RenderError};
use java_hier::Hierarchy;
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedFile {
    /// Path relative to the output root
    pub path: PathBuf,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct Emitter {
    config: EmitConfig,
}

impl Emitter {
    pub fn new(config: EmitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmitConfig {
        &self.config
    }

    /// `<package path>/<Class>/<Class>.<ext>`
    pub fn output_path(&self, class: &Class) -> PathBuf {
        let mut path: PathBuf = class
            .package_name
            .split(QUALIFIED_NAME_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .collect();
        path.push(&class.name);
        path.push(format!("{}.{}", class.name, self.config.extension));
        path
    }

    /// Package clause followed by the rendered class.
    ///
    /// # Errors
    ///
    /// The class's [`RenderError`] when its template contract is violated.
    pub fn file_text(&self, class: &Class) -> Result<String, RenderError> {
        let package = if class.package_name.is_empty() {
            self.config.default_package.as_str()
        } else {
            class.package_identifier()
        };
        Ok(format!("package {package}\n\n{}", render_class(class)?))
    }

    pub fn emit_class(&self, class: &Class) -> Result<EmittedFile, EmitError> {
        let text = self.file_text(class).map_err(|source| EmitError::Render {
            class: class.qualified_name(),
            source,
        })?;
        let path = self.output_path(class);
        debug!(class = %class.qualified_name(), path = %path.display(), "emitted class");
        Ok(EmittedFile { path, text })
    }

    /// Emits every class of the hierarchy, stubs included, in arena order.
    ///
    /// # Errors
    ///
    /// The first render failure; no files are returned in that case.
    pub fn emit_all(&self, hierarchy: &Hierarchy) -> Result<Vec<EmittedFile>, EmitError> {
        let classes: Vec<&Arc<Class>> = hierarchy.classes().map(|(_, class)| class).collect();
        let files = if self.config.parallel {
            classes
                .par_iter()
                .map(|class| self.emit_class(class))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            classes
                .iter()
                .map(|class| self.emit_class(class))
                .collect::<Result<Vec<_>, _>>()?
        };
        info!(files = files.len(), parallel = self.config.parallel, "emitted go files");
        Ok(files)
    }
}
