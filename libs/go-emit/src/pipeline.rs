//! # Translation Pipeline
//!
//! Runs every stage over a whole program with all-or-nothing semantics: the
//! first failing stage aborts the run and no file is produced.
//!
//! ```text
//! (name, ParseNode)* ──build_unit (parallel)──▶ CompilationUnit*
//!                    ──resolve (serial)──────▶ Hierarchy
//!                    ──emit_all (parallel)───▶ EmittedFile*
//! ```

use crate::emitter::{EmittedFile, Emitter};
use crate::error::TranslateError;
use crate::settings::EmitConfig;
use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use java_ast::{build_unit, AstError, CompilationUnit, ParseNode};
use java_hier::{resolve, ResolutionReport};
use rayon::prelude::*;
use serde::Deserialize;
use tracing::info;

/// Output of a successful run.
#[derive(Debug, Clone)]
pub struct Translation {
    pub files: Vec<EmittedFile>,
    pub report: ResolutionReport,
}

impl Translation {
    /// The emitted file whose path ends with `suffix`.
    pub fn file(&self, suffix: &str) -> Option<&EmittedFile> {
        self.files.iter().find(|file| file.path.ends_with(suffix))
    }
}

/// Translate parse trees, one per source file.
///
/// ## Parameters
///
/// - `sources`: `(file name, program node)` pairs
/// - `config`: emitter settings; `parallel` also applies to unit construction
///
/// ## Errors
///
/// - `TranslateError::Build` for malformed input
/// - `TranslateError::Resolve` for duplicate classes
/// - `TranslateError::Render` for a renderer defect
pub fn translate(sources: &[(&str, ParseNode)], config: &EmitConfig) -> Result<Translation, TranslateError> {
    let units: Vec<CompilationUnit> = if config.parallel {
        sources
            .par_iter()
            .map(|(name, root)| build_unit(root, name))
            .collect::<Result<_, _>>()?
    } else {
        sources
            .iter()
            .map(|(name, root)| build_unit(root, name))
            .collect::<Result<_, _>>()?
    };
    info!(units = units.len(), "built compilation units");

    let hierarchy = resolve(units)?;
    let files = Emitter::new(config.clone()).emit_all(&hierarchy)?;
    Ok(Translation {
        files,
        report: *hierarchy.report(),
    })
}

/// Translate parse trees handed over as web-tree-sitter JSON documents.
///
/// ## Parameters
///
/// - `documents`: `(file name, JSON text)` pairs
///
/// ## Errors
///
/// `TranslateError::Build` with `AstError::Parser` when a document is not a
/// parse tree; otherwise as [`translate`].
pub fn translate_json(documents: &[(&str, &str)], config: &EmitConfig) -> Result<Translation, TranslateError> {
    let sources = documents
        .iter()
        .map(|&(name, json)| {
            parse_document(json)
                .map(|root| (name, root))
                .map_err(|e| AstError::Parser(format!("{name}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    translate(&sources, config)
}

/// Deserializes a parse tree of any depth, growing the stack as needed.
fn parse_document(json: &str) -> Result<ParseNode, serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    deserializer.disable_recursion_limit();
    let mut stacked = serde_stacker::Deserializer::new(&mut deserializer);
    stacked.red_zone = STACKER_RED_ZONE_BYTES;
    stacked.stack_size = STACKER_STACK_SIZE_BYTES;
    let root = ParseNode::deserialize(stacked)?;
    deserializer.end()?;
    Ok(root)
}
