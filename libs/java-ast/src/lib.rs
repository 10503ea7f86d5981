//! # Java AST Crate
//!
//! Builds a typed AST for Java programs from grammar parse nodes and renders
//! it as Go source. Every construction error carries the position of the
//! offending parse node.
//!
//! ## Architecture
//!
//! ### Parse nodes from an external parser
//!
//! ```text
//! Java Source → grammar parser (JSON) → ParseNode → build_unit → CompilationUnit
//! ```
//!
//! ### Native (feature `native-parser`)
//!
//! ```text
//! Java Source → tree-sitter-java → ParseNode → build_unit → CompilationUnit
//! ```
//!
//! Classes are then linked by the hierarchy resolver and rendered with
//! [`render::render_class`].
//!
//! ## Design Principles
//!
//! - **Closed node model**: every AST element is reachable through [`Node`]
//! - **Fallible construction**: no partially formed node is ever built
//! - **Explicit context**: construction state is a value, never global
//! - **Pure rendering**: rendering reads the AST and never mutates it

pub mod build;
pub mod class;
pub mod cst;
pub mod diagnostic;
pub mod error;
pub mod expr;
#[cfg(feature = "native-parser")]
pub mod native;
pub mod node;
pub mod render;
pub mod span;
pub mod types;

// Re-exports for convenience
pub use build::build_unit;
pub use class::{Class, ClassKind, CompilationUnit, EnumConstant, Field, Import, Method};
pub use cst::ParseNode;
pub use diagnostic::Diagnostic;
pub use error::{AstError, RenderError};
pub use expr::{CallTarget, Expr, VariableDecl};
#[cfg(feature = "native-parser")]
pub use native::parse_java;
pub use node::Node;
pub use span::{Location, Position, Span};
pub use types::{ClassId, PackageId, ResolvedType, TypeKind, TypeRef};
