//! # Go Emit Crate
//!
//! Writes the resolved class hierarchy out as Go source text and wires the
//! whole translation pipeline together.
//!
//! ## Example
//!
//! ```rust
//! use go_emit::{translate, EmitConfig};
//! use java_ast::ParseNode;
//!
//! let class = ParseNode::branch(
//!     "class_declaration",
//!     vec![
//!         ParseNode::token("class"),
//!         ParseNode::leaf("identifier", "Foo").with_field("name"),
//!         ParseNode::branch("class_body", vec![]).with_field("body"),
//!     ],
//! );
//! let program = ParseNode::branch("program", vec![class]);
//!
//! let translation = translate(&[("Foo.java", program)], &EmitConfig::default()).unwrap();
//! assert_eq!(translation.files[0].path.to_str(), Some("Foo/Foo.go"));
//! assert!(translation.files[0].text.starts_with("package main\n"));
//! ```

pub mod emitter;
pub mod error;
pub mod pipeline;
pub mod settings;

pub use emitter::{EmittedFile, Emitter};
pub use error::{EmitError, TranslateError};
pub use pipeline::{translate, translate_json, Translation};
pub use settings::EmitConfig;
