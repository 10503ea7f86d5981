//! # Config Crate
//!
//! Centralized configuration constants for the java2go translation pipeline.
//! All literals that shape the generated Go code (file extension, marker
//! comments, type spellings) are defined here so every crate agrees on them.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{go_primitive, TARGET_EXTENSION};
//!
//! assert_eq!(TARGET_EXTENSION, "go");
//! assert_eq!(go_primitive("boolean"), Some("bool"));
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;
