//! # Java Hierarchy Crate
//!
//! Whole-program registry of packages and classes, and the single pass that
//! links them.
//!
//! ## Architecture
//!
//! ```text
//! CompilationUnit* → resolve → Hierarchy (read-only, Sync) → emitter
//! ```
//!
//! Classes live in an arena of `Arc<Class>`. Links between classes are arena
//! ids written once into the classes' `OnceLock` slots, so the pass never
//! needs mutable access to a class it has already stored.

pub mod error;
pub mod hierarchy;
pub mod resolve;
pub mod visitor;

pub use error::ResolveError;
pub use hierarchy::{FileScope, Hierarchy, Package};
pub use resolve::{resolve, ResolutionReport};
pub use visitor::{Accumulate, Visitor};
