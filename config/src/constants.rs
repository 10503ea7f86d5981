//! # Configuration Constants
//!
//! Centralized constants for the Java → Go translation pipeline. Output
//! naming, rendering layout, type tables and recursion limits are defined here.
//!
//! ## Categories
//!
//! - **Output**: Target file extension and default package name
//! - **Rendering**: Indentation and the synthesized-class marker
//! - **Types**: Java primitive and builtin types with their Go spelling
//! - **Limits**: Stack growth parameters for deep recursion

// =============================================================================
// OUTPUT CONSTANTS
// =============================================================================

/// File extension of every emitted file.
///
/// # Example
///
/// ```rust
/// use config::constants::TARGET_EXTENSION;
///
/// let file = format!("Foo.{}", TARGET_EXTENSION);
/// assert_eq!(file, "Foo.go");
/// ```
pub const TARGET_EXTENSION: &str = "go";

/// Go package name used for Java sources without a `package` declaration.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_PACKAGE_NAME;
///
/// assert_eq!(DEFAULT_PACKAGE_NAME, "main");
/// ```
pub const DEFAULT_PACKAGE_NAME: &str = "main";

/// Separator between segments of a qualified Java name.
pub const QUALIFIED_NAME_SEPARATOR: char = '.';

// =============================================================================
// RENDERING CONSTANTS
// =============================================================================

/// One level of indentation in rendered Go code.
pub const INDENT: &str = "\t";

/// Comment placed above every synthesized placeholder class.
///
/// Stub classes are created for types that are referenced but have no
/// source to translate. The marker makes them easy to find in the output.
///
/// # Example
///
/// ```rust
/// use config::constants::SYNTHESIZED_MARKER;
///
/// assert!(SYNTHESIZED_MARKER.starts_with("//"));
/// ```
pub const SYNTHESIZED_MARKER: &str =
    "// Synthesized placeholder: this class was referenced but not defined in the translated sources. It has no implementation.";

/// Prefix of generated construction functions (`NewFoo`).
pub const CONSTRUCTOR_PREFIX: &str = "New";

/// Name of the receiver used for instance members and construction functions.
pub const RECEIVER_NAME: &str = "this";

/// Go element type used for array literals whose element type is unknown.
pub const UNKNOWN_ELEMENT_TYPE: &str = "interface{}";

// =============================================================================
// TYPE TABLES
// =============================================================================

/// Java primitive types and their Go spelling.
///
/// `void` maps to the empty string: a method returning `void` has no result.
///
/// # Example
///
/// ```rust
/// use config::constants::go_primitive;
///
/// assert_eq!(go_primitive("int"), Some("int"));
/// assert_eq!(go_primitive("double"), Some("float64"));
/// assert_eq!(go_primitive("Foo"), None);
/// ```
pub const PRIMITIVE_TYPES: &[(&str, &str)] = &[
    ("boolean", "bool"),
    ("byte", "byte"),
    ("char", "rune"),
    ("short", "int16"),
    ("int", "int"),
    ("long", "int64"),
    ("float", "float32"),
    ("double", "float64"),
    ("void", ""),
];

/// `java.lang` types rendered as Go builtins instead of translated classes.
///
/// References to these names never produce synthesized stubs.
pub const BUILTIN_TYPES: &[(&str, &str)] = &[
    ("String", "string"),
    ("Object", "interface{}"),
    ("Boolean", "bool"),
    ("Byte", "byte"),
    ("Character", "rune"),
    ("Short", "int16"),
    ("Integer", "int"),
    ("Long", "int64"),
    ("Float", "float32"),
    ("Double", "float64"),
    ("java.lang.String", "string"),
    ("java.lang.Object", "interface{}"),
];

/// Looks up the Go spelling of a Java primitive type.
pub fn go_primitive(name: &str) -> Option<&'static str> {
    PRIMITIVE_TYPES
        .iter()
        .find(|(java, _)| *java == name)
        .map(|(_, go)| *go)
}

/// Looks up the Go spelling of a `java.lang` builtin type.
///
/// # Example
///
/// ```rust
/// use config::constants::go_builtin;
///
/// assert_eq!(go_builtin("String"), Some("string"));
/// assert_eq!(go_builtin("ArrayList"), None);
/// ```
pub fn go_builtin(name: &str) -> Option<&'static str> {
    BUILTIN_TYPES
        .iter()
        .find(|(java, _)| *java == name)
        .map(|(_, go)| *go)
}

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Bytes of stack space allocated when the `stacker` crate grows the stack
/// during recursive AST construction.
///
/// # Example
///
/// ```rust
/// use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
///
/// assert!(STACKER_STACK_SIZE_BYTES > STACKER_RED_ZONE_BYTES);
/// ```
pub const STACKER_STACK_SIZE_BYTES: usize = 8 * 1024 * 1024;

/// Remaining stack below which `stacker::maybe_grow` allocates a new segment.
pub const STACKER_RED_ZONE_BYTES: usize = 64 * 1024;

/// Number of characters of source text quoted in a diagnostic message.
pub const DIAGNOSTIC_SNIPPET_CHARS: usize = 40;
