//! # Type References
//!
//! Java type references as written in declarations, together with the link
//! attached by the resolution pass and their Go spelling.
//!
//! ## Go Spelling
//!
//! | Java                | Go               |
//! |---------------------|------------------|
//! | `int`, `double`     | `int`, `float64` |
//! | `String`, `Object`  | `string`, `interface{}` |
//! | `Foo` (class)       | `*Foo`           |
//! | `Shape` (interface) | `Shape`          |
//! | `T` (parameter)     | `T`              |
//! | `Box<Integer>`      | `*Box[int]`      |
//! | `int[][]`           | `[][]int`        |

use config::constants::{go_builtin, go_primitive, QUALIFIED_NAME_SEPARATOR};
use serde::Serialize;
use std::sync::OnceLock;

/// Index of a class in the hierarchy arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClassId(pub usize);

/// Index of a package in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PackageId(pub usize);

/// How a type name is rendered before resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypeKind {
    /// Java primitive, including `void`
    Primitive,
    /// `java.lang` type with a native Go spelling
    Builtin,
    /// Type parameter in scope at the reference
    Parameter,
    /// Any other class or interface name
    Named,
}

/// Target of a resolved type reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedType {
    pub class: ClassId,
    pub interface: bool,
    /// Go type name of the target class (`Outer_Inner` for nested classes)
    pub go_name: String,
}

/// A type as written in Java source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeRef {
    pub name: String,
    pub arguments: Vec<TypeRef>,
    pub dimensions: usize,
    pub kind: TypeKind,
    #[serde(skip)]
    resolved: OnceLock<ResolvedType>,
}

impl TypeRef {
    /// Creates a reference, classifying primitive and builtin names.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = if go_primitive(&name).is_some() {
            TypeKind::Primitive
        } else if go_builtin(&name).is_some() {
            TypeKind::Builtin
        } else {
            TypeKind::Named
        };
        Self {
            name,
            arguments: Vec::new(),
            dimensions: 0,
            kind,
            resolved: OnceLock::new(),
        }
    }

    /// Creates a reference to a type parameter.
    pub fn parameter(name: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::Parameter,
            ..Self::new(name)
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<TypeRef>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// The element type of an array reference (one dimension less).
    pub fn element(&self) -> TypeRef {
        let mut element = self.clone();
        element.dimensions = self.dimensions.saturating_sub(1);
        element
    }

    /// Whether the resolution pass has to look this name up.
    pub fn needs_resolution(&self) -> bool {
        self.kind == TypeKind::Named
    }

    pub fn is_void(&self) -> bool {
        self.kind == TypeKind::Primitive && self.name == "void" && self.dimensions == 0
    }

    /// Last segment of a qualified name.
    pub fn simple_name(&self) -> &str {
        self.name
            .rsplit(QUALIFIED_NAME_SEPARATOR)
            .next()
            .unwrap_or(&self.name)
    }

    /// Qualifier of a qualified name (`a.b` for `a.b.C`).
    pub fn qualifier(&self) -> Option<&str> {
        self.name
            .rsplit_once(QUALIFIED_NAME_SEPARATOR)
            .map(|(qualifier, _)| qualifier)
    }

    /// Attaches the resolution result. Returns `false` if already resolved.
    pub fn resolve(&self, target: ResolvedType) -> bool {
        self.resolved.set(target).is_ok()
    }

    pub fn resolved(&self) -> Option<&ResolvedType> {
        self.resolved.get()
    }

    /// Go name of the type without pointer, array or type arguments.
    pub fn go_name(&self) -> String {
        match self.kind {
            TypeKind::Primitive => go_primitive(&self.name).unwrap_or_default().to_string(),
            TypeKind::Builtin => go_builtin(&self.name).unwrap_or_default().to_string(),
            TypeKind::Parameter => self.name.clone(),
            TypeKind::Named => match self.resolved() {
                Some(target) => target.go_name.clone(),
                None => self.simple_name().to_string(),
            },
        }
    }

    /// Whether values of this type are held by pointer in Go.
    pub fn is_pointer(&self) -> bool {
        match self.kind {
            TypeKind::Named => !self.resolved().is_some_and(|target| target.interface),
            _ => false,
        }
    }

    /// Type arguments in Go syntax (`[A, B]`), empty when there are none.
    pub fn go_arguments(&self) -> String {
        if self.arguments.is_empty() {
            return String::new();
        }
        let arguments: Vec<String> = self.arguments.iter().map(TypeRef::go_type).collect();
        format!("[{}]", arguments.join(", "))
    }

    /// Full Go type expression.
    pub fn go_type(&self) -> String {
        let pointer = if self.is_pointer() { "*" } else { "" };
        format!(
            "{}{}{}{}",
            "[]".repeat(self.dimensions),
            pointer,
            self.go_name(),
            self.go_arguments()
        )
    }
}
