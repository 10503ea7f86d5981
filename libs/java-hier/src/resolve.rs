//! # Resolution Pass
//!
//! Links every class to its package and base class and attaches a target to
//! every class type reference, synthesizing stub classes for names that no
//! parsed file defines.
//!
//! ## Architecture
//!
//! ```text
//! units ──seed──▶ arena + index + file scopes
//!                      │
//!                      ▼
//!        for each declared class (visited once):
//!            package ◀── get or create, link
//!            base, interfaces ──▶ lookup ──miss──▶ stub
//!            children ──visit_type──▶ lookup ──miss──▶ stub
//! ```
//!
//! ## Lookup Order
//!
//! 1. class declared in the same file
//! 2. class in the same package
//! 3. single-type import
//! 4. on-demand imports, in declaration order
//! 5. fully qualified name
//! 6. synthesized stub
//!
//! A reference never walks into the class it names, so cyclic hierarchies
//! terminate.

use crate::error::ResolveError;
use crate::hierarchy::{FileScope, Hierarchy};
use crate::visitor::Visitor;
use config::constants::QUALIFIED_NAME_SEPARATOR;
use indexmap::IndexSet;
use java_ast::class::qualify;
use java_ast::{Class, ClassId, ClassKind, CompilationUnit, Node, ResolvedType, TypeRef};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Counters of one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Declared classes visited
    pub visited: usize,
    /// Type references linked to a class, stubs included
    pub resolved_types: usize,
    /// Stub classes synthesized
    pub stubs: usize,
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Build the hierarchy of a whole program.
///
/// ## Parameters
///
/// - `units`: every compilation unit of the program
///
/// ## Returns
///
/// The read-only hierarchy. Its [`Hierarchy::report`] counts what the pass
/// did.
///
/// ## Errors
///
/// `ResolveError::DuplicateClass` when two parsed classes share a qualified
/// name.
pub fn resolve(units: impl IntoIterator<Item = CompilationUnit>) -> Result<Hierarchy, ResolveError> {
    let hierarchy = seed(units)?;
    let declared = hierarchy.len();

    let mut resolver = Resolver {
        hierarchy,
        visited: IndexSet::new(),
        current: None,
        stubs: 0,
    };
    let mut resolved_types = 0;
    for index in 0..declared {
        let Some(class) = resolver.hierarchy.class(ClassId(index)).map(Arc::clone) else {
            continue;
        };
        resolved_types += resolver.visit_node(Node::Class(&class));
    }

    let mut hierarchy = resolver.hierarchy;
    hierarchy.report = ResolutionReport {
        visited: resolver.visited.len(),
        resolved_types,
        stubs: resolver.stubs,
    };
    info!(
        classes = hierarchy.len(),
        packages = hierarchy.packages.len(),
        resolved_types,
        stubs = resolver.stubs,
        "resolved class hierarchy"
    );
    Ok(hierarchy)
}

/// Moves every class into the arena and records each file's scope.
fn seed(units: impl IntoIterator<Item = CompilationUnit>) -> Result<Hierarchy, ResolveError> {
    let mut hierarchy = Hierarchy::default();
    for unit in units {
        let package = unit.package_name().to_string();
        let mut scope = hierarchy
            .files
            .shift_remove(&unit.source)
            .unwrap_or_else(|| FileScope::new(package.clone(), unit.imports.clone()));

        for class in unit.classes {
            let qualified = class.qualified_name();
            if let Some(existing) = hierarchy.lookup(&qualified).and_then(|id| hierarchy.class(id)) {
                return Err(ResolveError::DuplicateClass {
                    name: qualified,
                    first: existing.file.clone(),
                    second: class.file.clone(),
                });
            }
            let declared_name = class.declared_name.clone();
            let id = hierarchy.insert(class);
            scope.declare(&declared_name, id);
        }
        hierarchy.files.insert(unit.source, scope);
    }
    Ok(hierarchy)
}

// =============================================================================
// RESOLVER
// =============================================================================

/// Class being visited: the scope its references are resolved in.
struct Current {
    file: String,
    package: String,
}

struct Resolver {
    hierarchy: Hierarchy,
    visited: IndexSet<ClassId>,
    current: Option<Current>,
    stubs: usize,
}

impl Visitor for Resolver {
    type Output = usize;

    fn visit_class(&mut self, class: &Class) -> usize {
        let Some(id) = self.hierarchy.lookup(&class.qualified_name()) else {
            return 0;
        };
        if !self.visited.insert(id) {
            return 0;
        }
        self.hierarchy.register_in_package(id);

        let outer = self.current.replace(Current {
            file: class.file.clone(),
            package: class.package_name.clone(),
        });

        let mut resolved = 0;
        if let Some(base) = &class.base {
            if let Some(base_id) = self.resolve_reference(base, ClassKind::Class) {
                class.link_base(base_id);
                resolved += 1;
            }
            resolved += self.visit_children(Node::Type(base));
        }
        for interface in &class.interfaces {
            if self.resolve_reference(interface, ClassKind::Interface).is_some() {
                resolved += 1;
            }
            resolved += self.visit_children(Node::Type(interface));
        }
        resolved += self.visit_children(Node::Class(class));

        self.current = outer;
        debug!(class = %class.qualified_name(), resolved, "visited class");
        resolved
    }

    fn visit_type(&mut self, ty: &TypeRef) -> usize {
        let own = usize::from(self.resolve_reference(ty, ClassKind::Class).is_some());
        own + self.visit_children(Node::Type(ty))
    }
}

impl Resolver {
    /// Attaches a target to `ty` if it names a class. `stub_kind` is used
    /// when the name is undefined.
    fn resolve_reference(&mut self, ty: &TypeRef, stub_kind: ClassKind) -> Option<ClassId> {
        if !ty.needs_resolution() {
            return None;
        }
        if let Some(target) = ty.resolved() {
            return Some(target.class);
        }

        let id = match self.lookup(&ty.name) {
            Some(id) => id,
            None => self.synthesize(ty, stub_kind),
        };
        let class = self.hierarchy.class(id)?;
        ty.resolve(ResolvedType {
            class: id,
            interface: class.is_interface(),
            go_name: class.name.clone(),
        });
        Some(id)
    }

    fn scope(&self) -> Option<&FileScope> {
        self.current
            .as_ref()
            .and_then(|current| self.hierarchy.file(&current.file))
    }

    fn current_package(&self) -> &str {
        self.current
            .as_ref()
            .map(|current| current.package.as_str())
            .unwrap_or_default()
    }

    fn lookup(&self, name: &str) -> Option<ClassId> {
        let scope = self.scope();
        if let Some(id) = scope.and_then(|scope| scope.local(name)) {
            return Some(id);
        }
        if let Some(id) = self.hierarchy.lookup(&qualify(self.current_package(), name)) {
            return Some(id);
        }
        if let Some(scope) = scope {
            if let Some(import) = scope.single_import(name) {
                let rest = name
                    .split_once(QUALIFIED_NAME_SEPARATOR)
                    .map(|(_, rest)| rest);
                let target = match rest {
                    Some(rest) => qualify(&import.path, rest),
                    None => import.path.clone(),
                };
                if let Some(id) = self.hierarchy.lookup(&target) {
                    return Some(id);
                }
            }
            if let Some(id) = scope
                .on_demand_imports()
                .find_map(|import| self.hierarchy.lookup(&qualify(&import.path, name)))
            {
                return Some(id);
            }
        }
        self.hierarchy.lookup(name)
    }

    /// Creates the stub for an undefined name, or returns the one an
    /// earlier reference created.
    fn synthesize(&mut self, ty: &TypeRef, kind: ClassKind) -> ClassId {
        let package = self
            .scope()
            .and_then(|scope| scope.single_import(&ty.name))
            .map(|import| import.package().to_string())
            .or_else(|| ty.qualifier().map(str::to_string))
            .unwrap_or_else(|| self.current_package().to_string());
        let name = ty.simple_name().to_string();

        if let Some(id) = self.hierarchy.lookup(&qualify(&package, &name)) {
            return id;
        }

        let stub = Class::synthesized(name, package, kind);
        let qualified = stub.qualified_name();
        let id = self.hierarchy.insert(stub);
        self.hierarchy.register_in_package(id);
        self.stubs += 1;
        warn!(class = %qualified, kind = ?kind, "synthesized stub for undefined type");
        id
    }
}
