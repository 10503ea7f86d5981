//! # Hierarchy Registry
//!
//! Arena of every class in the program, grouped by package, plus the
//! per-file name scopes the resolution pass needs.
//!
//! ## Example
//!
//! ```rust
//! use java_ast::{Class, ClassKind, CompilationUnit};
//! use java_hier::resolve;
//!
//! let mut foo = Class::new("Foo", ClassKind::Class);
//! foo.package_name = "a.b".to_string();
//! foo.file = "Foo.java".to_string();
//! let unit = CompilationUnit {
//!     source: "Foo.java".to_string(),
//!     package: Some("a.b".to_string()),
//!     imports: Vec::new(),
//!     classes: vec![foo],
//! };
//!
//! let hierarchy = resolve(vec![unit]).unwrap();
//! let id = hierarchy.lookup("a.b.Foo").unwrap();
//! assert_eq!(hierarchy.package_of(id).unwrap().path(), "a/b");
//! ```

use crate::resolve::ResolutionReport;
use config::constants::{DEFAULT_PACKAGE_NAME, QUALIFIED_NAME_SEPARATOR};
use indexmap::IndexMap;
use java_ast::{Class, ClassId, Import, PackageId};
use rustc_hash::FxHashMap;
use std::sync::Arc;

// =============================================================================
// PACKAGE
// =============================================================================

/// A Java package and the classes registered in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    name: String,
    path: String,
    classes: Vec<ClassId>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let path = name.replace(QUALIFIED_NAME_SEPARATOR, "/");
        Self {
            name,
            path,
            classes: Vec::new(),
        }
    }

    /// Qualified name, empty for the default package.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory of the package relative to the output root (`a/b`).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last segment of the name, the Go package clause.
    pub fn identifier(&self) -> &str {
        if self.name.is_empty() {
            return DEFAULT_PACKAGE_NAME;
        }
        self.name
            .rsplit(QUALIFIED_NAME_SEPARATOR)
            .next()
            .unwrap_or(&self.name)
    }

    pub fn classes(&self) -> &[ClassId] {
        &self.classes
    }

    pub(crate) fn register(&mut self, class: ClassId) {
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
    }
}

// =============================================================================
// FILE SCOPE
// =============================================================================

/// Names visible inside one source file.
#[derive(Debug, Clone, Default)]
pub struct FileScope {
    pub package: String,
    pub imports: Vec<Import>,
    /// Declared names (`Outer.Inner`) and simple names of the file's classes
    locals: FxHashMap<String, ClassId>,
}

impl FileScope {
    pub fn new(package: impl Into<String>, imports: Vec<Import>) -> Self {
        Self {
            package: package.into(),
            imports,
            locals: FxHashMap::default(),
        }
    }

    pub(crate) fn declare(&mut self, declared_name: &str, id: ClassId) {
        let simple = declared_name
            .rsplit(QUALIFIED_NAME_SEPARATOR)
            .next()
            .unwrap_or(declared_name);
        self.locals.insert(declared_name.to_string(), id);
        self.locals.entry(simple.to_string()).or_insert(id);
    }

    /// A class declared in this file.
    pub fn local(&self, name: &str) -> Option<ClassId> {
        self.locals.get(name).copied()
    }

    /// The single-type import that makes `name` (or its first segment)
    /// visible.
    pub fn single_import(&self, name: &str) -> Option<&Import> {
        let head = name.split(QUALIFIED_NAME_SEPARATOR).next().unwrap_or(name);
        self.imports
            .iter()
            .filter(|import| !import.static_)
            .find(|import| import.simple_name() == Some(head))
    }

    pub fn on_demand_imports(&self) -> impl Iterator<Item = &Import> {
        self.imports.iter().filter(|import| import.on_demand && !import.static_)
    }
}

// =============================================================================
// HIERARCHY
// =============================================================================

/// Every package and class of the program.
///
/// Built by [`crate::resolve`]; read-only afterwards.
#[derive(Debug, Default)]
pub struct Hierarchy {
    pub(crate) packages: IndexMap<String, Package>,
    pub(crate) classes: Vec<Arc<Class>>,
    pub(crate) index: FxHashMap<String, ClassId>,
    pub(crate) files: IndexMap<String, FileScope>,
    pub(crate) report: ResolutionReport,
}

impl Hierarchy {
    pub fn class(&self, id: ClassId) -> Option<&Arc<Class>> {
        self.classes.get(id.0)
    }

    /// Every class in arena order: declared classes first, then stubs in
    /// the order they were synthesized.
    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &Arc<Class>)> {
        self.classes.iter().enumerate().map(|(i, class)| (ClassId(i), class))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Class id by qualified name (`a.b.Outer.Inner`).
    pub fn lookup(&self, qualified_name: &str) -> Option<ClassId> {
        self.index.get(qualified_name).copied()
    }

    pub fn package(&self, id: PackageId) -> Option<&Package> {
        self.packages.get_index(id.0).map(|(_, package)| package)
    }

    pub fn package_named(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    /// The package a class was linked to.
    pub fn package_of(&self, id: ClassId) -> Option<&Package> {
        self.class(id)?.package_id().and_then(|package| self.package(package))
    }

    /// The resolved base class of a class.
    pub fn base_of(&self, id: ClassId) -> Option<&Arc<Class>> {
        self.class(id)?.base_id().and_then(|base| self.class(base))
    }

    pub fn file(&self, name: &str) -> Option<&FileScope> {
        self.files.get(name)
    }

    pub fn stubs(&self) -> impl Iterator<Item = &Arc<Class>> {
        self.classes.iter().filter(|class| class.synthesized)
    }

    /// Counters of the resolution pass that built this hierarchy.
    pub fn report(&self) -> &ResolutionReport {
        &self.report
    }

    // ===== REGISTRATION =====

    /// Appends a class to the arena and indexes it by qualified name.
    pub(crate) fn insert(&mut self, class: Class) -> ClassId {
        let id = ClassId(self.classes.len());
        self.index.insert(class.qualified_name(), id);
        self.classes.push(Arc::new(class));
        id
    }

    /// Registers a class in its package, creating the package on first
    /// use, and links the class to it.
    pub(crate) fn register_in_package(&mut self, id: ClassId) {
        let Some(class) = self.classes.get(id.0).map(Arc::clone) else {
            return;
        };
        let entry = self.packages.entry(class.package_name.clone());
        let package_id = PackageId(entry.index());
        entry
            .or_insert_with(|| Package::new(class.package_name.clone()))
            .register(id);
        class.link_package(package_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use java_ast::ClassKind;

    #[test]
    fn test_package_path_and_identifier() {
        let package = Package::new("com.example.util");
        assert_eq!(package.path(), "com/example/util");
        assert_eq!(package.identifier(), "util");
        assert_eq!(Package::new("").identifier(), "main");
        assert_eq!(Package::new("").path(), "");
    }

    #[test]
    fn test_register_creates_package_once() {
        let mut hierarchy = Hierarchy::default();
        let mut a = Class::new("A", ClassKind::Class);
        a.package_name = "p".to_string();
        let mut b = Class::new("B", ClassKind::Class);
        b.package_name = "p".to_string();
        let a = hierarchy.insert(a);
        let b = hierarchy.insert(b);
        hierarchy.register_in_package(a);
        hierarchy.register_in_package(b);
        hierarchy.register_in_package(b);

        assert_eq!(hierarchy.packages().count(), 1);
        assert_eq!(hierarchy.package_named("p").unwrap().classes(), &[a, b]);
        assert_eq!(hierarchy.package_of(b).unwrap().name(), "p");
    }

    #[test]
    fn test_file_scope_locals_and_imports() {
        let mut scope = FileScope::new(
            "app",
            vec![
                Import { path: "util.List".to_string(), on_demand: false, static_: false },
                Import { path: "io".to_string(), on_demand: true, static_: false },
                Import { path: "util.Math.max".to_string(), on_demand: false, static_: true },
            ],
        );
        scope.declare("Outer.Inner", ClassId(3));

        assert_eq!(scope.local("Inner"), Some(ClassId(3)));
        assert_eq!(scope.local("Outer.Inner"), Some(ClassId(3)));
        assert_eq!(scope.single_import("List").unwrap().path, "util.List");
        assert_eq!(scope.single_import("List.Node").unwrap().path, "util.List");
        assert!(scope.single_import("max").is_none());
        assert_eq!(scope.on_demand_imports().count(), 1);
    }
}
