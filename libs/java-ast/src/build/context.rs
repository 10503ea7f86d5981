//! # Build Context
//!
//! State threaded through the recursive construction of one compilation
//! unit: the file, its package, the classes it declares, the class being
//! built, the local variables in scope and the diagnostics collected so far.

use crate::diagnostic::Diagnostic;
use crate::error::AstError;
use config::constants::{QUALIFIED_NAME_SEPARATOR, RECEIVER_NAME};
use indexmap::{IndexMap, IndexSet};

/// Members of the class currently being built, as seen from its bodies.
#[derive(Debug, Clone, Default)]
pub struct ClassFrame {
    /// Go name of the class
    pub name: String,
    /// Go name of the base class, if any
    pub base: Option<String>,
    pub type_parameters: Vec<String>,
    pub instance_fields: IndexSet<String>,
    pub static_fields: IndexSet<String>,
    pub static_methods: IndexSet<String>,
}

/// How an unqualified name inside a method body resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameRef {
    /// Parameter or local variable
    Local,
    /// Instance field of the enclosing class (`this.x`)
    InstanceField,
    /// Static field of the enclosing class (`Class_x`)
    StaticField(String),
    /// Anything else: class names, inherited members
    Unknown,
}

#[derive(Debug)]
pub struct BuildContext {
    source: String,
    package: Option<String>,
    /// Classes declared in this file, by simple and dotted name → Go name
    local_classes: IndexMap<String, String>,
    classes: Vec<ClassFrame>,
    method_type_parameters: Vec<String>,
    scopes: Vec<IndexSet<String>>,
    diagnostics: Vec<Diagnostic>,
}

impl BuildContext {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            package: None,
            local_classes: IndexMap::new(),
            classes: Vec::new(),
            method_type_parameters: Vec::new(),
            scopes: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn set_package(&mut self, package: String) {
        self.package = Some(package);
    }

    // =========================================================================
    // FILE-LOCAL CLASSES
    // =========================================================================

    /// Records a class declared in this file. `declared` is the dotted
    /// nesting path (`Outer.Inner`); the simple name maps to it as well.
    pub fn declare_class(&mut self, declared: &str, go_name: &str) {
        let simple = declared
            .rsplit(QUALIFIED_NAME_SEPARATOR)
            .next()
            .unwrap_or(declared);
        self.local_classes.insert(declared.to_string(), go_name.to_string());
        self.local_classes.insert(simple.to_string(), go_name.to_string());
    }

    /// Go name of a class declared in this file.
    pub fn local_class(&self, name: &str) -> Option<&str> {
        self.local_classes.get(name).map(String::as_str)
    }

    /// Go name for a class reference in expression position: file-local
    /// classes by their flattened name, anything else by its last segment.
    pub fn go_class_name(&self, name: &str) -> String {
        match self.local_class(name) {
            Some(go_name) => go_name.to_string(),
            None => name
                .rsplit(QUALIFIED_NAME_SEPARATOR)
                .next()
                .unwrap_or(name)
                .to_string(),
        }
    }

    // =========================================================================
    // CLASS FRAMES
    // =========================================================================

    pub fn enter_class(&mut self, frame: ClassFrame) {
        self.classes.push(frame);
    }

    pub fn exit_class(&mut self) {
        self.classes.pop();
    }

    pub fn current_class(&self) -> Option<&ClassFrame> {
        self.classes.last()
    }

    pub fn current_class_name(&self) -> &str {
        self.current_class().map(|c| c.name.as_str()).unwrap_or(RECEIVER_NAME)
    }

    pub fn current_base(&self) -> Option<&str> {
        self.current_class().and_then(|c| c.base.as_deref())
    }

    /// Whether `name` is a type parameter of an enclosing class or of the
    /// method being built.
    pub fn is_type_parameter(&self, name: &str) -> bool {
        self.method_type_parameters.iter().any(|p| p == name)
            || self
                .classes
                .iter()
                .any(|c| c.type_parameters.iter().any(|p| p == name))
    }

    /// Sets the type parameters of the method being built.
    pub fn set_method_type_parameters(&mut self, parameters: Vec<String>) {
        self.method_type_parameters = parameters;
    }

    pub fn is_static_method(&self, name: &str) -> bool {
        self.current_class()
            .is_some_and(|c| c.static_methods.contains(name))
    }

    // =========================================================================
    // LOCAL SCOPES
    // =========================================================================

    pub fn enter_scope(&mut self) {
        self.scopes.push(IndexSet::new());
    }

    pub fn exit_scope(&mut self) {
        self.scopes.pop();
    }

    pub fn declare_local(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string());
        }
    }

    /// Resolves an unqualified name used inside a body.
    pub fn lookup(&self, name: &str) -> NameRef {
        if self.scopes.iter().rev().any(|scope| scope.contains(name)) {
            return NameRef::Local;
        }
        match self.current_class() {
            Some(class) if class.instance_fields.contains(name) => NameRef::InstanceField,
            Some(class) if class.static_fields.contains(name) => {
                NameRef::StaticField(format!("{}_{}", class.name, name))
            }
            _ => NameRef::Unknown,
        }
    }

    /// Runs `f` with a fresh local scope.
    pub fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.enter_scope();
        let result = f(self);
        self.exit_scope();
        result
    }

    // =========================================================================
    // DIAGNOSTICS
    // =========================================================================

    /// Records a construction error and keeps building.
    pub fn report(&mut self, error: AstError) {
        tracing::debug!(source = %self.source, %error, "construction error");
        self.diagnostics.push(Diagnostic::from_error(&error));
    }

    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}
