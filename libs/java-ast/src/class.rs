//! # Class AST
//!
//! Declarations that aggregate statements: classes, interfaces and enums with
//! their fields, methods, enum constants and imports. A [`CompilationUnit`]
//! holds every class declared in one source file, nested classes flattened
//! next to their enclosing class.
//!
//! Links to other classes (base class, owning package) are arena ids set once
//! by the resolution pass. A class never owns another class.

use crate::expr::{Block, Expr, VariableDecl};
use crate::types::{ClassId, PackageId, TypeRef};
use config::constants::{DEFAULT_PACKAGE_NAME, QUALIFIED_NAME_SEPARATOR};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::OnceLock;

// =============================================================================
// MEMBERS
// =============================================================================

/// Rendering mode of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub decl: VariableDecl,
    pub public: bool,
    pub static_: bool,
    pub transient: bool,
}

impl Field {
    pub fn new(decl: VariableDecl) -> Self {
        Self {
            decl,
            public: false,
            static_: false,
            transient: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.decl.name
    }

    /// `<name> <type>`
    pub fn declaration(&self) -> String {
        format!("{} {}", self.decl.name, self.decl.ty.go_type())
    }

    /// `<name> = <expression>`, only for fields with an initializer.
    pub fn initializer(&self) -> Option<String> {
        self.decl
            .initializer
            .as_ref()
            .map(|value| format!("{} = {}", self.decl.name, value))
    }

    pub fn has_initializer(&self) -> bool {
        self.decl.has_initializer()
    }
}

/// A method or constructor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Method {
    pub name: String,
    pub parameters: Vec<VariableDecl>,
    pub return_type: Option<TypeRef>,
    /// `None` for abstract and interface methods
    pub body: Option<Block>,
    pub static_: bool,
    pub constructor: bool,
}

impl Method {
    /// `(a int, b string)`
    pub fn go_parameters(&self) -> String {
        let parameters: Vec<String> = self.parameters.iter().map(VariableDecl::typed).collect();
        format!("({})", parameters.join(", "))
    }

    /// Result type with a leading space, empty for `void` and constructors.
    pub fn go_result(&self) -> String {
        match &self.return_type {
            Some(ty) if !ty.is_void() => format!(" {}", ty.go_type()),
            _ => String::new(),
        }
    }

    /// `name(args) ret`
    pub fn signature(&self) -> String {
        format!("{}{}{}", self.name, self.go_parameters(), self.go_result())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumConstant {
    pub name: String,
    pub arguments: Vec<Expr>,
}

impl EnumConstant {
    /// Go constant name inside enum `owner` (`Color_RED`).
    pub fn go_name(&self, owner: &str) -> String {
        format!("{owner}_{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Import {
    /// Imported name without the trailing `.*`
    pub path: String,
    pub on_demand: bool,
    pub static_: bool,
}

impl Import {
    /// Simple name a single-type import makes visible.
    pub fn simple_name(&self) -> Option<&str> {
        if self.on_demand {
            return None;
        }
        self.path.rsplit(QUALIFIED_NAME_SEPARATOR).next()
    }

    /// Package part of the import (`a.b` for `a.b.C` and for `a.b.*`).
    pub fn package(&self) -> &str {
        if self.on_demand {
            return &self.path;
        }
        self.path
            .rsplit_once(QUALIFIED_NAME_SEPARATOR)
            .map(|(package, _)| package)
            .unwrap_or_default()
    }
}

// =============================================================================
// CLASS
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Class {
    /// Go type name (`Outer_Inner` for nested classes)
    pub name: String,
    /// Name as declared inside its file (`Outer.Inner` for nested classes)
    pub declared_name: String,
    pub enclosing: Option<String>,
    pub kind: ClassKind,
    pub members: Vec<Method>,
    fields: Vec<Field>,
    fields_by_name: IndexMap<String, usize>,
    pub base: Option<TypeRef>,
    #[serde(skip)]
    base_link: OnceLock<ClassId>,
    /// Implemented interfaces, or extended interfaces for an interface
    pub interfaces: Vec<TypeRef>,
    /// Qualified package name, empty for the default package
    pub package_name: String,
    #[serde(skip)]
    package_link: OnceLock<PackageId>,
    pub type_parameters: Vec<String>,
    pub constants: Vec<EnumConstant>,
    pub imports: Vec<Import>,
    pub synthesized: bool,
    /// Source file the class was declared in, empty for synthesized classes
    pub file: String,
}

impl Class {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        let name = name.into();
        Self {
            declared_name: name.clone(),
            name,
            enclosing: None,
            kind,
            members: Vec::new(),
            fields: Vec::new(),
            fields_by_name: IndexMap::new(),
            base: None,
            base_link: OnceLock::new(),
            interfaces: Vec::new(),
            package_name: String::new(),
            package_link: OnceLock::new(),
            type_parameters: Vec::new(),
            constants: Vec::new(),
            imports: Vec::new(),
            synthesized: false,
            file: String::new(),
        }
    }

    /// Creates an empty placeholder for a referenced but undefined type.
    pub fn synthesized(name: impl Into<String>, package_name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            package_name: package_name.into(),
            synthesized: true,
            ..Self::new(name, kind)
        }
    }

    /// Adds a field. A field with the same name replaces the earlier one in
    /// place, keeping its declaration position.
    pub fn add_field(&mut self, field: Field) {
        match self.fields_by_name.get(field.name()) {
            Some(&index) => self.fields[index] = field,
            None => {
                self.fields_by_name.insert(field.name().to_string(), self.fields.len());
                self.fields.push(field);
            }
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields_by_name.get(name).map(|&index| &self.fields[index])
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    pub fn is_enum(&self) -> bool {
        self.kind == ClassKind::Enum
    }

    /// `package.Declared.Name`, or the declared name in the default package.
    pub fn qualified_name(&self) -> String {
        qualify(&self.package_name, &self.declared_name)
    }

    /// Last segment of the package name (`main` for the default package).
    pub fn package_identifier(&self) -> &str {
        if self.package_name.is_empty() {
            return DEFAULT_PACKAGE_NAME;
        }
        self.package_name
            .rsplit(QUALIFIED_NAME_SEPARATOR)
            .next()
            .unwrap_or(&self.package_name)
    }

    /// Go name with type parameters (`Box[T]`).
    pub fn go_type_name(&self) -> String {
        if self.type_parameters.is_empty() {
            self.name.clone()
        } else {
            format!("{}[{}]", self.name, self.type_parameters.join(", "))
        }
    }

    /// Type parameter list for a declaration (`[T any, U any]`).
    pub fn go_type_parameters(&self) -> String {
        if self.type_parameters.is_empty() {
            return String::new();
        }
        let parameters: Vec<String> = self.type_parameters.iter().map(|p| format!("{p} any")).collect();
        format!("[{}]", parameters.join(", "))
    }

    pub fn constructors(&self) -> impl Iterator<Item = &Method> {
        self.members.iter().filter(|m| m.constructor)
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.members.iter().filter(|m| !m.constructor)
    }

    pub fn link_package(&self, package: PackageId) -> bool {
        self.package_link.set(package).is_ok()
    }

    pub fn package_id(&self) -> Option<PackageId> {
        self.package_link.get().copied()
    }

    pub fn link_base(&self, base: ClassId) -> bool {
        self.base_link.set(base).is_ok()
    }

    pub fn base_id(&self) -> Option<ClassId> {
        self.base_link.get().copied()
    }
}

/// Joins a package name and a class name.
pub fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}{QUALIFIED_NAME_SEPARATOR}{name}")
    }
}

// =============================================================================
// COMPILATION UNIT
// =============================================================================

/// Every class declared in one source file.
#[derive(Debug, Clone, Serialize)]
pub struct CompilationUnit {
    pub source: String,
    pub package: Option<String>,
    pub imports: Vec<Import>,
    pub classes: Vec<Class>,
}

impl CompilationUnit {
    pub fn package_name(&self) -> &str {
        self.package.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Literal;

    fn int_field(name: &str, value: Option<&str>) -> Field {
        let initializer = value.map(|v| Expr::Literal(Literal::new(Some(v.to_string())).unwrap()));
        Field::new(VariableDecl::new(Some(TypeRef::new("int")), Some(name.to_string()), initializer, false).unwrap())
    }

    #[test]
    fn test_field_declaration_and_initializer() {
        let field = int_field("x", Some("5"));
        assert_eq!(field.declaration(), "x int");
        assert_eq!(field.initializer().as_deref(), Some("x = 5"));

        let bare = int_field("y", None);
        assert!(!bare.has_initializer());
        assert!(bare.initializer().is_none());
    }

    #[test]
    fn test_duplicate_field_replaces_in_place() {
        let mut class = Class::new("Foo", ClassKind::Class);
        class.add_field(int_field("a", None));
        class.add_field(int_field("b", None));
        class.add_field(int_field("a", Some("1")));

        let names: Vec<_> = class.fields().iter().map(Field::name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(class.field("a").unwrap().has_initializer());
        for field in class.fields() {
            assert_eq!(class.field(field.name()), Some(field));
        }
    }

    #[test]
    fn test_qualified_name_and_package_identifier() {
        let mut class = Class::new("Foo", ClassKind::Class);
        assert_eq!(class.qualified_name(), "Foo");
        assert_eq!(class.package_identifier(), "main");
        class.package_name = "a.b".into();
        assert_eq!(class.qualified_name(), "a.b.Foo");
        assert_eq!(class.package_identifier(), "b");
    }

    #[test]
    fn test_links_are_set_once() {
        let class = Class::new("Foo", ClassKind::Class);
        assert!(class.link_base(ClassId(1)));
        assert!(!class.link_base(ClassId(2)));
        assert_eq!(class.base_id(), Some(ClassId(1)));
        assert!(class.package_id().is_none());
    }

    #[test]
    fn test_import_parts() {
        let single = Import { path: "a.b.C".into(), on_demand: false, static_: false };
        assert_eq!(single.simple_name(), Some("C"));
        assert_eq!(single.package(), "a.b");
        let wildcard = Import { path: "a.b".into(), on_demand: true, static_: false };
        assert_eq!(wildcard.simple_name(), None);
        assert_eq!(wildcard.package(), "a.b");
    }

    #[test]
    fn test_method_signature() {
        let method = Method {
            name: "add".into(),
            parameters: vec![VariableDecl::new(Some(TypeRef::new("int")), Some("a".into()), None, false).unwrap()],
            return_type: Some(TypeRef::new("int")),
            body: None,
            static_: false,
            constructor: false,
        };
        assert_eq!(method.signature(), "add(a int) int");
    }

    #[test]
    fn test_generic_names() {
        let mut class = Class::new("Box", ClassKind::Class);
        class.type_parameters = vec!["T".into()];
        assert_eq!(class.go_type_name(), "Box[T]");
        assert_eq!(class.go_type_parameters(), "[T any]");
    }
}
