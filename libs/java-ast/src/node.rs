//! # Node Model
//!
//! A borrowed view over every AST element as one closed sum type. Generic
//! traversals (the hierarchy resolver, counting visitors in tests) walk the
//! tree through [`Node::children`] and never need to know each struct.

use crate::class::{Class, CompilationUnit, EnumConstant, Field, Import, Method};
use crate::error::RenderError;
use crate::expr::{Expr, VariableDecl};
use crate::render::render_class;
use crate::types::TypeRef;

#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Unit(&'a CompilationUnit),
    Class(&'a Class),
    Field(&'a Field),
    Method(&'a Method),
    EnumConstant(&'a EnumConstant),
    Import(&'a Import),
    Type(&'a TypeRef),
    Variable(&'a VariableDecl),
    Expr(&'a Expr),
}

impl<'a> Node<'a> {
    /// Short name of the node kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Unit(_) => "unit",
            Node::Class(_) => "class",
            Node::Field(_) => "field",
            Node::Method(_) => "method",
            Node::EnumConstant(_) => "enum constant",
            Node::Import(_) => "import",
            Node::Type(_) => "type",
            Node::Variable(_) => "variable",
            Node::Expr(_) => "expression",
        }
    }

    /// Structural children in declaration order.
    ///
    /// A class yields its imports, fields, enum constants and members. Its
    /// base class and interfaces are references, not children: the resolver
    /// handles them when it visits the class itself.
    pub fn children(&self) -> Vec<Node<'a>> {
        match *self {
            Node::Unit(unit) => unit.classes.iter().map(Node::Class).collect(),
            Node::Class(class) => {
                let mut children: Vec<Node<'a>> = class.imports.iter().map(Node::Import).collect();
                children.extend(class.fields().iter().map(Node::Field));
                children.extend(class.constants.iter().map(Node::EnumConstant));
                children.extend(class.members.iter().map(Node::Method));
                children
            }
            Node::Field(field) => variable_children(&field.decl),
            Node::Method(method) => {
                let mut children: Vec<Node<'a>> = method.parameters.iter().map(Node::Variable).collect();
                children.extend(method.return_type.iter().map(Node::Type));
                if let Some(body) = &method.body {
                    children.extend(body.statements.iter().map(Node::Expr));
                }
                children
            }
            Node::EnumConstant(constant) => constant.arguments.iter().map(Node::Expr).collect(),
            Node::Import(_) => Vec::new(),
            Node::Type(ty) => ty.arguments.iter().map(Node::Type).collect(),
            Node::Variable(decl) => variable_children(decl),
            Node::Expr(expr) => expr_children(expr),
        }
    }

    /// Go text for this node.
    pub fn render(&self) -> Result<String, RenderError> {
        match self {
            Node::Unit(unit) => {
                let classes = unit
                    .classes
                    .iter()
                    .map(render_class)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(classes.join("\n"))
            }
            Node::Class(class) => render_class(class),
            Node::Field(field) => Ok(field.declaration()),
            Node::Method(method) => Ok(method.signature()),
            Node::EnumConstant(constant) => Ok(constant.name.clone()),
            Node::Import(import) => Ok(format!("// import {}", import.path)),
            Node::Type(ty) => Ok(ty.go_type()),
            Node::Variable(decl) => Ok(decl.typed()),
            Node::Expr(expr) => Ok(expr.render_statement()),
        }
    }
}

fn variable_children(decl: &VariableDecl) -> Vec<Node<'_>> {
    let mut children = vec![Node::Type(&decl.ty)];
    children.extend(decl.initializer.as_deref().map(Node::Expr));
    children
}

fn exprs<'a>(items: &[&'a Expr]) -> Vec<Node<'a>> {
    items.iter().map(|e| Node::Expr(*e)).collect()
}

fn expr_children(expr: &Expr) -> Vec<Node<'_>> {
    match expr {
        Expr::Literal(_) | Expr::Identifier(_) | Expr::Break(_) | Expr::Continue(_) => Vec::new(),
        Expr::Conditional(c) => {
            let mut children = exprs(&[&*c.condition, &*c.body]);
            children.extend(c.else_branch.as_deref().map(Node::Expr));
            children
        }
        Expr::Return(r) => r.expression.as_deref().map(Node::Expr).into_iter().collect(),
        Expr::Throw(t) => exprs(&[&*t.expression]),
        Expr::Label(l) => exprs(&[&*l.statement]),
        Expr::FieldAccess(a) => exprs(&[&*a.object]),
        Expr::MethodCall(call) => {
            let mut children = exprs(&[&*call.receiver]);
            children.extend(call.arguments.iter().map(Node::Expr));
            children
        }
        Expr::ConstructorCall(call) => {
            let mut children = vec![Node::Type(&call.class)];
            children.extend(call.type_arguments.iter().map(Node::Type));
            children.extend(call.arguments.iter().map(Node::Expr));
            children
        }
        Expr::VariableDecl(decl) => variable_children(decl),
        Expr::ArrayLiteral(array) => {
            let mut children: Vec<Node<'_>> = array.element_type.iter().map(Node::Type).collect();
            children.extend(array.elements.iter().map(Node::Expr));
            children
        }
        Expr::ArrayCreation(array) => vec![Node::Type(&array.element_type), Node::Expr(&array.length)],
        Expr::Block(block) => block.statements.iter().map(Node::Expr).collect(),
        Expr::Binary(b) => exprs(&[&*b.left, &*b.right]),
        Expr::Unary(u) => exprs(&[&*u.operand]),
        Expr::Assignment(a) => exprs(&[&*a.target, &*a.value]),
        Expr::Parenthesized(p) => exprs(&[&*p.inner]),
        Expr::ArrayAccess(a) => exprs(&[&*a.array, &*a.index]),
        Expr::Cast(c) => vec![Node::Type(&c.ty), Node::Expr(&c.value)],
        Expr::While(w) => exprs(&[&*w.condition, &*w.body]),
        Expr::For(l) => {
            let mut children: Vec<Node<'_>> = l.init.iter().map(Node::Expr).collect();
            children.extend(l.condition.as_deref().map(Node::Expr));
            children.extend(l.update.iter().map(Node::Expr));
            children.push(Node::Expr(&l.body));
            children
        }
        Expr::ForEach(each) => {
            let mut children = variable_children(&each.variable);
            children.push(Node::Expr(&each.iterable));
            children.push(Node::Expr(&each.body));
            children
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ClassKind;
    use crate::expr::{ConstructorCall, Literal, Throw};

    fn count(node: Node<'_>, kind: &str) -> usize {
        let own = usize::from(node.kind() == kind);
        own + node.children().into_iter().map(|c| count(c, kind)).sum::<usize>()
    }

    #[test]
    fn test_field_children_are_type_then_initializer() {
        let decl = VariableDecl::new(
            Some(TypeRef::new("int")),
            Some("x".into()),
            Some(Expr::Literal(Literal::new(Some("5".into())).unwrap())),
            false,
        )
        .unwrap();
        let field = Field::new(decl);
        let kinds: Vec<_> = Node::Field(&field).children().iter().map(Node::kind).collect();
        assert_eq!(kinds, vec!["type", "expression"]);
    }

    #[test]
    fn test_constructor_call_exposes_its_type() {
        let call = ConstructorCall::new(Some(TypeRef::new("Oops")), vec![], vec![]).unwrap();
        let throw = Expr::Throw(Throw::new(Some(Expr::ConstructorCall(call))).unwrap());
        assert_eq!(count(Node::Expr(&throw), "type"), 1);
    }

    #[test]
    fn test_class_children_skip_base_and_interfaces() {
        let mut class = Class::new("Foo", ClassKind::Class);
        class.base = Some(TypeRef::new("Bar"));
        class.interfaces.push(TypeRef::new("Baz"));
        assert!(Node::Class(&class).children().is_empty());
    }

    #[test]
    fn test_render_dispatches_per_kind() {
        let ty = TypeRef::new("long").with_dimensions(1);
        assert_eq!(Node::Type(&ty).render().unwrap(), "[]int64");
        let class = Class::synthesized("Gone", "", ClassKind::Class);
        assert!(Node::Class(&class).render().unwrap().contains("type Gone struct"));
    }
}
