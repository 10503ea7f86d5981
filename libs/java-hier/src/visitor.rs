//! # Generic Visitor
//!
//! Walks any [`Node`] tree. Classes and type references get their own hooks;
//! every other node kind just visits its children and folds their results.
//!
//! ## Accumulation
//!
//! ```text
//! acc = Output::default()
//! for child in node.children():
//!     acc = acc.accumulate(visit_node(child))
//! ```
//!
//! When only one side of a merge carries a value that side wins. When both
//! do, [`Accumulate::combine`] decides: counts add up, vectors concatenate,
//! options keep the first value.

use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use java_ast::{Class, Node, TypeRef};
use stacker::maybe_grow;

// =============================================================================
// ACCUMULATE
// =============================================================================

/// Result type of a visitor.
pub trait Accumulate: Default {
    /// Whether this value carries nothing worth keeping.
    fn is_empty(&self) -> bool;

    /// Merge two non-empty results.
    fn combine(self, other: Self) -> Self;

    fn accumulate(self, other: Self) -> Self {
        match (self.is_empty(), other.is_empty()) {
            (true, _) => other,
            (false, true) => self,
            (false, false) => self.combine(other),
        }
    }
}

impl Accumulate for () {
    fn is_empty(&self) -> bool {
        true
    }

    fn combine(self, _other: Self) -> Self {}
}

impl Accumulate for usize {
    fn is_empty(&self) -> bool {
        *self == 0
    }

    fn combine(self, other: Self) -> Self {
        self + other
    }
}

impl<T> Accumulate for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }

    fn combine(mut self, other: Self) -> Self {
        self.extend(other);
        self
    }
}

impl<T> Accumulate for Option<T> {
    fn is_empty(&self) -> bool {
        self.is_none()
    }

    fn combine(self, other: Self) -> Self {
        self.or(other)
    }
}

// =============================================================================
// VISITOR
// =============================================================================

pub trait Visitor {
    type Output: Accumulate;

    fn visit_node(&mut self, node: Node<'_>) -> Self::Output {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || match node {
            Node::Class(class) => self.visit_class(class),
            Node::Type(ty) => self.visit_type(ty),
            other => self.visit_children(other),
        })
    }

    fn visit_class(&mut self, class: &Class) -> Self::Output {
        self.visit_children(Node::Class(class))
    }

    fn visit_type(&mut self, ty: &TypeRef) -> Self::Output {
        self.visit_children(Node::Type(ty))
    }

    fn visit_children(&mut self, node: Node<'_>) -> Self::Output {
        node.children()
            .into_iter()
            .fold(Self::Output::default(), |acc, child| {
                let result = self.visit_node(child);
                acc.accumulate(result)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use java_ast::expr::{Binary, Identifier, Literal, Return};
    use java_ast::{ClassKind, Expr, Field, Method, VariableDecl};

    fn sample() -> Class {
        let mut class = Class::new("Pair", ClassKind::Class);
        class.add_field(Field::new(
            VariableDecl::new(Some(TypeRef::new("Left")), Some("left".to_string()), None, false).unwrap(),
        ));
        class.add_field(Field::new(
            VariableDecl::new(
                Some(TypeRef::new("Box").with_arguments(vec![TypeRef::new("Right")])),
                Some("right".to_string()),
                None,
                false,
            )
            .unwrap(),
        ));
        let sum = Expr::Binary(
            Binary::new(
                Some(Expr::Identifier(Identifier::new(Some("a".to_string())).unwrap())),
                Some("+".to_string()),
                Some(Expr::Literal(Literal::new(Some("1".to_string())).unwrap())),
            )
            .unwrap(),
        );
        class.members.push(Method {
            name: "total".to_string(),
            parameters: Vec::new(),
            return_type: Some(TypeRef::new("int")),
            body: Some(java_ast::expr::Block::new(vec![Expr::Return(Return::new(Some(sum)))])),
            static_: false,
            constructor: false,
        });
        class
    }

    struct CountNodes;

    impl Visitor for CountNodes {
        type Output = usize;

        fn visit_class(&mut self, class: &Class) -> usize {
            1 + self.visit_children(Node::Class(class))
        }

        fn visit_type(&mut self, ty: &TypeRef) -> usize {
            1 + self.visit_children(Node::Type(ty))
        }

        fn visit_children(&mut self, node: Node<'_>) -> usize {
            let below = node
                .children()
                .into_iter()
                .fold(0, |acc: usize, child| acc.accumulate(self.visit_node(child)));
            match node {
                Node::Class(_) | Node::Type(_) => below,
                _ => 1 + below,
            }
        }
    }

    struct TypeNames;

    impl Visitor for TypeNames {
        type Output = Vec<String>;

        fn visit_type(&mut self, ty: &TypeRef) -> Vec<String> {
            vec![ty.name.clone()].accumulate(self.visit_children(Node::Type(ty)))
        }
    }

    struct FirstNamed;

    impl Visitor for FirstNamed {
        type Output = Option<String>;

        fn visit_type(&mut self, ty: &TypeRef) -> Option<String> {
            ty.needs_resolution().then(|| ty.name.clone())
        }
    }

    #[test]
    fn test_accumulate_one_side_wins() {
        assert_eq!(0usize.accumulate(4), 4);
        assert_eq!(Vec::<u8>::new().accumulate(vec![1]), vec![1]);
        assert_eq!(None.accumulate(Some(2)), Some(2));
        assert_eq!(Some(1).accumulate(None), Some(1));
    }

    #[test]
    fn test_accumulate_combines_two_values() {
        assert_eq!(3usize.accumulate(4), 7);
        assert_eq!(vec![1, 2].accumulate(vec![3]), vec![1, 2, 3]);
        assert_eq!(Some("first").accumulate(Some("second")), Some("first"));
    }

    #[test]
    fn test_count_every_node() {
        // class, 2 fields, 3 types, method, return type, return, binary, 2 operands
        assert_eq!(CountNodes.visit_node(Node::Class(&sample())), 12);
    }

    #[test]
    fn test_collect_type_names_in_order() {
        let names = TypeNames.visit_node(Node::Class(&sample()));
        assert_eq!(names, vec!["Left", "Box", "Right", "int"]);
    }

    #[test]
    fn test_first_named_type_wins() {
        assert_eq!(FirstNamed.visit_node(Node::Class(&sample())), Some("Left".to_string()));
    }
}
