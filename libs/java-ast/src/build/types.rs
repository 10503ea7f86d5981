//! # Type Construction
//!
//! Builds [`TypeRef`]s from the grammar's type nodes.

use super::context::BuildContext;
use crate::cst::ParseNode;
use crate::error::AstError;
use crate::types::TypeRef;

/// Build a type reference from any `_type` node.
///
/// ## Parameters
///
/// - `node`: `integral_type`, `type_identifier`, `generic_type`, `array_type`, ...
/// - `ctx`: type parameters in scope decide between a parameter and a class
pub fn build_type(node: &ParseNode, ctx: &BuildContext) -> Result<TypeRef, AstError> {
    match node.kind.as_str() {
        "integral_type" | "floating_point_type" | "boolean_type" | "void_type" => {
            Ok(TypeRef::new(node.compact_text()))
        }
        "type_identifier" | "identifier" | "scoped_type_identifier" | "scoped_identifier" => {
            Ok(named(&node.compact_text(), ctx))
        }
        "generic_type" => {
            let base = node
                .named_children()
                .find(|c| c.kind != "type_arguments")
                .ok_or_else(|| AstError::missing("generic type", "name").located(node.location()))?;
            let arguments = match node.find_child("type_arguments") {
                Some(arguments) => build_type_arguments(arguments, ctx)?,
                None => Vec::new(),
            };
            Ok(named(&base.compact_text(), ctx).with_arguments(arguments))
        }
        "array_type" => {
            let element = node.required_field("element", "array type")?;
            let dimensions = node
                .child_by_field("dimensions")
                .map(count_dimensions)
                .unwrap_or(1);
            let element = build_type(element, ctx)?;
            let total = element.dimensions + dimensions;
            Ok(element.with_dimensions(total))
        }
        "annotated_type" => {
            let inner = node
                .named_children()
                .filter(|c| !c.kind.ends_with("annotation"))
                .last()
                .ok_or_else(|| AstError::missing("annotated type", "type").located(node.location()))?;
            build_type(inner, ctx)
        }
        other => Err(AstError::unsupported(format!("type {other}")).located(node.location())),
    }
}

/// Build the arguments of a `type_arguments` node (`<A, B>`). Wildcards
/// become their bound, or `Object` when unbounded.
pub fn build_type_arguments(node: &ParseNode, ctx: &BuildContext) -> Result<Vec<TypeRef>, AstError> {
    node.named_children()
        .map(|argument| match argument.kind.as_str() {
            "wildcard" => match argument.named_children().find(|c| !c.kind.ends_with("annotation")) {
                Some(bound) => build_type(bound, ctx),
                None => Ok(TypeRef::new("Object")),
            },
            _ => build_type(argument, ctx),
        })
        .collect()
}

/// Names declared by a `type_parameters` node (`<T, U extends Foo>`).
pub fn type_parameter_names(node: &ParseNode) -> Vec<String> {
    node.named_children()
        .filter(|c| c.kind == "type_parameter")
        .filter_map(|p| {
            p.named_children()
                .find(|c| c.kind == "type_identifier" || c.kind == "identifier")
                .map(|name| name.text.clone())
        })
        .collect()
}

/// Number of `[]` pairs in a `dimensions` node.
pub fn count_dimensions(node: &ParseNode) -> usize {
    node.text.matches('[').count().max(1)
}

fn named(name: &str, ctx: &BuildContext) -> TypeRef {
    if ctx.is_type_parameter(name) {
        TypeRef::parameter(name)
    } else {
        TypeRef::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::context::ClassFrame;
    use crate::types::TypeKind;

    #[test]
    fn test_primitive_and_array_types() {
        let ctx = BuildContext::new("T.java");
        let int = ParseNode::leaf("integral_type", "int");
        assert_eq!(build_type(&int, &ctx).unwrap().go_type(), "int");

        let array = ParseNode::branch(
            "array_type",
            vec![
                ParseNode::leaf("integral_type", "long").with_field("element"),
                ParseNode::leaf("dimensions", "[][]").with_field("dimensions"),
            ],
        );
        assert_eq!(build_type(&array, &ctx).unwrap().go_type(), "[][]int64");
    }

    #[test]
    fn test_generic_type_with_parameter_in_scope() {
        let mut ctx = BuildContext::new("Box.java");
        ctx.enter_class(ClassFrame { name: "Box".into(), type_parameters: vec!["T".into()], ..ClassFrame::default() });
        let generic = ParseNode::branch(
            "generic_type",
            vec![
                ParseNode::leaf("type_identifier", "Map"),
                ParseNode::branch(
                    "type_arguments",
                    vec![
                        ParseNode::token("<"),
                        ParseNode::leaf("type_identifier", "String"),
                        ParseNode::token(","),
                        ParseNode::leaf("type_identifier", "T"),
                        ParseNode::token(">"),
                    ],
                ),
            ],
        );
        let ty = build_type(&generic, &ctx).unwrap();
        assert_eq!(ty.arguments[1].kind, TypeKind::Parameter);
        assert_eq!(ty.go_type(), "*Map[string, T]");
    }

    #[test]
    fn test_type_parameter_names() {
        let params = ParseNode::branch(
            "type_parameters",
            vec![
                ParseNode::branch("type_parameter", vec![ParseNode::leaf("type_identifier", "K")]),
                ParseNode::branch("type_parameter", vec![ParseNode::leaf("type_identifier", "V")]),
            ],
        );
        assert_eq!(type_parameter_names(&params), vec!["K", "V"]);
    }
}
