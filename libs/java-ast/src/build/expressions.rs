//! # Expression Construction
//!
//! Builds [`Expr`] values from the grammar's expression nodes.
//!
//! Unqualified names are resolved against the build context: locals stay as
//! written, instance fields become `this.x`, static fields of the enclosing
//! class become `Class_x`. Method calls are classified as self-reference,
//! superclass reference or named call, in that priority.

use super::context::{BuildContext, NameRef};
use super::types::{build_type, count_dimensions};
use crate::cst::ParseNode;
use crate::error::AstError;
use crate::expr::{
    ArrayAccess, ArrayCreation, ArrayLiteral, Assignment, Binary, CallTarget, Cast, ConstructorCall, Expr, FieldAccess,
    Identifier, Literal, MethodCall, Parenthesized, Unary,
};
use crate::types::TypeRef;
use config::constants::{RECEIVER_NAME, STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use stacker::maybe_grow;

// =============================================================================
// PUBLIC API
// =============================================================================

/// Build an expression from any expression node.
///
/// ## Parameters
///
/// - `node`: expression node (`binary_expression`, `method_invocation`, literal, ...)
/// - `ctx`: build context of the enclosing unit
///
/// ## Returns
///
/// The expression, or the first construction error found inside it.
pub fn build_expression(node: &ParseNode, ctx: &mut BuildContext) -> Result<Expr, AstError> {
    maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
        build_expression_inner(node, ctx).map_err(|e| e.located(node.location()))
    })
}

/// Build every argument of an `argument_list`. A missing list yields an
/// empty vector.
pub fn build_arguments(node: Option<&ParseNode>, ctx: &mut BuildContext) -> Result<Vec<Expr>, AstError> {
    match node {
        Some(list) => list.named_children().map(|arg| build_expression(arg, ctx)).collect(),
        None => Ok(Vec::new()),
    }
}

/// Build an `array_initializer` (`{1, 2}`) with a known element type.
pub fn build_array_initializer(
    node: &ParseNode,
    element_type: Option<TypeRef>,
    ctx: &mut BuildContext,
) -> Result<Expr, AstError> {
    let nested = element_type.as_ref().map(TypeRef::element);
    let elements = node
        .named_children()
        .map(|element| match element.kind.as_str() {
            "array_initializer" => build_array_initializer(element, nested.clone(), ctx),
            _ => build_expression(element, ctx),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Expr::ArrayLiteral(ArrayLiteral::new(element_type, elements)))
}

// =============================================================================
// DISPATCH
// =============================================================================

fn build_expression_inner(node: &ParseNode, ctx: &mut BuildContext) -> Result<Expr, AstError> {
    match node.kind.as_str() {
        // Literals
        "decimal_integer_literal" | "hex_integer_literal" | "octal_integer_literal" | "binary_integer_literal" => {
            literal(node.text.trim_end_matches(['l', 'L']))
        }
        "decimal_floating_point_literal" | "hex_floating_point_literal" => {
            literal(node.text.trim_end_matches(['f', 'F', 'd', 'D']))
        }
        "true" | "false" | "character_literal" | "string_literal" => literal(&node.text),
        "text_block" => literal(&format!("`{}`", node.text.trim_matches('"').trim_start_matches('\n'))),
        "null_literal" => literal("nil"),

        // Names
        "identifier" => Ok(resolve_name(&node.text, ctx)),
        "this" => identifier(RECEIVER_NAME),
        "super" => build_super(ctx),
        "parenthesized_expression" => {
            let inner = node.first_named_child().map(|c| build_expression(c, ctx)).transpose()?;
            Ok(Expr::Parenthesized(Parenthesized::new(inner)?))
        }

        // Operators
        "binary_expression" => {
            let left = optional_expr(node.child_by_field("left"), ctx)?;
            let right = optional_expr(node.child_by_field("right"), ctx)?;
            let operator = node.child_by_field("operator").map(|op| op.text.clone());
            Ok(Expr::Binary(Binary::new(left, operator, right)?))
        }
        "unary_expression" => {
            let operand = optional_expr(node.child_by_field("operand"), ctx)?;
            let operator = node.child_by_field("operator").map(|op| op.text.clone());
            Ok(Expr::Unary(Unary::new(operator, operand, false)?))
        }
        "update_expression" => build_update(node, ctx),
        "assignment_expression" => {
            let target = optional_expr(node.child_by_field("left"), ctx)?;
            let value = optional_expr(node.child_by_field("right"), ctx)?;
            let operator = node.child_by_field("operator").map(|op| op.text.clone());
            Ok(Expr::Assignment(Assignment::new(target, operator, value)?))
        }
        "cast_expression" => {
            let ty = node.child_by_field("type").map(|t| build_type(t, ctx)).transpose()?;
            let value = optional_expr(node.child_by_field("value"), ctx)?;
            Ok(Expr::Cast(Cast::new(ty, value)?))
        }

        // Access
        "field_access" => build_field_access(node, ctx),
        "array_access" => {
            let array = optional_expr(node.child_by_field("array"), ctx)?;
            let index = optional_expr(node.child_by_field("index"), ctx)?;
            Ok(Expr::ArrayAccess(ArrayAccess::new(array, index)?))
        }

        // Calls and creation
        "method_invocation" => build_method_invocation(node, ctx),
        "explicit_constructor_invocation" => build_constructor_invocation(node, ctx),
        "object_creation_expression" => build_object_creation(node, ctx),
        "array_creation_expression" => build_array_creation(node, ctx),
        "array_initializer" => build_array_initializer(node, None, ctx),

        other => Err(AstError::unsupported(other)),
    }
}

fn optional_expr(node: Option<&ParseNode>, ctx: &mut BuildContext) -> Result<Option<Expr>, AstError> {
    node.map(|n| build_expression(n, ctx)).transpose()
}

fn literal(value: &str) -> Result<Expr, AstError> {
    Ok(Expr::Literal(Literal::new(Some(value.to_string()))?))
}

fn identifier(name: &str) -> Result<Expr, AstError> {
    Ok(Expr::Identifier(Identifier::new(Some(name.to_string()))?))
}

fn this_field(attribute: &str) -> Expr {
    Expr::FieldAccess(FieldAccess {
        object: Box::new(Expr::Identifier(Identifier { name: RECEIVER_NAME.to_string() })),
        attribute: attribute.to_string(),
    })
}

// =============================================================================
// NAMES
// =============================================================================

fn resolve_name(name: &str, ctx: &BuildContext) -> Expr {
    match ctx.lookup(name) {
        NameRef::InstanceField => this_field(name),
        NameRef::StaticField(go_name) => Expr::Identifier(Identifier { name: go_name }),
        NameRef::Local => Expr::Identifier(Identifier { name: name.to_string() }),
        NameRef::Unknown => Expr::Identifier(Identifier { name: ctx.go_class_name(name) }),
    }
}

/// `super` as a value: the embedded base (`this.Base`).
fn build_super(ctx: &BuildContext) -> Result<Expr, AstError> {
    match ctx.current_base() {
        Some(base) => Ok(this_field(base)),
        None => identifier(RECEIVER_NAME),
    }
}

/// Whether `node` names the class currently being built.
fn names_current_class(node: &ParseNode, ctx: &BuildContext) -> bool {
    node.kind == "identifier" && ctx.current_class().is_some() && ctx.go_class_name(&node.text) == ctx.current_class_name()
}

fn build_field_access(node: &ParseNode, ctx: &mut BuildContext) -> Result<Expr, AstError> {
    let object = node.child_by_field("object");
    let attribute = node.child_by_field("field").map(|f| f.text.clone());

    if let (Some(object), Some(attribute)) = (object, attribute.as_deref()) {
        if names_current_class(object, ctx) {
            if let NameRef::StaticField(go_name) = ctx.lookup(attribute) {
                return identifier(&go_name);
            }
        }
    }

    let object = optional_expr(object, ctx)?;
    Ok(Expr::FieldAccess(FieldAccess::new(object, attribute)?))
}

fn build_update(node: &ParseNode, ctx: &mut BuildContext) -> Result<Expr, AstError> {
    let operand_node = node.first_named_child();
    let operator = node.children.iter().find(|c| !c.is_named).map(|op| op.kind.clone());
    let postfix = node.children.first().is_some_and(|c| c.is_named);
    let operand = optional_expr(operand_node, ctx)?;
    Ok(Expr::Unary(Unary::new(operator, operand, postfix)?))
}

// =============================================================================
// CALLS
// =============================================================================

fn build_method_invocation(node: &ParseNode, ctx: &mut BuildContext) -> Result<Expr, AstError> {
    let name = node.child_by_field("name").map(|n| n.text.clone());
    let arguments = build_arguments(node.child_by_field("arguments"), ctx)?;
    let object = node.child_by_field("object");

    let class = ctx.current_class_name().to_string();
    let is_static = name.as_deref().is_some_and(|n| ctx.is_static_method(n));

    let (receiver, target) = match object {
        None if is_static => (identifier(&class)?, name.map(|name| CallTarget::Static { class, name })),
        None => (identifier(RECEIVER_NAME)?, name.map(CallTarget::Named)),
        Some(object) if is_static && names_current_class(object, ctx) => {
            (identifier(&class)?, name.map(|name| CallTarget::Static { class, name }))
        }
        Some(object) => (build_expression(object, ctx)?, name.map(CallTarget::Named)),
    };
    Ok(Expr::MethodCall(MethodCall::new(Some(receiver), target, arguments)?))
}

/// `this(...)` or `super(...)` as the first statement of a constructor.
fn build_constructor_invocation(node: &ParseNode, ctx: &mut BuildContext) -> Result<Expr, AstError> {
    let arguments = build_arguments(node.child_by_field("arguments"), ctx)?;
    let target = match node.child_by_field("constructor").map(|c| c.kind.as_str()) {
        Some("this") => Some(CallTarget::This { class: ctx.current_class_name().to_string() }),
        Some("super") => Some(CallTarget::Super { base: ctx.current_base().map(str::to_string) }),
        _ => None,
    };
    Ok(Expr::MethodCall(MethodCall::new(Some(identifier(RECEIVER_NAME)?), target, arguments)?))
}

fn build_object_creation(node: &ParseNode, ctx: &mut BuildContext) -> Result<Expr, AstError> {
    if node.find_child("class_body").is_some() {
        return Err(AstError::unsupported("anonymous class"));
    }
    let mut class = node.child_by_field("type").map(|t| build_type(t, ctx)).transpose()?;
    let type_arguments = class.as_mut().map(|c| std::mem::take(&mut c.arguments)).unwrap_or_default();
    let arguments = build_arguments(node.child_by_field("arguments"), ctx)?;
    Ok(Expr::ConstructorCall(ConstructorCall::new(class, type_arguments, arguments)?))
}

fn build_array_creation(node: &ParseNode, ctx: &mut BuildContext) -> Result<Expr, AstError> {
    let base = node.child_by_field("type").map(|t| build_type(t, ctx)).transpose()?;
    let lengths: Vec<&ParseNode> = node.children_by_field("dimensions").filter(|d| d.kind == "dimensions_expr").collect();
    let extra = node
        .children_by_field("dimensions")
        .filter(|d| d.kind == "dimensions")
        .map(count_dimensions)
        .sum::<usize>();

    if let Some(value) = node.child_by_field("value") {
        let element = base.map(|b| b.with_dimensions(extra.saturating_sub(1)));
        return build_array_initializer(value, element, ctx);
    }

    let element = base.map(|b| b.with_dimensions(lengths.len().saturating_sub(1) + extra));
    let length = lengths
        .first()
        .and_then(|d| d.first_named_child())
        .map(|e| build_expression(e, ctx))
        .transpose()?;
    Ok(Expr::ArrayCreation(ArrayCreation::new(element, length)?))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::context::ClassFrame;

    fn ctx_in_class() -> BuildContext {
        let mut ctx = BuildContext::new("Foo.java");
        ctx.enter_class(ClassFrame {
            name: "Foo".into(),
            base: Some("Base".into()),
            instance_fields: ["x".to_string()].into_iter().collect(),
            static_methods: ["helper".to_string()].into_iter().collect(),
            ..ClassFrame::default()
        });
        ctx
    }

    fn args(items: Vec<ParseNode>) -> ParseNode {
        let mut children = vec![ParseNode::token("(")];
        children.extend(items);
        children.push(ParseNode::token(")"));
        ParseNode::branch("argument_list", children).with_field("arguments")
    }

    #[test]
    fn test_literal_suffixes_and_null() {
        let mut ctx = BuildContext::new("T.java");
        let long = ParseNode::leaf("decimal_integer_literal", "10L");
        assert_eq!(build_expression(&long, &mut ctx).unwrap().to_string(), "10");
        let float = ParseNode::leaf("decimal_floating_point_literal", "1.5f");
        assert_eq!(build_expression(&float, &mut ctx).unwrap().to_string(), "1.5");
        let hex = ParseNode::leaf("hex_integer_literal", "0xFF");
        assert_eq!(build_expression(&hex, &mut ctx).unwrap().to_string(), "0xFF");
        let null = ParseNode::leaf("null_literal", "null");
        assert_eq!(build_expression(&null, &mut ctx).unwrap().to_string(), "nil");
    }

    #[test]
    fn test_field_names_resolve_to_receiver() {
        let mut ctx = ctx_in_class();
        let x = ParseNode::leaf("identifier", "x");
        assert_eq!(build_expression(&x, &mut ctx).unwrap().to_string(), "this.x");
    }

    #[test]
    fn test_unqualified_call_targets_receiver() {
        let mut ctx = ctx_in_class();
        let call = ParseNode::branch(
            "method_invocation",
            vec![
                ParseNode::leaf("identifier", "run").with_field("name"),
                args(vec![ParseNode::leaf("identifier", "x"), ParseNode::token(","), ParseNode::leaf("decimal_integer_literal", "2")]),
            ],
        );
        assert_eq!(build_expression(&call, &mut ctx).unwrap().to_string(), "this.run(this.x, 2)");
    }

    #[test]
    fn test_static_call_uses_class_prefix() {
        let mut ctx = ctx_in_class();
        let call = ParseNode::branch(
            "method_invocation",
            vec![ParseNode::leaf("identifier", "helper").with_field("name"), args(vec![])],
        );
        assert_eq!(build_expression(&call, &mut ctx).unwrap().to_string(), "Foo_helper()");
    }

    #[test]
    fn test_missing_argument_list_yields_empty_arguments() {
        let mut ctx = ctx_in_class();
        let call = ParseNode::branch(
            "method_invocation",
            vec![
                ParseNode::leaf("identifier", "list").with_field("object"),
                ParseNode::leaf("identifier", "clear").with_field("name"),
            ],
        );
        match build_expression(&call, &mut ctx).unwrap() {
            Expr::MethodCall(call) => assert!(call.arguments.is_empty()),
            other => panic!("expected a method call, got {other:?}"),
        }
    }

    #[test]
    fn test_super_and_this_invocations() {
        let mut ctx = ctx_in_class();
        let sup = ParseNode::branch(
            "explicit_constructor_invocation",
            vec![ParseNode::leaf("super", "super").with_field("constructor"), args(vec![ParseNode::leaf("identifier", "x")])],
        );
        assert_eq!(build_expression(&sup, &mut ctx).unwrap().to_string(), "this.Base = NewBase(this.x)");

        let this = ParseNode::branch(
            "explicit_constructor_invocation",
            vec![ParseNode::leaf("this", "this").with_field("constructor"), args(vec![])],
        );
        assert_eq!(build_expression(&this, &mut ctx).unwrap().to_string(), "*this = *NewFoo()");
    }

    #[test]
    fn test_super_receiver_is_embedded_base() {
        let mut ctx = ctx_in_class();
        let call = ParseNode::branch(
            "method_invocation",
            vec![
                ParseNode::leaf("super", "super").with_field("object"),
                ParseNode::leaf("identifier", "describe").with_field("name"),
                args(vec![]),
            ],
        );
        assert_eq!(build_expression(&call, &mut ctx).unwrap().to_string(), "this.Base.describe()");
    }

    #[test]
    fn test_object_creation_moves_type_arguments() {
        let mut ctx = BuildContext::new("T.java");
        let creation = ParseNode::branch(
            "object_creation_expression",
            vec![
                ParseNode::token("new"),
                ParseNode::branch(
                    "generic_type",
                    vec![
                        ParseNode::leaf("type_identifier", "Box"),
                        ParseNode::branch("type_arguments", vec![ParseNode::leaf("type_identifier", "Integer")]),
                    ],
                )
                .with_field("type"),
                args(vec![ParseNode::leaf("decimal_integer_literal", "1")]),
            ],
        );
        assert_eq!(build_expression(&creation, &mut ctx).unwrap().to_string(), "NewBox[int](1)");
    }

    #[test]
    fn test_unsupported_expression_is_located() {
        let mut ctx = BuildContext::new("T.java");
        let lambda = ParseNode::leaf("lambda_expression", "x -> x").at(4, 8);
        let err = build_expression(&lambda, &mut ctx).unwrap_err();
        assert_eq!(err.to_string(), "unsupported lambda_expression at 5:9");
    }

    #[test]
    fn test_array_creation_by_length() {
        let mut ctx = BuildContext::new("T.java");
        let creation = ParseNode::branch(
            "array_creation_expression",
            vec![
                ParseNode::token("new"),
                ParseNode::leaf("integral_type", "int").with_field("type"),
                ParseNode::branch("dimensions_expr", vec![ParseNode::leaf("identifier", "n")]).with_field("dimensions"),
            ],
        );
        assert_eq!(build_expression(&creation, &mut ctx).unwrap().to_string(), "make([]int, n)");
    }

    #[test]
    fn test_deeply_nested_expression_does_not_overflow() {
        let mut ctx = BuildContext::new("T.java");
        let mut node = ParseNode::leaf("decimal_integer_literal", "1");
        for _ in 0..2_000 {
            node = ParseNode::branch("parenthesized_expression", vec![ParseNode::token("("), node, ParseNode::token(")")]);
        }
        assert!(build_expression(&node, &mut ctx).is_ok());
    }
}
