//! # Statement Construction
//!
//! Builds statement sequences from `block` and statement nodes. One Java
//! statement may produce several (a declaration with many declarators) or
//! none (an empty statement).

use super::context::BuildContext;
use super::expressions::{build_array_initializer, build_expression};
use super::types::{build_type, count_dimensions};
use crate::cst::ParseNode;
use crate::error::AstError;
use crate::expr::{Block, Conditional, Expr, For, ForEach, Jump, Label, Return, Throw, VariableDecl, While};
use crate::types::TypeRef;

// =============================================================================
// PUBLIC API
// =============================================================================

/// Build the statements of a `block`, `constructor_body` or statement list.
///
/// ## Parameters
///
/// - `nodes`: statement nodes in source order
/// - `ctx`: build context; a new local scope is opened for the sequence
pub fn build_statements<'a>(
    nodes: impl IntoIterator<Item = &'a ParseNode>,
    ctx: &mut BuildContext,
) -> Result<Vec<Expr>, AstError> {
    ctx.scoped(|ctx| {
        let mut statements = Vec::new();
        for node in nodes {
            statements.extend(build_statement(node, ctx)?);
        }
        Ok(statements)
    })
}

/// Build the named statements inside a braced body.
pub fn build_block(node: &ParseNode, ctx: &mut BuildContext) -> Result<Block, AstError> {
    Ok(Block::new(build_statements(node.named_children(), ctx)?))
}

/// Build a single statement node.
///
/// ## Returns
///
/// The statements produced, possibly none.
pub fn build_statement(node: &ParseNode, ctx: &mut BuildContext) -> Result<Vec<Expr>, AstError> {
    let location = node.location();
    build_statement_inner(node, ctx).map_err(|e| e.located(location))
}

// =============================================================================
// DISPATCH
// =============================================================================

fn build_statement_inner(node: &ParseNode, ctx: &mut BuildContext) -> Result<Vec<Expr>, AstError> {
    let single = |expr: Expr| -> Result<Vec<Expr>, AstError> { Ok(vec![expr]) };

    match node.kind.as_str() {
        ";" | "empty_statement" => Ok(Vec::new()),
        "block" => single(Expr::Block(build_block(node, ctx)?)),
        "expression_statement" => match node.first_named_child() {
            Some(expression) => single(build_expression(expression, ctx)?),
            None => Ok(Vec::new()),
        },
        "explicit_constructor_invocation" => single(build_expression(node, ctx)?),
        "local_variable_declaration" => build_local_variables(node, ctx),

        "if_statement" => {
            let condition = condition(node, ctx)?;
            let body = optional_body(node.child_by_field("consequence"), ctx)?;
            let else_branch = optional_body(node.child_by_field("alternative"), ctx)?;
            single(Expr::Conditional(Conditional::new(condition, body, else_branch)?))
        }
        "while_statement" => {
            let condition = condition(node, ctx)?;
            let body = optional_body(node.child_by_field("body"), ctx)?;
            single(Expr::While(While::new(condition, body)?))
        }
        "for_statement" => ctx.scoped(|ctx| {
            let mut init = Vec::new();
            for child in node.children_by_field("init") {
                match child.kind.as_str() {
                    "local_variable_declaration" => init.extend(build_local_variables(child, ctx)?),
                    _ => init.push(build_expression(child, ctx)?),
                }
            }
            let condition = node
                .child_by_field("condition")
                .map(|c| build_expression(c, ctx))
                .transpose()?;
            let update = node
                .children_by_field("update")
                .map(|u| build_expression(u, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            let body = optional_body(node.child_by_field("body"), ctx)?;
            single(Expr::For(For::new(init, condition, update, body)?))
        }),
        "enhanced_for_statement" => ctx.scoped(|ctx| {
            let ty = node.child_by_field("type").map(|t| build_type(t, ctx)).transpose()?;
            let name = node.child_by_field("name").map(|n| n.text.clone());
            let iterable = node
                .child_by_field("value")
                .map(|v| build_expression(v, ctx))
                .transpose()?;
            let variable = VariableDecl::new(ty, name, None, false)?;
            ctx.declare_local(&variable.name);
            let body = optional_body(node.child_by_field("body"), ctx)?;
            single(Expr::ForEach(ForEach::new(Some(variable), iterable, body)?))
        }),

        "return_statement" => {
            let value = node.first_named_child().map(|v| build_expression(v, ctx)).transpose()?;
            single(Expr::Return(Return::new(value)))
        }
        "throw_statement" => {
            let value = node.first_named_child().map(|v| build_expression(v, ctx)).transpose()?;
            single(Expr::Throw(Throw::new(value)?))
        }
        "break_statement" => single(Expr::Break(Jump::new(label_of(node)))),
        "continue_statement" => single(Expr::Continue(Jump::new(label_of(node)))),
        "labeled_statement" => {
            let statement = node
                .named_children()
                .find(|c| c.kind != "identifier")
                .map(|s| build_body(s, ctx))
                .transpose()?;
            single(Expr::Label(Label::new(label_of(node), statement)?))
        }

        other => Err(AstError::unsupported(other)),
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Condition of an `if`/`while`, unwrapped from its parentheses.
fn condition(node: &ParseNode, ctx: &mut BuildContext) -> Result<Option<Expr>, AstError> {
    let Some(condition) = node.child_by_field("condition") else {
        return Ok(None);
    };
    let inner = match condition.kind.as_str() {
        "parenthesized_expression" => condition.first_named_child().unwrap_or(condition),
        _ => condition,
    };
    build_expression(inner, ctx).map(Some)
}

/// A branch or loop body as one expression: the block, or the single
/// statement it holds.
pub fn build_body(node: &ParseNode, ctx: &mut BuildContext) -> Result<Expr, AstError> {
    let mut statements = ctx.scoped(|ctx| build_statement(node, ctx))?;
    if statements.len() == 1 {
        if let Some(statement) = statements.pop() {
            return Ok(statement);
        }
    }
    Ok(Expr::Block(Block::new(statements)))
}

fn optional_body(node: Option<&ParseNode>, ctx: &mut BuildContext) -> Result<Option<Expr>, AstError> {
    node.map(|n| build_body(n, ctx)).transpose()
}

fn label_of(node: &ParseNode) -> Option<String> {
    node.find_child("identifier").map(|l| l.text.clone())
}

/// Build every declarator of a local variable or field declaration.
pub fn build_declarators(node: &ParseNode, ctx: &mut BuildContext) -> Result<Vec<VariableDecl>, AstError> {
    let base = node
        .child_by_field("type")
        .map(|t| build_type(t, ctx))
        .transpose()?
        .ok_or_else(|| AstError::missing("variable declaration", "type"))?;

    node.children_by_field("declarator")
        .map(|declarator| build_declarator(declarator, &base, ctx))
        .collect()
}

fn build_declarator(node: &ParseNode, base: &TypeRef, ctx: &mut BuildContext) -> Result<VariableDecl, AstError> {
    let extra = node.child_by_field("dimensions").map(count_dimensions).unwrap_or(0);
    let ty = base.clone().with_dimensions(base.dimensions + extra);
    let name = node.child_by_field("name").map(|n| n.text.clone());
    let initializer = match node.child_by_field("value") {
        Some(value) if value.kind == "array_initializer" => Some(build_array_initializer(value, Some(ty.element()), ctx)?),
        Some(value) => Some(build_expression(value, ctx)?),
        None => None,
    };
    VariableDecl::new(Some(ty), name, initializer, false)
}

fn build_local_variables(node: &ParseNode, ctx: &mut BuildContext) -> Result<Vec<Expr>, AstError> {
    let declarators = build_declarators(node, ctx)?;
    for decl in &declarators {
        ctx.declare_local(&decl.name);
    }
    Ok(declarators.into_iter().map(Expr::VariableDecl).collect())
}

// =============================================================================
// TESTS
// =============================================================================
