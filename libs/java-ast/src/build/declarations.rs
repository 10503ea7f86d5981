//! # Declaration Construction
//!
//! Builds classes, interfaces and enums with their members. Nested classes
//! are flattened: `Outer.Inner` becomes a sibling class named `Outer_Inner`
//! placed right after its enclosing class.
//!
//! A malformed member is reported to the context and skipped so the rest of
//! the class is still checked.

use super::context::{BuildContext, ClassFrame};
use super::expressions::build_arguments;
use super::statements::{build_block, build_declarators, build_statements};
use super::types::{build_type, count_dimensions, type_parameter_names};
use crate::class::{Class, ClassKind, EnumConstant, Field, Import, Method};
use crate::cst::ParseNode;
use crate::error::AstError;
use crate::expr::{Block, VariableDecl};
use crate::types::TypeRef;
use config::constants::QUALIFIED_NAME_SEPARATOR;
use tracing::debug;

/// Node kinds that declare a type.
pub const TYPE_DECLARATIONS: &[&str] = &["class_declaration", "interface_declaration", "enum_declaration"];

/// Declaring class of a nested declaration.
#[derive(Debug, Clone, Copy)]
pub struct Enclosing<'a> {
    pub declared: &'a str,
    pub go_name: &'a str,
}

// =============================================================================
// PRE-SCAN
// =============================================================================

/// Records every class declared in a file, nested ones included, so bodies
/// can refer to classes declared further down.
pub fn declare_classes(node: &ParseNode, enclosing: Option<Enclosing<'_>>, ctx: &mut BuildContext) {
    for declaration in node.named_children().filter(|c| TYPE_DECLARATIONS.contains(&c.kind.as_str())) {
        let Some(name) = declaration.child_by_field("name") else {
            continue;
        };
        let (declared, go_name) = names(&name.text, enclosing);
        ctx.declare_class(&declared, &go_name);
        if let Some(body) = declaration.child_by_field("body") {
            let nested = Enclosing { declared: &declared, go_name: &go_name };
            declare_classes(body, Some(nested), ctx);
            if let Some(members) = body.find_child("enum_body_declarations") {
                declare_classes(members, Some(nested), ctx);
            }
        }
    }
}

fn names(name: &str, enclosing: Option<Enclosing<'_>>) -> (String, String) {
    match enclosing {
        Some(outer) => (
            format!("{}{}{}", outer.declared, QUALIFIED_NAME_SEPARATOR, name),
            format!("{}_{}", outer.go_name, name),
        ),
        None => (name.to_string(), name.to_string()),
    }
}

// =============================================================================
// CLASSES
// =============================================================================

/// Build a type declaration and its nested declarations.
///
/// ## Parameters
///
/// - `node`: `class_declaration`, `interface_declaration` or `enum_declaration`
/// - `enclosing`: the declaring class for nested declarations
/// - `imports`: imports of the compilation unit, copied onto each class
/// - `out`: receives the class followed by its flattened nested classes
///
/// ## Returns
///
/// `Err` only when the declaration itself is unusable (no name). Errors in
/// members are reported to `ctx` and building continues.
pub fn build_class(
    node: &ParseNode,
    enclosing: Option<Enclosing<'_>>,
    imports: &[Import],
    ctx: &mut BuildContext,
    out: &mut Vec<Class>,
) -> Result<(), AstError> {
    let kind = match node.kind.as_str() {
        "interface_declaration" => ClassKind::Interface,
        "enum_declaration" => ClassKind::Enum,
        _ => ClassKind::Class,
    };
    let name = node.required_field("name", "class declaration")?;
    let (declared, go_name) = names(&name.text, enclosing);

    let mut class = Class::new(go_name.clone(), kind);
    class.declared_name = declared.clone();
    class.enclosing = enclosing.map(|outer| outer.go_name.to_string());
    class.package_name = ctx.package().unwrap_or_default().to_string();
    class.imports = imports.to_vec();
    class.file = ctx.source().to_string();
    class.type_parameters = node
        .child_by_field("type_parameters")
        .map(type_parameter_names)
        .unwrap_or_default();

    ctx.enter_class(ClassFrame {
        name: go_name.clone(),
        type_parameters: class.type_parameters.clone(),
        ..ClassFrame::default()
    });
    let result = build_class_body(node, &mut class, imports, ctx, Enclosing { declared: &declared, go_name: &go_name });
    ctx.exit_class();
    let nested = result?;

    debug!(class = %class.qualified_name(), kind = ?class.kind, members = class.members.len(), "built class");
    out.push(class);
    out.extend(nested);
    Ok(())
}

fn build_class_body(
    node: &ParseNode,
    class: &mut Class,
    imports: &[Import],
    ctx: &mut BuildContext,
    this: Enclosing<'_>,
) -> Result<Vec<Class>, AstError> {
    // Supertypes
    match class.kind {
        ClassKind::Class => {
            if let Some(superclass) = node.child_by_field("superclass") {
                match superclass.first_named_child().map(|t| build_type(t, ctx)).transpose() {
                    Ok(base) => class.base = base,
                    Err(error) => ctx.report(error),
                }
            }
            class.interfaces = report_types(node.child_by_field("interfaces"), ctx);
        }
        ClassKind::Interface => class.interfaces = report_types(node.find_child("extends_interfaces"), ctx),
        ClassKind::Enum => class.interfaces = report_types(node.child_by_field("interfaces"), ctx),
    }

    let Some(body) = node.child_by_field("body") else {
        return Err(AstError::missing("class declaration", "body").located(node.location()));
    };
    let mut members: Vec<&ParseNode> = body.named_children().collect();
    if let Some(extra) = body.find_child("enum_body_declarations") {
        members.retain(|m| m.kind != "enum_body_declarations");
        members.extend(extra.named_children());
    }

    prepare_frame(class, &members, ctx);

    let mut nested = Vec::new();
    for member in members {
        let built = build_member(member, class, imports, ctx, this, &mut nested);
        if let Err(error) = built {
            ctx.report(error.located(member.location()));
        }
    }
    Ok(nested)
}

/// Base and implemented types from a `superclass`/`super_interfaces`/
/// `extends_interfaces` node. Malformed entries are reported and skipped.
fn report_types(node: Option<&ParseNode>, ctx: &mut BuildContext) -> Vec<TypeRef> {
    let Some(node) = node else {
        return Vec::new();
    };
    let list = node.find_child("type_list").unwrap_or(node);
    let mut types = Vec::new();
    for entry in list.named_children() {
        match build_type(entry, ctx) {
            Ok(ty) => types.push(ty),
            Err(error) => ctx.report(error),
        }
    }
    types
}

/// Fills the current frame with the members visible from method bodies.
fn prepare_frame(class: &Class, members: &[&ParseNode], ctx: &mut BuildContext) {
    let base = class.base.as_ref().map(|b| ctx.go_class_name(&b.name));
    let mut frame = ClassFrame {
        name: class.name.clone(),
        base,
        type_parameters: class.type_parameters.clone(),
        ..ClassFrame::default()
    };

    for member in members {
        let is_static = has_modifier(member, "static");
        match member.kind.as_str() {
            "field_declaration" | "constant_declaration" => {
                let static_field = is_static || class.kind == ClassKind::Interface;
                for name in member.children_by_field("declarator").filter_map(|d| d.child_by_field("name")) {
                    if static_field {
                        frame.static_fields.insert(name.text.clone());
                    } else {
                        frame.instance_fields.insert(name.text.clone());
                    }
                }
            }
            "enum_constant" => {
                if let Some(name) = member.child_by_field("name") {
                    frame.static_fields.insert(name.text.clone());
                }
            }
            "method_declaration" if is_static => {
                if let Some(name) = member.child_by_field("name") {
                    frame.static_methods.insert(name.text.clone());
                }
            }
            _ => {}
        }
    }

    ctx.exit_class();
    ctx.enter_class(frame);
}

fn build_member(
    member: &ParseNode,
    class: &mut Class,
    imports: &[Import],
    ctx: &mut BuildContext,
    this: Enclosing<'_>,
    nested: &mut Vec<Class>,
) -> Result<(), AstError> {
    match member.kind.as_str() {
        "field_declaration" => {
            for field in build_fields(member, ctx)? {
                class.add_field(field);
            }
        }
        "constant_declaration" => {
            debug!(class = %class.name, "interface constant dropped");
        }
        "method_declaration" => class.members.push(build_method(member, ctx)?),
        "constructor_declaration" => class.members.push(build_constructor(member, &class.name, ctx)?),
        "enum_constant" => class.constants.push(build_enum_constant(member, ctx)?),
        kind if TYPE_DECLARATIONS.contains(&kind) => build_class(member, Some(this), imports, ctx, nested)?,
        other => return Err(AstError::unsupported(other)),
    }
    Ok(())
}

// =============================================================================
// MEMBERS
// =============================================================================

fn has_modifier(node: &ParseNode, modifier: &str) -> bool {
    node.find_child("modifiers").is_some_and(|m| m.has_token(modifier))
}

fn build_fields(node: &ParseNode, ctx: &mut BuildContext) -> Result<Vec<Field>, AstError> {
    let public = has_modifier(node, "public");
    let static_ = has_modifier(node, "static");
    let transient = has_modifier(node, "transient");
    let declarators = ctx.scoped(|ctx| build_declarators(node, ctx))?;
    Ok(declarators
        .into_iter()
        .map(|decl| Field { decl, public, static_, transient })
        .collect())
}

fn build_parameters(node: Option<&ParseNode>, ctx: &mut BuildContext) -> Result<Vec<VariableDecl>, AstError> {
    let Some(list) = node else {
        return Ok(Vec::new());
    };
    let mut parameters = Vec::new();
    for parameter in list.named_children() {
        let decl = match parameter.kind.as_str() {
            "formal_parameter" => {
                let ty = parameter.child_by_field("type").map(|t| build_type(t, ctx)).transpose()?;
                let extra = parameter.child_by_field("dimensions").map(count_dimensions).unwrap_or(0);
                let ty = ty.map(|t| {
                    let dimensions = t.dimensions + extra;
                    t.with_dimensions(dimensions)
                });
                let name = parameter.child_by_field("name").map(|n| n.text.clone());
                VariableDecl::new(ty, name, None, false)?
            }
            "spread_parameter" => {
                let ty = parameter
                    .named_children()
                    .find(|c| c.kind != "modifiers" && c.kind != "variable_declarator")
                    .map(|t| build_type(t, ctx))
                    .transpose()?
                    .map(|t| {
                        let dimensions = t.dimensions + 1;
                        t.with_dimensions(dimensions)
                    });
                let name = parameter
                    .find_child("variable_declarator")
                    .and_then(|d| d.child_by_field("name"))
                    .map(|n| n.text.clone());
                VariableDecl::new(ty, name, None, true)?
            }
            "receiver_parameter" => continue,
            other => return Err(AstError::unsupported(other).located(parameter.location())),
        };
        parameters.push(decl);
    }
    Ok(parameters)
}

fn build_method(node: &ParseNode, ctx: &mut BuildContext) -> Result<Method, AstError> {
    let name = node.required_field("name", "method declaration")?.text.clone();
    ctx.set_method_type_parameters(
        node.child_by_field("type_parameters")
            .map(type_parameter_names)
            .unwrap_or_default(),
    );

    let result = ctx.scoped(|ctx| {
        let return_type = node.child_by_field("type").map(|t| build_type(t, ctx)).transpose()?;
        let extra = node.child_by_field("dimensions").map(count_dimensions).unwrap_or(0);
        let return_type = return_type.map(|t| {
            let dimensions = t.dimensions + extra;
            t.with_dimensions(dimensions)
        });
        let parameters = build_parameters(node.child_by_field("parameters"), ctx)?;
        for parameter in &parameters {
            ctx.declare_local(&parameter.name);
        }
        let body = node.child_by_field("body").map(|b| build_block(b, ctx)).transpose()?;
        Ok(Method {
            name,
            parameters,
            return_type,
            body,
            static_: has_modifier(node, "static"),
            constructor: false,
        })
    });
    ctx.set_method_type_parameters(Vec::new());
    result
}

fn build_constructor(node: &ParseNode, class_name: &str, ctx: &mut BuildContext) -> Result<Method, AstError> {
    ctx.scoped(|ctx| {
        let parameters = build_parameters(node.child_by_field("parameters"), ctx)?;
        for parameter in &parameters {
            ctx.declare_local(&parameter.name);
        }
        let body = match node.child_by_field("body") {
            Some(body) => Block::new(build_statements(body.named_children(), ctx)?),
            None => return Err(AstError::missing("constructor", "body")),
        };
        Ok(Method {
            name: class_name.to_string(),
            parameters,
            return_type: None,
            body: Some(body),
            static_: false,
            constructor: true,
        })
    })
}

fn build_enum_constant(node: &ParseNode, ctx: &mut BuildContext) -> Result<EnumConstant, AstError> {
    if node.child_by_field("body").is_some() {
        return Err(AstError::unsupported("enum constant body"));
    }
    let name = node.required_field("name", "enum constant")?.text.clone();
    let arguments = build_arguments(node.child_by_field("arguments"), ctx)?;
    Ok(EnumConstant { name, arguments })
}

// =============================================================================
// TESTS
// =============================================================================
