//! # Class Rendering
//!
//! Go templates for classes. A class renders in exactly one mode:
//!
//! - **Synthesized**: marker comment and an empty struct (an empty interface
//!   for interface stubs)
//! - **Interface**: embedded super-interfaces and method signatures only
//! - **Enum**: an `int` type, a `const` block with `iota`, value-receiver methods
//! - **Concrete**: interface assertions, struct, construction functions, methods
//!
//! Rendering reads the class and the links set by the resolution pass. It
//! never mutates anything, so distinct classes can render concurrently.

use crate::class::{Class, ClassKind, Field, Method};
use crate::error::RenderError;
use crate::expr::{indent, render_statements};
use config::constants::{CONSTRUCTOR_PREFIX, RECEIVER_NAME, SYNTHESIZED_MARKER};
use std::fmt::Write;
use tracing::debug;

/// Renders a class with the template matching its kind.
///
/// ## Returns
///
/// The Go declarations for the class, without the `package` header.
///
/// ## Errors
///
/// `RenderError::Contract` when the class violates the invariant its
/// template relies on (a synthesized class with members, an interface with
/// fields). Interface method bodies and static interface methods have no Go
/// counterpart: the signature of a default method is kept, its body and every
/// static method are dropped.
pub fn render_class(class: &Class) -> Result<String, RenderError> {
    if class.name.is_empty() {
        return Err(contract(class, "class has no name"));
    }
    if class.synthesized {
        return render_synthesized(class);
    }
    match class.kind {
        ClassKind::Interface => render_interface(class),
        ClassKind::Enum => render_enum(class),
        ClassKind::Class => render_concrete(class),
    }
}

fn contract(class: &Class, reason: &str) -> RenderError {
    RenderError::Contract {
        class: class.qualified_name(),
        reason: reason.to_string(),
    }
}

fn format_error(class: &Class) -> impl Fn(std::fmt::Error) -> RenderError + '_ {
    move |_| RenderError::Format(class.qualified_name())
}

// =============================================================================
// SYNTHESIZED
// =============================================================================

fn render_synthesized(class: &Class) -> Result<String, RenderError> {
    if !class.members.is_empty() || !class.fields().is_empty() || !class.constants.is_empty() {
        return Err(contract(class, "synthesized class must be empty"));
    }
    let keyword = match class.kind {
        ClassKind::Interface => "interface",
        ClassKind::Class | ClassKind::Enum => "struct",
    };
    Ok(format!("{SYNTHESIZED_MARKER}\ntype {} {keyword} {{\n}}\n", class.name))
}

// =============================================================================
// INTERFACE
// =============================================================================

fn render_interface(class: &Class) -> Result<String, RenderError> {
    if !class.fields().is_empty() {
        return Err(contract(class, "interface cannot declare fields"));
    }
    let mut out = String::new();
    let err = format_error(class);

    writeln!(out, "type {}{} interface {{", class.name, class.go_type_parameters()).map_err(&err)?;
    for parent in &class.interfaces {
        writeln!(out, "\t{}{}", parent.go_name(), parent.go_arguments()).map_err(&err)?;
    }
    for method in class.methods() {
        if method.static_ {
            debug!(class = %class.qualified_name(), method = %method.name, "static interface method dropped");
            continue;
        }
        if method.body.is_some() {
            debug!(class = %class.qualified_name(), method = %method.name, "default method body dropped");
        }
        writeln!(out, "\t{}", method.signature()).map_err(&err)?;
    }
    writeln!(out, "}}").map_err(&err)?;
    Ok(out)
}

// =============================================================================
// ENUM
// =============================================================================

fn render_enum(class: &Class) -> Result<String, RenderError> {
    let mut out = String::new();
    let err = format_error(class);

    writeln!(out, "type {} int", class.name).map_err(&err)?;
    if !class.constants.is_empty() {
        writeln!(out, "\nconst (").map_err(&err)?;
        for (i, constant) in class.constants.iter().enumerate() {
            if i == 0 {
                writeln!(out, "\t{} {} = iota", constant.go_name(&class.name), class.name).map_err(&err)?;
            } else {
                writeln!(out, "\t{}", constant.go_name(&class.name)).map_err(&err)?;
            }
        }
        writeln!(out, ")").map_err(&err)?;
    }

    let receiver = format!("({RECEIVER_NAME} {})", class.name);
    for method in class.methods() {
        out.push('\n');
        out.push_str(&render_method(class, method, &receiver));
    }
    Ok(out)
}

// =============================================================================
// CONCRETE CLASS
// =============================================================================

fn render_concrete(class: &Class) -> Result<String, RenderError> {
    let mut out = String::new();
    let err = format_error(class);
    let type_name = class.go_type_name();

    if class.type_parameters.is_empty() && !class.interfaces.is_empty() {
        for interface in &class.interfaces {
            writeln!(out, "var _ {} = &{}{{}}", interface.go_name(), class.name).map_err(&err)?;
        }
        out.push('\n');
    }

    writeln!(out, "type {}{} struct {{", class.name, class.go_type_parameters()).map_err(&err)?;
    if let Some(base) = &class.base {
        writeln!(out, "\t*{}{}", base.go_name(), base.go_arguments()).map_err(&err)?;
    }
    for field in instance_fields(class) {
        writeln!(out, "\t{}", field.declaration()).map_err(&err)?;
    }
    writeln!(out, "}}").map_err(&err)?;

    for field in class.fields().iter().filter(|f| f.static_) {
        let name = format!("{}_{}", class.name, field.name());
        let written = match &field.decl.initializer {
            Some(value) => writeln!(out, "\nvar {} {} = {}", name, field.decl.ty.go_type(), value),
            None => writeln!(out, "\nvar {} {}", name, field.decl.ty.go_type()),
        };
        written.map_err(&err)?;
    }

    let constructors: Vec<&Method> = class.constructors().collect();
    if constructors.is_empty() {
        out.push('\n');
        out.push_str(&render_construction(class, &type_name, None, 0));
    }
    for (i, constructor) in constructors.into_iter().enumerate() {
        out.push('\n');
        out.push_str(&render_construction(class, &type_name, Some(constructor), i));
    }

    let receiver = format!("({RECEIVER_NAME} *{type_name})");
    for method in class.methods() {
        out.push('\n');
        out.push_str(&render_method(class, method, &receiver));
    }
    Ok(out)
}

fn instance_fields(class: &Class) -> impl Iterator<Item = &Field> {
    class.fields().iter().filter(|f| !f.static_)
}

/// Construction function: allocate, run field initializers in declaration
/// order, run the constructor body, return the instance.
fn render_construction(class: &Class, type_name: &str, constructor: Option<&Method>, ordinal: usize) -> String {
    let suffix = if ordinal == 0 { String::new() } else { ordinal.to_string() };
    let parameters = constructor.map(Method::go_parameters).unwrap_or_else(|| "()".to_string());

    let mut body = vec![format!("{RECEIVER_NAME} := &{type_name}{{}}")];
    body.extend(
        instance_fields(class)
            .filter_map(Field::initializer)
            .map(|assignment| format!("{RECEIVER_NAME}.{assignment}")),
    );
    if let Some(block) = constructor.and_then(|c| c.body.as_ref()) {
        let statements = render_statements(&block.statements);
        if !statements.is_empty() {
            body.push(statements);
        }
    }
    body.push(format!("return {RECEIVER_NAME}"));

    format!(
        "func {CONSTRUCTOR_PREFIX}{}{}{}{} *{} {{\n{}\n}}\n",
        class.name,
        suffix,
        class.go_type_parameters(),
        parameters,
        type_name,
        indent(&body.join("\n"))
    )
}

fn render_method(class: &Class, method: &Method, receiver: &str) -> String {
    let head = if method.static_ {
        format!("func {}_{}{}", class.name, method.name, method.go_parameters())
    } else {
        format!("func {} {}{}", receiver, method.name, method.go_parameters())
    };
    let body = match &method.body {
        Some(block) => render_statements(&block.statements),
        None => format!("panic(\"abstract method {}\")", method.name),
    };
    if body.is_empty() {
        format!("{head}{} {{\n}}\n", method.go_result())
    } else {
        format!("{head}{} {{\n{}\n}}\n", method.go_result(), indent(&body))
    }
}

// =============================================================================
// TESTS
// =============================================================================
