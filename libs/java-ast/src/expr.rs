//! # Expression and Statement AST
//!
//! Every statement and expression of a method body is one [`Expr`] variant.
//! Each variant has a fallible constructor that receives its sub-nodes as
//! options: a missing mandatory part yields [`AstError::MissingNode`] and no
//! node is produced.
//!
//! ## Rendering
//!
//! `Display` renders the expression form. [`Expr::render_statement`] renders
//! the statement form, which differs only for declarations without an
//! initializer (`var x int`) and for bare blocks.
//!
//! ```text
//! if c {            for _, x := range xs {      panic(NewError("bad"))
//! 	body          	body                      return this.x
//! } else {          }                           *this = *NewFoo(a, b)
//! 	other
//! }
//! ```

use crate::error::AstError;
use crate::types::TypeRef;
use config::constants::{
    CONSTRUCTOR_PREFIX, INDENT, RECEIVER_NAME, STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES,
    UNKNOWN_ELEMENT_TYPE,
};
use serde::Serialize;
use stacker::maybe_grow;
use std::fmt;

// =============================================================================
// EXPRESSION TYPE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Literal(Literal),
    Identifier(Identifier),
    Conditional(Conditional),
    Return(Return),
    Throw(Throw),
    Break(Jump),
    Continue(Jump),
    Label(Label),
    FieldAccess(FieldAccess),
    MethodCall(MethodCall),
    ConstructorCall(ConstructorCall),
    VariableDecl(VariableDecl),
    ArrayLiteral(ArrayLiteral),
    ArrayCreation(ArrayCreation),
    Block(Block),
    Binary(Binary),
    Unary(Unary),
    Assignment(Assignment),
    Parenthesized(Parenthesized),
    ArrayAccess(ArrayAccess),
    Cast(Cast),
    While(While),
    For(For),
    ForEach(ForEach),
}

fn required<T>(value: Option<T>, node: &'static str, part: &'static str) -> Result<T, AstError> {
    value.ok_or_else(|| AstError::missing(node, part))
}

fn boxed(value: Option<Expr>, node: &'static str, part: &'static str) -> Result<Box<Expr>, AstError> {
    required(value, node, part).map(Box::new)
}

fn non_empty(value: Option<String>, node: &'static str, part: &'static str) -> Result<String, AstError> {
    required(value.filter(|v| !v.is_empty()), node, part)
}

// =============================================================================
// VARIANTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Literal {
    pub value: String,
}

impl Literal {
    pub fn new(value: Option<String>) -> Result<Self, AstError> {
        Ok(Self { value: non_empty(value, "literal", "value")? })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identifier {
    pub name: String,
}

impl Identifier {
    pub fn new(name: Option<String>) -> Result<Self, AstError> {
        Ok(Self { name: non_empty(name, "identifier", "name")? })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conditional {
    pub condition: Box<Expr>,
    pub body: Box<Expr>,
    pub else_branch: Option<Box<Expr>>,
}

impl Conditional {
    pub fn new(condition: Option<Expr>, body: Option<Expr>, else_branch: Option<Expr>) -> Result<Self, AstError> {
        Ok(Self {
            condition: boxed(condition, "if statement", "condition")?,
            body: boxed(body, "if statement", "body")?,
            else_branch: else_branch.map(Box::new),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Return {
    pub expression: Option<Box<Expr>>,
}

impl Return {
    pub fn new(expression: Option<Expr>) -> Self {
        Self { expression: expression.map(Box::new) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Throw {
    pub expression: Box<Expr>,
}

impl Throw {
    pub fn new(expression: Option<Expr>) -> Result<Self, AstError> {
        Ok(Self { expression: boxed(expression, "throw statement", "expression")? })
    }
}

/// `break` or `continue` with an optional label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Jump {
    pub label: Option<String>,
}

impl Jump {
    pub fn new(label: Option<String>) -> Self {
        Self { label: label.filter(|l| !l.is_empty()) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub name: String,
    pub statement: Box<Expr>,
}

impl Label {
    pub fn new(name: Option<String>, statement: Option<Expr>) -> Result<Self, AstError> {
        Ok(Self {
            name: non_empty(name, "labeled statement", "label")?,
            statement: boxed(statement, "labeled statement", "statement")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldAccess {
    pub object: Box<Expr>,
    pub attribute: String,
}

impl FieldAccess {
    pub fn new(object: Option<Expr>, attribute: Option<String>) -> Result<Self, AstError> {
        Ok(Self {
            object: boxed(object, "field access", "object")?,
            attribute: non_empty(attribute, "field access", "field name")?,
        })
    }
}

/// What a method call invokes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CallTarget {
    /// `this(...)`: delegation to another constructor of `class`
    This { class: String },
    /// `super(...)`: construction of the embedded base, if the class has one
    Super { base: Option<String> },
    /// Static method of `class` (`class_name(...)`)
    Static { class: String, name: String },
    /// Instance method called on the receiver
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodCall {
    pub receiver: Box<Expr>,
    pub target: CallTarget,
    pub arguments: Vec<Expr>,
}

impl MethodCall {
    pub fn new(receiver: Option<Expr>, target: Option<CallTarget>, arguments: Vec<Expr>) -> Result<Self, AstError> {
        let target = match target {
            Some(CallTarget::Named(name)) if name.is_empty() => None,
            other => other,
        };
        Ok(Self {
            receiver: boxed(receiver, "method call", "receiver")?,
            target: required(target, "method call", "method name")?,
            arguments,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstructorCall {
    pub class: TypeRef,
    pub type_arguments: Vec<TypeRef>,
    pub arguments: Vec<Expr>,
}

impl ConstructorCall {
    pub fn new(class: Option<TypeRef>, type_arguments: Vec<TypeRef>, arguments: Vec<Expr>) -> Result<Self, AstError> {
        let class = required(class.filter(|c| !c.name.is_empty()), "object creation", "class name")?;
        Ok(Self { class, type_arguments, arguments })
    }
}

/// A local variable, parameter or field declarator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDecl {
    pub ty: TypeRef,
    pub name: String,
    pub initializer: Option<Box<Expr>>,
    pub variadic: bool,
}

impl VariableDecl {
    pub fn new(ty: Option<TypeRef>, name: Option<String>, initializer: Option<Expr>, variadic: bool) -> Result<Self, AstError> {
        Ok(Self {
            ty: required(ty, "variable declaration", "type")?,
            name: non_empty(name, "variable declaration", "name")?,
            initializer: initializer.map(Box::new),
            variadic,
        })
    }

    pub fn has_initializer(&self) -> bool {
        self.initializer.is_some()
    }

    /// `name type`, or `name ...type` for a variadic parameter.
    pub fn typed(&self) -> String {
        if self.variadic {
            format!("{} ...{}", self.name, self.ty.element().go_type())
        } else {
            format!("{} {}", self.name, self.ty.go_type())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayLiteral {
    pub element_type: Option<TypeRef>,
    pub elements: Vec<Expr>,
}

impl ArrayLiteral {
    pub fn new(element_type: Option<TypeRef>, elements: Vec<Expr>) -> Self {
        Self { element_type, elements }
    }
}

/// `new T[n]`: an array allocated by length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayCreation {
    pub element_type: TypeRef,
    pub length: Box<Expr>,
}

impl ArrayCreation {
    pub fn new(element_type: Option<TypeRef>, length: Option<Expr>) -> Result<Self, AstError> {
        Ok(Self {
            element_type: required(element_type, "array creation", "type")?,
            length: boxed(length, "array creation", "dimension")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Block {
    pub statements: Vec<Expr>,
}

impl Block {
    pub fn new(statements: Vec<Expr>) -> Self {
        Self { statements }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binary {
    pub left: Box<Expr>,
    pub operator: String,
    pub right: Box<Expr>,
}

impl Binary {
    pub fn new(left: Option<Expr>, operator: Option<String>, right: Option<Expr>) -> Result<Self, AstError> {
        Ok(Self {
            left: boxed(left, "binary expression", "left operand")?,
            operator: non_empty(operator, "binary expression", "operator")?,
            right: boxed(right, "binary expression", "right operand")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unary {
    pub operator: String,
    pub operand: Box<Expr>,
    pub postfix: bool,
}

impl Unary {
    pub fn new(operator: Option<String>, operand: Option<Expr>, postfix: bool) -> Result<Self, AstError> {
        Ok(Self {
            operator: non_empty(operator, "unary expression", "operator")?,
            operand: boxed(operand, "unary expression", "operand")?,
            postfix,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub target: Box<Expr>,
    pub operator: String,
    pub value: Box<Expr>,
}

impl Assignment {
    pub fn new(target: Option<Expr>, operator: Option<String>, value: Option<Expr>) -> Result<Self, AstError> {
        Ok(Self {
            target: boxed(target, "assignment", "left side")?,
            operator: non_empty(operator, "assignment", "operator")?,
            value: boxed(value, "assignment", "right side")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parenthesized {
    pub inner: Box<Expr>,
}

impl Parenthesized {
    pub fn new(inner: Option<Expr>) -> Result<Self, AstError> {
        Ok(Self { inner: boxed(inner, "parenthesized expression", "expression")? })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayAccess {
    pub array: Box<Expr>,
    pub index: Box<Expr>,
}

impl ArrayAccess {
    pub fn new(array: Option<Expr>, index: Option<Expr>) -> Result<Self, AstError> {
        Ok(Self {
            array: boxed(array, "array access", "array")?,
            index: boxed(index, "array access", "index")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cast {
    pub ty: TypeRef,
    pub value: Box<Expr>,
}

impl Cast {
    pub fn new(ty: Option<TypeRef>, value: Option<Expr>) -> Result<Self, AstError> {
        Ok(Self {
            ty: required(ty, "cast", "type")?,
            value: boxed(value, "cast", "value")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct While {
    pub condition: Box<Expr>,
    pub body: Box<Expr>,
}

impl While {
    pub fn new(condition: Option<Expr>, body: Option<Expr>) -> Result<Self, AstError> {
        Ok(Self {
            condition: boxed(condition, "while statement", "condition")?,
            body: boxed(body, "while statement", "body")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct For {
    pub init: Vec<Expr>,
    pub condition: Option<Box<Expr>>,
    pub update: Vec<Expr>,
    pub body: Box<Expr>,
}

impl For {
    pub fn new(init: Vec<Expr>, condition: Option<Expr>, update: Vec<Expr>, body: Option<Expr>) -> Result<Self, AstError> {
        Ok(Self {
            init,
            condition: condition.map(Box::new),
            update,
            body: boxed(body, "for statement", "body")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForEach {
    pub variable: VariableDecl,
    pub iterable: Box<Expr>,
    pub body: Box<Expr>,
}

impl ForEach {
    pub fn new(variable: Option<VariableDecl>, iterable: Option<Expr>, body: Option<Expr>) -> Result<Self, AstError> {
        Ok(Self {
            variable: required(variable, "enhanced for statement", "variable")?,
            iterable: boxed(iterable, "enhanced for statement", "iterable")?,
            body: boxed(body, "enhanced for statement", "body")?,
        })
    }
}

// =============================================================================
// RENDERING
// =============================================================================

/// Prefixes every non-empty line with one indentation level.
pub fn indent(text: &str) -> String {
    text.lines()
        .map(|line| if line.is_empty() { String::new() } else { format!("{INDENT}{line}") })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders arguments joined with `, `.
pub fn render_arguments(arguments: &[Expr]) -> String {
    arguments.iter().map(Expr::to_string).collect::<Vec<_>>().join(", ")
}

/// Renders statements joined with line breaks.
pub fn render_statements(statements: &[Expr]) -> String {
    statements
        .iter()
        .map(Expr::render_statement)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a loop or branch body: the statements of a block, or the single
/// statement itself.
fn render_body(body: &Expr) -> String {
    match body {
        Expr::Block(block) => render_statements(&block.statements),
        other => other.render_statement(),
    }
}

/// Opens a braced block after `head`, indents `body` and closes it.
fn braced(head: &str, body: &str) -> String {
    if body.is_empty() {
        format!("{head} {{\n}}")
    } else {
        format!("{head} {{\n{}\n}}", indent(body))
    }
}

impl Expr {
    /// Renders the node in statement position.
    pub fn render_statement(&self) -> String {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || self.render_statement_inner())
    }

    fn render_statement_inner(&self) -> String {
        match self {
            Expr::VariableDecl(decl) if !decl.has_initializer() => format!("var {}", decl.typed()),
            Expr::Block(block) => braced("", &render_statements(&block.statements))
                .trim_start()
                .to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || write_expr(self, f))
    }
}

fn write_expr(expr: &Expr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match expr {
        Expr::Literal(lit) => f.write_str(&lit.value),
        Expr::Identifier(id) => f.write_str(&id.name),
        Expr::Conditional(cond) => {
            let head = format!("if {}", cond.condition);
            let mut text = braced(&head, &render_body(&cond.body));
            if let Some(else_branch) = &cond.else_branch {
                match else_branch.as_ref() {
                    Expr::Conditional(_) => text.push_str(&format!(" else {else_branch}")),
                    other => text.push_str(&format!(" {}", braced("else", &render_body(other)))),
                }
            }
            f.write_str(&text)
        }
        Expr::Return(ret) => match &ret.expression {
            Some(expression) => write!(f, "return {expression}"),
            None => f.write_str("return"),
        },
        Expr::Throw(throw) => write!(f, "panic({})", throw.expression),
        Expr::Break(jump) => write_jump(f, "break", jump),
        Expr::Continue(jump) => write_jump(f, "continue", jump),
        Expr::Label(label) => write!(f, "{}:\n{}", label.name, label.statement.render_statement()),
        Expr::FieldAccess(access) => write!(f, "{}.{}", access.object, access.attribute),
        Expr::MethodCall(call) => {
            let arguments = render_arguments(&call.arguments);
            match &call.target {
                CallTarget::This { class } => {
                    write!(f, "*{RECEIVER_NAME} = *{CONSTRUCTOR_PREFIX}{class}({arguments})")
                }
                CallTarget::Super { base: Some(base) } => {
                    write!(f, "{RECEIVER_NAME}.{base} = {CONSTRUCTOR_PREFIX}{base}({arguments})")
                }
                CallTarget::Super { base: None } => Ok(()),
                CallTarget::Static { class, name } => write!(f, "{class}_{name}({arguments})"),
                CallTarget::Named(name) => write!(f, "{}.{}({})", call.receiver, name, arguments),
            }
        }
        Expr::ConstructorCall(call) => {
            write!(f, "{CONSTRUCTOR_PREFIX}{}", call.class.go_name())?;
            if !call.type_arguments.is_empty() {
                let arguments: Vec<String> = call.type_arguments.iter().map(TypeRef::go_type).collect();
                write!(f, "[{}]", arguments.join(", "))?;
            }
            write!(f, "({})", render_arguments(&call.arguments))
        }
        Expr::VariableDecl(decl) => match &decl.initializer {
            Some(initializer) => write!(f, "{} := {}", decl.name, initializer),
            None => f.write_str(&decl.typed()),
        },
        Expr::ArrayLiteral(array) => {
            let element = array
                .element_type
                .as_ref()
                .map(TypeRef::go_type)
                .unwrap_or_else(|| UNKNOWN_ELEMENT_TYPE.to_string());
            write!(f, "[]{}{{{}}}", element, render_arguments(&array.elements))
        }
        Expr::ArrayCreation(array) => {
            write!(f, "make([]{}, {})", array.element_type.go_type(), array.length)
        }
        Expr::Block(block) => f.write_str(&render_statements(&block.statements)),
        Expr::Binary(binary) => write!(f, "{} {} {}", binary.left, go_operator(&binary.operator), binary.right),
        Expr::Unary(unary) if unary.postfix => write!(f, "{}{}", unary.operand, unary.operator),
        Expr::Unary(unary) => write!(f, "{}{}", go_operator(&unary.operator), unary.operand),
        Expr::Assignment(assign) => {
            write!(f, "{} {} {}", assign.target, go_operator(&assign.operator), assign.value)
        }
        Expr::Parenthesized(paren) => write!(f, "({})", paren.inner),
        Expr::ArrayAccess(access) => write!(f, "{}[{}]", access.array, access.index),
        Expr::Cast(cast) => {
            if cast.ty.needs_resolution() && cast.ty.dimensions == 0 {
                write!(f, "{}.({})", cast.value, cast.ty.go_type())
            } else {
                write!(f, "{}({})", cast.ty.go_type(), cast.value)
            }
        }
        Expr::While(w) => f.write_str(&braced(&format!("for {}", w.condition), &render_body(&w.body))),
        Expr::For(l) => {
            let head = if l.init.is_empty() && l.update.is_empty() {
                match &l.condition {
                    Some(condition) => format!("for {condition}"),
                    None => "for".to_string(),
                }
            } else {
                format!(
                    "for {}; {}; {}",
                    render_arguments(&l.init),
                    l.condition.as_ref().map(|c| c.to_string()).unwrap_or_default(),
                    render_arguments(&l.update)
                )
            };
            f.write_str(&braced(&head, &render_body(&l.body)))
        }
        Expr::ForEach(each) => {
            let head = format!("for _, {} := range {}", each.variable.name, each.iterable);
            f.write_str(&braced(&head, &render_body(&each.body)))
        }
    }
}

fn write_jump(f: &mut fmt::Formatter<'_>, keyword: &str, jump: &Jump) -> fmt::Result {
    match &jump.label {
        Some(label) => write!(f, "{keyword} {label}"),
        None => f.write_str(keyword),
    }
}

/// Go spelling of a Java operator.
fn go_operator(operator: &str) -> &str {
    match operator {
        ">>>" => ">>",
        ">>>=" => ">>=",
        "~" => "^",
        other => other,
    }
}

// =============================================================================
// TESTS
// =============================================================================
