//! # Parse Nodes
//!
//! Typed parse nodes handed to the AST builder by the external Java grammar.
//! The shape mirrors a tree-sitter syntax tree: every node has a grammar kind,
//! its source text, location, children and (for field children) the grammar
//! field name it fills in its parent.
//!
//! ## Architecture
//!
//! ```text
//! Java Source → grammar parser (external) → ParseNode (JSON or native) → java-ast (AST)
//! ```
//!
//! The serde field names match the web-tree-sitter `SerializedNode` layout so
//! an out-of-process parser can deliver a JSON document.
//!
//! ## Usage
//!
//! ```rust
//! use java_ast::cst::ParseNode;
//!
//! let name = ParseNode::leaf("identifier", "Foo").with_field("name");
//! let class = ParseNode::branch("class_declaration", vec![ParseNode::token("class"), name]);
//! assert_eq!(class.child_by_field("name").map(|n| n.text.as_str()), Some("Foo"));
//! ```

use crate::diagnostic::Diagnostic;
use crate::error::AstError;
use crate::span::{Location, Position, Span};
use config::constants::{DIAGNOSTIC_SNIPPET_CHARS, STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use serde::{Deserialize, Serialize};
use stacker::maybe_grow;

/// A syntax tree node produced by the Java grammar.
///
/// # Fields
///
/// * `kind` - The grammar rule name (e.g., "program", "class_declaration")
/// * `text` - The source text covered by this node
/// * `start_index` / `end_index` - Byte offsets of the node
/// * `start_position` / `end_position` - Row/column positions of the node
/// * `children` - All child nodes, named and anonymous, in source order
/// * `is_named` - Whether this is a named node in the grammar
/// * `field_name` - The field name if this node is a field child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseNode {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub text: String,

    #[serde(rename = "startIndex", default)]
    pub start_index: usize,

    #[serde(rename = "endIndex", default)]
    pub end_index: usize,

    #[serde(rename = "startPosition", default)]
    pub start_position: Position,

    #[serde(rename = "endPosition", default)]
    pub end_position: Position,

    #[serde(default)]
    pub children: Vec<ParseNode>,

    #[serde(rename = "isNamed", default = "named_by_default")]
    pub is_named: bool,

    #[serde(rename = "fieldName", default)]
    pub field_name: Option<String>,
}

fn named_by_default() -> bool {
    true
}

impl ParseNode {
    /// Creates a named node without children.
    pub fn leaf(kind: &str, text: &str) -> Self {
        Self {
            kind: kind.to_string(),
            text: text.to_string(),
            start_index: 0,
            end_index: text.len(),
            start_position: Position::default(),
            end_position: Position::new(0, text.len()),
            children: Vec::new(),
            is_named: true,
            field_name: None,
        }
    }

    /// Creates an anonymous token node (keywords, punctuation, operators).
    pub fn token(kind: &str) -> Self {
        Self {
            is_named: false,
            ..Self::leaf(kind, kind)
        }
    }

    /// Creates a named node whose text is the space-joined text of its children.
    pub fn branch(kind: &str, children: Vec<ParseNode>) -> Self {
        let text = children
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            children,
            ..Self::leaf(kind, &text)
        }
    }

    /// Marks this node as filling the given grammar field of its parent.
    pub fn with_field(mut self, field: &str) -> Self {
        self.field_name = Some(field.to_string());
        self
    }

    /// Sets the start position of this node.
    pub fn at(mut self, row: usize, column: usize) -> Self {
        self.start_position = Position::new(row, column);
        self
    }

    pub fn span(&self) -> Span {
        Span::new(self.start_index, self.end_index)
    }

    pub fn location(&self) -> Location {
        Location {
            span: self.span(),
            position: self.start_position,
        }
    }

    /// Finds the first child with the given kind.
    pub fn find_child(&self, kind: &str) -> Option<&ParseNode> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// Finds the first child filling the given field.
    pub fn child_by_field(&self, field: &str) -> Option<&ParseNode> {
        self.children
            .iter()
            .find(|c| c.field_name.as_deref() == Some(field))
    }

    /// All children filling the given field, in source order.
    pub fn children_by_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ParseNode> + 'a {
        self.children
            .iter()
            .filter(move |c| c.field_name.as_deref() == Some(field))
    }

    /// Named children that carry meaning (comments are skipped).
    pub fn named_children(&self) -> impl Iterator<Item = &ParseNode> {
        self.children.iter().filter(|c| c.is_named && !c.is_comment())
    }

    /// First named, non-comment child.
    pub fn first_named_child(&self) -> Option<&ParseNode> {
        self.named_children().next()
    }

    /// Looks up a mandatory field child.
    ///
    /// # Errors
    ///
    /// `AstError::MissingNode` located at this node when the field is absent.
    pub fn required_field(&self, field: &'static str, owner: &'static str) -> Result<&ParseNode, AstError> {
        self.child_by_field(field)
            .ok_or_else(|| AstError::missing(owner, field).located(self.location()))
    }

    /// Whether an anonymous token with the given kind is a direct child.
    pub fn has_token(&self, kind: &str) -> bool {
        self.children.iter().any(|c| !c.is_named && c.kind == kind)
    }

    pub fn is_error(&self) -> bool {
        self.kind == "ERROR"
    }

    pub fn is_missing(&self) -> bool {
        self.kind.starts_with("MISSING")
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind.as_str(), "line_comment" | "block_comment" | "comment")
    }

    /// Source text with all whitespace removed (qualified names, type text).
    pub fn compact_text(&self) -> String {
        self.text.chars().filter(|c| !c.is_whitespace()).collect()
    }
}

/// Collects a diagnostic for every error or missing node in the tree.
pub fn collect_syntax_errors(node: &ParseNode, diagnostics: &mut Vec<Diagnostic>) {
    if node.is_error() || node.is_missing() {
        let message = if node.is_missing() {
            format!("missing {}", node.kind.trim_start_matches("MISSING").trim())
        } else {
            format!(
                "syntax error near '{}'",
                node.text.chars().take(DIAGNOSTIC_SNIPPET_CHARS).collect::<String>()
            )
        };
        diagnostics.push(Diagnostic::error(message, node.location()));
    }

    maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
        for child in &node.children {
            collect_syntax_errors(child, diagnostics);
        }
    });
}
