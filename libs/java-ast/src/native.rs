//! # Native Front End
//!
//! Parses Java source with tree-sitter-java and converts the syntax tree into
//! [`ParseNode`]s. Only compiled with the `native-parser` feature.
//!
//! ```text
//! Java Source → tree-sitter-java (Tree) → ParseNode → build_unit
//! ```

use crate::cst::ParseNode;
use crate::error::AstError;
use crate::span::Position;
use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use stacker::maybe_grow;
use tree_sitter::{Node, Parser, TreeCursor};

/// Parses Java source into a parse-node tree.
///
/// # Errors
///
/// `AstError::Parser` when the grammar cannot be loaded or parsing is
/// aborted. Syntax errors are not reported here: they appear as `ERROR` and
/// `MISSING` nodes and are rejected by `build_unit`.
pub fn parse_java(source: &str) -> Result<ParseNode, AstError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_java::LANGUAGE.into())
        .map_err(|e| AstError::Parser(e.to_string()))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| AstError::Parser("parsing was aborted".to_string()))?;

    let mut cursor = tree.walk();
    convert(&mut cursor, source.as_bytes())
}

fn convert(cursor: &mut TreeCursor<'_>, source: &[u8]) -> Result<ParseNode, AstError> {
    maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
        let node = cursor.node();
        let mut converted = leaf(&node, source)?;

        if cursor.goto_first_child() {
            loop {
                let field = cursor.field_name().map(str::to_string);
                let mut child = convert(cursor, source)?;
                child.field_name = field;
                converted.children.push(child);
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
            cursor.goto_parent();
        }
        Ok(converted)
    })
}

fn leaf(node: &Node<'_>, source: &[u8]) -> Result<ParseNode, AstError> {
    let text = node
        .utf8_text(source)
        .map_err(|e| AstError::Parser(e.to_string()))?;
    let kind = if node.is_missing() {
        format!("MISSING {}", node.kind())
    } else {
        node.kind().to_string()
    };
    let start = node.start_position();
    let end = node.end_position();

    Ok(ParseNode {
        kind,
        text: text.to_string(),
        start_index: node.start_byte(),
        end_index: node.end_byte(),
        start_position: Position::new(start.row, start.column),
        end_position: Position::new(end.row, end.column),
        children: Vec::new(),
        is_named: node.is_named(),
        field_name: None,
    })
}
