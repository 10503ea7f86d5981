//! # Parse Nodes to AST
//!
//! Builds a [`CompilationUnit`] from the parse tree of one Java file.
//!
//! ## Example
//!
//! ```rust
//! use java_ast::build::build_unit;
//! use java_ast::cst::ParseNode;
//!
//! let class = ParseNode::branch(
//!     "class_declaration",
//!     vec![
//!         ParseNode::token("class"),
//!         ParseNode::leaf("identifier", "Foo").with_field("name"),
//!         ParseNode::branch("class_body", vec![]).with_field("body"),
//!     ],
//! );
//! let program = ParseNode::branch("program", vec![class]);
//! let unit = build_unit(&program, "Foo.java").unwrap();
//! assert_eq!(unit.classes[0].name, "Foo");
//! ```

pub mod context;
pub mod declarations;
pub mod expressions;
pub mod statements;
pub mod types;

use crate::class::{CompilationUnit, Import};
use crate::cst::{collect_syntax_errors, ParseNode};
use crate::error::AstError;
use context::BuildContext;
use declarations::{build_class, declare_classes, TYPE_DECLARATIONS};
use tracing::debug;

// =============================================================================
// PUBLIC API
// =============================================================================

/// Build the compilation unit of one source file.
///
/// ## Parameters
///
/// - `root`: the `program` node of the file
/// - `source_name`: file name used in diagnostics and recorded on each class
///
/// ## Returns
///
/// The unit with every declared class, nested classes flattened.
///
/// ## Errors
///
/// - `AstError::SyntaxErrors` when the tree contains error or missing nodes
/// - `AstError::Diagnostics` with one entry per malformed construct
pub fn build_unit(root: &ParseNode, source_name: &str) -> Result<CompilationUnit, AstError> {
    let mut syntax = Vec::new();
    collect_syntax_errors(root, &mut syntax);
    if !syntax.is_empty() {
        return Err(AstError::SyntaxErrors {
            source_name: source_name.to_string(),
            diagnostics: syntax,
        });
    }
    if root.kind != "program" {
        return Err(AstError::unsupported(format!("root node {}", root.kind)).located(root.location()));
    }

    let mut ctx = BuildContext::new(source_name);
    if let Some(package) = root.find_child("package_declaration").and_then(qualified_name) {
        ctx.set_package(package);
    }
    let imports: Vec<Import> = root
        .named_children()
        .filter(|c| c.kind == "import_declaration")
        .filter_map(build_import)
        .collect();

    declare_classes(root, None, &mut ctx);

    let mut classes = Vec::new();
    for child in root.named_children() {
        match child.kind.as_str() {
            "package_declaration" | "import_declaration" => {}
            kind if TYPE_DECLARATIONS.contains(&kind) => {
                if let Err(error) = build_class(child, None, &imports, &mut ctx, &mut classes) {
                    ctx.report(error.located(child.location()));
                }
            }
            other => ctx.report(AstError::unsupported(other).located(child.location())),
        }
    }

    if ctx.has_diagnostics() {
        return Err(AstError::Diagnostics {
            source_name: source_name.to_string(),
            diagnostics: ctx.take_diagnostics(),
        });
    }

    debug!(source = source_name, classes = classes.len(), "built compilation unit");
    Ok(CompilationUnit {
        source: source_name.to_string(),
        package: ctx.package().map(str::to_string),
        imports,
        classes,
    })
}

fn qualified_name(node: &ParseNode) -> Option<String> {
    node.named_children()
        .find(|c| c.kind == "identifier" || c.kind == "scoped_identifier")
        .map(ParseNode::compact_text)
}

fn build_import(node: &ParseNode) -> Option<Import> {
    Some(Import {
        path: qualified_name(node)?,
        on_demand: node.find_child("asterisk").is_some(),
        static_: node.has_token("static"),
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> ParseNode {
        ParseNode::leaf("identifier", name)
    }

    fn class_decl(name: &str) -> ParseNode {
        ParseNode::branch(
            "class_declaration",
            vec![
                ParseNode::token("class"),
                id(name).with_field("name"),
                ParseNode::branch("class_body", vec![ParseNode::token("{"), ParseNode::token("}")]).with_field("body"),
            ],
        )
    }

    #[test]
    fn test_package_and_imports() {
        let program = ParseNode::branch(
            "program",
            vec![
                ParseNode::branch("package_declaration", vec![ParseNode::token("package"), ParseNode::leaf("scoped_identifier", "a.b")]),
                ParseNode::branch("import_declaration", vec![ParseNode::token("import"), ParseNode::leaf("scoped_identifier", "x.y.Z")]),
                ParseNode::branch(
                    "import_declaration",
                    vec![ParseNode::token("import"), id("w"), ParseNode::token("."), ParseNode::leaf("asterisk", "*")],
                ),
                class_decl("Foo"),
            ],
        );
        let unit = build_unit(&program, "Foo.java").unwrap();
        assert_eq!(unit.package.as_deref(), Some("a.b"));
        assert_eq!(unit.imports.len(), 2);
        assert!(unit.imports[1].on_demand);
        assert_eq!(unit.classes[0].qualified_name(), "a.b.Foo");
        assert_eq!(unit.classes[0].imports, unit.imports);
    }

    #[test]
    fn test_syntax_errors_reject_unit() {
        let program = ParseNode::branch("program", vec![ParseNode::leaf("ERROR", "clas Foo")]);
        match build_unit(&program, "Foo.java") {
            Err(AstError::SyntaxErrors { diagnostics, .. }) => assert_eq!(diagnostics.len(), 1),
            other => panic!("expected syntax errors, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_top_level_declaration() {
        let program = ParseNode::branch("program", vec![ParseNode::leaf("record_declaration", "record P() {}")]);
        let err = build_unit(&program, "P.java").unwrap_err();
        assert_eq!(err.diagnostics().len(), 1);
        assert!(err.to_string().starts_with("P.java: 1 malformed construct(s)"));
    }

    #[test]
    fn test_default_package() {
        let program = ParseNode::branch("program", vec![class_decl("Main")]);
        let unit = build_unit(&program, "Main.java").unwrap();
        assert!(unit.package.is_none());
        assert_eq!(unit.classes[0].package_identifier(), "main");
    }
}
