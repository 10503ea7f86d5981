//! End-to-end translation of small programs built from parse-node fixtures.

use go_emit::{translate, translate_json, EmitConfig, TranslateError};
use java_ast::{AstError, ParseNode};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

// ===== Fixture builders =====

fn id(name: &str) -> ParseNode {
    ParseNode::leaf("identifier", name)
}

fn tok(kind: &str) -> ParseNode {
    ParseNode::token(kind)
}

fn braced(kind: &str, items: Vec<ParseNode>) -> ParseNode {
    let mut children = vec![tok("{")];
    children.extend(items);
    children.push(tok("}"));
    ParseNode::branch(kind, children)
}

fn int_field(name: &str, value: Option<&str>) -> ParseNode {
    let mut declarator = vec![id(name).with_field("name")];
    if let Some(value) = value {
        declarator.push(tok("="));
        declarator.push(ParseNode::leaf("decimal_integer_literal", value).with_field("value"));
    }
    ParseNode::branch(
        "field_declaration",
        vec![
            ParseNode::leaf("integral_type", "int").with_field("type"),
            ParseNode::branch("variable_declarator", declarator).with_field("declarator"),
            tok(";"),
        ],
    )
}

fn method(ret: ParseNode, name: &str, parameters: Vec<ParseNode>, body: Option<Vec<ParseNode>>) -> ParseNode {
    let mut list = vec![tok("(")];
    list.extend(parameters);
    list.push(tok(")"));
    let mut children = vec![
        ret.with_field("type"),
        id(name).with_field("name"),
        ParseNode::branch("formal_parameters", list).with_field("parameters"),
    ];
    match body {
        Some(statements) => children.push(braced("block", statements).with_field("body")),
        None => children.push(tok(";")),
    }
    ParseNode::branch("method_declaration", children)
}

fn declaration(kind: &str, keyword: &str, name: &str, body_kind: &str, members: Vec<ParseNode>) -> ParseNode {
    ParseNode::branch(
        kind,
        vec![tok(keyword), id(name).with_field("name"), braced(body_kind, members).with_field("body")],
    )
}

fn class(name: &str, members: Vec<ParseNode>) -> ParseNode {
    declaration("class_declaration", "class", name, "class_body", members)
}

fn program(package: Option<&str>, declaration: ParseNode) -> ParseNode {
    let mut children = Vec::new();
    if let Some(package) = package {
        children.push(ParseNode::branch(
            "package_declaration",
            vec![tok("package"), ParseNode::leaf("scoped_identifier", package), tok(";")],
        ));
    }
    children.push(declaration);
    ParseNode::branch("program", children)
}

fn sequential() -> EmitConfig {
    EmitConfig {
        parallel: false,
        ..EmitConfig::default()
    }
}

// ===== Scenarios =====

#[test]
fn test_class_with_field_and_getter() {
    let foo = class(
        "Foo",
        vec![
            int_field("x", Some("5")),
            method(
                ParseNode::leaf("integral_type", "int"),
                "get",
                vec![],
                Some(vec![ParseNode::branch("return_statement", vec![tok("return"), id("x"), tok(";")])]),
            ),
        ],
    );
    let translation = translate(&[("a/b/Foo.java", program(Some("a.b"), foo))], &EmitConfig::default()).unwrap();

    assert_eq!(translation.files.len(), 1);
    let file = &translation.files[0];
    assert_eq!(file.path, PathBuf::from("a/b/Foo/Foo.go"));
    assert_eq!(
        file.text,
        "package b\n\n\
         type Foo struct {\n\tx int\n}\n\
         \n\
         func NewFoo() *Foo {\n\tthis := &Foo{}\n\tthis.x = 5\n\treturn this\n}\n\
         \n\
         func (this *Foo) get() int {\n\treturn this.x\n}\n"
    );
}

#[test]
fn test_throw_becomes_panic_and_exception_is_stubbed() {
    let creation = ParseNode::branch(
        "object_creation_expression",
        vec![
            tok("new"),
            ParseNode::leaf("type_identifier", "IllegalArgumentException").with_field("type"),
            ParseNode::branch("argument_list", vec![tok("("), ParseNode::leaf("string_literal", "\"bad\""), tok(")")])
                .with_field("arguments"),
        ],
    );
    let guard = ParseNode::branch(
        "if_statement",
        vec![
            tok("if"),
            ParseNode::branch(
                "parenthesized_expression",
                vec![
                    tok("("),
                    ParseNode::branch(
                        "binary_expression",
                        vec![
                            id("v").with_field("left"),
                            ParseNode::token("<").with_field("operator"),
                            ParseNode::leaf("decimal_integer_literal", "0").with_field("right"),
                        ],
                    ),
                    tok(")"),
                ],
            )
            .with_field("condition"),
            ParseNode::branch("throw_statement", vec![tok("throw"), creation, tok(";")]).with_field("consequence"),
        ],
    );
    let parameter = ParseNode::branch(
        "formal_parameter",
        vec![ParseNode::leaf("integral_type", "int").with_field("type"), id("v").with_field("name")],
    );
    let checker = class(
        "Checker",
        vec![method(ParseNode::leaf("void_type", "void"), "check", vec![parameter], Some(vec![guard]))],
    );

    let translation = translate(&[("app/Checker.java", program(Some("app"), checker))], &sequential()).unwrap();

    let text = &translation.file("Checker.go").unwrap().text;
    assert!(text.contains("func (this *Checker) check(v int) {\n"));
    assert!(text.contains("if v < 0 {"));
    assert!(text.contains("panic(NewIllegalArgumentException(\"bad\"))"));

    let stub = translation.file("IllegalArgumentException.go").unwrap();
    assert_eq!(stub.path, PathBuf::from("app/IllegalArgumentException/IllegalArgumentException.go"));
    assert!(stub.text.contains("Synthesized placeholder"));
    assert!(stub.text.ends_with("type IllegalArgumentException struct {\n}\n"));
    assert_eq!(translation.report.stubs, 1);
}

#[test]
fn test_interface_has_no_fields_or_bodies() {
    let shape = declaration(
        "interface_declaration",
        "interface",
        "Shape",
        "interface_body",
        vec![method(ParseNode::leaf("floating_point_type", "double"), "area", vec![], None)],
    );
    let translation = translate(&[("geo/Shape.java", program(Some("geo"), shape))], &sequential()).unwrap();

    let text = &translation.files[0].text;
    assert_eq!(text, "package geo\n\ntype Shape interface {\n\tarea() float64\n}\n");
    assert!(!text.contains("func"));
}

#[test]
fn test_field_without_initializer_is_not_assigned() {
    let point = class("Point", vec![int_field("x", Some("1")), int_field("y", None)]);
    let translation = translate(&[("Point.java", program(None, point))], &sequential()).unwrap();

    let text = &translation.files[0].text;
    assert!(text.contains("\tx int\n\ty int\n"));
    assert!(text.contains("this.x = 1"));
    assert!(!text.contains("this.y ="));
}

#[test]
fn test_default_package() {
    let translation = translate(&[("Main.java", program(None, class("Main", vec![])))], &sequential()).unwrap();

    assert_eq!(translation.files[0].path, PathBuf::from("Main/Main.go"));
    assert!(translation.files[0].text.starts_with("package main\n\n"));
}

#[test]
fn test_duplicate_classes_abort_the_run() {
    let sources = [
        ("One.java", program(Some("p"), class("Dup", vec![]))),
        ("Two.java", program(Some("p"), class("Dup", vec![]))),
    ];
    let err = translate(&sources, &EmitConfig::default()).unwrap_err();
    assert!(matches!(err, TranslateError::Resolve(_)));
    assert!(!err.is_tool_defect());
}

#[test]
fn test_malformed_member_aborts_the_run() {
    let broken = class(
        "Broken",
        vec![method(
            ParseNode::leaf("void_type", "void"),
            "run",
            vec![],
            Some(vec![ParseNode::leaf("try_statement", "try {} finally {}")]),
        )],
    );
    let err = translate(&[("Broken.java", program(None, broken))], &sequential()).unwrap_err();
    match err {
        TranslateError::Build(AstError::Diagnostics { source_name, diagnostics }) => {
            assert_eq!(source_name, "Broken.java");
            assert_eq!(diagnostics.len(), 1);
        }
        other => panic!("expected build diagnostics, got {other:?}"),
    }
}

#[test]
fn test_json_documents() {
    let document = r#"{
      "type": "program",
      "children": [
        {
          "type": "class_declaration",
          "children": [
            { "type": "class", "text": "class", "isNamed": false },
            { "type": "identifier", "text": "Empty", "fieldName": "name" },
            { "type": "class_body", "fieldName": "body", "children": [] }
          ]
        }
      ]
    }"#;
    let translation = translate_json(&[("Empty.java", document)], &EmitConfig::default()).unwrap();
    assert_eq!(
        translation.files[0].text,
        "package main\n\ntype Empty struct {\n}\n\nfunc NewEmpty() *Empty {\n\tthis := &Empty{}\n\treturn this\n}\n"
    );

    let err = translate_json(&[("Bad.java", "{ not json")], &EmitConfig::default()).unwrap_err();
    match err {
        TranslateError::Build(AstError::Parser(message)) => assert!(message.starts_with("Bad.java: ")),
        other => panic!("expected a parser error, got {other:?}"),
    }
}

fn nested_sum(depth: usize) -> ParseNode {
    let mut expression = ParseNode::leaf("decimal_integer_literal", "1");
    for _ in 0..depth {
        expression = ParseNode::branch(
            "binary_expression",
            vec![
                expression.with_field("left"),
                ParseNode::token("+").with_field("operator"),
                ParseNode::leaf("decimal_integer_literal", "1").with_field("right"),
            ],
        );
    }
    expression
}

fn deep_program(depth: usize) -> ParseNode {
    let total = method(
        ParseNode::leaf("integral_type", "int"),
        "total",
        vec![],
        Some(vec![ParseNode::branch("return_statement", vec![tok("return"), nested_sum(depth), tok(";")])]),
    );
    program(Some("deep"), class("Foo", vec![total]))
}

#[test]
fn test_deeply_nested_method_renders_on_worker_threads() {
    let sources = [
        ("deep/Foo.java", deep_program(1000)),
        ("deep/Bar.java", program(Some("deep"), class("Bar", vec![]))),
    ];
    let translation = translate(&sources, &EmitConfig::default()).unwrap();

    assert_eq!(translation.files.len(), 2);
    let text = &translation.file("Foo.go").unwrap().text;
    assert!(text.contains("func (this *Foo) total() int {\n\treturn 1 + 1 + 1"));
    assert_eq!(text.matches(" + 1").count(), 1000);
}

#[test]
fn test_implemented_interface_stub_is_an_interface() {
    let foo = ParseNode::branch(
        "class_declaration",
        vec![
            tok("class"),
            id("Foo").with_field("name"),
            ParseNode::branch(
                "super_interfaces",
                vec![
                    tok("implements"),
                    ParseNode::branch("type_list", vec![ParseNode::leaf("type_identifier", "Runnable")]),
                ],
            )
            .with_field("interfaces"),
            braced("class_body", vec![]).with_field("body"),
        ],
    );
    let translation = translate(&[("app/Foo.java", program(Some("app"), foo))], &sequential()).unwrap();

    assert!(translation.file("Foo.go").unwrap().text.contains("var _ Runnable = &Foo{}\n"));
    let stub = translation.file("Runnable.go").unwrap();
    assert!(stub.text.contains("Synthesized placeholder"));
    assert!(stub.text.ends_with("type Runnable interface {\n}\n"));
}

#[test]
fn test_json_documents_deeper_than_the_default_limit() {
    let document = serde_json::to_string(&deep_program(300)).unwrap();
    let translation = translate_json(&[("deep/Foo.java", document.as_str())], &sequential()).unwrap();

    assert_eq!(translation.files.len(), 1);
    assert_eq!(translation.files[0].text.matches(" + 1").count(), 300);
}
