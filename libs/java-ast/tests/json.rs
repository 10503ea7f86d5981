//! Parse-node documents in the web-tree-sitter JSON layout, built into units.

use java_ast::{build_unit, AstError, ClassKind, ParseNode};

const SHAPE_JSON: &str = r#"{
  "type": "program",
  "text": "package geo; interface Shape { double area(); }",
  "children": [
    {
      "type": "package_declaration",
      "children": [
        { "type": "package", "text": "package", "isNamed": false },
        { "type": "identifier", "text": "geo" },
        { "type": ";", "text": ";", "isNamed": false }
      ]
    },
    {
      "type": "interface_declaration",
      "startPosition": { "row": 0, "column": 13 },
      "children": [
        { "type": "interface", "text": "interface", "isNamed": false },
        { "type": "identifier", "text": "Shape", "fieldName": "name" },
        {
          "type": "interface_body",
          "fieldName": "body",
          "children": [
            { "type": "{", "text": "{", "isNamed": false },
            {
              "type": "method_declaration",
              "children": [
                { "type": "floating_point_type", "text": "double", "fieldName": "type" },
                { "type": "identifier", "text": "area", "fieldName": "name" },
                {
                  "type": "formal_parameters",
                  "fieldName": "parameters",
                  "children": [
                    { "type": "(", "text": "(", "isNamed": false },
                    { "type": ")", "text": ")", "isNamed": false }
                  ]
                },
                { "type": ";", "text": ";", "isNamed": false }
              ]
            },
            { "type": "}", "text": "}", "isNamed": false }
          ]
        }
      ]
    }
  ]
}"#;

#[test]
fn test_json_document_builds_interface() {
    let root: ParseNode = serde_json::from_str(SHAPE_JSON).unwrap();
    let unit = build_unit(&root, "Shape.java").unwrap();

    assert_eq!(unit.package.as_deref(), Some("geo"));
    let shape = &unit.classes[0];
    assert_eq!(shape.kind, ClassKind::Interface);
    assert_eq!(shape.members.len(), 1);
    assert!(shape.members[0].body.is_none());
    assert_eq!(shape.members[0].signature(), "area() float64");
}

#[test]
fn test_json_missing_node_is_a_syntax_error() {
    let json = r#"{
      "type": "program",
      "children": [
        { "type": "MISSING ;", "startPosition": { "row": 2, "column": 7 } }
      ]
    }"#;
    let root: ParseNode = serde_json::from_str(json).unwrap();
    match build_unit(&root, "Broken.java") {
        Err(AstError::SyntaxErrors { diagnostics, .. }) => {
            assert_eq!(diagnostics[0].message, "missing ;");
            assert_eq!(diagnostics[0].position.to_string(), "3:8");
        }
        other => panic!("expected syntax errors, got {other:?}"),
    }
}

#[test]
fn test_unit_serializes_for_debugging() {
    let root: ParseNode = serde_json::from_str(SHAPE_JSON).unwrap();
    let unit = build_unit(&root, "Shape.java").unwrap();
    let dump = serde_json::to_value(&unit).unwrap();
    assert_eq!(dump["classes"][0]["name"], "Shape");
    assert_eq!(dump["classes"][0]["kind"], "Interface");
}
