//! Schema-engaged parsing tests

#![allow(clippy::unwrap_used)]

use saxtree::{Parser, Vocabulary};

fn fixture(name: &str) -> String {
    format!(
        "{}/tests/fixtures/{name}",
        env!("CARGO_MANIFEST_DIR")
    )
}

#[test]
fn test_valid_document_is_clean() {
    let mut parser = Parser::new();
    let parse = parser
        .create_parse()
        .resource_source(fixture("order-valid.xml"))
        .unwrap()
        .schema_resource(fixture("shop.xsd"))
        .execute()
        .unwrap();
    assert!(!parse.has_errors());
    assert!(!parse.has_warnings());
    assert_eq!(parse.root_element().unwrap().tag_name(), "order");
}

#[test]
fn test_all_violations_surface_in_one_pass() {
    // Two independent violations; the parse completes, the tree is
    // populated, and both problems are reported together.
    let mut parser = Parser::new();
    let parse = parser
        .create_parse()
        .resource_source(fixture("order-invalid.xml"))
        .unwrap()
        .schema_resource(fixture("shop.xsd"))
        .execute()
        .unwrap();

    assert!(parse.has_errors());
    assert_eq!(parse.errors().len(), 2);
    assert!(parse.errors()[0].message().contains("itme"));
    assert!(parse.errors()[1].message().contains("refund"));

    let root = parse.root_element().unwrap();
    assert_eq!(root.tag_name(), "order");
    assert_eq!(root.children().len(), 3);

    // Escalation remains the caller's decision.
    let err = parse.throw_exception_for_errors().unwrap_err();
    assert!(err.message().contains("itme"));
    assert!(err.message().contains("refund"));
}

#[test]
fn test_violations_carry_locations_and_resource() {
    let mut parser = Parser::new();
    let parse = parser
        .create_parse()
        .resource_source(fixture("order-invalid.xml"))
        .unwrap()
        .schema_resource(fixture("shop.xsd"))
        .execute()
        .unwrap();

    let first = &parse.errors()[0];
    assert_eq!(first.line(), 3);
    assert!(first.resource().unwrap().ends_with("order-invalid.xml"));
}

#[test]
fn test_elements_outside_target_namespace_ignored() {
    let document = r#"<order xmlns="urn:shop" xmlns:x="urn:other">
        <x:anything/>
        <item/>
    </order>"#;
    let mut parser = Parser::new();
    let parse = parser
        .create_parse()
        .string_source(document)
        .unwrap()
        .schema_resource(fixture("shop.xsd"))
        .execute()
        .unwrap();
    assert!(!parse.has_errors());
}

#[test]
fn test_missing_schema_resource_is_fatal() {
    let mut parser = Parser::new();
    let err = parser
        .create_parse()
        .string_source("<order xmlns=\"urn:shop\"/>")
        .unwrap()
        .schema_resource("/nonexistent/schema.xsd")
        .execute()
        .unwrap_err();
    assert!(matches!(err.kind(), saxtree::ErrorKind::Io { .. }));
}

#[test]
fn test_vocabulary_compiles_from_fixture() {
    let bytes = std::fs::read(fixture("shop.xsd")).unwrap();
    let vocabulary = Vocabulary::compile(&bytes).unwrap();
    assert_eq!(vocabulary.target_namespace(), Some("urn:shop"));
    assert!(vocabulary.declares("order"));
    assert!(vocabulary.declares("item"));
    assert!(vocabulary.declares("note"));
    assert!(!vocabulary.declares("itme"));
}
