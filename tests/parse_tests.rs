//! End-to-end parse and tree-query tests

#![allow(clippy::unwrap_used)]

use saxtree::{ErrorKind, Namespace, Parser};

#[test]
fn test_tree_matches_document_structure() {
    let mut parser = Parser::new();
    let parse = parser
        .create_parse()
        .string_source("<a id=\"1\"><b id=\"2\"/><b id=\"3\"/></a>")
        .unwrap()
        .execute()
        .unwrap();

    let root = parse.root_element().unwrap();
    assert_eq!(root.tag_name(), "a");
    assert_eq!(root.children().len(), 2);
    assert_eq!(root.children_named("b").len(), 2);

    let err = root.child("b").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::AmbiguousChild { count: 2, .. }));
}

#[test]
fn test_collect_ids_in_document_order() {
    let mut parser = Parser::new();
    let parse = parser
        .create_parse()
        .string_source("<a id=\"1\"><b id=\"2\"/><b id=\"3\"/></a>")
        .unwrap()
        .execute()
        .unwrap();

    let mut ids = Vec::new();
    parse.root_element().unwrap().collect_ids(&mut ids);
    assert_eq!(
        ids,
        vec![
            Some("1".to_string()),
            Some("2".to_string()),
            Some("3".to_string()),
        ]
    );
}

#[test]
fn test_collect_ids_keeps_entries_for_missing_ids() {
    // Elements without an id still contribute an entry; consuming layers
    // are expected to filter. Flagging the quirk here on purpose.
    let mut parser = Parser::new();
    let parse = parser
        .create_parse()
        .string_source("<a id=\"1\"><b/></a>")
        .unwrap()
        .execute()
        .unwrap();

    let mut ids = Vec::new();
    parse.root_element().unwrap().collect_ids(&mut ids);
    assert_eq!(ids, vec![Some("1".to_string()), None]);
}

#[test]
fn test_text_fragmentation_invariance() {
    // Entities force the engine to deliver character data in fragments;
    // the accumulated text must match a single-delivery document.
    let mut parser = Parser::new();
    let fragmented = parser
        .create_parse()
        .string_source("<a>one &amp; two &gt; three</a>")
        .unwrap()
        .execute()
        .unwrap();
    assert_eq!(
        fragmented.root_element().unwrap().text(),
        "one & two > three"
    );
}

#[test]
fn test_cdata_and_text_mix() {
    let mut parser = Parser::new();
    let parse = parser
        .create_parse()
        .string_source("<a>start <![CDATA[<raw&>]]> end</a>")
        .unwrap()
        .execute()
        .unwrap();
    assert_eq!(parse.root_element().unwrap().text(), "start <raw&> end");
}

#[test]
fn test_text_preserves_significant_whitespace() {
    let mut parser = Parser::new();
    let parse = parser
        .create_parse()
        .string_source("<a><![CDATA[  x  ]]></a>")
        .unwrap()
        .execute()
        .unwrap();
    assert_eq!(parse.root_element().unwrap().text(), "  x  ");

    let parse = parser
        .create_parse()
        .string_source("<a>  padded  </a>")
        .unwrap()
        .execute()
        .unwrap();
    assert_eq!(parse.root_element().unwrap().text(), "  padded  ");
}

#[test]
fn test_attribute_lookup_without_namespaces() {
    // Without a schema the parse is namespace-unaware; qualified names
    // are literal, so lookup falls back to the delivered name.
    let mut parser = Parser::new();
    let parse = parser
        .create_parse()
        .string_source("<a xmlns:c=\"urn:c\" c:tag=\"v\"/>")
        .unwrap()
        .execute()
        .unwrap();
    let root = parse.root_element().unwrap();
    assert_eq!(root.tag_name(), "a");
    assert_eq!(root.attribute("c:tag"), Some("v"));
}

#[test]
fn test_namespace_aware_queries_with_alternative_fallback() {
    let mut parser = Parser::new();
    let parse = parser
        .create_parse()
        .resource_source(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/order-valid.xml"
        ))
        .unwrap()
        .schema_resource(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/shop.xsd"
        ))
        .execute()
        .unwrap();

    let root = parse.root_element().unwrap();
    assert_eq!(root.namespace_uri(), Some("urn:shop"));
    assert_eq!(root.tag_name(), "order");

    // Primary URI matches directly.
    let shop = Namespace::new("urn:shop");
    assert_eq!(root.children_ns(&shop, "item").len(), 2);

    // Primary misses, alternative URI carries the lookup.
    let renamed = Namespace::with_alternative("urn:shop-v2", "urn:shop");
    assert_eq!(root.children_ns(&renamed, "item").len(), 2);
    let note = root.child_ns(&renamed, "note").unwrap().unwrap();
    assert_eq!(note.text(), "rush delivery");

    // Absent under both URIs.
    let unrelated = Namespace::with_alternative("urn:a", "urn:b");
    assert!(root.children_ns(&unrelated, "item").is_empty());
}

#[test]
fn test_second_source_rejected() {
    let mut parser = Parser::new();
    let err = parser
        .create_parse()
        .string_source("<a/>")
        .unwrap()
        .url_source("file:///tmp/x.xml")
        .unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::SourceAlreadySet {
            existing: "string",
            requested: "url",
        }
    );
}

#[test]
fn test_missing_resource_is_fatal_io() {
    let mut parser = Parser::new();
    let err = parser
        .create_parse()
        .resource_source("/nonexistent/missing.xml")
        .unwrap()
        .execute()
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Io { .. }));
}

#[test]
fn test_parse_str_escalates_collected_errors() {
    // An unknown entity is recoverable inside a Parse, but the strict
    // one-shot entry point escalates it.
    let err = saxtree::parse_str("<a>&nope;</a>").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::ParseFailure { .. }));
    assert!(err.message().contains("unknown entity"));

    let root = saxtree::parse_str("<a><b/></a>").unwrap();
    assert_eq!(root.children().len(), 1);
}

#[test]
fn test_root_populated_alongside_recoverable_errors() {
    let mut parser = Parser::new();
    let parse = parser
        .create_parse()
        .name("diag.xml")
        .string_source("<a>&one;<b>&two;</b></a>")
        .unwrap()
        .execute()
        .unwrap();

    assert!(parse.has_errors());
    assert_eq!(parse.errors().len(), 2);
    assert!(parse.root_element().is_some());
    assert_eq!(parse.errors()[0].resource(), Some("diag.xml"));
}
