//! Integration tests for the CQL parser.
//!
//! These cover boolean associativity, sort and prefix handling, and that the
//! canonical rendering parses back to the same tree.

use pgcql_parser::{BooleanOp, CqlNode, CqlParser, MAX_DEPTH, Modifier};

// ============================================================================
// Helper Functions
// ============================================================================

fn parse(input: &str) -> CqlNode {
    CqlParser::parse(input).unwrap_or_else(|e| panic!("parse of {:?} failed: {}", input, e))
}

fn assert_round_trip(input: &str) {
    let node = parse(input);
    let rendered = node.to_cql();
    let reparsed = parse(&rendered);
    assert_eq!(node, reparsed, "rendering {:?} of {:?} changed the tree", rendered, input);
}

// ============================================================================
// Boolean Structure
// ============================================================================

#[test]
fn test_booleans_are_left_associative() {
    let node = parse("cost=1 or cost=2 and cost=3");
    assert_eq!(node.to_cql(), "((cost = 1) or (cost = 2)) and (cost = 3)");
}

#[test]
fn test_parentheses_group() {
    let node = parse("cost=1 or (cost=2 and cost=3)");
    assert_eq!(node.to_cql(), "(cost = 1) or ((cost = 2) and (cost = 3))");
}

#[test]
fn test_keywords_case_insensitive() {
    match parse("a=1 NOT b=2") {
        CqlNode::Boolean(node) => assert_eq!(node.op, BooleanOp::Not),
        other => panic!("Expected Boolean, got {:?}", other),
    }
}

#[test]
fn test_prox_with_modifiers() {
    match parse("title==v1 prox/unit=word title==v2") {
        CqlNode::Boolean(node) => {
            assert_eq!(node.op, BooleanOp::Prox);
            assert_eq!(node.modifiers, vec![Modifier::with_value("unit", "=", "word")]);
        }
        other => panic!("Expected Boolean, got {:?}", other),
    }
}

// ============================================================================
// Sort and Prefix
// ============================================================================

#[test]
fn test_sortby_keys_and_modifiers() {
    match parse("paid=1234 sortby cost/sort.descending title/sort.ascending") {
        CqlNode::Sort(sort) => {
            assert_eq!(sort.keys.len(), 2);
            assert_eq!(sort.keys[0].base, "cost");
            assert_eq!(sort.keys[0].modifiers, vec![Modifier::new("sort.descending")]);
            assert_eq!(sort.keys[1].base, "title");
            assert!(sort.subtree.as_term().is_some());
        }
        other => panic!("Expected Sort, got {:?}", other),
    }
}

#[test]
fn test_prefix_wraps_sorted_query() {
    match parse(">dc=\"http://foo.org/p\" paid=1234 sortby isbn") {
        CqlNode::Prefix(prefix) => {
            assert_eq!(prefix.name.as_deref(), Some("dc"));
            assert_eq!(prefix.uri, "http://foo.org/p");
            assert!(matches!(*prefix.subtree, CqlNode::Sort(_)));
        }
        other => panic!("Expected Prefix, got {:?}", other),
    }
}

#[test]
fn test_prefix_without_name() {
    match parse(">\"http://foo.org/p\" title==v1") {
        CqlNode::Prefix(prefix) => {
            assert_eq!(prefix.name, None);
            assert_eq!(prefix.uri, "http://foo.org/p");
        }
        other => panic!("Expected Prefix, got {:?}", other),
    }
}

#[test]
fn test_prefix_inside_parentheses() {
    let node = parse("(>x=\"http://foo.org/p\" title==v1) and b=2");
    assert!(matches!(node, CqlNode::Boolean(_)));
}

// ============================================================================
// Terms
// ============================================================================

#[test]
fn test_terms_keep_escapes() {
    let node = parse(r#"Title="x\\\"\\""#);
    assert_eq!(node.as_term().unwrap().term, r#"x\\\"\\"#);

    let node = parse(r"Title=a\*b");
    assert_eq!(node.as_term().unwrap().term, r"a\*b");
}

#[test]
fn test_reserved_word_as_term() {
    let node = parse("title = and");
    assert_eq!(node.as_term().unwrap().term, "and");
}

#[test]
fn test_empty_quoted_term() {
    let node = parse("cost==\"\"");
    let term = node.as_term().unwrap();
    assert_eq!(term.term, "");
    assert_eq!(term.to_cql(), "cost == \"\"");
}

// ============================================================================
// Canonical Rendering
// ============================================================================

#[test]
fn test_round_trips() {
    for input in [
        "dc.Title==value",
        "Title=men's room",
        "Title=\"a\\\"b\"",
        "title==v1 not cql.allRecords=1",
        "cost=\"\" or cost<>\"\" not cost<>\"\"",
        "paid=1234 sortby cost/sort.descending title/sort.ascending",
        ">x = \"http://foo.org/p\" title==v1",
        "dylan and title =/locale=en v1",
        "title==v1 prox/unit=word title==v2",
        "isbn=978-3-16-148410-*",
        "title==x a\\",
        "title==and x\\",
    ] {
        assert_round_trip(input);
    }
}

#[test]
fn test_ast_serializes_to_json() {
    let node = parse("paid=true sortby cost/sort.descending");
    let json = serde_json::to_value(&node).unwrap();
    assert_eq!(json["type"], "sort");
    assert_eq!(json["subtree"]["type"], "term");
    assert_eq!(json["subtree"]["relation"]["base"], "=");
    assert_eq!(json["keys"][0]["modifiers"][0]["name"], "sort.descending");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_error_messages() {
    let cases = [
        ("(", "expected index or term, got EOF"),
        ("title=\"open", "unterminated quoted string"),
        ("a=1 and", "expected index or term, got EOF"),
        ("(a=1", "expected \")\", got EOF"),
        ("a=1 sortby", "expected sort index, got EOF"),
        ("title <>", "expected search term, got EOF"),
        ("> a=1", "expected index or term, got EOF"),
    ];
    for (input, expected) in cases {
        let err = CqlParser::parse(input).unwrap_err();
        assert_eq!(err.message, expected, "query {:?}", input);
    }
}

// ============================================================================
// Nesting Limits
// ============================================================================

#[test]
fn test_long_boolean_chain() {
    let at_limit = vec!["cost=1"; MAX_DEPTH + 1].join(" or ");
    assert!(CqlParser::parse(&at_limit).is_ok());

    let too_long = vec!["cost=1"; 1000].join(" or ");
    let err = CqlParser::parse(&too_long).unwrap_err();
    assert_eq!(err.message, "query too deeply nested");
}

#[test]
fn test_deep_parentheses() {
    let at_limit = format!("{}a=1{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
    assert!(CqlParser::parse(&at_limit).is_ok());

    let too_deep = format!("{}a=1{}", "(".repeat(100_000), ")".repeat(100_000));
    let err = CqlParser::parse(&too_deep).unwrap_err();
    assert_eq!(err.message, "query too deeply nested");
    assert_eq!(err.position, MAX_DEPTH);
}

#[test]
fn test_deep_prefixes() {
    let too_deep = format!("{}a=1", ">p=\"http://x\" ".repeat(1000));
    let err = CqlParser::parse(&too_deep).unwrap_err();
    assert_eq!(err.message, "query too deeply nested");
}

#[test]
fn test_parenthesized_chains_share_the_limit() {
    let half = vec!["a=1"; MAX_DEPTH / 2 + 1].join(" and ");
    let nested = format!("({}) or ({})", half, half);
    assert!(CqlParser::parse(&nested).is_ok());

    let inner = vec!["a=1"; MAX_DEPTH + 1].join(" and ");
    let err = CqlParser::parse(&format!("({})", inner)).unwrap_err();
    assert_eq!(err.message, "query too deeply nested");
}
