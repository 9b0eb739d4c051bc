use crate::ctx::request::{parse_query, serialize_query};
use pretty_assertions::assert_eq;

#[test]
fn parse_lower_cases_keys_and_collects_repeats() {
    // Arrange
    let raw = "A=1&b=2&a=3";

    // Act
    let query = parse_query(raw);

    // Assert
    assert_eq!(query.len(), 2);
    assert_eq!(query["a"], vec!["1", "3"]);
    assert_eq!(query["b"], vec!["2"]);
}

#[test]
fn parse_skips_empty_pairs_and_allows_bare_keys() {
    let query = parse_query("&flag&&x=");

    assert_eq!(query["flag"], vec![""]);
    assert_eq!(query["x"], vec![""]);
}

#[test]
fn parse_empty_is_empty() {
    assert!(parse_query("").is_empty());
}

#[test]
fn serialize_keeps_arrival_order() {
    let query = parse_query("z=1&a=2&z=3&flag");

    assert_eq!(serialize_query(&query), "z=1&z=3&a=2&flag");
}

#[test]
fn values_are_not_decoded() {
    let query = parse_query("q=a%20b");

    assert_eq!(query["q"], vec!["a%20b"]);
}
