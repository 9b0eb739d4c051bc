use crate::ctx::RequestState;
use crate::rule::RuleResult;
use crate::value::{Operation, RewriteMap, Value, ValueConcatenator, ValueGetter};
use pretty_assertions::assert_eq;
use std::sync::Arc;

//-----------------------------------------------------------------------------
// Built-in operations
//-----------------------------------------------------------------------------
#[test]
fn builtin_names_are_case_insensitive() {
    assert!(matches!(
        Operation::builtin("ToLower"),
        Some(Operation::LowerCase)
    ));
    assert!(matches!(
        Operation::builtin("URLENCODE"),
        Some(Operation::UrlEncode)
    ));
    assert!(Operation::builtin("reverse").is_none());
}

#[test]
fn url_encode_keeps_unreserved_characters() {
    assert_eq!(
        Operation::UrlEncode.apply("a b/c?d=e~f_g.h-i"),
        "a%20b%2Fc%3Fd%3De~f_g.h-i"
    );
}

#[test]
fn url_decode_handles_plus_and_percent() {
    assert_eq!(Operation::UrlDecode.apply("a+b%2Fc%20d"), "a b/c d");
}

#[test]
fn make_absolute_removes_dot_segments() {
    assert_eq!(Operation::MakeAbsolute.apply("a/./b/../c"), "/a/c");
    assert_eq!(Operation::MakeAbsolute.apply("../../x/"), "/x/");
    assert_eq!(Operation::MakeAbsolute.apply(""), "/");
    assert_eq!(
        Operation::MakeAbsolute.apply("https://example.com/a/../b"),
        "https://example.com/a/../b"
    );
}

#[test]
fn map_lookup_is_case_insensitive_with_default() {
    // Arrange
    let mut map = RewriteMap::new("colors", Some("unknown".into()));
    map.insert("Red", "ff0000");
    let op = Operation::Map(Arc::new(map));

    // Act / Assert
    assert_eq!(op.apply("RED"), "ff0000");
    assert_eq!(op.apply("blue"), "unknown");
    assert_eq!(op.to_string(), "map:colors");
}

//-----------------------------------------------------------------------------
// Chaining and concatenation
//-----------------------------------------------------------------------------
#[test]
fn getter_operations_run_left_to_right() {
    // Arrange
    let getter = ValueGetter::literal("A B")
        .with_operation(Operation::LowerCase)
        .with_operation(Operation::UrlEncode);

    // Act
    let value = getter.get_string(&RequestState::default(), &RuleResult::new());

    // Assert
    assert_eq!(value, "a%20b");
    assert_eq!(getter.to_string(), "urlEncode(toLower(\"A B\"))");
}

#[test]
fn concatenation_joins_parts_with_separator() {
    // Arrange
    let state = RequestState::new("/Shop/Items");
    let concat = ValueConcatenator::new(vec![
        Value::literal("x"),
        ValueGetter::new(crate::value::Scope::Path, None).unwrap().into(),
    ])
    .with_separator("|")
    .with_operation(Operation::LowerCase);

    // Act
    let value = concat.get_string(&state, &RuleResult::new());

    // Assert
    assert_eq!(value, "x|/shop/items");
}

#[test]
fn operation_on_concat_wraps_whole_value() {
    // Arrange
    let inner = Value::Concat(ValueConcatenator::new(vec![
        Value::literal("A"),
        Value::literal("B"),
    ]));

    // Act
    let once = inner.with_operation(Operation::LowerCase);
    let twice = once.with_operation(Operation::UrlEncode);

    // Assert
    let state = RequestState::default();
    assert_eq!(twice.get_string(&state, &RuleResult::new()), "ab");
    assert!(twice.as_getter().is_none());
}
