use crate::action::{Append, Delete, Insert, Normalize, Replace, SeparatorPolicy, Target};
use crate::ctx::RequestState;
use crate::error::BuildError;
use crate::rule::RuleResult;
use crate::value::{Scope, Value};
use pretty_assertions::assert_eq;

fn new_value() -> Value {
    Value::literal("NewValue")
}

fn replace(scope: Scope, index: Option<&str>, value: &str, url: &str) -> String {
    let mut state = RequestState::new(url);
    Replace::new(scope, index, Value::literal(value))
        .unwrap()
        .perform(&mut state, &RuleResult::new());
    state.new_url_string()
}

fn append(scope: Scope, index: Option<&str>, value: &str, url: &str) -> String {
    let mut state = RequestState::new(url);
    Append::new(scope, index, Value::literal(value))
        .unwrap()
        .perform(&mut state, &RuleResult::new());
    state.new_url_string()
}

fn delete(scope: Scope, index: Option<&str>, url: &str) -> String {
    let mut state = RequestState::new(url);
    Delete::new(scope, index).unwrap().perform(&mut state);
    state.new_url_string()
}

//-----------------------------------------------------------------------------
// Targets
//-----------------------------------------------------------------------------
#[test]
fn original_scopes_are_read_only() {
    let err = Target::new("replace", Scope::OriginalPath, None).unwrap_err();

    assert!(matches!(err, BuildError::ReadOnlyScope { .. }));
}

#[test]
fn meta_scopes_are_not_writable() {
    let err = Target::new("replace", Scope::MatchGroup, Some("1")).unwrap_err();

    assert!(matches!(err, BuildError::UnsupportedScope { .. }));
}

#[test]
fn element_zero_targets_whole_path() {
    assert_eq!(
        Target::new("replace", Scope::PathElement, Some("0")).unwrap(),
        Target::Path
    );
    assert_eq!(
        Target::new("replace", Scope::PathElement, Some("-2")).unwrap(),
        Target::PathElement(-2)
    );
}

#[test]
fn named_targets_are_lower_cased() {
    assert_eq!(
        Target::new("append", Scope::Header, Some("X-Trace")).unwrap(),
        Target::Header("x-trace".into())
    );
    assert!(Target::new("append", Scope::Parameter, None).is_err());
}

//-----------------------------------------------------------------------------
// Replace
//-----------------------------------------------------------------------------
#[test]
fn replace_element_zero_replaces_whole_path() {
    assert_eq!(
        replace(Scope::PathElement, Some("0"), "NewValue", "/path1/path2/path3"),
        "NewValue"
    );
}

#[test]
fn replace_element_by_negative_index() {
    assert_eq!(
        replace(Scope::PathElement, Some("-1"), "x", "/a/b/c/"),
        "/a/b/x/"
    );
}

#[test]
fn replace_out_of_range_element_is_noop() {
    // Arrange
    let mut state = RequestState::new("/a/b");
    let action = Replace::new(Scope::PathElement, Some("5"), new_value()).unwrap();

    // Act
    action.perform(&mut state, &RuleResult::new());

    // Assert
    assert_eq!(state.new_url_string(), "/a/b");
    assert!(!state.is_modified());
}

#[test]
fn replace_url_resplits_path_and_query() {
    // Arrange
    let mut state = RequestState::new("/old?x=1");

    // Act
    Replace::new(Scope::Url, None, Value::literal("/new/place?y=2"))
        .unwrap()
        .perform(&mut state, &RuleResult::new());

    // Assert
    assert_eq!(state.new_path_string(), "/new/place");
    assert_eq!(state.parameter("y").as_deref(), Some("2"));
    assert_eq!(state.parameter("x"), None);
}

#[test]
fn replace_parameter_overwrites_all_values() {
    assert_eq!(
        replace(Scope::Parameter, Some("tag"), "z", "/p?tag=a&tag=b&id=1"),
        "/p?tag=z&id=1"
    );
}

//-----------------------------------------------------------------------------
// Append
//-----------------------------------------------------------------------------
#[test]
fn append_to_element_by_negative_index() {
    assert_eq!(
        append(Scope::PathElement, Some("-3"), "NewValue", "/path1/path2/path3"),
        "/path1NewValue/path2/path3"
    );
}

#[test]
fn append_negative_index_reaching_root_is_noop() {
    assert_eq!(
        append(Scope::PathElement, Some("-3"), "NewValue", "/path1/path2"),
        "/path1/path2"
    );
}

#[test]
fn append_path_uses_exactly_one_separator() {
    assert_eq!(append(Scope::Path, None, "/c", "/a/b/"), "/a/b/c");
    assert_eq!(append(Scope::Path, None, "c", "/a/b"), "/a/b/c");
}

#[test]
fn append_query_uses_exactly_one_ampersand() {
    assert_eq!(append(Scope::QueryString, None, "&b=2", "/p?a=1&"), "/p?a=1&b=2");
    assert_eq!(append(Scope::QueryString, None, "b=2", "/p"), "/p?b=2");
    assert_eq!(append(Scope::QueryString, None, "", "/p?a=1"), "/p?a=1");
}

#[test]
fn append_creates_missing_entries() {
    // Arrange
    let mut state = RequestState::new("/p?a=1").with_header("Via", "1.1 a");

    // Act
    for (scope, name, value) in [
        (Scope::Parameter, "b", "new"),
        (Scope::Parameter, "a", "0"),
        (Scope::Header, "via", ", 1.1 b"),
        (Scope::ServerVariable, "X_SEEN", "yes"),
    ] {
        Append::new(scope, Some(name), Value::literal(value))
            .unwrap()
            .perform(&mut state, &RuleResult::new());
    }

    // Assert
    assert_eq!(state.new_query_string(), "a=10&b=new");
    assert_eq!(state.header("via"), Some("1.1 a, 1.1 b"));
    assert_eq!(state.original_header("via"), Some("1.1 a"));
    assert_eq!(state.server_variable("x_seen"), Some("yes"));
}

//-----------------------------------------------------------------------------
// Insert
//-----------------------------------------------------------------------------
#[test]
fn insert_at_zero_goes_after_root_marker() {
    // Arrange
    let action = Insert::new(Scope::PathElement, Some("0"), new_value()).unwrap();
    let mut deep = RequestState::new("/path1/path2/path3");
    let mut root = RequestState::new("/");

    // Act
    action.perform(&mut deep, &RuleResult::new());
    action.perform(&mut root, &RuleResult::new());

    // Assert
    assert_eq!(deep.new_path_string(), "/NewValue/path1/path2/path3");
    assert_eq!(root.new_path_string(), "/");
}

#[test]
fn insert_before_element() {
    let action = Insert::new(Scope::Path, Some("2"), new_value()).unwrap();
    let mut state = RequestState::new("/a/b/c");

    action.perform(&mut state, &RuleResult::new());

    assert_eq!(state.new_path_string(), "/a/NewValue/b/c");
}

#[test]
fn insert_requires_numeric_index_on_path() {
    assert!(matches!(
        Insert::new(Scope::PathElement, Some("x"), new_value()),
        Err(BuildError::InvalidIndex { .. })
    ));
    assert!(matches!(
        Insert::new(Scope::PathElement, None, new_value()),
        Err(BuildError::MissingIndex { .. })
    ));
    assert!(matches!(
        Insert::new(Scope::QueryString, Some("1"), new_value()),
        Err(BuildError::UnsupportedScope { .. })
    ));
    assert!(matches!(
        Insert::new(Scope::OriginalPath, Some("1"), new_value()),
        Err(BuildError::ReadOnlyScope { .. })
    ));
}

//-----------------------------------------------------------------------------
// Delete
//-----------------------------------------------------------------------------
#[test]
fn delete_element_removes_segment() {
    assert_eq!(
        delete(Scope::PathElement, Some("1"), "/path1/path2/path3"),
        "/path2/path3"
    );
}

#[test]
fn delete_element_zero_collapses_to_root() {
    assert_eq!(delete(Scope::PathElement, Some("0"), "/path1/path2/path3"), "/");
}

#[test]
fn delete_last_segment_collapses_to_root() {
    assert_eq!(delete(Scope::PathElement, Some("-1"), "/only"), "/");
    assert_eq!(delete(Scope::PathElement, Some("1"), "/only/"), "/");
}

#[test]
fn delete_element_keeps_relative_head() {
    assert_eq!(delete(Scope::PathElement, Some("1"), "a/b"), "a");
    assert_eq!(delete(Scope::PathElement, Some("-1"), "a/b/c"), "a/b");
}

#[test]
fn delete_after_leading_separator_removed() {
    // Arrange
    let mut state = RequestState::new("/a/b");
    Normalize::new(SeparatorPolicy::Remove, SeparatorPolicy::Leave).perform(&mut state);

    // Act
    Delete::new(Scope::PathElement, Some("1"))
        .unwrap()
        .perform(&mut state);

    // Assert
    assert_eq!(state.new_path_string(), "a");
}

#[test]
fn delete_whole_url_and_query() {
    assert_eq!(delete(Scope::Url, None, "/a?b=1"), "/");
    assert_eq!(delete(Scope::QueryString, None, "/a?b=1"), "/a");
}

#[test]
fn delete_missing_parameter_leaves_request_untouched() {
    // Arrange
    let mut state = RequestState::new("/a?b=1");

    // Act
    Delete::new(Scope::Parameter, Some("missing"))
        .unwrap()
        .perform(&mut state);

    // Assert
    assert!(!state.is_modified());
}

#[test]
fn delete_header() {
    let mut state = RequestState::new("/").with_header("Cookie", "x");

    Delete::new(Scope::Header, Some("cookie"))
        .unwrap()
        .perform(&mut state);

    assert_eq!(state.header("cookie"), None);
    assert_eq!(state.original_header("cookie"), Some("x"));
}
