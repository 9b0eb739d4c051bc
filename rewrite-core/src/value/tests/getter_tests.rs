use crate::ctx::RequestState;
use crate::error::BuildError;
use crate::rule::{CaptureKey, RuleResult};
use crate::value::{Scope, ValueGetter};
use pretty_assertions::assert_eq;

fn request() -> RequestState {
    RequestState::new("/path1/path2/path3?Id=7&tag=a&tag=b")
        .with_header("Host", "example.com")
        .with_server_variable("HTTPS", "on")
}

fn get(scope: Scope, index: Option<&str>, state: &RequestState) -> String {
    let getter = ValueGetter::new(scope, index).expect("getter");
    getter.get_string(state, &RuleResult::new())
}

//-----------------------------------------------------------------------------
// Scope parsing
//-----------------------------------------------------------------------------
#[test]
fn scope_parses_camel_and_snake_case() {
    assert_eq!("pathElement".parse::<Scope>().unwrap(), Scope::PathElement);
    assert_eq!("path_element".parse::<Scope>().unwrap(), Scope::PathElement);
    assert_eq!(
        "ORIGINAL_QUERY_STRING".parse::<Scope>().unwrap(),
        Scope::OriginalQueryString
    );
}

#[test]
fn unknown_scope_is_rejected() {
    let err = "cookie".parse::<Scope>().unwrap_err();

    assert!(matches!(err, BuildError::UnknownScope(name) if name == "cookie"));
}

//-----------------------------------------------------------------------------
// Whole-request scopes
//-----------------------------------------------------------------------------
#[test]
fn url_scopes_read_working_and_original_copies() {
    // Arrange
    let mut state = request();
    state.set_new_path_string("/moved");

    // Act / Assert
    assert_eq!(get(Scope::Url, None, &state), "/moved?Id=7&tag=a&tag=b");
    assert_eq!(
        get(Scope::OriginalUrl, None, &state),
        "/path1/path2/path3?Id=7&tag=a&tag=b"
    );
    assert_eq!(get(Scope::Path, None, &state), "/moved");
    assert_eq!(get(Scope::OriginalPath, None, &state), "/path1/path2/path3");
    assert_eq!(get(Scope::QueryString, None, &state), "Id=7&tag=a&tag=b");
}

#[test]
fn match_path_drops_leading_separator() {
    let state = request();

    assert_eq!(get(Scope::MatchPath, None, &state), "path1/path2/path3");
}

//-----------------------------------------------------------------------------
// Path elements
//-----------------------------------------------------------------------------
#[test]
fn path_element_reads_positive_and_negative_indices() {
    let state = request();

    assert_eq!(get(Scope::PathElement, Some("1"), &state), "path1");
    assert_eq!(get(Scope::PathElement, Some("-1"), &state), "path3");
    assert_eq!(get(Scope::OriginalPathElement, Some("-3"), &state), "path1");
}

#[test]
fn negative_index_skips_trailing_separator() {
    let state = RequestState::new("/a/b/");

    assert_eq!(get(Scope::PathElement, Some("-1"), &state), "b");
}

#[test]
fn out_of_range_element_is_empty() {
    let state = request();

    assert_eq!(get(Scope::PathElement, Some("4"), &state), "");
    assert_eq!(get(Scope::PathElement, Some("-4"), &state), "");
}

#[test]
fn element_zero_or_missing_collapses_to_whole_path() {
    // Act
    let zero = ValueGetter::new(Scope::PathElement, Some("0")).unwrap();
    let missing = ValueGetter::new(Scope::OriginalPathElement, None).unwrap();
    let garbage = ValueGetter::new(Scope::PathElement, Some("abc")).unwrap();

    // Assert
    assert_eq!(zero.scope(), Scope::Path);
    assert_eq!(missing.scope(), Scope::OriginalPath);
    assert_eq!(garbage.scope(), Scope::Path);
    assert_eq!(zero.element_index(), None);
}

//-----------------------------------------------------------------------------
// Named scopes
//-----------------------------------------------------------------------------
#[test]
fn parameters_are_case_insensitive_and_joined() {
    let state = request();

    assert_eq!(get(Scope::Parameter, Some("ID"), &state), "7");
    assert_eq!(get(Scope::OriginalParameter, Some("tag"), &state), "a,b");
    assert_eq!(get(Scope::Parameter, Some("missing"), &state), "");
}

#[test]
fn headers_and_server_variables_resolve_by_name() {
    let state = request();

    assert_eq!(get(Scope::Header, Some("host"), &state), "example.com");
    assert_eq!(get(Scope::OriginalHeader, Some("HOST"), &state), "example.com");
    assert_eq!(get(Scope::ServerVariable, Some("https"), &state), "on");
}

#[test]
fn named_scope_requires_a_name() {
    let err = ValueGetter::new(Scope::Header, Some("  ")).unwrap_err();

    assert!(matches!(
        err,
        BuildError::MissingIndex {
            scope: Scope::Header
        }
    ));
}

//-----------------------------------------------------------------------------
// Captures and literals
//-----------------------------------------------------------------------------
#[test]
fn capture_groups_read_from_rule_result() {
    // Arrange
    let state = request();
    let mut result = RuleResult::new();
    result.store_captures(CaptureKey::Match, vec!["path1/x".into(), "x".into()]);

    // Act
    let group = ValueGetter::new(Scope::MatchGroup, Some("1")).unwrap();
    let absent = ValueGetter::capture(CaptureKey::Condition, 0);

    // Assert
    assert_eq!(group.get_string(&state, &result), "x");
    assert_eq!(absent.get_string(&state, &result), "");
}

#[test]
fn capture_group_index_must_be_numeric() {
    let err = ValueGetter::new(Scope::ConditionGroup, Some("x")).unwrap_err();

    assert!(matches!(err, BuildError::InvalidIndex { .. }));
}

#[test]
fn get_int_falls_back_to_default() {
    let state = request();
    let result = RuleResult::new();

    assert_eq!(
        ValueGetter::literal(" 42 ").get_int(&state, &result, -1),
        42
    );
    assert_eq!(
        ValueGetter::literal("4x2").get_int(&state, &result, -1),
        -1
    );
    assert_eq!(
        ValueGetter::new(Scope::Parameter, Some("id"))
            .unwrap()
            .get_int(&state, &result, 0),
        7
    );
}
