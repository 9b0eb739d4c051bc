use crate::action::Action;
use crate::conf::{ConfigError, compile_str};
use crate::condition::Condition;
use crate::registry::CustomRegistry;
use crate::rule::RuleSet;
use pretty_assertions::assert_eq;
use std::path::Path;

fn compile(text: &str) -> Result<RuleSet, ConfigError> {
    compile_str(text, Path::new("test.hcl"), &CustomRegistry::new())
}

fn compile_err(text: &str) -> ConfigError {
    match compile(text) {
        Ok(_) => panic!("expected a config error"),
        Err(e) => e,
    }
}

//-----------------------------------------------------------------------------
// Happy path
//-----------------------------------------------------------------------------
#[test]
fn compiles_rules_and_maps() {
    // Arrange
    let text = r#"
rewrite_maps = [
  {
    name          = "Legacy"
    default_value = "/"
    entries = {
      "/old-page" = "/new-page"
    }
  }
]

rules = [
  {
    name            = "canonical"
    stop_processing = true
    match = { url = "^(.*)$" }
    actions = [
      { type = "rewrite", url = "/{legacy:{R:1}}" }
    ]
  },
  {
    match = { url = "^api/", syntax = "regex" }
    rules = [
      { name = "inner", actions = [ { type = "abort" } ] }
    ]
  }
]
"#;

    // Act
    let rules = compile(text).unwrap();

    // Assert
    assert_eq!(rules.root.len(), 2);
    assert_eq!(rules.rule_count(), 3);
    assert_eq!(rules.map_count(), 1);
    assert!(rules.map("legacy").is_some());
    assert_eq!(rules.root.rules[0].name, "canonical");
    assert!(rules.root.rules[0].stop_processing);
    assert_eq!(rules.root.rules[1].name, "rule-1");
    assert!(matches!(rules.root.rules[1].action, Some(Action::Rules(_))));
}

#[test]
fn disabled_rules_are_skipped() {
    let text = r#"
rules = [
  { name = "off", enabled = false },
  { name = "on" }
]
"#;

    let rules = compile(text).unwrap();

    assert_eq!(rules.root.len(), 1);
    assert_eq!(rules.root.rules[0].name, "on");
}

#[test]
fn match_and_conditions_merge_into_one_list() {
    let text = r#"
rules = [
  {
    match = { url = "^a$" }
    conditions = {
      items = [
        { input = "{HTTP_HOST}", pattern = "example" },
        { scope = "parameter", index = "page", match_type = "number", operator = ">", value = 1 }
      ]
    }
  }
]
"#;

    let rules = compile(text).unwrap();

    match &rules.root.rules[0].condition {
        Some(Condition::List(list)) => assert_eq!(list.len(), 3),
        other => panic!("expected a flat condition list, got {other:?}"),
    }
}

#[test]
fn single_action_is_not_wrapped() {
    let text = r#"
rules = [
  { actions = [ { type = "keep", scope = "parameter", index = "page,sort" } ] }
]
"#;

    let rules = compile(text).unwrap();

    assert!(matches!(rules.root.rules[0].action, Some(Action::Keep(_))));
}

#[test]
fn action_flags_follow_mutators() {
    let text = r#"
rules = [
  { actions = [ { type = "append", value = "x", stop_processing = true } ] }
]
"#;

    let rules = compile(text).unwrap();

    match &rules.root.rules[0].action {
        Some(Action::List(list)) => {
            assert_eq!(list.len(), 2);
            assert!(matches!(list.actions()[1], Action::DoNothing(o) if o.stop_processing));
        }
        other => panic!("expected an action list, got {other:?}"),
    }
}

#[test]
fn custom_response_defaults_reason_from_status() {
    let text = r#"
rules = [
  { actions = [ { type = "custom_response", status_code = 404 } ] }
]
"#;

    let rules = compile(text).unwrap();

    match &rules.root.rules[0].action {
        Some(Action::CustomResponse(response)) => {
            assert_eq!(response.status, 404);
            assert_eq!(response.reason, "Not Found");
        }
        other => panic!("expected a custom response, got {other:?}"),
    }
}

//-----------------------------------------------------------------------------
// Errors
//-----------------------------------------------------------------------------
#[test]
fn missing_rules_attribute() {
    let err = compile_err("rewrite_maps = []");

    assert!(matches!(err, ConfigError::MissingRules { .. }));
}

#[test]
fn malformed_document() {
    let err = compile_err("rules = [ {");

    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn unknown_attribute_is_a_parse_error() {
    let err = compile_err(r#"rules = [ { nmae = "typo" } ]"#);

    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn map_name_rules() {
    let unnamed = compile_err(r#"
rewrite_maps = [ { entries = {} } ]
rules = []
"#);
    let colon = compile_err(r#"
rewrite_maps = [ { name = "a:b" } ]
rules = []
"#);
    let duplicate = compile_err(r#"
rewrite_maps = [ { name = "a" }, { name = "A" } ]
rules = []
"#);

    assert!(matches!(unnamed, ConfigError::UnnamedMap { .. }));
    assert!(matches!(colon, ConfigError::InvalidMapName { .. }));
    assert!(matches!(duplicate, ConfigError::DuplicateMap { name, .. } if name == "A"));
}

#[test]
fn unknown_action_type_carries_origin() {
    let err = compile_err(r#"
rules = [
  { actions = [ { type = "none" } ] },
  { actions = [ { type = "noop" }, { type = "teleport" } ] }
]
"#);

    assert_eq!(
        err.to_string(),
        "test.hcl: rules[1].actions[0] block: unknown action type 'noop'"
    );
}

#[test]
fn unknown_match_type() {
    let err = compile_err(r#"
rules = [ { conditions = { items = [ { match_type = "soundex", pattern = "x" } ] } } ]
"#);

    assert!(matches!(err, ConfigError::UnknownMatchType { kind, .. } if kind == "soundex"));
}

#[test]
fn invalid_regex_is_a_build_error() {
    let err = compile_err(r#"rules = [ { match = { url = "(" } } ]"#);

    assert!(matches!(err, ConfigError::Build { .. }));
}

#[test]
fn unknown_scope_and_redirect_type() {
    let scope = compile_err(r#"
rules = [ { actions = [ { type = "replace", scope = "cookie", index = "a", value = "b" } ] } ]
"#);
    let redirect = compile_err(r#"
rules = [ { actions = [ { type = "redirect", url = "/x", redirect_type = "forever" } ] } ]
"#);

    assert!(matches!(scope, ConfigError::Build { .. }));
    assert!(matches!(redirect, ConfigError::Build { .. }));
}

#[test]
fn required_fields() {
    let insert = compile_err(r#"
rules = [ { actions = [ { type = "insert", index = 1 } ] } ]
"#);
    let truncate = compile_err(r#"
rules = [ { actions = [ { type = "truncate" } ] } ]
"#);
    let pattern = compile_err(r#"
rules = [ { conditions = { items = [ { match_type = "contains" } ] } } ]
"#);

    assert!(matches!(insert, ConfigError::MissingField { field: "value", .. }));
    assert!(matches!(truncate, ConfigError::MissingField { field: "max_depth", .. }));
    assert!(matches!(pattern, ConfigError::MissingField { field: "pattern", .. }));
}

#[test]
fn bad_macro_is_reported_with_text() {
    let err = compile_err(r#"
rules = [ { actions = [ { type = "rewrite", url = "/{R:1" } ] } ]
"#);

    match err {
        ConfigError::Macro { text, .. } => assert_eq!(text, "/{R:1"),
        other => panic!("expected a macro error, got {other}"),
    }
}

#[test]
fn invalid_status_code() {
    let err = compile_err(r#"
rules = [ { actions = [ { type = "respond", status_code = 42 } ] } ]
"#);

    assert!(matches!(err, ConfigError::InvalidStatus { code: 42, .. }));
}
