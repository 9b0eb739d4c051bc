use pretty_assertions::assert_eq;
use rewrite_core::{CustomRegistry, EvalEnv, RequestState, RulesHandle, load_rules};
use std::fs;

fn rules_to(target: &str) -> String {
    format!(
        r#"
rules = [
  {{ name = "to", actions = [ {{ type = "rewrite", url = "{target}" }} ] }}
]
"#
    )
}

#[test]
fn reload_swaps_rules_for_new_engines_only() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.hcl");
    fs::write(&path, rules_to("/first")).unwrap();

    let registry = CustomRegistry::new();
    let handle = RulesHandle::new(load_rules(&path, &registry).unwrap());
    let before = handle.engine(EvalEnv::default());

    // Act
    fs::write(&path, rules_to("/second")).unwrap();
    handle.reload_from(&path, &registry).unwrap();
    let after = handle.engine(EvalEnv::default());

    // Assert
    let mut state = RequestState::new("/x");
    assert_eq!(before.process(&mut state).new_url, "/first");

    let mut state = RequestState::new("/x");
    assert_eq!(after.process(&mut state).new_url, "/second");
}

#[test]
fn broken_file_keeps_current_rules() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.hcl");
    fs::write(&path, rules_to("/first")).unwrap();

    let registry = CustomRegistry::new();
    let handle = RulesHandle::new(load_rules(&path, &registry).unwrap());

    fs::write(&path, "rules = [ { match = { url = \"(\" } } ]").unwrap();
    let err = handle.reload_from(&path, &registry);

    assert!(err.is_err());
    let mut state = RequestState::new("/x");
    let outcome = handle.engine(EvalEnv::default()).process(&mut state);
    assert_eq!(outcome.new_url, "/first");
}
