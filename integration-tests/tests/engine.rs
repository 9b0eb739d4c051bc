use anyhow::Result;
use integration_tests::harness::TestEngine;
use pretty_assertions::assert_eq;
use rewrite_core::action::ActionOutcome;
use rewrite_core::registry::{CustomAction, CustomParams};
use rewrite_core::rule::RuleResult;
use rewrite_core::trace::TraceEvent;
use rewrite_core::{CustomRegistry, RequestState};
use std::sync::Arc;

//-----------------------------------------------------------------------------
// Dry run
//-----------------------------------------------------------------------------
#[test]
fn dry_run_computes_the_same_url_as_process() {
    let engine = TestEngine::from_fixture("rewrite");

    for url in [
        "/blog/1/a",
        "/docs/x/",
        "/shop/shoes?utm_source=a&b=2",
        "/nothing",
    ] {
        let dry = engine.get(url).dry_run();
        let live = engine.get(url).send();

        assert_eq!(dry.new_url, live.new_url, "url {url}");
        assert_eq!(dry.matched, live.matched, "url {url}");
    }
}

//-----------------------------------------------------------------------------
// Trace
//-----------------------------------------------------------------------------
#[test]
fn trace_is_balanced_and_names_rules() {
    // Arrange
    let engine = TestEngine::from_fixture("rewrite");
    engine.take_trace();

    // Act
    engine.rewrite("/blog/3/t");
    let events = engine.take_trace();

    // Assert
    assert_eq!(events.iter().map(TraceEvent::depth_delta).sum::<i32>(), 0);
    assert_eq!(
        events.first(),
        Some(&TraceEvent::RuleListBegin {
            name: "root".into()
        })
    );
    assert!(events.contains(&TraceEvent::RuleBegin {
        name: "legacy-blog".into()
    }));
    // The blog rule stops processing, so later rules never begin.
    assert!(!events.contains(&TraceEvent::RuleBegin {
        name: "docs-trailing-slash".into()
    }));
}

//-----------------------------------------------------------------------------
// Inline rules and custom extensions
//-----------------------------------------------------------------------------
#[test]
fn nested_rules_share_enclosing_captures() {
    let engine = TestEngine::from_text(
        r#"
rules = [
  {
    name  = "api"
    match = { url = "^api/(v\\d+)/(.*)$" }
    rules = [
      {
        name = "users"
        conditions = {
          items = [ { match_type = "ends_with", pattern = "/users" } ]
        }
        actions = [ { type = "rewrite", url = "/{R:1}/people" } ]
      }
    ]
  }
]
"#,
    );

    let outcome = engine.rewrite("/api/v2/users");

    assert_eq!(outcome.new_url, "/v2/people");
}

#[derive(Debug)]
struct Stamp(String);

impl CustomAction for Stamp {
    fn name(&self) -> &str {
        "stamp"
    }

    fn perform(&self, state: &mut RequestState, _result: &mut RuleResult<'_>) -> ActionOutcome {
        state.set_header("x-stamp", self.0.clone());
        ActionOutcome::CONTINUE
    }
}

fn stamp(params: &CustomParams) -> Result<Arc<dyn CustomAction>> {
    Ok(Arc::new(Stamp(params.get("value").cloned().unwrap_or_default())))
}

#[test]
fn custom_action_runs_inside_the_walk() {
    let mut registry = CustomRegistry::new();
    registry.register_action("stamp", stamp);
    let engine = TestEngine::from_text_with(
        r#"
rules = [
  { actions = [ { type = "stamp", params = { value = "v1" } } ] }
]
"#,
        &registry,
    );

    let (outcome, state) = engine.get("/any").send_with_state();

    assert!(outcome.matched);
    assert_eq!(state.header("x-stamp"), Some("v1"));
}
