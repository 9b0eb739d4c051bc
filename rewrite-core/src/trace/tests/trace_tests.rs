use crate::trace::{RecordingSink, TraceEvent, TraceSink, render_plain};
use pretty_assertions::assert_eq;

fn walk() -> Vec<TraceEvent> {
    vec![
        TraceEvent::RuleListBegin {
            name: "root".into(),
        },
        TraceEvent::RuleBegin { name: "a".into() },
        TraceEvent::Condition {
            description: "matchPath ~ \"^a$\"".into(),
            result: true,
        },
        TraceEvent::Action {
            description: "abort".into(),
            stop_processing: true,
            end_request: true,
        },
        TraceEvent::RuleEnd {
            name: "a".into(),
            matched: true,
            stop_processing: true,
            end_request: true,
        },
        TraceEvent::RuleListEnd {
            name: "root".into(),
            matched: true,
            end_request: true,
        },
    ]
}

#[test]
fn recording_sink_keeps_order_and_drains_on_take() {
    // Arrange
    let sink = RecordingSink::new();
    for event in walk() {
        sink.record(event);
    }

    // Act
    let seen = sink.events();
    let taken = sink.take();

    // Assert
    assert_eq!(seen, walk());
    assert_eq!(taken, walk());
    assert!(sink.events().is_empty());
}

#[test]
fn depth_delta_pairs_begin_and_end() {
    let total: i32 = walk().iter().map(TraceEvent::depth_delta).sum();

    assert_eq!(total, 0);
}

#[test]
fn render_plain_indents_nested_events() {
    // Act
    let text = render_plain(&walk());

    // Assert
    let expected = "\
rules 'root'
  rule 'a'
    condition matchPath ~ \"^a$\" = true
    action abort stop=true end=true
  end rule 'a' matched=true stop=true end=true
end rules 'root' matched=true end=true
";
    assert_eq!(text, expected);
}

#[test]
fn events_serialize_with_a_tag() {
    let json = serde_json::to_value(TraceEvent::RuleBegin { name: "x".into() }).unwrap();

    assert_eq!(json, serde_json::json!({ "event": "rule_begin", "name": "x" }));
}
