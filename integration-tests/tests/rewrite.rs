use integration_tests::harness::TestEngine;
use pretty_assertions::assert_eq;

#[test]
fn legacy_blog_url_is_rewritten_with_captures() {
    // Arrange
    let engine = TestEngine::from_fixture("rewrite");

    // Act
    let outcome = engine.rewrite("/blog/42/hello-world");

    // Assert
    assert!(outcome.matched);
    assert!(outcome.modified);
    assert_eq!(outcome.new_url, "/articles/hello-world?id=42");
    assert!(outcome.deferred.is_empty());
}

#[test]
fn trailing_slash_is_removed_below_docs() {
    let engine = TestEngine::from_fixture("rewrite");

    let outcome = engine.rewrite("/docs/guide/");

    assert_eq!(outcome.new_url, "/docs/guide");
}

#[test]
fn mobile_user_agent_gets_mobile_shop() {
    let engine = TestEngine::from_fixture("rewrite");

    let outcome = engine
        .get("/shop/shoes")
        .header("user-agent", "Mozilla/5.0 (Linux; Android 14) Mobile Safari")
        .send();

    assert_eq!(outcome.new_url, "/m/shop/shoes");
}

#[test]
fn tracking_parameter_is_dropped_for_desktop() {
    let engine = TestEngine::from_fixture("rewrite");

    let outcome = engine
        .get("/shop/shoes?utm_source=mail&color=red")
        .header("user-agent", "Mozilla/5.0 (X11; Linux x86_64)")
        .send();

    assert!(outcome.modified);
    assert_eq!(outcome.new_url, "/shop/shoes?color=red");
}

#[test]
fn unmatched_request_passes_through() {
    let engine = TestEngine::from_fixture("rewrite");

    let outcome = engine.rewrite("/about?x=1");

    assert!(!outcome.matched);
    assert!(!outcome.modified);
    assert!(!outcome.end_request);
    assert_eq!(outcome.new_url, "/about?x=1");
}

#[test]
fn original_url_survives_rewrites() {
    let engine = TestEngine::from_fixture("rewrite");

    let (outcome, state) = engine.get("/blog/7/intro").send_with_state();

    assert_eq!(outcome.new_url, "/articles/intro?id=7");
    assert_eq!(state.original_url_string(), "/blog/7/intro");
}
