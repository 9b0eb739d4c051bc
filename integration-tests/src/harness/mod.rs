mod engine;
pub mod tracing;

pub use engine::{TestEngine, TestRequest, fixture_path};
pub use tracing::{CapturedEvent, init_test_tracing};
