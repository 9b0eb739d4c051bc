mod deferred;
mod path;
mod query;
mod request_state;
mod snapshot_map;
#[cfg(test)]
mod tests;

pub use deferred::*;
pub use path::*;
pub use query::*;
pub use request_state::*;
pub use snapshot_map::*;
