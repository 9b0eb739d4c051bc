//! Rules, rule lists and the per-rule scratch result.

mod result;
#[allow(clippy::module_inception)]
mod rule;
mod rule_list;

pub use result::*;
pub use rule::*;
pub use rule_list::*;
