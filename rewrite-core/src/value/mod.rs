//! Value resolution: scopes, getters, operations and concatenation.
//!
//! A [`Value`] is compiled once from configuration and resolved per request
//! against a [`RequestState`](crate::ctx::RequestState) and the active
//! [`RuleResult`](crate::rule::RuleResult). Resolution never fails: missing
//! or out-of-range inputs resolve to an empty string, and numeric reads fall
//! back to a caller-supplied default.

mod concat;
mod getter;
mod operation;
mod rewrite_map;
mod scope;
#[cfg(test)]
mod tests;

pub use concat::*;
pub use getter::*;
pub use operation::*;
pub use rewrite_map::*;
pub use scope::*;
