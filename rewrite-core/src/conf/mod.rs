mod compile;
mod error;
mod loader;
pub mod macros;
mod origin;
mod parse;
#[cfg(test)]
mod tests;
pub mod types;

pub use error::ConfigError;
pub use loader::{compile_str, load_rules};
pub use origin::Origin;
pub use parse::parse_rules;
