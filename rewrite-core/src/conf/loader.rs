use crate::conf::ConfigError;
use crate::conf::compile::compile;
use crate::conf::parse::parse_rules;
use crate::registry::CustomRegistry;
use crate::rule::RuleSet;
use std::fs;
use std::path::Path;

/// Reads and compiles a rules file.
pub fn load_rules(path: &Path, registry: &CustomRegistry) -> Result<RuleSet, ConfigError> {
    //--------------------------------------------------------------------------
    // Hard fail: IO
    //--------------------------------------------------------------------------
    let text = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

    compile_str(&text, path, registry)
}

/// Compiles rules text; `file` is only used for error origins.
pub fn compile_str(
    text: &str,
    file: &Path,
    registry: &CustomRegistry,
) -> Result<RuleSet, ConfigError> {
    //--------------------------------------------------------------------------
    // Hard fail: parsing
    //--------------------------------------------------------------------------
    let document = parse_rules(text, file)?;

    //--------------------------------------------------------------------------
    // Lower to the rule tree
    //--------------------------------------------------------------------------
    compile(document, file, registry)
}
