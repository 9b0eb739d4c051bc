use crate::conf::{ConfigError, load_rules};
use crate::registry::CustomRegistry;
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub fn check(path: PathBuf, plain: bool) -> anyhow::Result<()> {
    match load_rules(&path, &CustomRegistry::new()) {
        Ok(rules) => {
            println!("✔ Rules compiled successfully");
            println!("✔ {} top-level rules", rules.root.len());
            println!("✔ {} rules in total", rules.rule_count());
            println!("✔ {} rewrite maps", rules.map_count());
            Ok(())
        }
        Err(err) => {
            print_config_error(&err, plain);
            std::process::exit(1);
        }
    }
}

fn print_config_error(err: &ConfigError, plain: bool) {
    if plain {
        eprintln!("{err}");
    } else {
        eprintln!();
        eprintln!("{} {err}", "✘".red().bold());
        let mut source = std::error::Error::source(err);
        while let Some(cause) = source {
            eprintln!("  {} {cause}", "caused by:".dimmed());
            source = cause.source();
        }
    }

    if let Some(hint) = config_error_hint(err) {
        eprintln!();
        eprintln!("{hint}");
    }
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        ConfigError::MissingRules { .. } => Some(
            "A rules file must define a top-level `rules` list.\n\
             \n\
             Example:\n\
             \n\
             rules = [\n\
             \x20 {\n\
             \x20   name  = \"lowercase\"\n\
             \x20   match = { url = \"^(.*[A-Z].*)$\" }\n\
             \x20   actions = [{ type = \"rewrite\", value = \"{toLower:{R:1}}\" }]\n\
             \x20 }\n\
             ]",
        ),

        ConfigError::UnknownActionType { .. } => Some(
            "Valid action types are: rewrite, replace, append, insert, delete, keep,\n\
             normalize, truncate, redirect, custom_response, abort, none.\n\
             \n\
             Custom actions must be registered before the rules are compiled.",
        ),

        ConfigError::UnknownMatchType { .. } => Some(
            "Valid match types are: pattern, wildcard, starts_with, ends_with, contains,\n\
             equals, number, is_file, is_directory, exists.\n\
             \n\
             Custom conditions must be registered before the rules are compiled.",
        ),

        ConfigError::UnnamedMap { .. } | ConfigError::InvalidMapName { .. } => Some(
            "Rewrite maps are referenced from macros as `{name:input}`, so every map\n\
             needs a unique `name` without a ':' character.",
        ),

        ConfigError::Macro { .. } => Some(
            "Macros are written in braces:\n\
             \n\
             {R:1}            capture group 1 of the rule's match\n\
             {C:1}            capture group 1 of the conditions\n\
             {toLower:{R:1}}  an operation or rewrite map applied to a value\n\
             {HTTP_HOST}      the `host` request header\n\
             {NAME}           the server variable NAME",
        ),

        ConfigError::Parse { .. } => Some(
            "The rules file must be valid HCL. Check for unbalanced braces or\n\
             misspelled attribute names (unknown attributes are rejected).",
        ),

        _ => None,
    }
}
