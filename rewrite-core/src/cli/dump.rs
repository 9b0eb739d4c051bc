use crate::action::Action;
use crate::conf::{load_rules, parse_rules};
use crate::registry::CustomRegistry;
use crate::rule::RuleList;
use anyhow::Context;
use std::fmt::Write;
use std::fs;
use std::path::PathBuf;

pub fn dump(path: PathBuf, json: bool) -> anyhow::Result<()> {
    if json {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let document = parse_rules(&text, &path)?;
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    let rules = load_rules(&path, &CustomRegistry::new())?;
    print!("{}", describe_tree(&rules.root));

    let mut maps: Vec<_> = rules.maps.values().collect();
    maps.sort_by(|a, b| a.name().cmp(b.name()));
    for map in maps {
        println!(
            "map '{}' ({} entries, default {:?})",
            map.name(),
            map.len(),
            map.default_value()
        );
    }

    Ok(())
}

/// One line per rule, nested lists indented below their rule.
pub fn describe_tree(list: &RuleList) -> String {
    let mut out = String::new();
    describe_list(list, 0, &mut out);
    out
}

fn describe_list(list: &RuleList, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);

    for rule in &list.rules {
        let _ = write!(out, "{indent}rule '{}'", rule.name);
        if rule.stop_processing {
            out.push_str(" [stop]");
        }
        if rule.is_dynamic {
            out.push_str(" [dynamic]");
        }
        out.push('\n');

        if let Some(condition) = &rule.condition {
            let _ = writeln!(out, "{indent}  if   {condition}");
        }

        match &rule.action {
            Some(Action::Rules(nested)) => describe_list(nested, depth + 1, out),
            Some(Action::List(actions)) => {
                for action in actions.actions() {
                    match action {
                        Action::Rules(nested) => describe_list(nested, depth + 1, out),
                        other => {
                            let _ = writeln!(out, "{indent}  then {other}");
                        }
                    }
                }
            }
            Some(action) => {
                let _ = writeln!(out, "{indent}  then {action}");
            }
            None => {}
        }
    }
}
