use crate::conf::types::{ConditionsSpec, RuleSpec, RulesDocument};
use crate::conf::{ConfigError, Origin};
use std::path::Path;

/// Parses a rules document and stamps every block with its origin.
pub fn parse_rules(text: &str, path: &Path) -> Result<RulesDocument, ConfigError> {
    let mut parsed: RulesDocument =
        hcl::from_str(text).map_err(|e| ConfigError::parse(path, e))?;

    //-------------------------------------------------------------------------
    // Inject origin metadata
    //-------------------------------------------------------------------------

    for (i, map) in parsed.rewrite_maps.iter_mut().enumerate() {
        map.origin = Origin::new(path, "rewrite_maps", Some(i));
    }

    if let Some(rules) = &mut parsed.rules {
        let root = Origin::new(path, "", None);
        stamp_rules(rules, &root, "rules");
    }

    Ok(parsed)
}

fn stamp_rules(rules: &mut [RuleSpec], parent: &Origin, section: &str) {
    for (i, rule) in rules.iter_mut().enumerate() {
        rule.origin = if parent.section.is_empty() {
            Origin::new(&parent.file, section, Some(i))
        } else {
            parent.nested(section, Some(i))
        };

        for (j, action) in rule.actions.iter_mut().enumerate() {
            action.origin = rule.origin.nested("actions", Some(j));
        }

        if let Some(conditions) = &mut rule.conditions {
            stamp_conditions(conditions, &rule.origin.nested("conditions", None));
        }

        let origin = rule.origin.clone();
        stamp_rules(&mut rule.rules, &origin, "rules");
    }
}

fn stamp_conditions(conditions: &mut ConditionsSpec, parent: &Origin) {
    for (i, item) in conditions.items.iter_mut().enumerate() {
        item.origin = parent.nested("items", Some(i));
        if let Some(group) = &mut item.group {
            stamp_conditions(group, &item.origin.nested("group", None));
        }
    }
}
