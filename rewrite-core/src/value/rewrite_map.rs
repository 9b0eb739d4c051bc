use std::collections::HashMap;

/// Named, case-insensitive lookup table used as an operation from macros.
///
/// Compiled once from configuration and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct RewriteMap {
    name: String,
    default_value: String,
    entries: HashMap<String, String>,
}

impl RewriteMap {
    pub fn new(name: impl Into<String>, default_value: Option<String>) -> Self {
        Self {
            name: name.into(),
            default_value: default_value.unwrap_or_default(),
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(key.to_lowercase(), value.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks `key` up case-insensitively; misses yield the default value.
    pub fn lookup(&self, key: &str) -> &str {
        self.entries
            .get(&key.to_lowercase())
            .map(String::as_str)
            .unwrap_or(&self.default_value)
    }
}
