use indexmap::IndexMap;

/// Case-insensitive string map with a lazily captured "as received" snapshot.
///
/// Used for headers and server variables: the first write copies the live
/// map aside, so [`SnapshotMap::get_original`] keeps answering with the
/// values the request arrived with.
#[derive(Debug, Clone, Default)]
pub struct SnapshotMap {
    live: IndexMap<String, String>,
    original: Option<IndexMap<String, String>>,
}

impl SnapshotMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.live.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn get_original(&self, name: &str) -> Option<&str> {
        self.original
            .as_ref()
            .unwrap_or(&self.live)
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.live.contains_key(&name.to_ascii_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.live.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Populates the map before any snapshot exists. Used while building a
    /// request, not by actions.
    pub(crate) fn seed(&mut self, name: &str, value: &str) {
        debug_assert!(self.original.is_none(), "seed after first write");
        self.live.insert(name.to_ascii_lowercase(), value.to_owned());
    }

    //-------------------------------------------------------------------------
    // Mutations (each one captures the snapshot first)
    //-------------------------------------------------------------------------

    pub fn set(&mut self, name: &str, value: String) {
        self.snapshot();
        self.live.insert(name.to_ascii_lowercase(), value);
    }

    pub fn append(&mut self, name: &str, value: &str) {
        self.snapshot();
        self.live
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push_str(value);
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.snapshot();
        self.live.shift_remove(&name.to_ascii_lowercase())
    }

    /// Keeps only the entries whose (lower-cased) name satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.snapshot();
        self.live.retain(|name, _| keep(name));
    }

    fn snapshot(&mut self) {
        if self.original.is_none() {
            self.original = Some(self.live.clone());
        }
    }
}
