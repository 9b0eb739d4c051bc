use crate::action::ActionOutcome;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// Where regex captures are stored in the property bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureKey {
    /// Captures of the rule's `match` condition (`{R:n}`).
    Match,
    /// Captures of the rule's `conditions` (`{C:n}`).
    Condition,
}

impl CaptureKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Match => "R",
            Self::Condition => "C",
        }
    }
}

impl fmt::Display for CaptureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String-keyed typed values, falling back to a borrowed parent bag.
pub struct PropertyBag<'p> {
    values: HashMap<String, Box<dyn Any + Send + Sync>>,
    parent: Option<&'p PropertyBag<'p>>,
}

impl Default for PropertyBag<'_> {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
            parent: None,
        }
    }
}

impl<'p> PropertyBag<'p> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(parent: &'p PropertyBag<'p>) -> Self {
        Self {
            values: HashMap::new(),
            parent: Some(parent),
        }
    }

    pub fn set<T: Any + Send + Sync>(&mut self, key: &str, value: T) {
        self.values.insert(key.to_owned(), Box::new(value));
    }

    /// Local value first, then the parent chain.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values
            .get(key)
            .and_then(|value| value.downcast_ref::<T>())
            .or_else(|| self.parent.and_then(|parent| parent.get::<T>(key)))
    }

    /// Local values only; the parent is never mutated.
    pub fn get_local_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.values
            .get_mut(key)
            .and_then(|value| value.downcast_mut::<T>())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key) || self.parent.is_some_and(|parent| parent.contains(key))
    }
}

impl fmt::Debug for PropertyBag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("PropertyBag")
            .field("keys", &keys)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

/// Scratch state of one rule evaluation.
#[derive(Debug, Default)]
pub struct RuleResult<'p> {
    pub matched: bool,
    pub stop_processing: bool,
    pub end_request: bool,
    pub is_dynamic: bool,
    track_all_captures: bool,
    properties: PropertyBag<'p>,
}

impl<'p> RuleResult<'p> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A result whose captures fall back to an enclosing rule's.
    pub fn with_parent(parent: &'p PropertyBag<'p>) -> Self {
        Self {
            properties: PropertyBag::with_parent(parent),
            ..Self::default()
        }
    }

    pub fn properties(&self) -> &PropertyBag<'p> {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyBag<'p> {
        &mut self.properties
    }

    pub fn captures(&self, key: CaptureKey) -> Option<&[String]> {
        self.properties
            .get::<Vec<String>>(key.as_str())
            .map(Vec::as_slice)
    }

    /// Group `index` of the `key` captures, or `""`.
    pub fn capture(&self, key: CaptureKey, index: usize) -> &str {
        self.captures(key)
            .and_then(|groups| groups.get(index))
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Stores regex groups. While capture tracking is on, groups are
    /// appended to the existing list instead of replacing it.
    pub fn store_captures(&mut self, key: CaptureKey, groups: Vec<String>) {
        if self.track_all_captures {
            if let Some(existing) = self.properties.get_local_mut::<Vec<String>>(key.as_str()) {
                existing.extend(groups);
                return;
            }
        }
        self.properties.set(key.as_str(), groups);
    }

    /// Turns capture tracking on (if `track`) and returns the previous
    /// setting for [`Self::restore_capture_tracking`].
    pub fn push_capture_tracking(&mut self, track: bool) -> bool {
        let previous = self.track_all_captures;
        self.track_all_captures |= track;
        previous
    }

    pub fn restore_capture_tracking(&mut self, previous: bool) {
        self.track_all_captures = previous;
    }

    pub fn tracks_all_captures(&self) -> bool {
        self.track_all_captures
    }

    /// ORs an action outcome into the flags.
    pub fn absorb(&mut self, outcome: ActionOutcome) {
        self.stop_processing |= outcome.stop_processing;
        self.end_request |= outcome.end_request;
    }
}
