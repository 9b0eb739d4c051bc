use crate::ctx::request::{
    DeferredAction, QueryMap, SnapshotMap, join_path, parse_query, root_path, serialize_query,
    split_path,
};
use http::{HeaderMap, Uri};
use std::cell::OnceCell;

/// Working state of one request while the rule tree is evaluated.
///
/// Holds the URL as received (frozen) next to a working copy that actions
/// mutate. The working path and query are copied from the originals on first
/// mutable access and diverge independently afterwards. Headers and server
/// variables keep a lazily captured snapshot of their original values.
#[derive(Debug, Clone)]
pub struct RequestState {
    original_path: Vec<String>,
    original_query: QueryMap,
    original_query_text: String,

    new_path: Option<Vec<String>>,
    new_query: Option<QueryMap>,

    // Serialization caches, reset by `path_changed`/`query_changed`.
    new_path_text: OnceCell<String>,
    new_query_text: OnceCell<String>,

    headers: SnapshotMap,
    server_variables: SnapshotMap,

    modified: bool,
    deferred: Vec<DeferredAction>,
}

impl Default for RequestState {
    fn default() -> Self {
        Self::new("/")
    }
}

/// Construction API
impl RequestState {
    /// Creates the state for a raw request target such as `/a/b?x=1`.
    /// An empty path is treated as the root path.
    pub fn new(url: &str) -> Self {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let original_path = if path.is_empty() {
            root_path()
        } else {
            split_path(path)
        };

        Self {
            original_path,
            original_query: parse_query(query),
            original_query_text: query.to_owned(),
            new_path: None,
            new_query: None,
            new_path_text: OnceCell::new(),
            new_query_text: OnceCell::new(),
            headers: SnapshotMap::new(),
            server_variables: SnapshotMap::new(),
            modified: false,
            deferred: Vec::new(),
        }
    }

    /// Creates the state from an `http` request head. Header values that
    /// are not valid UTF-8 are converted lossily; repeated headers are
    /// joined with `", "`.
    pub fn from_http(uri: &Uri, headers: &HeaderMap) -> Self {
        let target = match uri.query() {
            Some(query) => format!("{}?{}", uri.path(), query),
            None => uri.path().to_owned(),
        };
        let mut state = Self::new(&target);

        for name in headers.keys() {
            let joined = headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(", ");
            state.headers.seed(name.as_str(), &joined);
        }

        state
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.seed(name, value);
        self
    }

    pub fn with_server_variable(mut self, name: &str, value: &str) -> Self {
        self.server_variables.seed(name, value);
        self
    }
}

/// Original (as received) API
impl RequestState {
    pub fn original_path(&self) -> &[String] {
        &self.original_path
    }

    pub fn original_path_string(&self) -> String {
        join_path(&self.original_path)
    }

    pub fn original_query(&self) -> &QueryMap {
        &self.original_query
    }

    pub fn original_query_string(&self) -> &str {
        &self.original_query_text
    }

    pub fn original_url_string(&self) -> String {
        compose_url(&self.original_path_string(), &self.original_query_text)
    }

    pub fn original_parameter(&self, name: &str) -> Option<String> {
        lookup_parameter(&self.original_query, name)
    }
}

/// Working path API
impl RequestState {
    /// Current path segments (the originals until first mutable access).
    pub fn path(&self) -> &[String] {
        self.new_path.as_deref().unwrap_or(&self.original_path)
    }

    /// Live path segments. Callers must invoke [`Self::path_changed`] after
    /// mutating them.
    pub fn new_path_mut(&mut self) -> &mut Vec<String> {
        self.new_path_text = OnceCell::new();
        self.new_path
            .get_or_insert_with(|| self.original_path.clone())
    }

    pub fn path_changed(&mut self) {
        self.new_path_text = OnceCell::new();
        self.modified = true;
    }

    pub fn new_path_string(&self) -> &str {
        self.new_path_text.get_or_init(|| join_path(self.path()))
    }

    pub fn set_new_path_string(&mut self, path: &str) {
        self.new_path = Some(split_path(path));
        self.path_changed();
    }
}

/// Working query API
impl RequestState {
    pub fn query(&self) -> &QueryMap {
        self.new_query.as_ref().unwrap_or(&self.original_query)
    }

    /// Live query parameters. Callers must invoke [`Self::query_changed`]
    /// after mutating them.
    pub fn new_query_mut(&mut self) -> &mut QueryMap {
        self.new_query_text = OnceCell::new();
        self.new_query
            .get_or_insert_with(|| self.original_query.clone())
    }

    pub fn query_changed(&mut self) {
        self.new_query_text = OnceCell::new();
        self.modified = true;
    }

    pub fn new_query_string(&self) -> &str {
        self.new_query_text.get_or_init(|| match &self.new_query {
            Some(query) => serialize_query(query),
            None => self.original_query_text.clone(),
        })
    }

    /// Replaces the whole query string. The text is kept verbatim as the
    /// serialized form until the parameters are mutated individually.
    pub fn set_new_query_string(&mut self, query: &str) {
        self.new_query = Some(parse_query(query));
        self.query_changed();
        self.new_query_text = OnceCell::from(query.to_owned());
    }

    pub fn parameter(&self, name: &str) -> Option<String> {
        lookup_parameter(self.query(), name)
    }
}

/// Working URL API
impl RequestState {
    /// `path + "?" + query`, the query part omitted when empty.
    pub fn new_url_string(&self) -> String {
        compose_url(self.new_path_string(), self.new_query_string())
    }

    /// Re-splits `url` into path and query and marks the request modified.
    pub fn set_new_url_string(&mut self, url: &str) {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        self.set_new_path_string(path);
        self.set_new_query_string(query);
    }

    /// Set once anything was mutated; never cleared.
    pub fn is_modified(&self) -> bool {
        self.modified
    }
}

/// Header and server variable API
impl RequestState {
    pub fn headers(&self) -> &SnapshotMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut SnapshotMap {
        self.modified = true;
        &mut self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn original_header(&self, name: &str) -> Option<&str> {
        self.headers.get_original(name)
    }

    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers_mut().set(name, value);
    }

    pub fn append_header(&mut self, name: &str, value: &str) {
        self.headers_mut().append(name, value);
    }

    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        self.headers_mut().remove(name)
    }

    pub fn retain_headers(&mut self, keep: impl FnMut(&str) -> bool) {
        self.headers_mut().retain(keep);
    }

    pub fn server_variables(&self) -> &SnapshotMap {
        &self.server_variables
    }

    pub fn server_variables_mut(&mut self) -> &mut SnapshotMap {
        self.modified = true;
        &mut self.server_variables
    }

    pub fn server_variable(&self, name: &str) -> Option<&str> {
        self.server_variables.get(name)
    }

    pub fn original_server_variable(&self, name: &str) -> Option<&str> {
        self.server_variables.get_original(name)
    }

    pub fn set_server_variable(&mut self, name: &str, value: String) {
        self.server_variables_mut().set(name, value);
    }

    pub fn append_server_variable(&mut self, name: &str, value: &str) {
        self.server_variables_mut().append(name, value);
    }

    pub fn remove_server_variable(&mut self, name: &str) -> Option<String> {
        self.server_variables_mut().remove(name)
    }

    pub fn retain_server_variables(&mut self, keep: impl FnMut(&str) -> bool) {
        self.server_variables_mut().retain(keep);
    }
}

/// Deferred action API
impl RequestState {
    pub fn defer(&mut self, action: DeferredAction) {
        self.deferred.push(action);
    }

    pub fn deferred(&self) -> &[DeferredAction] {
        &self.deferred
    }

    /// Drains the queue in scheduling order.
    pub fn take_deferred(&mut self) -> Vec<DeferredAction> {
        std::mem::take(&mut self.deferred)
    }
}

fn compose_url(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_owned()
    } else {
        format!("{path}?{query}")
    }
}

fn lookup_parameter(query: &QueryMap, name: &str) -> Option<String> {
    query
        .get(&name.to_ascii_lowercase())
        .map(|values| values.join(","))
}
