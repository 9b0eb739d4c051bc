use indexmap::IndexMap;

/// Ordered query parameters: lower-cased key → values in arrival order.
pub type QueryMap = IndexMap<String, Vec<String>>;

/// Parses a raw query string (without the leading `?`).
///
/// Keys are lower-cased; repeated keys collect their values in order.
/// Empty pairs (`a=1&&b=2`) are skipped and a pair without `=` yields an
/// empty value. Values are kept verbatim (no percent-decoding).
pub fn parse_query(query: &str) -> QueryMap {
    let mut map = QueryMap::new();

    for part in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = part.split_once('=').unwrap_or((part, ""));
        map.entry(key.to_ascii_lowercase())
            .or_default()
            .push(value.to_owned());
    }

    map
}

/// Serializes parameters back into a query string.
///
/// Empty values serialize as a bare key, so `a&b=1` round-trips.
pub fn serialize_query(map: &QueryMap) -> String {
    let mut pairs = Vec::new();

    for (key, values) in map {
        if values.is_empty() {
            pairs.push(key.clone());
            continue;
        }
        for value in values {
            if value.is_empty() {
                pairs.push(key.clone());
            } else {
                pairs.push(format!("{key}={value}"));
            }
        }
    }

    pairs.join("&")
}
