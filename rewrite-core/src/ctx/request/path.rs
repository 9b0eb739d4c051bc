/// Splits a path into its `/`-delimited segments.
///
/// The result always holds at least one element. A leading empty segment
/// encodes a leading separator and a trailing empty segment encodes a
/// trailing separator, so `join_path(&split_path(p)) == p` for every `p`.
///
/// - `""`        → `[""]`
/// - `"/"`       → `["", ""]`
/// - `"/a/b/"`   → `["", "a", "b", ""]`
/// - `"a/b"`     → `["a", "b"]`
pub fn split_path(path: &str) -> Vec<String> {
    path.split('/').map(str::to_owned).collect()
}

/// Inverse of [`split_path`].
pub fn join_path(segments: &[String]) -> String {
    segments.join("/")
}

/// Number of addressable segments: the segment count, minus one when the
/// last segment is the empty trailing-separator marker.
pub fn effective_count(segments: &[String]) -> usize {
    match segments.last() {
        Some(last) if last.is_empty() => segments.len() - 1,
        _ => segments.len(),
    }
}

/// Resolves a signed path element index to a position in `segments`.
///
/// Index 0 is reserved for the whole path and never resolves here.
/// A positive index `i` is valid iff `0 < i < effective_count`.
/// A negative index resolves to `effective_count + i` and is valid iff that
/// position is greater than zero.
pub fn resolve_element_index(segments: &[String], index: i32) -> Option<usize> {
    let count = effective_count(segments) as i64;
    let index = i64::from(index);
    let position = if index < 0 { count + index } else { index };

    (position > 0 && position < count).then_some(position as usize)
}

/// Resolves the position a new segment is inserted at.
///
/// Index 0 means "right after the root marker" (or the very front of a
/// relative path); every other index follows [`resolve_element_index`].
pub fn resolve_insert_index(segments: &[String], index: i32) -> Option<usize> {
    if index != 0 {
        return resolve_element_index(segments, index);
    }

    let position = match segments.first() {
        Some(first) if first.is_empty() => 1,
        _ => 0,
    };

    (position < effective_count(segments)).then_some(position)
}

/// Restores a valid root after segments were removed. An emptied path
/// becomes `/`, and a rooted path left with only its leading marker gets
/// the trailing separator back. Relative paths are left as they are.
pub fn ensure_root(segments: &mut Vec<String>) {
    if segments.is_empty() {
        segments.push(String::new());
    }
    if segments.len() < 2 && segments[0].is_empty() {
        segments.push(String::new());
    }
}

/// The root path `/`.
pub fn root_path() -> Vec<String> {
    vec![String::new(), String::new()]
}
