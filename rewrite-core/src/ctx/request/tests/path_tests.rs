use crate::ctx::request::{
    effective_count, ensure_root, join_path, resolve_element_index, resolve_insert_index,
    split_path,
};
use pretty_assertions::assert_eq;

fn segments(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

//-----------------------------------------------------------------------------
// Split / join
//-----------------------------------------------------------------------------
#[test]
fn split_root_yields_two_empty_markers() {
    assert_eq!(split_path("/"), segments(&["", ""]));
}

#[test]
fn split_empty_yields_single_empty_segment() {
    assert_eq!(split_path(""), segments(&[""]));
}

#[test]
fn split_keeps_leading_and_trailing_markers() {
    assert_eq!(split_path("/a/b/"), segments(&["", "a", "b", ""]));
}

#[test]
fn split_relative_path_has_no_leading_marker() {
    assert_eq!(split_path("a/b"), segments(&["a", "b"]));
}

#[test]
fn split_join_round_trips() {
    let paths = [
        "", "/", "//", "/a", "/a/", "a", "a/", "/a/b/c", "/a//b", "///x///", "/%20/é/",
    ];

    for path in paths {
        assert_eq!(join_path(&split_path(path)), path, "round trip of {path:?}");
    }
}

//-----------------------------------------------------------------------------
// Effective count and index resolution
//-----------------------------------------------------------------------------
#[test]
fn effective_count_ignores_trailing_marker() {
    assert_eq!(effective_count(&split_path("/a/b/")), 3);
    assert_eq!(effective_count(&split_path("/a/b")), 3);
    assert_eq!(effective_count(&split_path("/")), 1);
}

#[test]
fn positive_index_addresses_segment_directly() {
    let path = split_path("/path1/path2/path3");

    assert_eq!(resolve_element_index(&path, 1), Some(1));
    assert_eq!(resolve_element_index(&path, 3), Some(3));
    assert_eq!(resolve_element_index(&path, 4), None);
}

#[test]
fn index_zero_never_resolves() {
    let path = split_path("/path1/path2");

    assert_eq!(resolve_element_index(&path, 0), None);
}

#[test]
fn negative_index_counts_from_the_end() {
    let path = split_path("/path1/path2/path3");

    assert_eq!(resolve_element_index(&path, -1), Some(3));
    assert_eq!(resolve_element_index(&path, -3), Some(1));
    assert_eq!(resolve_element_index(&path, -4), None);
}

#[test]
fn negative_index_skips_trailing_marker() {
    let path = split_path("/path1/path2/");

    assert_eq!(resolve_element_index(&path, -1), Some(2));
}

#[test]
fn positive_and_negative_forms_resolve_to_same_segment() {
    for raw in ["/a/b/c/d", "/a/b/c/d/", "/x", "/x/y/"] {
        let path = split_path(raw);
        let count = effective_count(&path) as i32;

        for i in 1..count {
            assert_eq!(
                resolve_element_index(&path, i),
                resolve_element_index(&path, -(count - i)),
                "index {i} of {raw}"
            );
        }
    }
}

#[test]
fn insert_index_zero_lands_after_root() {
    assert_eq!(resolve_insert_index(&split_path("/a/b"), 0), Some(1));
    assert_eq!(resolve_insert_index(&split_path("/"), 0), None);
    assert_eq!(resolve_insert_index(&split_path("a/b"), 0), Some(0));
}

#[test]
fn ensure_root_pads_short_paths() {
    let mut path = segments(&[""]);

    ensure_root(&mut path);

    assert_eq!(join_path(&path), "/");
}

#[test]
fn ensure_root_leaves_relative_paths_alone() {
    let mut relative = segments(&["a"]);
    let mut emptied: Vec<String> = Vec::new();

    ensure_root(&mut relative);
    ensure_root(&mut emptied);

    assert_eq!(join_path(&relative), "a");
    assert_eq!(join_path(&emptied), "/");
}
