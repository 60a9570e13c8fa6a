//! File location model.
//!
//! A location is an opaque URL string. Only its basename (the text after the
//! last `/`) is ever extracted; nothing is decoded or normalized.

use std::path::{Path, PathBuf};

/// Substring after the final `/`, or the whole location when it has none.
///
/// - `basename("http://x/a/b.root")` → `"b.root"`
/// - `basename("http://x/dir/")` → `""`
pub fn basename(location: &str) -> &str {
    match location.rfind('/') {
        Some(idx) => &location[idx + 1..],
        None => location,
    }
}

/// Remote path of an XRootD location: the text after the last occurrence of
/// `server_root`, or the whole location if it does not contain it.
pub fn remote_path<'a>(location: &'a str, server_root: &str) -> &'a str {
    if server_root.is_empty() {
        return location;
    }
    match location.rfind(server_root) {
        Some(idx) => &location[idx + server_root.len()..],
        None => location,
    }
}

/// Where a location lands inside `dest_dir`: `dest_dir/<basename>`.
pub fn destination_path(dest_dir: &Path, location: &str) -> PathBuf {
    dest_dir.join(basename(location))
}
