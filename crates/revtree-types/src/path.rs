//! Absolute, `/`-separated node paths.
//!
//! Paths are plain strings. The root is `/`; every other path is a sequence
//! of non-empty names each preceded by a single `/`, with no trailing slash.

use crate::error::{TypeError, TypeResult};

/// The root path.
pub const ROOT: &str = "/";

/// Returns `true` if `path` is the root path.
pub fn is_root(path: &str) -> bool {
    path == ROOT
}

/// Join a child `name` onto `parent`.
///
/// The root is special-cased so that children of `/` do not get a doubled
/// separator: `child_path("/", "a") == "/a"`, `child_path("/a", "b") == "/a/b"`.
pub fn child_path(parent: &str, name: &str) -> String {
    if is_root(parent) {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

/// Check that `name` can be used as a single path segment.
pub fn validate_name(name: &str) -> TypeResult<()> {
    if name.is_empty() || name.contains('/') {
        return Err(TypeError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Check that `path` is absolute and well formed.
pub fn validate_path(path: &str) -> TypeResult<()> {
    if is_root(path) {
        return Ok(());
    }
    let Some(rest) = path.strip_prefix('/') else {
        return Err(TypeError::InvalidPath(path.to_string()));
    };
    if rest.split('/').any(str::is_empty) {
        return Err(TypeError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// The names along `path`, root first. The root itself has no segments.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
