//! Path helpers for absolute, slash-separated filesystem paths
//!
//! A normalized path starts with `/`, has no empty, `.` or `..` segments
//! and no trailing slash (except the root itself).

use crate::error::{FsError, FsResult};

/// Normalize a path, making it absolute
///
/// Collapses duplicate slashes, `.` and `..` segments. A `..` that would
/// climb above the root is an error.
pub fn normalize(path: &str) -> FsResult<String> {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.pop().is_none() {
                    return Err(FsError::IllegalBackReference {
                        path: path.to_string(),
                    });
                }
            }
            other => parts.push(other),
        }
    }
    Ok(format!("/{}", parts.join("/")))
}

/// Parent of a normalized path; the root is its own parent
pub fn parent(path: &str) -> String {
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

/// Final segment of a normalized path (empty for the root)
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or_default()
}

/// Join a child name onto a normalized directory path
pub fn join(dir: &str, name: &str) -> String {
    if dir == "/" {
        format!("/{name}")
    } else {
        format!("{dir}/{name}")
    }
}

/// Every ancestor of a normalized path, root first, excluding the path itself
pub fn ancestors(path: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = path.to_string();
    while current != "/" {
        current = parent(&current);
        result.push(current.clone());
    }
    result.reverse();
    result
}

pub fn is_root(path: &str) -> bool {
    path == "/"
}
