//! Minimal path helpers for remote addressing

/// Normalize path (ensure leading /, no trailing /)
pub(crate) fn normalize_path(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_string();
    }
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    path.trim_end_matches('/').to_string()
}

/// Split a normalized path into its parent folder and final segment
pub(crate) fn split_path(path: &str) -> Option<(String, String)> {
    let path = normalize_path(path);
    if path == "/" {
        return None;
    }
    let idx = path.rfind('/')?;
    let parent = if idx == 0 {
        "/".to_string()
    } else {
        path[..idx].to_string()
    };
    Some((parent, path[idx + 1..].to_string()))
}
