// Path helper utilities shared across transfer operations
use std::path::Path;

/// Build a remote path by joining base and a relative path, always with '/' separators.
pub fn build_remote_path(base: &str, relative: &str) -> String {
    let relative = relative.replace('\\', "/");
    let relative = relative.trim_start_matches('/');
    if base.is_empty() || base == "/" {
        relative.to_string()
    } else {
        format!("{}{relative}", ensure_trailing_slash(base))
    }
}

/// Return a new String that guarantees a trailing '/'.
pub fn ensure_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

/// Get a path relative to `base_path`, falling back to the file name.
///
/// Downloading a single file yields its file name.
pub fn get_root_relative_path(full_path: &str, base_path: &str) -> String {
    let full_path = Path::new(full_path.trim_start_matches('/'));
    let base_path = Path::new(base_path.trim_start_matches('/'));

    let file_name = || {
        full_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    };

    if full_path == base_path {
        return file_name();
    }

    full_path
        .strip_prefix(base_path)
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| file_name())
}
