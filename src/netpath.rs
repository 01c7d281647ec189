//! Lexical operations on slash-separated import paths.
//!
//! Import paths are not OS paths: they always use `/` as the separator and a
//! leading double slash (`//host/...`) is a *network path*, fetched over
//! HTTPS without a written scheme. The functions here mirror the usual
//! parent-directory and join operations but never touch the filesystem, and
//! they provide the preservation rule for the `//` prefix, which ordinary
//! path cleaning would collapse into a single slash.

/// Returns true if `path` is a network path (starts with a double slash).
pub fn is_netpath(path: &str) -> bool {
    path.starts_with("//")
}

/// Returns true if `path` is rooted (starts with a slash). Network paths are
/// rooted too.
pub fn is_abs(path: &str) -> bool {
    path.starts_with('/')
}

/// Re-applies the network-root prefix to `cleaned` if `orig` was a network
/// path. [`clean`], [`dir`] and [`join`] all collapse a leading `//` into
/// `/`; callers that need to keep the network meaning of the original path
/// pass their result through here.
pub fn preserve_net_root(orig: &str, cleaned: &str) -> String {
    if is_netpath(orig) {
        format!("/{cleaned}")
    } else {
        cleaned.to_string()
    }
}

/// Lexically normalizes `path`: collapses repeated slashes, removes `.`
/// segments, resolves `..` against preceding segments, and drops any
/// trailing slash. An empty result becomes `.` (or `/` for rooted paths).
pub fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let rooted = path.starts_with('/');
    let mut segs: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                if segs.last().is_some_and(|s| *s != "..") {
                    segs.pop();
                } else if !rooted {
                    segs.push("..");
                }
                // ".." above a rooted path's root is dropped
            }
            seg => segs.push(seg),
        }
    }
    let joined = segs.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Returns the parent directory of `path`, cleaned. The directory of a path
/// with no slash is `.`.
pub fn dir(path: &str) -> String {
    match path.rfind('/') {
        Some(i) => clean(&path[..i + 1]),
        None => ".".to_string(),
    }
}

/// Joins `prefix` and `elem` with a slash and cleans the result. Empty
/// arguments are ignored.
pub fn join(prefix: &str, elem: &str) -> String {
    if prefix.is_empty() {
        return clean(elem);
    }
    if elem.is_empty() {
        return clean(prefix);
    }
    clean(&format!("{prefix}/{elem}"))
}
