/// Navigation path cleanup
///
/// Browsers and hand-written links hand us paths like `/example//42/` or
/// `\login`. When normalization is enabled on the router, paths are put in
/// canonical form before any pattern sees them.

use std::borrow::Cow;

/// Returns true when `path` is already canonical
///
/// Canonical means: leading `/`, no empty segments, no backslashes and no
/// trailing `/` (the root `/` excepted).
///
/// ```
/// use rhtmx_spa_router::path::is_canonical;
///
/// assert!(is_canonical("/"));
/// assert!(is_canonical("/example/42"));
/// assert!(!is_canonical("/example/42/"));
/// assert!(!is_canonical("example"));
/// ```
pub fn is_canonical(path: &str) -> bool {
    match path {
        "" => false,
        "/" => true,
        _ => {
            path.starts_with('/')
                && !path.ends_with('/')
                && !path.contains("//")
                && !path.contains('\\')
        }
    }
}

/// Brings a navigation path into canonical form
///
/// Borrows when nothing needs fixing, allocates once otherwise.
///
/// ```
/// use rhtmx_spa_router::path::canonicalize;
///
/// assert_eq!(canonicalize("/login"), "/login");
/// assert_eq!(canonicalize("\\example\\\\42/"), "/example/42");
/// assert_eq!(canonicalize(""), "/");
/// ```
pub fn canonicalize(path: &str) -> Cow<'_, str> {
    if is_canonical(path) {
        return Cow::Borrowed(path);
    }

    let segments: Vec<&str> = path
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", segments.join("/")))
    }
}
