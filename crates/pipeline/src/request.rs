//! Request string parsing
//!
//! A request is the host build tool's module specifier for the asset: a path
//! possibly followed by a `?query` or `#fragment`. The stem names published
//! artifacts; the extension names the workspace input file so the engine can
//! sniff the container format.

/// The request path with any query or fragment stripped.
fn request_path(request: &str) -> &str {
    let end = request
        .find(['?', '#'])
        .unwrap_or(request.len());
    &request[..end]
}

/// Final path segment of the request, without its extension.
///
/// Falls back to `"asset"` when the request has no usable name.
#[must_use]
pub fn stem(request: &str) -> &str {
    let path = request_path(request);
    let file = path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(path);
    let stem = match file.rfind('.') {
        Some(0) | None => file,
        Some(dot) => &file[..dot],
    };
    if stem.is_empty() { "asset" } else { stem }
}

/// File extension of the request path, if any.
#[must_use]
pub fn extension(request: &str) -> Option<&str> {
    let path = request_path(request);
    let file = path.rsplit(['/', '\\']).next()?;
    match file.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < file.len() => Some(&file[dot + 1..]),
        _ => None,
    }
}
