// src/utils/url.rs

//! URL manipulation utilities.

/// Append an API path to a base URL by concatenation.
///
/// Unlike [`url::Url::join`], a path prefix on the base is kept.
///
/// # Examples
/// ```
/// use newsroom::utils::url::api_url;
///
/// assert_eq!(
///     api_url("https://example.com/cms/", "/api/tags/"),
///     "https://example.com/cms/api/tags/"
/// );
/// ```
pub fn api_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Resolve a media asset URL for display.
///
/// Absolute URLs pass through. Relative URLs (e.g. `/static/uploads/...`)
/// are prefixed with `asset_base` when one is configured and returned
/// unchanged otherwise, so a same-origin proxy can serve them.
///
/// # Examples
/// ```
/// use newsroom::utils::url::resolve_asset_url;
///
/// assert_eq!(
///     resolve_asset_url("http://localhost:8000", "/static/a.png"),
///     "http://localhost:8000/static/a.png"
/// );
/// assert_eq!(resolve_asset_url("", "/static/a.png"), "/static/a.png");
/// ```
pub fn resolve_asset_url(asset_base: &str, url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    if asset_base.trim().is_empty() {
        return url.to_string();
    }
    api_url(asset_base.trim(), url)
}

/// Percent-encode a single path segment (slug, id).
pub fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
