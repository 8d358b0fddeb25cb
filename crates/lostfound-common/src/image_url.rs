/// Turn an image path returned by the backend into an absolute URL.
///
/// Empty input yields an empty string. Backslashes are normalised to
/// forward slashes, absolute `http(s)://` URLs pass through, and anything
/// else is joined onto `base_url` with exactly one slash between them.
pub fn build_image_url(base_url: &str, path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }

    let normalized = path.replace('\\', "/");
    if normalized.starts_with("http://") || normalized.starts_with("https://") {
        return normalized;
    }

    let base = base_url.trim_end_matches('/');
    if normalized.starts_with('/') {
        format!("{base}{normalized}")
    } else {
        format!("{base}/{normalized}")
    }
}
