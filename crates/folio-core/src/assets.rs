//! Asset URL resolution for project images

use reqwest::Url;

/// Resolve an image path for display
///
/// Absolute URLs and root-relative paths pass through unchanged. Anything
/// else is treated as relative to `{asset_root}/assets/`.
pub fn resolve_asset_url(path: &str, asset_root: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    if is_absolute(path) {
        return path.to_string();
    }

    Url::parse(asset_root)
        .and_then(|root| root.join(&format!("/assets/{}", path)))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| path.to_string())
}

fn is_absolute(path: &str) -> bool {
    let lower = path.get(..8).unwrap_or(path).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || path.starts_with('/')
}
