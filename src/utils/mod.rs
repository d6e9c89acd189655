//! Utility functions and helpers.

pub mod format;
pub mod geo;

use url::Url;

use crate::error::Result;

/// Parse an API base URL, making sure relative joins append to its path.
///
/// `Url::join` replaces the last path segment unless the base ends with a
/// slash, so `https://host/api` is treated as `https://host/api/`.
pub fn parse_base_url(base: &str) -> Result<Url> {
    let mut url = Url::parse(base.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Join a resource path onto a base URL.
pub fn endpoint_url(base: &Url, path: &str) -> Result<Url> {
    Ok(base.join(path.trim_start_matches('/'))?)
}
