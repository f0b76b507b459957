// GET /_image?url=... - proxy for remote images on allowed domains

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use url::Url;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub url: Option<String>,
}

const CACHE_CONTROL: &str = "public, max-age=86400";

/// Path under the backend URL where storage objects are served
const STORAGE_OBJECT_PATH: &str = "/storage/v1/object/";

/// True when `url` is a storage object on the configured backend: same
/// scheme, host and port, with a path under the storage object prefix.
pub fn is_backend_storage_url(url: &Url, backend_url: Option<&str>) -> bool {
    let Some(backend) = backend_url.and_then(|u| Url::parse(u).ok()) else {
        return false;
    };

    let prefix = format!("{}{}", backend.path().trim_end_matches('/'), STORAGE_OBJECT_PATH);

    url.scheme() == backend.scheme()
        && url.host_str().is_some()
        && url.host_str() == backend.host_str()
        && url.port_or_known_default() == backend.port_or_known_default()
        && url.path().starts_with(&prefix)
}

/// Parse and check a remote image URL against the allowed domains and
/// the backend's storage objects.
pub fn validate_image_url(state: &AppState, raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw).map_err(|_| ApiError::bad_request("Invalid image URL"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::bad_request("Image URL must use http or https"));
    }

    let host = url
        .host_str()
        .ok_or_else(|| ApiError::bad_request("Image URL has no host"))?;

    let allowed = state.config.site.image_host_allowed(host)
        || is_backend_storage_url(&url, state.config.backend.url.as_deref());
    if !allowed {
        tracing::warn!("Rejected image from unlisted location: {}", url);
        return Err(ApiError::forbidden(format!("Image host '{}' is not allowed", host)));
    }

    Ok(url)
}

pub async fn proxy_image(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> Result<Response, ApiError> {
    let raw = query
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing 'url' query parameter"))?;
    let url = validate_image_url(&state, &raw)?;
    let max_bytes = state.config.site.image_max_bytes;

    // image_http never follows redirects, so every hop stays validated
    let mut upstream = state.image_http.get(url.clone()).send().await.map_err(|e| {
        tracing::error!("Image fetch failed for {}: {}", url, e);
        ApiError::bad_gateway("Failed to fetch remote image")
    })?;

    if upstream.status().is_redirection() {
        tracing::warn!("Image host redirected for {}; not followed", url);
        return Err(ApiError::bad_gateway("Remote image redirects are not followed"));
    }
    if !upstream.status().is_success() {
        return Err(ApiError::bad_gateway(format!(
            "Remote image responded with {}",
            upstream.status()
        )));
    }

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !content_type.starts_with("image/") {
        return Err(ApiError::bad_gateway("Remote resource is not an image"));
    }

    if upstream.content_length().is_some_and(|len| len > max_bytes) {
        return Err(ApiError::bad_gateway("Remote image is too large"));
    }

    let mut body = Vec::new();
    while let Some(chunk) = upstream.chunk().await.map_err(|e| {
        tracing::error!("Image body read failed for {}: {}", url, e);
        ApiError::bad_gateway("Failed to read remote image")
    })? {
        if (body.len() + chunk.len()) as u64 > max_bytes {
            return Err(ApiError::bad_gateway("Remote image is too large"));
        }
        body.extend_from_slice(&chunk);
    }

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, CACHE_CONTROL.to_string()),
        ],
        body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn storage_exemption_requires_same_origin_and_prefix() {
        let backend = Some("http://localhost:54321");
        assert!(is_backend_storage_url(&url("http://localhost:54321/storage/v1/object/public/a.png"), backend));
        assert!(!is_backend_storage_url(&url("http://localhost:6000/storage/v1/object/public/a.png"), backend));
        assert!(!is_backend_storage_url(&url("https://localhost:54321/storage/v1/object/public/a.png"), backend));
        assert!(!is_backend_storage_url(&url("http://localhost:54321/rest/v1/profiles"), backend));
        assert!(!is_backend_storage_url(&url("http://localhost:54321/storage/v1/object/../../rest/v1/x"), backend));
        assert!(!is_backend_storage_url(&url("http://localhost:54321/storage/v1/object/a.png"), None));
    }

    #[test]
    fn storage_exemption_honours_default_ports_and_base_path() {
        assert!(is_backend_storage_url(
            &url("https://project.supabase.co:443/storage/v1/object/public/a.png"),
            Some("https://project.supabase.co"),
        ));
        assert!(is_backend_storage_url(
            &url("http://gw.internal/proxy/storage/v1/object/public/a.png"),
            Some("http://gw.internal/proxy/"),
        ));
        assert!(!is_backend_storage_url(
            &url("http://gw.internal/storage/v1/object/public/a.png"),
            Some("http://gw.internal/proxy/"),
        ));
    }
}
