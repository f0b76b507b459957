use axum::http::{header, HeaderMap};
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::BackendError;
use crate::config::{BackendConfig, BACKEND_ANON_KEY_VAR, BACKEND_URL_VAR};

/// Cookie holding the caller's backend session token
pub const SESSION_COOKIE: &str = "sb-access-token";

/// Thin client over the backend's REST and auth gateways
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
    anon_key: String,
    access_token: Option<String>,
}

/// Error body returned by the REST gateway
#[derive(Debug, Deserialize)]
struct GatewayError {
    code: Option<String>,
    message: Option<String>,
    msg: Option<String>,
    hint: Option<String>,
}

/// Build an anonymous client, as used from the browser side.
/// Fails fast when either connection setting is missing.
pub fn create_browser_client(
    config: &BackendConfig,
    http: reqwest::Client,
) -> Result<BackendClient, BackendError> {
    BackendClient::new(config, http, None)
}

/// Build a client acting for the caller of the current request, carrying
/// their session token when one is present in cookies or the
/// Authorization header.
pub fn create_server_client(
    config: &BackendConfig,
    http: reqwest::Client,
    headers: &HeaderMap,
) -> Result<BackendClient, BackendError> {
    BackendClient::new(config, http, session_token(headers))
}

fn required<'a>(value: &'a Option<String>, var: &'static str) -> Result<&'a str, BackendError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(BackendError::ConfigMissing(var))
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.trim().to_string());

    from_cookie
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(|token| token.trim().to_string())
        })
        .filter(|token| !token.is_empty())
}

fn is_valid_table_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl BackendClient {
    fn new(
        config: &BackendConfig,
        http: reqwest::Client,
        access_token: Option<String>,
    ) -> Result<Self, BackendError> {
        let url = required(&config.url, BACKEND_URL_VAR)?;
        let anon_key = required(&config.anon_key, BACKEND_ANON_KEY_VAR)?;

        let base_url = Url::parse(url).map_err(|e| BackendError::InvalidUrl(format!("{}: {}", url, e)))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(url.to_string()));
        }

        Ok(Self {
            http,
            base_url,
            anon_key: anon_key.to_string(),
            access_token,
        })
    }

    /// Whether requests run with a user session rather than the anon key
    pub fn has_session(&self) -> bool {
        self.access_token.is_some()
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        request
            .header("apikey", &self.anon_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", bearer))
    }

    /// Ping the auth gateway
    pub async fn auth_health(&self) -> Result<(), BackendError> {
        let url = self.endpoint(&["auth", "v1", "health"])?;
        let response = self.authorize(self.http.get(url)).send().await?;
        check_status(response).await.map(|_| ())
    }

    /// Exact row count of a table, without fetching more than one row
    pub async fn count_rows(&self, table: &str) -> Result<u64, BackendError> {
        if !is_valid_table_name(table) {
            return Err(BackendError::InvalidTable(table.to_string()));
        }

        let mut url = self.endpoint(&["rest", "v1", table])?;
        url.query_pairs_mut().append_pair("select", "*");

        let response = self
            .authorize(self.http.get(url))
            .header("Prefer", "count=exact")
            .header("Range-Unit", "items")
            .header(header::RANGE, "0-0")
            .send()
            .await?;
        let response = check_status(response).await?;

        let content_range = response
            .headers()
            .get(header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let count = parse_total(&content_range)?;
        debug!("Table {} has {} rows", table, count);
        Ok(count)
    }
}

/// Pass successful responses through; decode gateway errors otherwise
async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<GatewayError>(&body) {
        Ok(err) => {
            let message = err
                .message
                .or(err.msg)
                .or(err.hint)
                .unwrap_or_else(|| status.to_string());
            (err.code, message)
        }
        Err(_) if !body.trim().is_empty() => (None, body.trim().to_string()),
        Err(_) => (None, status.to_string()),
    };

    Err(BackendError::Api {
        status: status.as_u16(),
        code,
        message,
    })
}

/// Total from a `Content-Range` header such as `0-0/42` or `*/0`
fn parse_total(content_range: &str) -> Result<u64, BackendError> {
    content_range
        .rsplit_once('/')
        .and_then(|(_, total)| total.trim().parse().ok())
        .ok_or_else(|| BackendError::InvalidCountHeader(content_range.to_string()))
}
