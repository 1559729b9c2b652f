//! JSON-over-HTTP plumbing built on `gloo-net`.

pub mod chart_data_client;
pub mod drawing_api_client;

pub use chart_data_client::ChartDataClient;
pub use drawing_api_client::DrawingApiClient;

use std::collections::BTreeMap;

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::errors::{AppError, NetworkResult};
use crate::domain::logging::LogComponent;
use crate::{log_debug, log_error};

const COMPONENT: LogComponent = LogComponent::Infrastructure("HTTP");

/// Thin JSON client over one base URL.
#[derive(Debug, Clone)]
pub struct GlooHttpClient {
    base_url: String,
    default_headers: BTreeMap<String, String>,
}

impl GlooHttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut default_headers = BTreeMap::new();
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        Self { base_url: base_url.into(), default_headers }
    }

    pub fn url(&self, endpoint: &str) -> String {
        HttpUtils::join_url(&self.base_url, endpoint)
    }

    fn with_headers(&self, mut request: RequestBuilder) -> RequestBuilder {
        for (key, value) in &self.default_headers {
            request = request.header(key, value);
        }
        request
    }

    /// GET `endpoint?query` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> NetworkResult<T> {
        let url = HttpUtils::build_url_with_params(&self.url(endpoint), query);
        log_debug!(COMPONENT, "GET {}", url);

        let response = self
            .with_headers(Request::get(&url))
            .send()
            .await
            .map_err(|e| network_error("GET", &url, e))?;
        decode_json(ensure_success(response, "GET", &url)?).await
    }

    /// POST a JSON body and decode the JSON reply.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> NetworkResult<T> {
        let url = self.url(endpoint);
        log_debug!(COMPONENT, "POST {}", url);

        let response = self
            .with_headers(Request::post(&url))
            .json(body)
            .map_err(|e| AppError::ParseError(format!("failed to encode request body: {e}")))?
            .send()
            .await
            .map_err(|e| network_error("POST", &url, e))?;
        decode_json(ensure_success(response, "POST", &url)?).await
    }

    pub async fn delete(&self, endpoint: &str) -> NetworkResult<()> {
        let url = self.url(endpoint);
        log_debug!(COMPONENT, "DELETE {}", url);

        let response = self
            .with_headers(Request::delete(&url))
            .send()
            .await
            .map_err(|e| network_error("DELETE", &url, e))?;
        ensure_success(response, "DELETE", &url).map(|_| ())
    }
}

fn network_error(method: &str, url: &str, err: gloo_net::Error) -> AppError {
    let msg = format!("{method} {url} failed: {err}");
    log_error!(COMPONENT, "{}", msg);
    AppError::NetworkError(msg)
}

fn ensure_success(response: Response, method: &str, url: &str) -> NetworkResult<Response> {
    if HttpUtils::is_success_status(response.status()) {
        return Ok(response);
    }
    let msg = format!("{method} {url}: HTTP {} {}", response.status(), response.status_text());
    log_error!(COMPONENT, "{}", msg);
    Err(AppError::NetworkError(msg))
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> NetworkResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| AppError::ParseError(format!("invalid JSON response: {e}")))
}

/// URL helpers.
pub struct HttpUtils;

impl HttpUtils {
    pub fn is_success_status(status: u16) -> bool {
        (200..300).contains(&status)
    }

    /// `base` and `endpoint` joined with exactly one slash.
    pub fn join_url(base: &str, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        format!("{}/{}", base.trim_end_matches('/'), endpoint.trim_start_matches('/'))
    }

    /// Append percent-encoded query parameters in the given order.
    pub fn build_url_with_params(base_url: &str, params: &[(&str, &str)]) -> String {
        if params.is_empty() {
            return base_url.to_string();
        }
        let query: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{}={}", Self::url_encode(key), Self::url_encode(value)))
            .collect();
        let separator = if base_url.contains('?') { '&' } else { '?' };
        format!("{base_url}{separator}{}", query.join("&"))
    }

    /// Percent-encode everything outside the RFC 3986 unreserved set.
    pub fn url_encode(input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        for byte in input.bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(byte as char),
                _ => out.push_str(&format!("%{byte:02X}")),
            }
        }
        out
    }
}
