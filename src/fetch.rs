use std::time::Duration;

use tracing::debug;
use wreq::Client;

use crate::error::{self, ApiError};
use crate::model::{Flight, SummaryMetrics};
use crate::query::FilterSet;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct ApiOptions {
    pub base_url: String,
    pub proxy: Option<String>,
    pub timeout: u64,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            proxy: None,
            timeout: 30,
        }
    }
}

fn build_client(options: &ApiOptions) -> Result<Client, ApiError> {
    let mut builder = Client::builder().timeout(Duration::from_secs(options.timeout));

    if let Some(ref proxy) = options.proxy {
        builder = builder.proxy(wreq::Proxy::all(proxy).map_err(error::from_http_error)?);
    }

    builder.build().map_err(error::from_http_error)
}

async fn get_json(
    url: &str,
    params: &[(String, String)],
    options: &ApiOptions,
) -> Result<String, ApiError> {
    let client = build_client(options)?;

    debug!(url, params = ?params, "fetching");

    let response = client
        .get(url)
        .query(params)
        .send()
        .await
        .map_err(error::from_http_error)?;

    let status = response.status().as_u16();
    debug!(url, status, "response");
    match status {
        200 => {}
        429 => return Err(ApiError::RateLimited),
        _ if status >= 400 => return Err(ApiError::HttpStatus(status)),
        _ => {}
    }

    response.text().await.map_err(error::from_http_error)
}

pub async fn fetch_flights(
    filters: &FilterSet,
    limit: usize,
    offset: usize,
    options: &ApiOptions,
) -> Result<Vec<Flight>, ApiError> {
    let url = format!("{}/flights", options.base_url.trim_end_matches('/'));
    let params = filters.to_query_params(limit, offset);
    let body = get_json(&url, &params, options).await?;

    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

// The summary endpoint wraps its single row in an array.
pub async fn fetch_summary(options: &ApiOptions) -> Result<SummaryMetrics, ApiError> {
    let url = format!("{}/flights/summary", options.base_url.trim_end_matches('/'));
    let body = get_json(&url, &[], options).await?;

    let rows: Vec<SummaryMetrics> =
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
    rows.into_iter()
        .next()
        .ok_or_else(|| ApiError::Decode("summary endpoint returned an empty array".into()))
}

fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

pub fn flights_url(filters: &FilterSet, limit: usize, offset: usize, options: &ApiOptions) -> String {
    let query: Vec<String> = filters
        .to_query_params(limit, offset)
        .iter()
        .map(|(k, v)| format!("{k}={}", encode_component(v)))
        .collect();
    format!(
        "{}/flights?{}",
        options.base_url.trim_end_matches('/'),
        query.join("&")
    )
}
