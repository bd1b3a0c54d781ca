use crate::config::Config;
use crate::error::FetchError;
use crate::types::LimitStatus;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Error body the exporter writes alongside a 500.
#[derive(Debug, Deserialize)]
struct ExporterError {
    error: String,
}

pub fn build_client(cfg: &Config) -> reqwest::Result<Client> {
    let mut default_headers = HeaderMap::new();
    match HeaderValue::from_str(&cfg.user_agent) {
        Ok(ua) => {
            default_headers.insert(USER_AGENT, ua);
        }
        Err(e) => warn!(
            "ignoring invalid user agent {:?}: {}",
            cfg.user_agent, e
        ),
    }
    let builder = Client::builder()
        .default_headers(default_headers)
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .use_rustls_tls();
    builder.build()
}

/// Pick the most useful message out of a non-success response body.
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(e) = serde_json::from_str::<ExporterError>(body) {
        if !e.error.is_empty() {
            return e.error;
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("unknown status")
        .to_string()
}

pub fn decode_limit_status(body: &str) -> Result<LimitStatus, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))
}

/// One GET against the limit endpoint. No retries.
pub async fn get_limit_status(client: &Client, url: &Url) -> Result<LimitStatus, FetchError> {
    let res = client
        .get(url.clone())
        .header(ACCEPT, HeaderValue::from_static("application/json"))
        .send()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    if !status.is_success() {
        return Err(FetchError::Status {
            status,
            message: error_message(status, &body),
        });
    }
    debug!("GET {} -> {}", url, body);
    decode_limit_status(&body)
}
