//! Small helpers shared by every provider client

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{ClientError, Result};

/// `base` joined with `path` and a percent-encoded query string
pub fn build_url(base: &str, path: &str, params: &[(String, String)]) -> String {
    let mut url = format!("{}{}", base.trim_end_matches('/'), path);
    if !params.is_empty() {
        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(&query);
    }
    url
}

/// Owned key/value pairs from borrowed ones
pub fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Masks the `key=` query value so URLs can be logged
pub fn redact_key(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let query = query
        .split('&')
        .map(|pair| {
            if pair.starts_with("key=") {
                "key=***"
            } else {
                pair
            }
        })
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", base, query)
}

/// Map a non-success status to the matching error
pub fn check_status(status: StatusCode, url: &str) -> Result<()> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(ClientError::Unauthorized);
    }
    if !status.is_success() {
        return Err(ClientError::Status {
            status: status.as_u16(),
            url: redact_key(url),
        });
    }
    Ok(())
}

/// reqwest client for the keyless providers
pub fn companion_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent("GameLibrary/1.0")
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to configure HTTP client, using defaults: {}", e);
            reqwest::Client::new()
        })
}

/// GET a JSON document
pub async fn get_json<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<T> {
    tracing::debug!(url = %redact_key(url), "GET");
    let response = client.get(url).send().await?;
    check_status(response.status(), url)?;
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// POST a JSON body and read a JSON document back
pub async fn post_json<B, T>(client: &reqwest::Client, url: &str, body: &B) -> Result<T>
where
    B: serde::Serialize + ?Sized,
    T: DeserializeOwned,
{
    tracing::debug!(url = %url, "POST");
    let response = client.post(url).json(body).send().await?;
    check_status(response.status(), url)?;
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
