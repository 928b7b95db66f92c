//! HTTP retry helpers shared by the GitHub and Discord REST clients.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;

const RETRY_ATTEMPT_HEADER: &str = "x-discord-issues-retry-attempt";
const MAX_RETRY_DELAY_MS: u64 = 30_000;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, base_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay_ms: base_delay_ms.max(1),
        }
    }

    /// One attempt and no retries, for requests that are not idempotent.
    pub fn single_attempt() -> Self {
        Self::new(1, 1)
    }
}

pub fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    let raw = headers.get(reqwest::header::RETRY_AFTER)?.to_str().ok()?;
    let seconds = raw.trim().parse::<f64>().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some(Duration::from_millis((seconds * 1_000.0).ceil() as u64))
}

pub fn retry_delay(base_delay_ms: u64, attempt: usize, retry_after: Option<Duration>) -> Duration {
    if let Some(delay) = retry_after {
        return delay
            .max(Duration::from_millis(base_delay_ms))
            .min(Duration::from_millis(MAX_RETRY_DELAY_MS));
    }
    let exponent = attempt.saturating_sub(1).min(10) as u32;
    let scaled = base_delay_ms.saturating_mul(2_u64.saturating_pow(exponent));
    Duration::from_millis(scaled.min(MAX_RETRY_DELAY_MS))
}

pub fn is_retryable_transport_error(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect() || error.is_request()
}

pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || status >= 500
}

pub fn truncate_for_error(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated = text.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}

/// Send a request built by `request_builder`, retrying throttled, 5xx, and
/// transport failures, and return the successful response.
pub async fn send_with_retry<F>(
    service: &str,
    operation: &str,
    policy: RetryPolicy,
    mut request_builder: F,
) -> Result<reqwest::Response>
where
    F: FnMut() -> reqwest::RequestBuilder,
{
    let mut attempt = 0_usize;
    loop {
        attempt = attempt.saturating_add(1);
        let response = request_builder()
            .header(RETRY_ATTEMPT_HEADER, attempt.saturating_sub(1).to_string())
            .send()
            .await;
        match response {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return Ok(response);
                }

                let retry_after = parse_retry_after(response.headers());
                let body = response.text().await.unwrap_or_default();
                if attempt < policy.max_attempts && is_retryable_status(status.as_u16()) {
                    tracing::debug!(
                        service,
                        operation,
                        status = status.as_u16(),
                        attempt,
                        "retrying api request"
                    );
                    tokio::time::sleep(retry_delay(policy.base_delay_ms, attempt, retry_after))
                        .await;
                    continue;
                }

                bail!(
                    "{service} api {operation} failed with status {}: {}",
                    status.as_u16(),
                    truncate_for_error(&body, 800)
                );
            }
            Err(error) => {
                if attempt < policy.max_attempts && is_retryable_transport_error(&error) {
                    tokio::time::sleep(retry_delay(policy.base_delay_ms, attempt, None)).await;
                    continue;
                }
                return Err(error)
                    .with_context(|| format!("{service} api {operation} request failed"));
            }
        }
    }
}

pub async fn request_json_with_retry<T, F>(
    service: &str,
    operation: &str,
    policy: RetryPolicy,
    request_builder: F,
) -> Result<T>
where
    T: DeserializeOwned,
    F: FnMut() -> reqwest::RequestBuilder,
{
    let response = send_with_retry(service, operation, policy, request_builder).await?;
    response
        .json::<T>()
        .await
        .with_context(|| format!("failed to decode {service} {operation}"))
}
