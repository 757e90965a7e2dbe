//! Evaluation service client with retry/backoff and the usage-limit gate.

use async_trait::async_trait;
use log::{error, warn};
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::{sleep, Instant};

use crate::config::{EngineSettings, RetryPolicy};
use crate::error::{Result, ReviewError};
use crate::eval::RawEval;

/// Process-wide "usage limit reached" flag. Starts clear, trips once, never resets.
#[derive(Clone, Debug, Default)]
pub struct UsageGate(Arc<AtomicBool>);

impl UsageGate {
    pub fn new() -> Self { Self::default() }
    pub fn is_tripped(&self) -> bool { self.0.load(Ordering::Relaxed) }
    pub fn trip(&self) { self.0.store(true, Ordering::Relaxed); }
}

#[derive(Debug)]
pub enum EvalOutcome {
    Ready(RawEval),
    UsageLimit,
    /// Retry budget exhausted.
    Unavailable,
}

#[async_trait(?Send)]
pub trait EvalClient {
    async fn evaluate(&self, fen: &str, settings: &EngineSettings) -> EvalOutcome;
}

/// Retries `attempt` with doubling delays until it succeeds or `max_wait` has elapsed.
pub async fn retry_with_backoff<T, F, Fut>(policy: &RetryPolicy, mut attempt: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let started = Instant::now();
    let mut delay = policy.initial_backoff();
    loop {
        match attempt().await {
            Ok(v) => return Some(v),
            Err(e) => {
                if started.elapsed() >= policy.max_wait() {
                    error!("evaluation request gave up after {:?}: {}", started.elapsed(), e);
                    return None;
                }
                warn!("evaluation request failed ({}), retrying in {:?}", e, delay);
                sleep(delay).await;
                delay *= 2;
            }
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    fen: &'a str,
    depth: u32,
    variants: u32,
    max_thinking_time: u32,
}

/// HTTP client for a chess-api.com compatible endpoint.
pub struct ChessApiClient {
    http: reqwest::Client,
    retry: RetryPolicy,
    gate: UsageGate,
}

impl ChessApiClient {
    pub fn new(retry: RetryPolicy, gate: UsageGate) -> Self {
        Self { http: reqwest::Client::new(), retry, gate }
    }

    async fn post(&self, url: &str, body: &ApiRequest<'_>) -> Result<RawEval> {
        let response = self.http.post(url).json(body).send().await?;
        let status = response.status();
        let data: RawEval = response.json().await?;
        if data.is_usage_limit() { return Ok(data); }
        if !status.is_success() { return Err(ReviewError::HttpStatus(status.as_u16())); }
        Ok(data)
    }
}

#[async_trait(?Send)]
impl EvalClient for ChessApiClient {
    async fn evaluate(&self, fen: &str, settings: &EngineSettings) -> EvalOutcome {
        if self.gate.is_tripped() { return EvalOutcome::UsageLimit; }
        let body = ApiRequest {
            fen,
            depth: settings.depth,
            variants: settings.variants,
            max_thinking_time: settings.max_thinking_time_ms,
        };
        match retry_with_backoff(&self.retry, || self.post(&settings.api_url, &body)).await {
            Some(raw) if raw.is_usage_limit() => {
                warn!("evaluation service reports usage limit reached");
                self.gate.trip();
                EvalOutcome::UsageLimit
            }
            Some(raw) => EvalOutcome::Ready(raw),
            None => EvalOutcome::Unavailable,
        }
    }
}
