//! Runtime configuration, persisted as JSON next to the cache and session files.
//!
//! A missing or unreadable config file is not an error: defaults are used and
//! the problem is logged.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

pub const DEFAULT_API_URL: &str = "https://chess-api.com/v1";

/// Request parameters forwarded to the evaluation service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineSettings {
    pub api_url: String,
    pub depth: u32,
    pub variants: u32,
    pub max_thinking_time_ms: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self { api_url: DEFAULT_API_URL.to_string(), depth: 18, variants: 1, max_thinking_time_ms: 100 }
    }
}

impl EngineSettings {
    /// Limits accepted by the service: depth 10..=18, 1..=5 variants, 10..=100 ms.
    pub fn clamped(mut self) -> Self {
        self.depth = self.depth.clamp(10, 18);
        self.variants = self.variants.clamp(1, 5);
        self.max_thinking_time_ms = self.max_thinking_time_ms.clamp(10, 100);
        self
    }
}

/// Timing of the analysis scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Quiet period before a foreground request is issued.
    pub debounce_ms: u64,
    /// Delay before each background sweep request.
    pub sweep_pacing_ms: u64,
    /// How many plies either side of the resolved node the sweep visits.
    pub sweep_radius: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self { Self { debounce_ms: 500, sweep_pacing_ms: 200, sweep_radius: 3 } }
}

impl SchedulerConfig {
    pub fn debounce(&self) -> Duration { Duration::from_millis(self.debounce_ms) }
    pub fn sweep_pacing(&self) -> Duration { Duration::from_millis(self.sweep_pacing_ms) }
}

/// Backoff for transient evaluation failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub initial_backoff_ms: u64,
    pub max_wait_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self { Self { initial_backoff_ms: 200, max_wait_ms: 5 * 60 * 1000 } }
}

impl RetryPolicy {
    pub fn initial_backoff(&self) -> Duration { Duration::from_millis(self.initial_backoff_ms) }
    pub fn max_wait(&self) -> Duration { Duration::from_millis(self.max_wait_ms) }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    pub engine: EngineSettings,
    pub scheduler: SchedulerConfig,
    pub retry: RetryPolicy,
    pub cache_capacity: usize,
    pub cache_path: PathBuf,
    pub sessions_path: PathBuf,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            engine: EngineSettings::default(),
            scheduler: SchedulerConfig::default(),
            retry: RetryPolicy::default(),
            cache_capacity: crate::cache::DEFAULT_CAPACITY,
            cache_path: PathBuf::from("chess_analysis_cache.json"),
            sessions_path: PathBuf::from("chess_games.json"),
        }
    }
}

impl ReviewConfig {
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!("no config at {}, using defaults", path.display());
            return Self::default();
        }
        match std::fs::read_to_string(path).map(|s| serde_json::from_str::<ReviewConfig>(&s)) {
            Ok(Ok(cfg)) => cfg,
            Ok(Err(e)) => { warn!("failed to parse config {}: {}; using defaults", path.display(), e); Self::default() }
            Err(e) => { warn!("failed to read config {}: {}; using defaults", path.display(), e); Self::default() }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() { std::fs::create_dir_all(parent)?; }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
