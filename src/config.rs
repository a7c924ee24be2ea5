use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;

/// Capture loop settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    pub frames_per_second: u32,
    pub buffer_seconds: u32,
    pub pause_threshold_ms: u64,
    pub min_confidence: f64,
    pub cooling_period_ms: u64,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            frames_per_second: 3,
            buffer_seconds: 4,
            pause_threshold_ms: 1000,
            min_confidence: 0.80,
            cooling_period_ms: 500,
        }
    }
}

/// Plan execution pacing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExecutionSettings {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            min_delay_ms: 100,
            max_delay_ms: 300,
        }
    }
}

/// Remote prediction service settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CloudSettings {
    pub prediction_endpoint: String,
    pub api_key: String,
    pub timeout_ms: u64,
    pub min_confidence: f64,
}

impl Default for CloudSettings {
    fn default() -> Self {
        Self {
            prediction_endpoint: String::new(),
            api_key: String::new(),
            timeout_ms: 5000,
            min_confidence: 0.80,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub capture: CaptureSettings,
    pub execution: ExecutionSettings,
    pub cloud: CloudSettings,
}

impl AppSettings {
    /// Load settings from an optional TOML file layered under `PULSE__`
    /// environment overrides (e.g. `PULSE__CAPTURE__FRAMES_PER_SECOND=5`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix("PULSE").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    pub fn pause_threshold(&self) -> Duration {
        Duration::from_millis(self.capture.pause_threshold_ms)
    }

    pub fn cooling_period(&self) -> Duration {
        Duration::from_millis(self.capture.cooling_period_ms)
    }
}
