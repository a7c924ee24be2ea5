use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;

use super::types::{Prediction, PredictionRequest};
use crate::capture::{CaptureContext, Frame};
use crate::config::CloudSettings;
use crate::error::{PulseError, Result};

/// Remote model that predicts the user's next action from recent frames.
/// Any transport or protocol failure is reported as "no prediction".
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, frames: &[Frame], context: &CaptureContext) -> Option<Prediction>;
}

/// HTTP client for the prediction service: one attempt per call, bounded by
/// the configured deadline, authenticated with an API-key header.
pub struct CloudPredictor {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl CloudPredictor {
    pub fn new(settings: &CloudSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()
            .map_err(|err| PulseError::Cloud(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            endpoint: settings.prediction_endpoint.clone(),
            api_key: settings.api_key.clone(),
        })
    }
}

#[async_trait]
impl Predictor for CloudPredictor {
    async fn predict(&self, frames: &[Frame], context: &CaptureContext) -> Option<Prediction> {
        if self.endpoint.is_empty() {
            tracing::debug!("no prediction endpoint configured");
            return None;
        }

        let request = PredictionRequest {
            frames: frames.iter().map(Frame::to_base64).collect(),
            timestamp: Utc::now(),
            context: context.clone(),
        };

        let response = match self
            .http
            .post(&self.endpoint)
            .header("X-API-Key", &self.api_key)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!("prediction request failed: {err}");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("prediction service returned {}", response.status());
            return None;
        }

        match response.json::<Prediction>().await {
            Ok(prediction) => {
                tracing::debug!(
                    confidence = prediction.confidence,
                    "prediction received"
                );
                Some(prediction)
            }
            Err(err) => {
                tracing::debug!("prediction body unparseable: {err}");
                None
            }
        }
    }
}
