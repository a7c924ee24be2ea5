use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::Region;
use crate::capture::CaptureContext;

/// Request body for the prediction service
#[derive(Debug, Serialize)]
pub struct PredictionRequest {
    /// Base64-encoded JPEG frames, most recent last
    pub frames: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub context: CaptureContext,
}

/// Response from the prediction service. Either the `actions` array or the
/// legacy `action`/`coordinates` pair describes the plan.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Prediction {
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub actions: Option<Vec<CloudAction>>,
    #[serde(default)]
    pub suggestion: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Coordinates {
    pub x: i32,
    pub y: i32,
}

/// One entry of the `actions` array as sent by the service
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudAction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub x: Option<i32>,
    #[serde(default)]
    pub y: Option<i32>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub keys: Option<String>,
    #[serde(default)]
    pub source_region: Option<Region>,
    #[serde(default)]
    pub target_region: Option<Region>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub amount: Option<i32>,
}
