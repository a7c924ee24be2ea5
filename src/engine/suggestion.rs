use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::action::ActionPlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStatus {
    Pending,
    Executed,
    Dismissed,
    Failed,
}

impl SuggestionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, SuggestionStatus::Pending)
    }
}

impl fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestionStatus::Pending => write!(f, "pending"),
            SuggestionStatus::Executed => write!(f, "executed"),
            SuggestionStatus::Dismissed => write!(f, "dismissed"),
            SuggestionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A proposed action plan awaiting human approval. Lives from the moment the
/// predictor clears the confidence floor until the machine returns to Idle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: Uuid,
    pub description: String,
    pub confidence: f64,
    pub plan: ActionPlan,
    pub status: SuggestionStatus,
    pub created_at: DateTime<Utc>,
}

impl Suggestion {
    pub fn new(description: String, confidence: f64, plan: ActionPlan) -> Self {
        Self {
            id: Uuid::new_v4(),
            description,
            confidence,
            plan,
            status: SuggestionStatus::Pending,
            created_at: Utc::now(),
        }
    }
}
