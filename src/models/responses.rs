use serde::{Deserialize, Serialize};
use crate::models::domain::{RecommendationSource, RiskAssessment, RiskFactor};

/// Response for the recommendations step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(flatten)]
    pub risk: RiskAssessment,
    pub factors: Vec<RiskFactor>,
    pub recommendations: Vec<String>,
    pub source: RecommendationSource,
    pub status: String,
}

/// Returned by the parse step when too many answers are missing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncompleteResponse {
    pub status: String,
    pub reason: String,
}

impl Default for IncompleteResponse {
    fn default() -> Self {
        Self {
            status: "incomplete_profile".to_string(),
            reason: ">50% fields missing".to_string(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: &str, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            status_code,
        }
    }
}
