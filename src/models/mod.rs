// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    recognition_confidence, AnswerRecord, Diet, Exercise, FactorSet, Field, Provenance, RecommendationSource, RiskAssessment,
    RiskFactor, RiskLevel, DEFAULT_RECOGNITION_CONFIDENCE, REQUIRED_FIELDS,
};
pub use requests::{classify_json_body, classify_text_body, TextSurveyRequest};
pub use responses::{ErrorResponse, HealthResponse, IncompleteResponse, RecommendationsResponse};
