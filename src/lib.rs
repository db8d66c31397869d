//! Health Risk Profiler - survey normalization and lifestyle risk scoring
//!
//! Turns a self-reported health survey (structured JSON, "key: value" text,
//! or text recognized from an image) into canonical answers, a heuristic
//! risk score and short, non-diagnostic lifestyle recommendations.
//! Scores are not medical advice.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{ParseOutcome, PipelineError, Profiler, RawInput};
pub use models::{AnswerRecord, RiskAssessment, RiskFactor, RiskLevel};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let profiler = Profiler::default();
        let risk = profiler
            .risk(&RawInput::FreeText("Smoker: yes".to_string()))
            .unwrap();
        assert_eq!(risk.level, RiskLevel::Moderate);
    }
}
