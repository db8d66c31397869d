use serde::Serialize;
use thiserror::Error;

use crate::core::{
    adapter::{adapt, RawInput},
    confidence::{evaluate, is_incomplete, present_fraction},
    factors::extract_factors,
    recommendations::{build_prompt, build_recommendations, filter_recommendations, parse_generated},
    scoring::score_risk,
};
use crate::models::{
    recognition_confidence, AnswerRecord, FactorSet, Field, Provenance, RecommendationSource,
    RiskAssessment, RiskFactor, DEFAULT_RECOGNITION_CONFIDENCE,
};
use crate::services::TextGenerator;

/// The only error the pipeline reports
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("Provide JSON, text or image")]
    NoUsableInput,
}

/// Normalized survey with its completeness
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedSurvey {
    pub answers: AnswerRecord,
    pub missing_fields: Vec<Field>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Parsed(ParsedSurvey),
    /// More than half of the required fields are missing
    Incomplete,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorReport {
    pub factors: Vec<RiskFactor>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationReport {
    pub risk: RiskAssessment,
    pub factors: Vec<RiskFactor>,
    pub recommendations: Vec<String>,
    pub source: RecommendationSource,
}

/// Survey pipeline orchestrator
///
/// # Pipeline Stages
/// 1. Input adaptation and field normalization
/// 2. Completeness and confidence evaluation
/// 3. Factor extraction
/// 4. Risk scoring
/// 5. Recommendation synthesis (generator, or rule-based fallback)
///
/// Every entry point re-runs the pipeline from raw input; nothing is
/// carried between calls.
#[derive(Debug, Clone, Copy)]
pub struct Profiler {
    default_confidence: f64,
}

impl Profiler {
    pub fn new(default_confidence: f64) -> Self {
        Self {
            default_confidence: recognition_confidence(default_confidence),
        }
    }

    pub fn with_default_confidence() -> Self {
        Self::new(DEFAULT_RECOGNITION_CONFIDENCE)
    }

    fn answers(&self, raw: &RawInput) -> Result<(AnswerRecord, Provenance), PipelineError> {
        let adapted = adapt(raw, self.default_confidence);
        if adapted.is_unusable() {
            tracing::debug!("No survey fields in input");
            return Err(PipelineError::NoUsableInput);
        }
        Ok((adapted.answers, adapted.provenance))
    }

    /// Normalize and report missing fields and confidence
    pub fn parse(&self, raw: &RawInput) -> Result<ParseOutcome, PipelineError> {
        let (answers, provenance) = self.answers(raw)?;
        let evaluation = evaluate(&answers, &provenance);

        if is_incomplete(&evaluation.missing) {
            tracing::debug!("Incomplete profile: {} fields missing", evaluation.missing.len());
            return Ok(ParseOutcome::Incomplete);
        }

        Ok(ParseOutcome::Parsed(ParsedSurvey {
            answers,
            missing_fields: evaluation.missing,
            confidence: evaluation.confidence,
        }))
    }

    /// Factor labels plus the share of answered fields
    pub fn factors(&self, raw: &RawInput) -> Result<FactorReport, PipelineError> {
        let (answers, _) = self.answers(raw)?;
        let FactorSet { factors, .. } = extract_factors(&answers);

        Ok(FactorReport {
            factors,
            confidence: present_fraction(&answers),
        })
    }

    pub fn risk(&self, raw: &RawInput) -> Result<RiskAssessment, PipelineError> {
        let (answers, _) = self.answers(raw)?;
        let set = extract_factors(&answers);
        Ok(score_risk(&answers, &set.factors))
    }

    /// Score and recommend
    ///
    /// Uses `generator` when given; any generator failure falls back to the
    /// rule-based list. Either way the result goes through
    /// [`filter_recommendations`].
    pub async fn recommendations(
        &self,
        raw: &RawInput,
        generator: Option<&dyn TextGenerator>,
    ) -> Result<RecommendationReport, PipelineError> {
        let (answers, _) = self.answers(raw)?;
        let set = extract_factors(&answers);
        let risk = score_risk(&answers, &set.factors);

        let generated = match generator {
            Some(generator) => {
                let prompt = build_prompt(&risk, &set.factors, &answers);
                match generator.generate(&prompt).await {
                    Ok(text) => Some(parse_generated(&text)),
                    Err(e) => {
                        tracing::warn!("Text generation failed, using rule-based recommendations: {}", e);
                        None
                    }
                }
            }
            None => None,
        };

        let (raw_recs, source) = match generated {
            Some(recs) => (recs, RecommendationSource::Generator),
            None => (
                build_recommendations(risk.level, &set.factors, &answers),
                RecommendationSource::Fallback,
            ),
        };

        Ok(RecommendationReport {
            recommendations: filter_recommendations(raw_recs),
            risk,
            factors: set.factors,
            source,
        })
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::with_default_confidence()
    }
}
