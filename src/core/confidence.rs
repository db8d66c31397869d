use crate::models::{recognition_confidence, AnswerRecord, Field, Provenance, REQUIRED_FIELDS};

/// Blend weight for the share of answered fields
const COMPLETENESS_WEIGHT: f64 = 0.7;
/// Extra weight per answered field when the input was structured
const STRUCTURED_BOOST: f64 = 0.1;
/// Blend weight for the recognition confidence
const RECOGNITION_WEIGHT: f64 = 0.3;

/// Completeness of a record
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Absent required fields, in canonical order
    pub missing: Vec<Field>,
    /// Blended confidence in [0, 1]
    pub confidence: f64,
}

pub fn evaluate(answers: &AnswerRecord, provenance: &Provenance) -> Evaluation {
    Evaluation {
        missing: find_missing(answers),
        confidence: compute_confidence(answers, provenance),
    }
}

pub fn find_missing(answers: &AnswerRecord) -> Vec<Field> {
    REQUIRED_FIELDS
        .into_iter()
        .filter(|field| !answers.has(*field))
        .collect()
}

/// Share of required fields that are present (0, 0.25, .. 1)
pub fn present_fraction(answers: &AnswerRecord) -> f64 {
    answers.present_count() as f64 / REQUIRED_FIELDS.len() as f64
}

/// `0.7 * frac + boost * frac + 0.3 * recognition`, clamped to [0, 1]
///
/// The structured boost scales with `frac`, so an empty structured record
/// gets nothing from it.
pub fn compute_confidence(answers: &AnswerRecord, provenance: &Provenance) -> f64 {
    let frac = present_fraction(answers);
    let boost = if provenance.was_structured { STRUCTURED_BOOST } else { 0.0 };
    let recognition = recognition_confidence(provenance.recognition_confidence);

    (COMPLETENESS_WEIGHT * frac + boost * frac + RECOGNITION_WEIGHT * recognition).clamp(0.0, 1.0)
}

/// More than half of the required fields are missing
pub fn is_incomplete(missing: &[Field]) -> bool {
    missing.len() * 2 > REQUIRED_FIELDS.len()
}
