use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::core::normalize::{normalize_field, FieldValue};
use crate::models::{AnswerRecord, Field, Provenance, REQUIRED_FIELDS};

/// Raw survey input, already classified by the transport layer
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// JSON object with optional `age`, `smoker`, `exercise`, `diet` keys
    Structured(Map<String, Value>),
    /// "key: value" lines
    FreeText(String),
    /// Text recovered from an image, parsed like free text
    Recognized {
        text: String,
        confidence: Option<f64>,
    },
}

/// True if `map` is worth treating as a structured survey
pub fn is_structured_survey(map: &Map<String, Value>) -> bool {
    !map.is_empty() && REQUIRED_FIELDS.iter().any(|f| map.contains_key(f.as_str()))
}

/// Adapted input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adapted {
    pub answers: AnswerRecord,
    pub provenance: Provenance,
    /// Number of survey keys or labels found, whether or not their values
    /// normalized
    pub fields_seen: usize,
}

impl Adapted {
    /// Nothing in the input named a survey field
    pub fn is_unusable(&self) -> bool {
        self.fields_seen == 0
    }
}

/// Turn raw input into a canonical answer record and its provenance
pub fn adapt(raw: &RawInput, default_confidence: f64) -> Adapted {
    let (answers, fields_seen, provenance) = match raw {
        RawInput::Structured(map) => {
            let (answers, seen) = scan_structured(map);
            (answers, seen, Provenance::structured().with_recognition_confidence(default_confidence))
        }
        RawInput::FreeText(text) => {
            let (answers, seen) = scan_key_value_text(text);
            (answers, seen, Provenance::text().with_recognition_confidence(default_confidence))
        }
        RawInput::Recognized { text, confidence } => {
            let confidence = confidence.filter(|c| c.is_finite()).unwrap_or(default_confidence);
            let (answers, seen) = scan_key_value_text(text);
            (answers, seen, Provenance::text().with_recognition_confidence(confidence))
        }
    };

    Adapted {
        answers,
        provenance,
        fields_seen,
    }
}

/// Parse a structured object
///
/// Each field must carry the right primitive type (age: positive integer,
/// smoker: boolean, exercise/diet: string); a mistyped field is dropped on
/// its own without discarding the rest.
pub fn parse_structured(map: &Map<String, Value>) -> AnswerRecord {
    scan_structured(map).0
}

/// Structured parse plus the count of well-typed survey keys
fn scan_structured(map: &Map<String, Value>) -> (AnswerRecord, usize) {
    let mut answers = AnswerRecord::default();
    let mut seen = 0;
    if !is_structured_survey(map) {
        return (answers, seen);
    }

    for field in REQUIRED_FIELDS {
        let Some(raw) = map.get(field.as_str()) else {
            continue;
        };
        if !has_structured_type(field, raw) {
            tracing::debug!("Dropping structured field {} with unexpected type", field);
            continue;
        }
        seen += 1;
        apply(&mut answers, field, normalize_field(field, raw));
    }

    (answers, seen)
}

fn has_structured_type(field: Field, raw: &Value) -> bool {
    match field {
        Field::Age => raw
            .as_f64()
            .is_some_and(|n| n.is_finite() && n.fract() == 0.0 && n > 0.0),
        Field::Smoker => raw.is_boolean(),
        Field::Exercise | Field::Diet => raw.is_string(),
    }
}

/// `label: value` or `label - value`, label made of letters and spaces
static LINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z ]+)\s*[:\-]\s*(.+?)\s*$").expect("valid regex"));

/// Parse free text with one "key: value" pair per line
///
/// Unmatched lines and unknown labels are ignored. A later line for the
/// same label replaces the earlier answer, even when its value is invalid.
pub fn parse_key_value_text(text: &str) -> AnswerRecord {
    scan_key_value_text(text).0
}

/// Free-text parse plus the count of lines with a known label
fn scan_key_value_text(text: &str) -> (AnswerRecord, usize) {
    let mut answers = AnswerRecord::default();
    let mut seen = 0;

    let lines = text
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty());

    for line in lines {
        let Some(caps) = LINE_PATTERN.captures(line) else {
            continue;
        };
        let Some(field) = Field::from_label(&caps[1]) else {
            continue;
        };
        let raw = Value::String(caps[2].trim().to_string());
        seen += 1;
        apply(&mut answers, field, normalize_field(field, &raw));
    }

    (answers, seen)
}

fn apply(answers: &mut AnswerRecord, field: Field, value: Option<FieldValue>) {
    match field {
        Field::Age => answers.age = None,
        Field::Smoker => answers.smoker = None,
        Field::Exercise => answers.exercise = None,
        Field::Diet => answers.diet = None,
    }

    match value {
        Some(FieldValue::Age(age)) => answers.age = Some(age),
        Some(FieldValue::Smoker(smoker)) => answers.smoker = Some(smoker),
        Some(FieldValue::Exercise(exercise)) => answers.exercise = Some(exercise),
        Some(FieldValue::Diet(diet)) => answers.diet = Some(diet),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Diet, Exercise, DEFAULT_RECOGNITION_CONFIDENCE};
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_structured_full() {
        let map = object(json!({"age": 50, "smoker": true, "exercise": "never", "diet": "high sugar"}));
        let answers = parse_structured(&map);

        assert_eq!(answers.age, Some(50.0));
        assert_eq!(answers.smoker, Some(true));
        assert_eq!(answers.exercise, Some(Exercise::Never));
        assert_eq!(answers.diet, Some(Diet::HighSugar));
    }

    #[test]
    fn test_structured_wrong_types_dropped_individually() {
        let map = object(json!({"age": "50", "smoker": "yes", "exercise": "daily", "diet": 3}));
        let answers = parse_structured(&map);

        assert_eq!(answers.age, None);
        assert_eq!(answers.smoker, None);
        assert_eq!(answers.exercise, Some(Exercise::Daily));
        assert_eq!(answers.diet, None);
    }

    #[test]
    fn test_structured_age_must_be_positive_integer() {
        assert_eq!(parse_structured(&object(json!({"age": 42.5}))).age, None);
        assert_eq!(parse_structured(&object(json!({"age": 0}))).age, None);
        assert_eq!(parse_structured(&object(json!({"age": -5}))).age, None);
        assert_eq!(parse_structured(&object(json!({"age": 42.0}))).age, Some(42.0));
    }

    #[test]
    fn test_structured_without_survey_keys_is_empty() {
        let answers = parse_structured(&object(json!({"name": "x", "text": "Age: 30"})));
        assert!(answers.is_empty());
        assert!(parse_structured(&Map::new()).is_empty());
    }

    #[test]
    fn test_free_text_lines() {
        let answers = parse_key_value_text("Age: 42\r\nSmoker - yes\n\n  Exercise: rarely  \nDiet: high-sugar");

        assert_eq!(answers.age, Some(42.0));
        assert_eq!(answers.smoker, Some(true));
        assert_eq!(answers.exercise, Some(Exercise::Rarely));
        assert_eq!(answers.diet, Some(Diet::HighSugar));
    }

    #[test]
    fn test_free_text_ignores_unknown_and_unmatched() {
        let answers = parse_key_value_text("Name: Jane\nAges: 40\nsmoker yes\n42\nDIET: balanced");

        assert_eq!(answers.age, None);
        assert_eq!(answers.smoker, None);
        assert_eq!(answers.diet, Some(Diet::Balanced));
    }

    #[test]
    fn test_free_text_accepts_fractional_age() {
        assert_eq!(parse_key_value_text("Age: 42.5").age, Some(42.5));
    }

    #[test]
    fn test_free_text_exercise_with_dash_value() {
        let answers = parse_key_value_text("Exercise: 3-5x/week");
        assert_eq!(answers.exercise, Some(Exercise::Often));
    }

    #[test]
    fn test_later_line_wins() {
        let answers = parse_key_value_text("Age: 30\nAge: unknown");
        assert_eq!(answers.age, None);
    }

    #[test]
    fn test_adapt_provenance() {
        let structured = adapt(&RawInput::Structured(object(json!({"age": 30}))), 0.95).provenance;
        assert!(structured.was_structured);

        let text = adapt(&RawInput::FreeText("Age: 30".into()), 0.95).provenance;
        assert!(!text.was_structured);
        assert_eq!(text.recognition_confidence, 0.95);

        let ocr = adapt(
            &RawInput::Recognized { text: "Age: 30".into(), confidence: Some(0.6) },
            DEFAULT_RECOGNITION_CONFIDENCE,
        )
        .provenance;
        assert!(!ocr.was_structured);
        assert_eq!(ocr.recognition_confidence, 0.6);
    }

    #[test]
    fn test_adapt_recognized_nan_confidence_uses_default() {
        let ocr = adapt(
            &RawInput::Recognized { text: "Age: 30".into(), confidence: Some(f64::NAN) },
            0.8,
        )
        .provenance;
        assert_eq!(ocr.recognition_confidence, 0.8);
    }

    #[test]
    fn test_known_label_with_invalid_value_is_counted() {
        let adapted = adapt(&RawInput::FreeText("Smoker: maybe".into()), 0.95);
        assert!(adapted.answers.is_empty());
        assert_eq!(adapted.fields_seen, 1);
        assert!(!adapted.is_unusable());

        let adapted = adapt(&RawInput::Structured(object(json!({"exercise": "twice a week"}))), 0.95);
        assert!(adapted.answers.is_empty());
        assert!(!adapted.is_unusable());
    }

    #[test]
    fn test_unknown_or_mistyped_keys_are_unusable() {
        assert!(adapt(&RawInput::FreeText("Name: Jane\nsmoker yes".into()), 0.95).is_unusable());
        assert!(adapt(&RawInput::Structured(object(json!({"smoker": "yes"}))), 0.95).is_unusable());
        assert!(adapt(&RawInput::FreeText(String::new()), 0.95).is_unusable());
    }
}
