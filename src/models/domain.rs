use serde::{Deserialize, Serialize, Serializer};

/// Required survey fields, in canonical order
pub const REQUIRED_FIELDS: [Field; 4] = [Field::Age, Field::Smoker, Field::Exercise, Field::Diet];

/// One of the four survey questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Age,
    Smoker,
    Exercise,
    Diet,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Age => "age",
            Field::Smoker => "smoker",
            Field::Exercise => "exercise",
            Field::Diet => "diet",
        }
    }

    /// Exact, case-insensitive label lookup. No partial matches.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "age" => Some(Field::Age),
            "smoker" => Some(Field::Smoker),
            "exercise" => Some(Field::Exercise),
            "diet" => Some(Field::Diet),
            _ => None,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-reported exercise frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exercise {
    Never,
    Rarely,
    Sometimes,
    Often,
    Daily,
}

impl Exercise {
    pub const ALL: [Exercise; 5] = [
        Exercise::Never,
        Exercise::Rarely,
        Exercise::Sometimes,
        Exercise::Often,
        Exercise::Daily,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Exercise::Never => "never",
            Exercise::Rarely => "rarely",
            Exercise::Sometimes => "sometimes",
            Exercise::Often => "often",
            Exercise::Daily => "daily",
        }
    }

    pub fn is_low(&self) -> bool {
        matches!(self, Exercise::Never | Exercise::Rarely)
    }
}

/// Canonical diet pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diet {
    #[serde(rename = "high sugar")]
    HighSugar,
    #[serde(rename = "high fat")]
    HighFat,
    #[serde(rename = "high salt")]
    HighSalt,
    #[serde(rename = "processed")]
    Processed,
    #[serde(rename = "balanced")]
    Balanced,
    #[serde(rename = "vegetarian")]
    Vegetarian,
    #[serde(rename = "low carb")]
    LowCarb,
    #[serde(rename = "low fat")]
    LowFat,
    #[serde(rename = "high protein")]
    HighProtein,
}

impl Diet {
    /// Classification priority order
    pub const ALL: [Diet; 9] = [
        Diet::HighSugar,
        Diet::HighFat,
        Diet::HighSalt,
        Diet::Processed,
        Diet::Balanced,
        Diet::Vegetarian,
        Diet::LowCarb,
        Diet::LowFat,
        Diet::HighProtein,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Diet::HighSugar => "high sugar",
            Diet::HighFat => "high fat",
            Diet::HighSalt => "high salt",
            Diet::Processed => "processed",
            Diet::Balanced => "balanced",
            Diet::Vegetarian => "vegetarian",
            Diet::LowCarb => "low carb",
            Diet::LowFat => "low fat",
            Diet::HighProtein => "high protein",
        }
    }

    /// Diets that count toward the "poor diet" factor
    pub fn is_poor(&self) -> bool {
        matches!(
            self,
            Diet::HighSugar | Diet::Processed | Diet::HighFat | Diet::HighSalt
        )
    }
}

/// Canonical survey answers
///
/// Every present value is already validated; anything that failed
/// normalization is simply absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_age"
    )]
    pub age: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoker: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise: Option<Exercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diet: Option<Diet>,
}

impl AnswerRecord {
    pub fn is_empty(&self) -> bool {
        self.age.is_none() && self.smoker.is_none() && self.exercise.is_none() && self.diet.is_none()
    }

    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::Age => self.age.is_some(),
            Field::Smoker => self.smoker.is_some(),
            Field::Exercise => self.exercise.is_some(),
            Field::Diet => self.diet.is_some(),
        }
    }

    pub fn present_count(&self) -> usize {
        REQUIRED_FIELDS.iter().filter(|f| self.has(**f)).count()
    }

    pub fn is_smoker(&self) -> bool {
        self.smoker == Some(true)
    }

    pub fn is_age_45_plus(&self) -> bool {
        self.age.is_some_and(|age| age >= 45.0)
    }
}

/// Whole ages serialize as integers (`30`, not `30.0`)
fn serialize_age<S: Serializer>(age: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match age {
        Some(a) if a.fract() == 0.0 && *a <= u64::MAX as f64 => serializer.serialize_u64(*a as u64),
        Some(a) => serializer.serialize_f64(*a),
        None => serializer.serialize_none(),
    }
}

/// Where a record came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Provenance {
    pub was_structured: bool,
    /// Recognition confidence in [0, 1]
    pub recognition_confidence: f64,
}

/// Default recognition confidence when the source supplies none
pub const DEFAULT_RECOGNITION_CONFIDENCE: f64 = 0.95;

/// Clamp a recognition confidence to [0, 1]
///
/// NaN and infinities are replaced by [`DEFAULT_RECOGNITION_CONFIDENCE`].
pub fn recognition_confidence(confidence: f64) -> f64 {
    if confidence.is_finite() {
        confidence.clamp(0.0, 1.0)
    } else {
        DEFAULT_RECOGNITION_CONFIDENCE
    }
}

impl Provenance {
    pub fn structured() -> Self {
        Self {
            was_structured: true,
            recognition_confidence: DEFAULT_RECOGNITION_CONFIDENCE,
        }
    }

    pub fn text() -> Self {
        Self {
            was_structured: false,
            recognition_confidence: DEFAULT_RECOGNITION_CONFIDENCE,
        }
    }

    pub fn with_recognition_confidence(mut self, confidence: f64) -> Self {
        self.recognition_confidence = recognition_confidence(confidence);
        self
    }
}

/// Qualitative risk factor label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskFactor {
    #[serde(rename = "smoking")]
    Smoking,
    #[serde(rename = "low exercise")]
    LowExercise,
    #[serde(rename = "poor diet")]
    PoorDiet,
    #[serde(rename = "age ≥45")]
    Age45Plus,
}

impl RiskFactor {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskFactor::Smoking => "smoking",
            RiskFactor::LowExercise => "low exercise",
            RiskFactor::PoorDiet => "poor diet",
            RiskFactor::Age45Plus => "age ≥45",
        }
    }
}

impl std::fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, deduplicated factors and their reasons
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorSet {
    pub factors: Vec<RiskFactor>,
    pub rationale: Vec<String>,
}

impl FactorSet {
    pub fn contains(&self, factor: RiskFactor) -> bool {
        self.factors.contains(&factor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        if score >= 60 {
            RiskLevel::High
        } else if score >= 30 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scored risk with its level and reasons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    #[serde(rename = "risk_level")]
    pub level: RiskLevel,
    /// 0..=100
    pub score: u8,
    pub rationale: Vec<String>,
}

/// Where the final recommendation list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationSource {
    Generator,
    Fallback,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_thresholds() {
        assert_eq!(RiskLevel::from_score(29), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(30), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(59), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(60), RiskLevel::High);
    }

    #[test]
    fn test_answer_record_serialization() {
        let record = AnswerRecord {
            age: Some(30.0),
            smoker: None,
            exercise: Some(Exercise::Daily),
            diet: Some(Diet::HighSugar),
        };
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"age": 30, "exercise": "daily", "diet": "high sugar"})
        );
    }

    #[test]
    fn test_fractional_age_kept() {
        let record = AnswerRecord {
            age: Some(42.5),
            ..Default::default()
        };
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(json["age"], serde_json::json!(42.5));
    }

    #[test]
    fn test_field_label_exact_match() {
        assert_eq!(Field::from_label("AGE"), Some(Field::Age));
        assert_eq!(Field::from_label(" Diet "), Some(Field::Diet));
        assert_eq!(Field::from_label("ages"), None);
        assert_eq!(Field::from_label("smoking"), None);
    }

    #[test]
    fn test_factor_labels_serialize() {
        let json = serde_json::to_value(RiskFactor::Age45Plus).unwrap();
        assert_eq!(json, serde_json::json!("age ≥45"));
    }

    #[test]
    fn test_recognition_confidence_non_finite_uses_default() {
        assert_eq!(recognition_confidence(f64::NAN), DEFAULT_RECOGNITION_CONFIDENCE);
        assert_eq!(recognition_confidence(f64::INFINITY), DEFAULT_RECOGNITION_CONFIDENCE);
        assert_eq!(recognition_confidence(1.7), 1.0);
        assert_eq!(recognition_confidence(-0.2), 0.0);

        let provenance = Provenance::text().with_recognition_confidence(f64::NAN);
        assert_eq!(provenance.recognition_confidence, DEFAULT_RECOGNITION_CONFIDENCE);
    }
}
