use std::sync::LazyLock;

use regex::Regex;

use crate::models::{AnswerRecord, Diet, RiskAssessment, RiskFactor, RiskLevel};

/// Appended to every rule-based list; removed again by [`filter_recommendations`]
pub const DISCLAIMER: &str = "This is not a diagnosis. Consult a clinician for personalized advice.";

/// Rule-based recommendations, used whenever the generator is unavailable
///
/// Deduplicated; keeps first-insertion order.
pub fn build_recommendations(
    _level: RiskLevel,
    factors: &[RiskFactor],
    answers: &AnswerRecord,
) -> Vec<String> {
    let mut recs: Vec<String> = Vec::new();
    let mut add = |rec: &str| {
        if !recs.iter().any(|r| r == rec) {
            recs.push(rec.to_string());
        }
    };

    if factors.contains(&RiskFactor::Smoking) {
        add("Quit smoking (seek a cessation program)");
    }

    if factors.contains(&RiskFactor::LowExercise) || answers.exercise.is_some_and(|e| e.is_low()) {
        add("Start walking 30 minutes daily");
        add("Aim for 150 minutes of moderate activity per week");
    }

    if answers.diet == Some(Diet::HighSugar) || factors.contains(&RiskFactor::PoorDiet) {
        add("Reduce added sugar and sugary beverages");
    }

    match answers.diet {
        Some(Diet::HighFat) => add("Prefer unsaturated fats; limit fried foods"),
        Some(Diet::HighSalt) => add("Cut down on salt and processed snacks"),
        Some(Diet::Processed) => add("Cook more whole foods at home"),
        _ => {}
    }

    if answers.is_age_45_plus() {
        add("Schedule regular health checkups");
    }

    add(DISCLAIMER);

    recs
}

static DISCLAIMER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)diagnosis|clinician|doctor|medical").expect("valid regex"));

static PARENTHETICAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("valid regex"));

/// Clean up a recommendation list from any source
///
/// Drops entries with clinical/disclaimer vocabulary, strips parentheticals,
/// keeps only the text before the first period, trims, and drops entries
/// left empty.
pub fn filter_recommendations<I, S>(recommendations: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    recommendations
        .into_iter()
        .filter(|rec| !DISCLAIMER_PATTERN.is_match(rec.as_ref()))
        .map(|rec| {
            let stripped = PARENTHETICAL_PATTERN.replace_all(rec.as_ref(), "");
            let sentence = stripped.split('.').next().unwrap_or_default();
            sentence.trim().to_string()
        })
        .filter(|rec| !rec.is_empty())
        .collect()
}

/// Prompt for the external text generator
pub fn build_prompt(risk: &RiskAssessment, factors: &[RiskFactor], answers: &AnswerRecord) -> String {
    let factor_list = factors.iter().map(RiskFactor::as_str).collect::<Vec<_>>().join(", ");
    let age = answers
        .age
        .map(|a| a.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let diet = answers.diet.map(|d| d.as_str()).unwrap_or("unknown");
    let exercise = answers.exercise.map(|e| e.as_str()).unwrap_or("unknown");

    format!(
        "You are a helpful and safe health lifestyle assistant.\n\
         \n\
         Risk Level: {level} (score {score}/100)\n\
         Factors: {factor_list}\n\
         Age: {age}\n\
         Diet: {diet}\n\
         Exercise: {exercise}\n\
         \n\
         Write 3-5 very short, actionable, safe lifestyle recommendations to lower risk.\n\
         Each recommendation should be a short phrase of at most 5 words.\n\
         Return only a JSON array of short strings - no explanations, no notes, no disclaimers.\n\
         \n\
         Example:\n\
         [\"Quit smoking\",\"Reduce sugar\",\"Walk 30 mins daily\"]\n",
        level = risk.level,
        score = risk.score,
    )
}

static CODE_FENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^```(?:json)?\s*(.*?)\s*```$").expect("valid regex"));

/// Interpret raw generator output
///
/// A JSON array of strings (optionally inside a Markdown code fence) is
/// used as-is, and a bare JSON string becomes a single entry. Anything
/// else becomes a single-entry list holding the whole text.
pub fn parse_generated(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    let body = CODE_FENCE_PATTERN
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |m| m.as_str());

    if let Ok(recs) = serde_json::from_str::<Vec<String>>(body) {
        return recs;
    }
    match serde_json::from_str::<String>(body) {
        Ok(rec) => vec![rec],
        Err(_) => vec![text.to_string()],
    }
}
