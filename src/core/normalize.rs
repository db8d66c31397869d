use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::models::{Diet, Exercise, Field};

/// A normalized value for one survey field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Age(f64),
    Smoker(bool),
    Exercise(Exercise),
    Diet(Diet),
}

/// Normalize a raw value for `field`
///
/// Never fails: anything that doesn't validate comes back as `None`
/// and is treated exactly like a missing answer.
pub fn normalize_field(field: Field, raw: &Value) -> Option<FieldValue> {
    match field {
        Field::Age => normalize_age(raw).map(FieldValue::Age),
        Field::Smoker => normalize_smoker(raw).map(FieldValue::Smoker),
        Field::Exercise => normalize_exercise(raw).map(FieldValue::Exercise),
        Field::Diet => normalize_diet(raw).map(FieldValue::Diet),
    }
}

/// Age as a finite, positive number
///
/// Strings are stripped of everything except digits and dots first,
/// so "42 years" and "age 42" both become 42.
pub fn normalize_age(raw: &Value) -> Option<f64> {
    let age = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let digits: String = s.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
            digits.parse::<f64>().ok()?
        }
        _ => return None,
    };

    (age.is_finite() && age > 0.0).then_some(age)
}

pub fn normalize_smoker(raw: &Value) -> Option<bool> {
    if let Value::Bool(b) = raw {
        return Some(*b);
    }

    match raw_text(raw)?.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

pub fn normalize_exercise(raw: &Value) -> Option<Exercise> {
    let text = raw_text(raw)?.trim().to_lowercase();

    let synonym = match text.as_str() {
        "never" | "none" | "no exercise" => Some(Exercise::Never),
        "rarely" | "seldom" => Some(Exercise::Rarely),
        "sometimes" | "occasional" => Some(Exercise::Sometimes),
        "often" | "regular" | "3-5x/week" => Some(Exercise::Often),
        "daily" | "everyday" => Some(Exercise::Daily),
        _ => None,
    };

    synonym.or_else(|| Exercise::ALL.into_iter().find(|e| e.as_str() == text))
}

/// Diet classifiers, tried in priority order
static DIET_PATTERNS: LazyLock<Vec<(Diet, Regex)>> = LazyLock::new(|| {
    [
        (Diet::HighSugar, r"(?i)high[\s-]?sugar|sugary|lots of sugar"),
        (Diet::HighFat, r"(?i)high[\s-]?fat|fatty"),
        (Diet::HighSalt, r"(?i)high[\s-]?salt|salty"),
        (Diet::Processed, r"(?i)processed|packaged|junk"),
        (Diet::Balanced, r"(?i)balanced"),
        (Diet::Vegetarian, r"(?i)vegetarian|veg"),
        (Diet::LowCarb, r"(?i)low[\s-]?carb"),
        (Diet::LowFat, r"(?i)low[\s-]?fat"),
        (Diet::HighProtein, r"(?i)high[\s-]?protein"),
    ]
    .into_iter()
    .map(|(diet, pattern)| (diet, Regex::new(pattern).expect("valid regex")))
    .collect()
});

pub fn normalize_diet(raw: &Value) -> Option<Diet> {
    let text = raw_text(raw)?.trim().to_lowercase();

    DIET_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(&text))
        .map(|(diet, _)| *diet)
        .or_else(|| Diet::ALL.into_iter().find(|d| d.as_str() == text))
}

/// String view of a primitive JSON value
fn raw_text(raw: &Value) -> Option<Cow<'_, str>> {
    match raw {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}
