use crate::models::{AnswerRecord, Diet, FactorSet, RiskFactor};

/// Derive qualitative risk factors from the answers
///
/// Rules are independent. Both lists are deduplicated and keep the
/// order in which rules first fired.
pub fn extract_factors(answers: &AnswerRecord) -> FactorSet {
    let mut set = FactorSet::default();

    if answers.is_smoker() {
        push(&mut set, RiskFactor::Smoking, "smoking");
    }

    if answers.exercise.is_some_and(|e| e.is_low()) {
        push(&mut set, RiskFactor::LowExercise, "low activity");
    }

    if let Some(diet) = answers.diet.filter(Diet::is_poor) {
        push(&mut set, RiskFactor::PoorDiet, diet_reason(diet));
    }

    if answers.is_age_45_plus() {
        push(&mut set, RiskFactor::Age45Plus, "age 45+");
    }

    set
}

fn diet_reason(diet: Diet) -> &'static str {
    match diet {
        Diet::HighSugar => "high sugar diet",
        Diet::HighFat => "high fat diet",
        Diet::HighSalt => "high salt diet",
        _ => "processed foods",
    }
}

fn push(set: &mut FactorSet, factor: RiskFactor, reason: &str) {
    if !set.factors.contains(&factor) {
        set.factors.push(factor);
    }
    if !set.rationale.iter().any(|r| r == reason) {
        set.rationale.push(reason.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Exercise;

    #[test]
    fn test_all_factors_in_order() {
        let answers = AnswerRecord {
            age: Some(50.0),
            smoker: Some(true),
            exercise: Some(Exercise::Never),
            diet: Some(Diet::HighSugar),
        };
        let set = extract_factors(&answers);

        assert_eq!(
            set.factors,
            vec![
                RiskFactor::Smoking,
                RiskFactor::LowExercise,
                RiskFactor::PoorDiet,
                RiskFactor::Age45Plus
            ]
        );
        assert_eq!(set.rationale, vec!["smoking", "low activity", "high sugar diet", "age 45+"]);
    }

    #[test]
    fn test_healthy_answers_have_no_factors() {
        let answers = AnswerRecord {
            age: Some(30.0),
            smoker: Some(false),
            exercise: Some(Exercise::Daily),
            diet: Some(Diet::Balanced),
        };
        let set = extract_factors(&answers);

        assert!(set.factors.is_empty());
        assert!(set.rationale.is_empty());
    }

    #[test]
    fn test_diet_specific_reasons() {
        let cases = [
            (Diet::HighFat, "high fat diet"),
            (Diet::HighSalt, "high salt diet"),
            (Diet::Processed, "processed foods"),
        ];
        for (diet, reason) in cases {
            let set = extract_factors(&AnswerRecord { diet: Some(diet), ..Default::default() });
            assert_eq!(set.factors, vec![RiskFactor::PoorDiet]);
            assert_eq!(set.rationale, vec![reason]);
        }
    }

    #[test]
    fn test_age_boundary() {
        let at_45 = extract_factors(&AnswerRecord { age: Some(45.0), ..Default::default() });
        let under = extract_factors(&AnswerRecord { age: Some(44.9), ..Default::default() });

        assert_eq!(at_45.factors, vec![RiskFactor::Age45Plus]);
        assert!(under.factors.is_empty());
    }

    #[test]
    fn test_rarely_counts_as_low_exercise() {
        let set = extract_factors(&AnswerRecord {
            exercise: Some(Exercise::Rarely),
            ..Default::default()
        });
        assert_eq!(set.factors, vec![RiskFactor::LowExercise]);
    }
}
