use crate::models::{AnswerRecord, Diet, Exercise, RiskAssessment, RiskFactor, RiskLevel};

/// Calculate a lifestyle risk score (0-100) and its level
///
/// Scoring table (conditions are summed independently):
/// score = (
///     40 if smoker +
///     30 if exercise == never, else 20 if rarely +
///     20 high sugar | 15 high fat | 10 high salt | 10 processed +
///     10 if age >= 45
/// )
///
/// Level: >= 60 high, >= 30 moderate, otherwise low. The rationale is the
/// factor list when there is one, otherwise the scorer's own reasons.
pub fn score_risk(answers: &AnswerRecord, factors: &[RiskFactor]) -> RiskAssessment {
    let mut score: u32 = 0;
    let mut why: Vec<&'static str> = Vec::new();

    if answers.is_smoker() {
        score += 40;
        why.push("smoking");
    }

    let (points, reason) = exercise_points(answers.exercise);
    if points > 0 {
        score += points;
        why.push(reason);
    }

    let (points, reason) = diet_points(answers.diet);
    if points > 0 {
        score += points;
        why.push(reason);
    }

    if answers.is_age_45_plus() {
        score += 10;
        why.push("age 45+");
    }

    let score = score.min(100) as u8;

    let rationale = if factors.is_empty() {
        why.into_iter().map(String::from).collect()
    } else {
        factors.iter().map(|f| f.as_str().to_string()).collect()
    };

    RiskAssessment {
        level: RiskLevel::from_score(score),
        score,
        rationale,
    }
}

#[inline]
fn exercise_points(exercise: Option<Exercise>) -> (u32, &'static str) {
    match exercise {
        Some(Exercise::Never) => (30, "no exercise"),
        Some(Exercise::Rarely) => (20, "low activity"),
        _ => (0, ""),
    }
}

#[inline]
fn diet_points(diet: Option<Diet>) -> (u32, &'static str) {
    match diet {
        Some(Diet::HighSugar) => (20, "high sugar diet"),
        Some(Diet::HighFat) => (15, "high fat diet"),
        Some(Diet::HighSalt) => (10, "high salt diet"),
        Some(Diet::Processed) => (10, "processed foods"),
        _ => (0, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::factors::extract_factors;

    fn record(age: Option<f64>, smoker: Option<bool>, exercise: Option<Exercise>, diet: Option<Diet>) -> AnswerRecord {
        AnswerRecord { age, smoker, exercise, diet }
    }

    #[test]
    fn test_worst_case_clamps_to_100() {
        let answers = record(Some(50.0), Some(true), Some(Exercise::Never), Some(Diet::HighSugar));
        let factors = extract_factors(&answers).factors;
        let assessment = score_risk(&answers, &factors);

        assert_eq!(assessment.score, 100);
        assert_eq!(assessment.level, RiskLevel::High);
        assert_eq!(assessment.rationale, vec!["smoking", "low exercise", "poor diet", "age ≥45"]);
    }

    #[test]
    fn test_empty_answers_score_zero() {
        let assessment = score_risk(&AnswerRecord::default(), &[]);

        assert_eq!(assessment.score, 0);
        assert_eq!(assessment.level, RiskLevel::Low);
        assert!(assessment.rationale.is_empty());
    }

    #[test]
    fn test_rarely_scores_less_than_never() {
        let never = score_risk(&record(None, None, Some(Exercise::Never), None), &[]);
        let rarely = score_risk(&record(None, None, Some(Exercise::Rarely), None), &[]);

        assert_eq!(never.score, 30);
        assert_eq!(rarely.score, 20);
    }

    #[test]
    fn test_diet_points() {
        let score = |diet| score_risk(&record(None, None, None, Some(diet)), &[]).score;

        assert_eq!(score(Diet::HighSugar), 20);
        assert_eq!(score(Diet::HighFat), 15);
        assert_eq!(score(Diet::HighSalt), 10);
        assert_eq!(score(Diet::Processed), 10);
        assert_eq!(score(Diet::Balanced), 0);
    }

    #[test]
    fn test_rationale_falls_back_to_reasons() {
        let answers = record(None, Some(true), Some(Exercise::Never), None);
        let assessment = score_risk(&answers, &[]);

        assert_eq!(assessment.rationale, vec!["smoking", "no exercise"]);
        assert_eq!(assessment.score, 70);
        assert_eq!(assessment.level, RiskLevel::High);
    }

    #[test]
    fn test_moderate_band() {
        // smoker only: 40
        let assessment = score_risk(&record(None, Some(true), None, None), &[RiskFactor::Smoking]);
        assert_eq!(assessment.level, RiskLevel::Moderate);
        assert_eq!(assessment.rationale, vec!["smoking"]);
    }
}
