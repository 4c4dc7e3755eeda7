//! Severity Classifier

use crate::models::SeverityLabel;

pub const MILD_MAX: f64 = 70.0;
pub const MODERATE_MAX: f64 = 80.0;

/// Map a probability percentage to a severity label.
///
/// `p <= 70` is Mild, `70 < p <= 80` is Moderate, anything above is Severe.
/// The Moderate band starts right after 70 so that no value between 70 and 71
/// is left unassigned.
pub fn classify(percentage: f64) -> SeverityLabel {
    if percentage <= MILD_MAX {
        SeverityLabel::Mild
    } else if percentage <= MODERATE_MAX {
        SeverityLabel::Moderate
    } else {
        SeverityLabel::Severe
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scorer::{score, Score};
    use crate::models::{item_set, Rule};

    #[test]
    fn test_boundaries() {
        assert_eq!(classify(0.0), SeverityLabel::Mild);
        assert_eq!(classify(70.0), SeverityLabel::Mild);
        assert_eq!(classify(71.0), SeverityLabel::Moderate);
        assert_eq!(classify(80.0), SeverityLabel::Moderate);
        assert_eq!(classify(80.01), SeverityLabel::Severe);
        assert_eq!(classify(100.0), SeverityLabel::Severe);
    }

    #[test]
    fn test_gap_between_70_and_71_is_moderate() {
        assert_eq!(classify(70.5), SeverityLabel::Moderate);
        assert_eq!(classify(70.000_001), SeverityLabel::Moderate);
        assert_eq!(classify(70.999), SeverityLabel::Moderate);
    }

    #[test]
    fn test_total_over_percentage_range() {
        let mut previous = SeverityLabel::Mild;
        for step in 0..=10_000 {
            let p = step as f64 / 100.0;
            let label = classify(p);
            // Labels only move upward as p grows
            let rank = |l: SeverityLabel| l as u8;
            assert!(rank(label) >= rank(previous), "p = {p}");
            previous = label;
        }
        assert_eq!(previous, SeverityLabel::Severe);
    }

    #[test]
    fn test_weighted_score_at_moderate_boundary() {
        let consequent = item_set(["Severity_Moderate"]);
        let rules = vec![
            Rule::new(item_set(["Fever"]), consequent.clone(), 0.5, 0.5, 1.0).unwrap(),
            Rule::new(item_set(["Fever", "Pains", "Sore-Throat"]), consequent, 0.4, 0.9, 1.0).unwrap(),
        ];
        let features = item_set(["Fever", "Pains", "Sore-Throat", "Age_25-59"]);

        let Score::Match(result) = score(&features, &rules) else {
            panic!("Expected a match");
        };
        assert_eq!(classify(result.percentage), SeverityLabel::Moderate);
    }

    #[test]
    fn test_single_rule_scores_severe() {
        let rules = vec![
            Rule::new(item_set(["Fever"]), item_set(["Severity_Severe"]), 0.5, 0.9, 1.0).unwrap(),
        ];
        let features = item_set(["Fever", "Age:30", "Gender:M", "Contact:Yes"]);

        let Score::Match(result) = score(&features, &rules) else {
            panic!("Expected a match");
        };
        assert_eq!(classify(result.percentage), SeverityLabel::Severe);
    }
}
