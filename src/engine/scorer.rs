//! Aggregate Scorer
//!
//! Weighted-confidence estimate over every rule whose antecedent is contained
//! in the user's features. Each rule is weighted by its antecedent size, so
//! more specific rules count for more.

use crate::models::{ItemSet, Rule};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    Match(MatchResult),
    NoMatch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    /// Weighted probability as a percentage, `0..=100`
    pub percentage: f64,
    pub matched_rules: usize,
}

pub fn score(features: &ItemSet, rules: &[Rule]) -> Score {
    let (weighted_sum, total_weight, matched) = rules
        .iter()
        .filter(|rule| rule.applies_to(features))
        .fold((0.0, 0.0, 0usize), |(sum, total, n), rule| {
            let weight = rule.antecedent().len() as f64;
            (sum + rule.confidence() * weight, total + weight, n + 1)
        });

    if matched == 0 || total_weight <= 0.0 {
        return Score::NoMatch;
    }

    Score::Match(MatchResult {
        percentage: weighted_sum / total_weight * 100.0,
        matched_rules: matched,
    })
}
