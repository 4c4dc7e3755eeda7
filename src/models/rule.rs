//! Association rule model

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

/// Set of attribute tokens, compared by exact string equality.
pub type ItemSet = BTreeSet<String>;

#[derive(Debug, Error, PartialEq)]
pub enum RuleError {
    #[error("rule antecedent must not be empty")]
    EmptyAntecedent,

    #[error("rule consequent must not be empty")]
    EmptyConsequent,

    #[error("item '{0}' appears on both sides of the rule")]
    Overlap(String),

    #[error("{metric} {value} is outside [0, 1]")]
    OutOfRange { metric: &'static str, value: f64 },
}

/// A mined rule `antecedent -> consequent`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    antecedent: ItemSet,
    consequent: ItemSet,
    support: f64,
    confidence: f64,
    lift: f64,
}

impl Rule {
    pub fn new(
        antecedent: ItemSet,
        consequent: ItemSet,
        support: f64,
        confidence: f64,
        lift: f64,
    ) -> Result<Self, RuleError> {
        if antecedent.is_empty() {
            return Err(RuleError::EmptyAntecedent);
        }
        if consequent.is_empty() {
            return Err(RuleError::EmptyConsequent);
        }
        if let Some(item) = antecedent.intersection(&consequent).next() {
            return Err(RuleError::Overlap(item.clone()));
        }
        check_unit("support", support)?;
        check_unit("confidence", confidence)?;

        Ok(Self {
            antecedent,
            consequent,
            support,
            confidence,
            lift,
        })
    }

    pub fn antecedent(&self) -> &ItemSet {
        &self.antecedent
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// True when every antecedent token is in `features`.
    pub fn applies_to(&self, features: &ItemSet) -> bool {
        self.antecedent.is_subset(features)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |set: &ItemSet| set.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
        write!(
            f,
            "{{{}}} -> {{{}}} (support {:.3}, confidence {:.3}, lift {:.3})",
            join(&self.antecedent),
            join(&self.consequent),
            self.support,
            self.confidence,
            self.lift
        )
    }
}

fn check_unit(metric: &'static str, value: f64) -> Result<(), RuleError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(RuleError::OutOfRange { metric, value })
    }
}

#[cfg(test)]
impl Rule {
    pub fn consequent(&self) -> &ItemSet {
        &self.consequent
    }

    pub fn support(&self) -> f64 {
        self.support
    }

    pub fn lift(&self) -> f64 {
        self.lift
    }
}

/// Build an item set from string literals.
#[cfg(test)]
pub fn item_set<I, S>(items: I) -> ItemSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}
