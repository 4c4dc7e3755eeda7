//! Rule Store - read-only set of mined rules

use super::mining::{MiningError, MiningParams, RuleMiner};
use crate::models::{Dataset, Rule};

#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    rules: Vec<Rule>,
}

impl RuleStore {
    /// Mine `dataset` once. Called during startup only.
    pub fn build(
        dataset: &Dataset,
        miner: &dyn RuleMiner,
        params: &MiningParams,
    ) -> Result<Self, MiningError> {
        let rules = miner.mine(dataset, params)?;

        if rules.is_empty() {
            tracing::warn!(
                min_support = params.min_support,
                min_confidence = params.min_confidence,
                "No association rules mined, every prediction will be indeterminate"
            );
        } else {
            tracing::info!(rules = rules.len(), "Rule store ready");
            for rule in rules.iter().take(5) {
                tracing::debug!("Sample rule: {}", rule);
            }
        }

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

#[cfg(test)]
impl RuleStore {
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
