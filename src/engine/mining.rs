//! Association rule mining
//!
//! The miner is a collaborator behind [`RuleMiner`] so the rule source can be
//! swapped. [`AprioriMiner`] finds frequent item sets level by level and
//! derives every confidence-qualified rule from them.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::models::{Dataset, ItemSet, Rule, RuleError};

#[derive(Debug, Error)]
pub enum MiningError {
    #[error("invalid mining parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("item set of {size} items exceeds the rule generation limit of {limit}, set MAX_ITEMSET_LEN")]
    ItemsetTooLarge { size: usize, limit: usize },

    #[error("mined rule rejected: {0}")]
    Rule(#[from] RuleError),
}

/// Largest frequent item set split into rules. Subsets are enumerated as
/// bitmasks and the count doubles per item, so this stays well below 64.
pub const MAX_RULE_ITEMSET_LEN: usize = 20;

/// Thresholds for a mining run
#[derive(Debug, Clone, PartialEq)]
pub struct MiningParams {
    /// Minimum fraction of rows an item set must occur in, `(0, 1]`
    pub min_support: f64,
    /// Minimum rule confidence, `[0, 1]`
    pub min_confidence: f64,
    /// Largest item set considered, unbounded when `None`
    pub max_len: Option<usize>,
}

impl Default for MiningParams {
    fn default() -> Self {
        Self {
            min_support: 0.4,
            min_confidence: 0.4,
            max_len: None,
        }
    }
}

impl MiningParams {
    pub fn validate(&self) -> Result<(), MiningError> {
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            return Err(MiningError::InvalidParameter {
                name: "min_support",
                value: self.min_support.to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(MiningError::InvalidParameter {
                name: "min_confidence",
                value: self.min_confidence.to_string(),
            });
        }
        if self.max_len == Some(0) {
            return Err(MiningError::InvalidParameter {
                name: "max_len",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

pub trait RuleMiner: Send + Sync {
    fn mine(&self, dataset: &Dataset, params: &MiningParams) -> Result<Vec<Rule>, MiningError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AprioriMiner;

impl RuleMiner for AprioriMiner {
    fn mine(&self, dataset: &Dataset, params: &MiningParams) -> Result<Vec<Rule>, MiningError> {
        params.validate()?;

        let index = BitIndex::build(dataset);
        let frequent = frequent_itemsets(&index, params);
        tracing::debug!(
            itemsets = frequent.len(),
            min_support = params.min_support,
            "Frequent item sets found"
        );

        generate_rules(dataset, &index, &frequent, params.min_confidence, MAX_RULE_ITEMSET_LEN)
    }
}

// ============================================================================
// SUPPORT COUNTING
// ============================================================================

/// Column-major bitsets, one bit per row.
struct BitIndex {
    columns: Vec<Vec<u64>>,
    rows: usize,
}

impl BitIndex {
    fn build(dataset: &Dataset) -> Self {
        let rows = dataset.len();
        let words = rows.div_ceil(64);
        let mut columns = vec![vec![0u64; words]; dataset.columns().len()];

        for (row, record) in dataset.records().iter().enumerate() {
            for (col, bits) in columns.iter_mut().enumerate() {
                if record.is_present(col) {
                    bits[row / 64] |= 1 << (row % 64);
                }
            }
        }

        Self { columns, rows }
    }

    fn count(&self, items: &[usize]) -> u64 {
        let Some((first, rest)) = items.split_first() else {
            return self.rows as u64;
        };

        self.columns[*first]
            .iter()
            .enumerate()
            .map(|(w, word)| {
                rest.iter()
                    .fold(*word, |acc, item| acc & self.columns[*item][w])
                    .count_ones() as u64
            })
            .sum()
    }

    fn support(&self, count: u64) -> f64 {
        count as f64 / self.rows as f64
    }
}

/// Item set (sorted column indices) -> row count
type Frequent = Vec<(Vec<usize>, u64)>;

fn frequent_itemsets(index: &BitIndex, params: &MiningParams) -> Frequent {
    let max_len = params.max_len.unwrap_or(usize::MAX);

    let mut level: Frequent = (0..index.columns.len())
        .map(|col| (vec![col], index.count(&[col])))
        .filter(|(_, count)| index.support(*count) >= params.min_support)
        .collect();

    let mut all = Vec::new();
    let mut size = 1;

    while !level.is_empty() {
        all.extend(level.iter().cloned());
        if size >= max_len {
            break;
        }
        level = next_level(index, &level, size, params.min_support);
        size += 1;
    }

    all
}

/// Join frequent `size`-sets into `size + 1` candidates and keep the frequent ones.
/// `level` must be sorted lexicographically; the output is too.
fn next_level(index: &BitIndex, level: &Frequent, size: usize, min_support: f64) -> Frequent {
    let known: HashSet<&[usize]> = level.iter().map(|(items, _)| items.as_slice()).collect();
    let mut next = Vec::new();

    for (i, (a, _)) in level.iter().enumerate() {
        for (b, _) in &level[i + 1..] {
            // Join only when the first k-1 items agree
            if a[..size - 1] != b[..size - 1] {
                break;
            }

            let mut candidate = a.clone();
            candidate.push(b[size - 1]);

            let all_subsets_frequent = (0..candidate.len()).all(|skip| {
                let subset: Vec<usize> = candidate
                    .iter()
                    .enumerate()
                    .filter(|(pos, _)| *pos != skip)
                    .map(|(_, item)| *item)
                    .collect();
                known.contains(subset.as_slice())
            });
            if !all_subsets_frequent {
                continue;
            }

            let count = index.count(&candidate);
            if index.support(count) >= min_support {
                next.push((candidate, count));
            }
        }
    }

    next
}

// ============================================================================
// RULE GENERATION
// ============================================================================

fn generate_rules(
    dataset: &Dataset,
    index: &BitIndex,
    frequent: &Frequent,
    min_confidence: f64,
    limit: usize,
) -> Result<Vec<Rule>, MiningError> {
    let counts: HashMap<&[usize], u64> = frequent
        .iter()
        .map(|(items, count)| (items.as_slice(), *count))
        .collect();
    let names = |items: &[usize]| -> ItemSet {
        items.iter().map(|i| dataset.columns()[*i].clone()).collect()
    };

    let mut rules = Vec::new();

    for (items, count) in frequent.iter().filter(|(items, _)| items.len() >= 2) {
        let k = items.len();
        if k > limit {
            return Err(MiningError::ItemsetTooLarge { size: k, limit });
        }
        // Every non-empty proper subset becomes an antecedent
        for mask in 1..(1u64 << k) - 1 {
            let (antecedent, consequent): (Vec<usize>, Vec<usize>) = items
                .iter()
                .enumerate()
                .map(|(pos, item)| (mask & (1 << pos) != 0, *item))
                .fold((Vec::new(), Vec::new()), |(mut ante, mut cons), (left, item)| {
                    if left {
                        ante.push(item);
                    } else {
                        cons.push(item);
                    }
                    (ante, cons)
                });

            // Subsets of a frequent set are frequent, so both lookups hit
            let ante_count = counts
                .get(antecedent.as_slice())
                .copied()
                .unwrap_or_else(|| index.count(&antecedent));
            let cons_count = counts
                .get(consequent.as_slice())
                .copied()
                .unwrap_or_else(|| index.count(&consequent));
            if ante_count == 0 || cons_count == 0 {
                continue;
            }

            let confidence = *count as f64 / ante_count as f64;
            if confidence < min_confidence {
                continue;
            }
            let lift = confidence / index.support(cons_count);

            rules.push(Rule::new(
                names(&antecedent),
                names(&consequent),
                index.support(*count),
                confidence,
                lift,
            )?);
        }
    }

    Ok(rules)
}
