//! Severity engine: rule mining, scoring, classification and summaries

pub mod mining;
pub mod rule_store;
pub mod scorer;
pub mod classifier;
pub mod summary;

pub use mining::{AprioriMiner, MiningParams};
pub use rule_store::RuleStore;
pub use scorer::{score, Score};
pub use classifier::classify;
pub use summary::{summarize, DEFAULT_SYMPTOM_COLUMNS};
