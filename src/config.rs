//! Configuration module

use std::env;

use thiserror::Error;

use crate::engine::{MiningParams, DEFAULT_SYMPTOM_COLUMNS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be within {range}, got {value}")]
    OutOfRange {
        name: &'static str,
        range: &'static str,
        value: f64,
    },

    #[error("{0} must list at least one column")]
    EmptyList(&'static str),
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Symptom dataset (comma-separated, header row first)
    pub dataset_path: String,

    /// Columns dropped before mining
    pub excluded_columns: Vec<String>,

    /// Columns counted by the prevalence summary
    pub summary_columns: Vec<String>,

    /// Minimum item set support for mining
    pub min_support: f64,

    /// Minimum rule confidence for mining
    pub min_confidence: f64,

    /// Largest item set size mined
    pub max_itemset_len: Option<usize>,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            dataset_path: "covid_symptoms_data.csv".to_string(),
            excluded_columns: vec!["Country".to_string()],
            summary_columns: DEFAULT_SYMPTOM_COLUMNS.iter().map(|s| s.to_string()).collect(),
            min_support: 0.4,
            min_confidence: 0.4,
            max_itemset_len: None,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup, falling back to defaults
    /// for missing or unparseable values
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            dataset_path: lookup("DATASET_PATH").unwrap_or(defaults.dataset_path),

            excluded_columns: lookup("EXCLUDED_COLUMNS")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.excluded_columns),

            summary_columns: lookup("SUMMARY_COLUMNS")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.summary_columns),

            min_support: lookup("MIN_SUPPORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.min_support),

            min_confidence: lookup("MIN_CONFIDENCE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.min_confidence),

            max_itemset_len: lookup("MAX_ITEMSET_LEN")
                .and_then(|v| v.parse().ok())
                .filter(|len: &usize| *len > 0),

            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Reject thresholds the miner cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            return Err(ConfigError::OutOfRange {
                name: "MIN_SUPPORT",
                range: "(0, 1]",
                value: self.min_support,
            });
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::OutOfRange {
                name: "MIN_CONFIDENCE",
                range: "[0, 1]",
                value: self.min_confidence,
            });
        }
        if self.summary_columns.is_empty() {
            return Err(ConfigError::EmptyList("SUMMARY_COLUMNS"));
        }
        Ok(())
    }

    pub fn mining_params(&self) -> MiningParams {
        MiningParams {
            min_support: self.min_support,
            min_confidence: self.min_confidence,
            max_len: self.max_itemset_len,
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
