//! Summary Aggregator - per-symptom prevalence across the dataset

use crate::models::{Dataset, DatasetError, PrevalenceSummary};

/// Symptom columns shown in the prevalence chart unless configured otherwise
pub const DEFAULT_SYMPTOM_COLUMNS: [&str; 9] = [
    "Fever",
    "Tiredness",
    "Dry-Cough",
    "Difficulty-in-Breathing",
    "Sore-Throat",
    "Pains",
    "Nasal-Congestion",
    "Runny-Nose",
    "Diarrhea",
];

/// Count, for each column in `symptoms`, the rows where it is present.
/// Recomputed on every call.
pub fn summarize(dataset: &Dataset, symptoms: &[String]) -> Result<PrevalenceSummary, DatasetError> {
    let mut summary = PrevalenceSummary::default();
    for symptom in symptoms {
        let count = dataset
            .count_present(symptom)
            .ok_or_else(|| DatasetError::MissingColumn(symptom.clone()))?;
        summary.push(symptom.as_str(), count);
    }
    Ok(summary)
}
