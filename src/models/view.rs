//! Rendering payload handed to the presentation layer

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::severity::{SeverityLabel, INDETERMINATE_MESSAGE};

/// Symptom name -> number of cases, in configured column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrevalenceSummary {
    entries: Vec<(String, u64)>,
}

impl PrevalenceSummary {
    pub fn push(&mut self, symptom: impl Into<String>, count: u64) {
        self.entries.push((symptom.into(), count));
    }
}

#[cfg(test)]
impl PrevalenceSummary {
    pub fn get(&self, symptom: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(name, _)| name == symptom)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

// Serialized as a JSON object, keeping column order
impl Serialize for PrevalenceSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, count) in &self.entries {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct RenderPayload {
    pub result: Option<String>,
    pub severity: Option<SeverityLabel>,
    pub probability: Option<f64>,
    pub matched_rules: Option<usize>,
    pub prevalence: Option<PrevalenceSummary>,
    pub show_chart: bool,
}

impl RenderPayload {
    /// Initial page view, also used as the fallback for bad submissions
    pub fn initial() -> Self {
        Self::default()
    }

    pub fn summary(prevalence: PrevalenceSummary) -> Self {
        Self {
            prevalence: Some(prevalence),
            show_chart: true,
            ..Self::default()
        }
    }

    pub fn prediction(label: SeverityLabel, probability: f64, matched_rules: usize) -> Self {
        Self {
            result: Some(label.message().to_string()),
            severity: Some(label),
            probability: Some(probability),
            matched_rules: Some(matched_rules),
            ..Self::default()
        }
    }

    pub fn indeterminate() -> Self {
        Self {
            result: Some(INDETERMINATE_MESSAGE.to_string()),
            matched_rules: Some(0),
            ..Self::default()
        }
    }
}
