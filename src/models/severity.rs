//! Severity label model

use serde::Serialize;

pub const INDETERMINATE_MESSAGE: &str =
    "Unable to determine the probability based on the given information.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeverityLabel {
    Mild,
    Moderate,
    Severe,
}

impl SeverityLabel {
    /// User-facing message shown by the presentation layer
    pub fn message(&self) -> &'static str {
        match self {
            SeverityLabel::Mild => "Patient condition is Mild.",
            SeverityLabel::Moderate => "Patient condition is Moderate.",
            SeverityLabel::Severe => "Condition Severe: Immediate Care Needed.",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityLabel::Mild => "Mild",
            SeverityLabel::Moderate => "Moderate",
            SeverityLabel::Severe => "Severe",
        }
    }
}

impl std::fmt::Display for SeverityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
