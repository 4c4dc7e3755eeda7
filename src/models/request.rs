//! Form submission model

use validator::Validate;

use crate::models::rule::ItemSet;
use crate::{AppError, AppResult};

/// What the submitted form asked for
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    ShowSummary,
    Predict(PredictRequest),
    Unrecognized,
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct PredictRequest {
    #[validate(length(max = 64, message = "too many symptoms"))]
    pub symptoms: Vec<String>,

    #[validate(length(min = 1, max = 128, message = "age is required"))]
    pub age: String,

    #[validate(length(min = 1, max = 128, message = "gender is required"))]
    pub gender: String,

    #[validate(length(min = 1, max = 128, message = "contact history is required"))]
    pub contact: String,
}

impl Submission {
    /// Decode an `application/x-www-form-urlencoded` body.
    ///
    /// `show_graph` or `action=summary` selects the summary view, `predict` or
    /// `action=predict` selects a prediction. The summary wins when both are set.
    pub fn from_form(body: &[u8]) -> Self {
        let mut show_summary = false;
        let mut predict = false;
        let mut request = PredictRequest::default();

        for (key, value) in url::form_urlencoded::parse(body) {
            match key.as_ref() {
                "show_graph" => show_summary = true,
                "predict" => predict = true,
                "action" => match value.as_ref() {
                    "summary" => show_summary = true,
                    "predict" => predict = true,
                    other => tracing::debug!("Ignoring unknown action '{}'", other),
                },
                "symptoms" => {
                    if !value.is_empty() {
                        request.symptoms.push(value.into_owned());
                    }
                }
                "age" => request.age = value.into_owned(),
                "gender" => request.gender = value.into_owned(),
                "contact" => request.contact = value.into_owned(),
                _ => {}
            }
        }

        if show_summary {
            Submission::ShowSummary
        } else if predict {
            Submission::Predict(request)
        } else {
            Submission::Unrecognized
        }
    }
}

impl PredictRequest {
    /// Run field validation, turning failures into a typed error
    pub fn validated(self) -> AppResult<Self> {
        self.validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;
        Ok(self)
    }

    /// Symptom tokens plus the demographic tokens, deduplicated
    pub fn features(&self) -> ItemSet {
        self.symptoms
            .iter()
            .chain([&self.age, &self.gender, &self.contact])
            .cloned()
            .collect()
    }
}
