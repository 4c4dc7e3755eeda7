//! Severity form handler
//!
//! `GET /` renders the empty form, `POST /` handles a submission. Bad or
//! unknown submissions fall back to the empty form instead of failing.

use axum::{body::Bytes, extract::State, Json};

use crate::engine::{classify, score, summarize, Score};
use crate::models::{PredictRequest, RenderPayload, Submission};
use crate::{AppError, AppState};

/// Initial page view
pub async fn index() -> Json<RenderPayload> {
    Json(RenderPayload::initial())
}

/// Form submission
pub async fn submit(State(state): State<AppState>, body: Bytes) -> Json<RenderPayload> {
    Json(handle(&state, Submission::from_form(&body)))
}

pub fn handle(state: &AppState, submission: Submission) -> RenderPayload {
    match submission {
        Submission::ShowSummary => {
            match summarize(&state.dataset, &state.config.summary_columns).map_err(AppError::from) {
                Ok(summary) => RenderPayload::summary(summary),
                Err(e) => {
                    // Columns are checked at startup, so this means a bad deploy
                    tracing::error!("Prevalence summary failed: {}", e);
                    RenderPayload::initial()
                }
            }
        }
        Submission::Predict(request) => match request.validated() {
            Ok(request) => predict(state, &request),
            Err(e) => {
                tracing::warn!("Rejected prediction request: {}", e);
                RenderPayload::initial()
            }
        },
        Submission::Unrecognized => {
            tracing::warn!("Unrecognized form submission, showing initial view");
            RenderPayload::initial()
        }
    }
}

fn predict(state: &AppState, request: &PredictRequest) -> RenderPayload {
    let features = request.features();

    match score(&features, state.rules.rules()) {
        Score::Match(result) => {
            let label = classify(result.percentage);
            tracing::debug!(
                features = features.len(),
                matched = result.matched_rules,
                probability = result.percentage,
                severity = %label,
                "Prediction"
            );
            RenderPayload::prediction(label, result.percentage, result.matched_rules)
        }
        Score::NoMatch => {
            tracing::debug!(features = features.len(), "No rule matched");
            RenderPayload::indeterminate()
        }
    }
}
