//! Symptom Severity Server
//!
//! Estimates a Mild / Moderate / Severe label for a reported symptom set using
//! association rules mined from a static symptom dataset.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   SEVERITY SERVER                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  startup:  Dataset ──► RuleMiner ──► RuleStore              │
//! │                                                             │
//! │  request:  Form (Axum) ──┬──► Scorer ──► Classifier         │
//! │                          └──► Summary                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod engine;
mod models;
mod handlers;
mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::get,
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::engine::{AprioriMiner, RuleStore, summarize};
use crate::models::Dataset;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging, JSON lines in production
    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "severity_server=debug,tower_http=debug".into()));
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Severity Server starting ({})...", config.environment);

    // Dataset and rules must be ready before the listener opens
    let state = build_state(config.clone())?;

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Shared application state, read-only after startup
#[derive(Clone)]
pub struct AppState {
    pub rules: Arc<RuleStore>,
    pub dataset: Arc<Dataset>,
    pub config: config::Config,
}

/// Load the dataset, mine the rules and check the summary columns.
/// Any failure here aborts startup.
fn build_state(config: config::Config) -> anyhow::Result<AppState> {
    config.validate().context("invalid configuration")?;

    let dataset = Dataset::load(&config.dataset_path, &config.excluded_columns)
        .with_context(|| format!("failed to load dataset {}", config.dataset_path))?;

    let params = config.mining_params();
    tracing::info!(
        min_support = params.min_support,
        min_confidence = params.min_confidence,
        "Mining association rules..."
    );
    let rules = RuleStore::build(&dataset, &AprioriMiner, &params)
        .context("failed to mine association rules")?;

    summarize(&dataset, &config.summary_columns)
        .context("summary columns do not match the dataset")?;

    Ok(AppState {
        rules: Arc::new(rules),
        dataset: Arc::new(dataset),
        config,
    })
}

/// Create the main router
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/", get(handlers::form::index).post(handlers::form::submit))
        .fallback(handlers::not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use axum::{
        body::{self, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    // Fever in every row, Dry-Cough in 3 of 4, both together in 3 of 4
    const DATA: &str = "\
Fever,Tiredness,Dry-Cough,Difficulty-in-Breathing,Sore-Throat,Pains,Nasal-Congestion,Runny-Nose,Diarrhea,Gender_Male,Country
1,0,1,0,0,0,0,0,0,1,China
1,1,1,0,1,0,0,0,0,1,Italy
1,0,1,1,0,1,0,1,0,0,Iran
1,0,0,0,0,0,1,0,1,0,Spain
";

    fn config_for(dir: &tempfile::TempDir) -> config::Config {
        let path = dir.path().join("symptoms.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(DATA.as_bytes()).unwrap();

        config::Config {
            dataset_path: path.to_string_lossy().into_owned(),
            ..config::Config::default()
        }
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn form(body: &'static str) -> Request<Body> {
        Request::post("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[test]
    fn test_build_state_mines_rules() {
        let dir = tempfile::tempdir().unwrap();
        let state = build_state(config_for(&dir)).unwrap();
        assert_eq!(state.dataset.len(), 4);
        assert!(!state.rules.is_empty());
    }

    #[test]
    fn test_build_state_fails_without_dataset() {
        let config = config::Config {
            dataset_path: "/nonexistent/symptoms.csv".to_string(),
            ..config::Config::default()
        };
        assert!(build_state(config).is_err());
    }

    #[test]
    fn test_build_state_fails_on_missing_summary_column() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_for(&dir);
        config.summary_columns.push("Loss-of-Taste".to_string());
        assert!(build_state(config).is_err());
    }

    #[test]
    fn test_build_state_fails_on_bad_thresholds() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_for(&dir);
        config.min_support = 2.0;
        assert!(build_state(config).is_err());
    }

    #[tokio::test]
    async fn test_initial_view() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(build_state(config_for(&dir)).unwrap());

        let (status, json) = send(app, Request::get("/").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["result"], Value::Null);
        assert_eq!(json["prevalence"], Value::Null);
        assert_eq!(json["show_chart"], false);
    }

    #[tokio::test]
    async fn test_show_summary() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(build_state(config_for(&dir)).unwrap());

        let (status, json) = send(app, form("show_graph=Show+Graph")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["show_chart"], true);
        assert_eq!(json["prevalence"]["Fever"], 4);
        assert_eq!(json["prevalence"]["Dry-Cough"], 3);
        assert_eq!(json["prevalence"]["Diarrhea"], 1);
    }

    #[tokio::test]
    async fn test_predict() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(build_state(config_for(&dir)).unwrap());

        // Dry-Cough -> Fever has confidence 1.0, Fever -> Dry-Cough 0.75
        let (status, json) = send(
            app,
            form("symptoms=Fever&symptoms=Dry-Cough&age=Age_20-24&gender=Gender_Female&contact=Contact_No&predict=Predict"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["show_chart"], false);
        assert!(json["result"].is_string());
        assert!(json["matched_rules"].as_u64().unwrap() > 0);

        let probability = json["probability"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&probability));
    }

    #[tokio::test]
    async fn test_predict_without_match() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(build_state(config_for(&dir)).unwrap());

        let (_, json) = send(
            app,
            form("symptoms=Loss-of-Taste&age=Age_60%2B&gender=Gender_Female&contact=Contact_No&predict=Predict"),
        )
        .await;
        assert_eq!(json["result"], crate::models::INDETERMINATE_MESSAGE);
        assert_eq!(json["severity"], Value::Null);
    }

    #[tokio::test]
    async fn test_bad_submissions_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(build_state(config_for(&dir)).unwrap());

        for body in ["action=export", "predict=Predict&symptoms=Fever", "%%%"] {
            let (status, json) = send(app.clone(), form(body)).await;
            assert_eq!(status, StatusCode::OK, "body {body}");
            assert_eq!(json["result"], Value::Null, "body {body}");
            assert_eq!(json["show_chart"], false, "body {body}");
        }
    }

    #[tokio::test]
    async fn test_health_and_unknown_route() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(build_state(config_for(&dir)).unwrap());

        let (status, json) = send(app.clone(), Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["records"], 4);

        let (status, _) = send(app, Request::get("/missing").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_payload_serializes_for_presentation() {
        let payload = tokio_test::block_on(handlers::form::index()).0;
        let json = serde_json::to_value(payload).unwrap();
        assert_eq!(json["show_chart"], false);
    }
}
