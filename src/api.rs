//! HTTP API for the Return Engine.
//!
//! This module exposes the calculator over a small REST API using the
//! [`axum`](https://crates.io/crates/axum) framework.  The bilingual
//! page posts its raw form fields and renders the figures (or errors)
//! it gets back; the language toggle is persisted through the same
//! server.

use crate::engine::{evaluate, evaluate_batch, CalculationRequest};
use crate::error::{CalcError, FieldError};
use crate::locale::{message, Locale, MessageKind};
use crate::models::ReturnResult;
use crate::prefs::{load_locale, save_locale, toggle_locale, JsonFileStore, PreferenceStore};
use crate::present::{render, ResultItem};
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Application state shared across requests.
pub struct AppState {
    pub prefs: Arc<dyn PreferenceStore>,
}

/// Build the API router around the given preference store.  Returns
/// the router and a handle to the state.
pub fn build_router(prefs: Arc<dyn PreferenceStore>) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState { prefs });
    let router = Router::new()
        .route("/api/calculate", post(calculate_handler))
        .route("/api/calculate/batch", post(batch_handler))
        .route("/api/language", get(get_language).put(put_language))
        .route("/api/language/toggle", post(toggle_language))
        .with_state(state.clone());
    (router, state)
}

/// Body of `POST /api/calculate`.
#[derive(Debug, Deserialize)]
pub struct CalculateBody {
    #[serde(flatten)]
    pub request: CalculationRequest,
    /// Overrides the stored language for this response only.
    #[serde(default)]
    pub locale: Option<Locale>,
}

/// Body of `POST /api/calculate/batch`.
#[derive(Debug, Deserialize)]
pub struct BatchBody {
    #[serde(default)]
    pub locale: Option<Locale>,
    pub requests: Vec<CalculationRequest>,
}

/// The outcome of one calculation as sent to the client.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Ok {
        result: ReturnResult,
        items: Vec<ResultItem>,
    },
    /// Per-field failures; the page marks each group.
    Fields { errors: Vec<FieldError> },
    /// A blocking error shown as a single alert.
    Fatal { message: &'static str },
}

impl Outcome {
    fn new(result: Result<ReturnResult, CalcError>, locale: Locale) -> Self {
        match result {
            Ok(result) => {
                let items = render(&result, locale);
                Outcome::Ok { result, items }
            }
            Err(CalcError::InvalidFields(errors)) => Outcome::Fields { errors },
            Err(CalcError::TaxRateOutOfRange) => Outcome::Fatal {
                message: message(locale, MessageKind::TaxRateRange),
            },
            Err(CalcError::UsedAmountNotPositive) => Outcome::Fatal {
                message: message(locale, MessageKind::UsedAmountPositive),
            },
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Outcome::Ok { .. } => StatusCode::OK,
            Outcome::Fields { .. } | Outcome::Fatal { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

#[derive(Debug, Serialize)]
struct CalculateResponse {
    locale: Locale,
    direction: &'static str,
    #[serde(flatten)]
    outcome: Outcome,
}

#[derive(Debug, Serialize, Deserialize)]
struct LanguageBody {
    locale: Locale,
}

#[derive(Debug, Serialize)]
struct LanguageResponse {
    locale: Locale,
    direction: &'static str,
}

impl From<Locale> for LanguageResponse {
    fn from(locale: Locale) -> Self {
        Self {
            locale,
            direction: locale.direction(),
        }
    }
}

fn internal_error(err: anyhow::Error) -> Response {
    error!(error = %err, "request failed");
    let body = Json(serde_json::json!({"error": err.to_string()}));
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}

fn resolve_locale(state: &AppState, requested: Option<Locale>) -> Result<Locale> {
    match requested {
        Some(locale) => Ok(locale),
        None => load_locale(state.prefs.as_ref()),
    }
}

/// Handler for POST /api/calculate
///
/// Fields are evaluated exactly as sent, the same way each batch entry
/// is.
async fn calculate_handler(
    State(app_state): State<Arc<AppState>>,
    Json(body): Json<CalculateBody>,
) -> Response {
    let locale = match resolve_locale(&app_state, body.locale) {
        Ok(locale) => locale,
        Err(err) => return internal_error(err),
    };

    let CalculationRequest { mode, inputs } = body.request;
    let outcome = Outcome::new(evaluate(&inputs, mode, locale), locale);
    let status = outcome.status_code();
    let response = CalculateResponse {
        locale,
        direction: locale.direction(),
        outcome,
    };
    (status, Json(response)).into_response()
}

/// Handler for POST /api/calculate/batch
async fn batch_handler(
    State(app_state): State<Arc<AppState>>,
    Json(body): Json<BatchBody>,
) -> Response {
    let locale = match resolve_locale(&app_state, body.locale) {
        Ok(locale) => locale,
        Err(err) => return internal_error(err),
    };
    let outcomes: Vec<Outcome> = evaluate_batch(body.requests, locale)
        .into_iter()
        .map(|result| Outcome::new(result, locale))
        .collect();
    (StatusCode::OK, Json(outcomes)).into_response()
}

/// Handler for GET /api/language
async fn get_language(State(app_state): State<Arc<AppState>>) -> Response {
    match load_locale(app_state.prefs.as_ref()) {
        Ok(locale) => Json(LanguageResponse::from(locale)).into_response(),
        Err(err) => internal_error(err),
    }
}

/// Handler for PUT /api/language
async fn put_language(
    State(app_state): State<Arc<AppState>>,
    Json(body): Json<LanguageBody>,
) -> Response {
    match save_locale(app_state.prefs.as_ref(), body.locale) {
        Ok(()) => Json(LanguageResponse::from(body.locale)).into_response(),
        Err(err) => internal_error(err),
    }
}

/// Handler for POST /api/language/toggle
async fn toggle_language(State(app_state): State<Arc<AppState>>) -> Response {
    match toggle_locale(app_state.prefs.as_ref()) {
        Ok(locale) => Json(LanguageResponse::from(locale)).into_response(),
        Err(err) => internal_error(err),
    }
}

/// Launch the API server.  The language preference is persisted to
/// `prefs_file`.  Blocks until the server terminates (e.g. when
/// interrupted).
pub async fn serve(addr: &str, prefs_file: PathBuf) -> Result<()> {
    let store = JsonFileStore::new(prefs_file);
    info!(prefs = ?store.path(), "using preference file");
    let (router, _state) = build_router(Arc::new(store));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "server listening");
    axum::serve(listener, router).await?;
    Ok(())
}
