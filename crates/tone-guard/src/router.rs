use std::sync::Arc;

use axum::extract::{rejection::JsonRejection, State};
use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::analysis::{Dimension, ToneAnalysis, ToneError};
use crate::error::AppError;
use crate::rewrite::{RephraseOutcome, RewriteOutcome};
use crate::service::ToneService;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct RewriteRequest {
    pub text: String,
    #[serde(default)]
    pub item_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RephraseRequest {
    pub user_input: String,
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub improve_toxicity: bool,
    #[serde(default)]
    pub improve_empathy: bool,
    #[serde(default)]
    pub improve_politeness: bool,
    #[serde(default)]
    pub improve_prosocial: bool,
}

impl RephraseRequest {
    pub fn goals(&self) -> Vec<Dimension> {
        [
            (self.improve_toxicity, Dimension::Toxicity),
            (self.improve_empathy, Dimension::Empathy),
            (self.improve_politeness, Dimension::Politeness),
            (self.improve_prosocial, Dimension::Prosocial),
        ]
        .into_iter()
        .filter_map(|(wanted, dimension)| wanted.then_some(dimension))
        .collect()
    }
}

/// Response body carrying the caller's correlation id next to the outcome fields.
#[derive(Debug, Serialize)]
pub struct Tagged<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(flatten)]
    pub outcome: T,
}

/// Router builder exposing the analysis and rewriting endpoints.
pub fn tone_router(service: Arc<ToneService>) -> Router {
    Router::new()
        .route("/api/v1/analyze", post(analyze_handler))
        .route("/api/v1/rewrite", post(rewrite_handler))
        .route("/api/v1/rephrase", post(rephrase_handler))
        .with_state(service)
}

async fn run_blocking<T, F>(service: Arc<ToneService>, job: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&ToneService) -> Result<T, ToneError> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || job(&service)).await?;
    Ok(result?)
}

pub(crate) async fn analyze_handler(
    State(service): State<Arc<ToneService>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<ToneAnalysis>, AppError> {
    let Json(request) = payload?;
    let analysis = run_blocking(service, move |service| service.analyze(&request.text)).await?;
    Ok(Json(analysis))
}

pub(crate) async fn rewrite_handler(
    State(service): State<Arc<ToneService>>,
    payload: Result<Json<RewriteRequest>, JsonRejection>,
) -> Result<Json<Tagged<RewriteOutcome>>, AppError> {
    let Json(request) = payload?;
    let RewriteRequest { text, item_id } = request;
    let outcome = run_blocking(service, move |service| service.run_rewrite_session(&text)).await?;
    Ok(Json(Tagged { item_id, outcome }))
}

pub(crate) async fn rephrase_handler(
    State(service): State<Arc<ToneService>>,
    payload: Result<Json<RephraseRequest>, JsonRejection>,
) -> Result<Json<Tagged<RephraseOutcome>>, AppError> {
    let Json(request) = payload?;
    let goals = request.goals();
    let RephraseRequest {
        user_input,
        item_id,
        ..
    } = request;
    let outcome =
        run_blocking(service, move |service| service.rephrase(&user_input, &goals)).await?;
    Ok(Json(Tagged { item_id, outcome }))
}
