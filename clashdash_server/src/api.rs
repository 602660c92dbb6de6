// HTTP routes for the CWL clan endpoints.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use clashdash_lib::{AggregationError, Aggregator, RosterRow};

// ── Request types ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ClansParams {
    /// `?all=true` bypasses the capacity filter.
    #[serde(default)]
    pub all: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibleRequest {
    pub sheet_data: RosterRow,
}

// ── Router ────────────────────────────────────────────────────────────

pub fn router(aggregator: Arc<Aggregator>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/cwl/clans", get(cwl_clans))
        .route("/cwl/clans/{tag}/eligible", post(clan_eligible))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(aggregator)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": "clashdash" }))
}

async fn cwl_clans(
    State(aggregator): State<Arc<Aggregator>>,
    Query(params): Query<ClansParams>,
) -> impl IntoResponse {
    let all = params.all.unwrap_or(false);
    let result = if all {
        aggregator.all_clans().await
    } else {
        aggregator.filtered_clans().await
    };
    match result {
        Ok(clans) => {
            let mut body = json!({ "count": clans.len(), "clans": clans });
            if all {
                body["filtered"] = json!(false);
            }
            (StatusCode::OK, Json(body))
        }
        Err(err) => error_response(err),
    }
}

async fn clan_eligible(
    State(aggregator): State<Arc<Aggregator>>,
    Path(tag): Path<String>,
    Json(req): Json<EligibleRequest>,
) -> impl IntoResponse {
    match aggregator.eligibility_report(&tag, &req.sheet_data).await {
        Ok(report) => (StatusCode::OK, Json(json!(report))),
        Err(err) => error_response(err),
    }
}

fn error_response(err: AggregationError) -> (StatusCode, Json<serde_json::Value>) {
    let status = match &err {
        AggregationError::NoRosterData | AggregationError::NoLiveData => StatusCode::NOT_FOUND,
        AggregationError::Api(api) if api.is_not_found() => StatusCode::NOT_FOUND,
        AggregationError::Api(_) | AggregationError::Roster(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::error!("request failed: {}", err);
    (status, Json(json!({ "error": err.to_string() })))
}
