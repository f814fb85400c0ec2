use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{CaseFamily, SourceDocument};
use super::service::DossierAnalyzer;

/// Body of an analysis request. A missing `case_type` falls back to the analyzer's default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub case_type: Option<CaseFamily>,
    #[serde(default)]
    pub documents: Vec<SourceDocument>,
}

/// Router exposing dossier analysis over HTTP.
pub fn dossier_router(analyzer: Arc<DossierAnalyzer>) -> Router {
    Router::new()
        .route("/api/v1/dossiers/analyze", post(analyze_handler))
        .with_state(analyzer)
}

pub(crate) async fn analyze_handler(
    State(analyzer): State<Arc<DossierAnalyzer>>,
    axum::Json(request): axum::Json<AnalyzeRequest>,
) -> Response {
    let family = request.case_type.unwrap_or(analyzer.default_family());
    match analyzer.try_analyze(&request.documents, family) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
    }
}
