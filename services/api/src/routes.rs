use crate::infra::AppState;
use aqua_verify::error::AppError;
use aqua_verify::workflows::dossier::{
    dossier_router, CaseFamily, DocumentType, DossierAnalyzer, DossierError,
    SMALL_PROJECT_THRESHOLD_M2,
};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct PieceView {
    pub(crate) code: &'static str,
    pub(crate) label: &'static str,
}

impl From<DocumentType> for PieceView {
    fn from(document_type: DocumentType) -> Self {
        Self {
            code: document_type.code(),
            label: document_type.label(),
        }
    }
}

/// Pieces a dossier of one family is checked against.
#[derive(Debug, Serialize)]
pub(crate) struct RequirementsResponse {
    pub(crate) case_type: CaseFamily,
    pub(crate) label: &'static str,
    pub(crate) required_documents: Vec<PieceView>,
    pub(crate) critical_documents: Vec<PieceView>,
    pub(crate) site_layout: PieceView,
    pub(crate) small_project_threshold_m2: f64,
}

pub(crate) fn with_dossier_routes(analyzer: Arc<DossierAnalyzer>) -> axum::Router {
    dossier_router(analyzer)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/dossiers/requirements/:case_type",
            axum::routing::get(requirements_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn requirements_endpoint(
    Path(case_type): Path<String>,
) -> Result<Json<RequirementsResponse>, AppError> {
    let family = case_type
        .parse::<CaseFamily>()
        .map_err(DossierError::from)?;

    Ok(Json(RequirementsResponse {
        case_type: family,
        label: family.label(),
        required_documents: family
            .required_documents()
            .iter()
            .copied()
            .map(PieceView::from)
            .collect(),
        critical_documents: family
            .critical_documents()
            .into_iter()
            .map(PieceView::from)
            .collect(),
        site_layout: family.site_layout().into(),
        small_project_threshold_m2: SMALL_PROJECT_THRESHOLD_M2,
    }))
}
