use super::common::*;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::dossier::router::analyze_handler;
use crate::workflows::dossier::{dossier_router, AnalyzeRequest, CaseFamily};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

fn post(payload: Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post("/api/v1/dossiers/analyze")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(&payload).expect("payload serializes"),
        ))
        .expect("request builds")
}

#[tokio::test]
async fn analyze_route_returns_report() {
    let router = dossier_router(Arc::new(analyzer()));
    let payload = json!({
        "case_type": "PC",
        "documents": complete_small_dossier(),
    });

    let response = router.oneshot(post(payload)).await.expect("route responds");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["case_type"], "PC");
    assert_eq!(body["total_documents"], 9);
    assert_eq!(body["conformity_score"], 100.0);
    assert_eq!(body["project_info"]["surface_m2"], 205.0);
}

#[tokio::test]
async fn case_type_defaults_to_construction() {
    let router = dossier_router(Arc::new(analyzer()));
    let payload = json!({
        "documents": [{ "filename": "pa2.pdf", "text": "PA2 NOTICE" }],
    });

    let response = router.oneshot(post(payload)).await.expect("route responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["case_type"], "PC");
    assert_eq!(body["missing_documents"][0], "PC1");
}

#[tokio::test]
async fn empty_dossier_is_a_bad_request() {
    let response = analyze_handler(
        State(Arc::new(analyzer())),
        axum::Json(AnalyzeRequest {
            case_type: Some(CaseFamily::Subdivision),
            documents: Vec::new(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "dossier contains no documents");
}

#[tokio::test]
async fn unknown_case_type_is_rejected() {
    let router = dossier_router(Arc::new(analyzer()));
    let payload = json!({
        "case_type": "DP",
        "documents": [{ "filename": "a.pdf", "text": "" }],
    });

    let response = router.oneshot(post(payload)).await.expect("route responds");
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn configured_default_family_applies_without_case_type() {
    let analyzer = analyzer().with_default_family(CaseFamily::Subdivision);
    let response = analyze_handler(
        State(Arc::new(analyzer)),
        axum::Json(AnalyzeRequest {
            case_type: None,
            documents: vec![source("pa2.pdf", "PA2 NOTICE")],
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["case_type"], "PA");
    assert_eq!(body["conforming_documents"][0]["document_type"], "PA2");
}
