use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use uuid::Uuid;

use crate::analysis;
use crate::error::{FieldViolation, ServiceError};
use crate::markdown;
use crate::models::{AccountInput, AnalysisResult};
use crate::store::AnalysisStore;

type SharedStore = Arc<dyn AnalysisStore>;

pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze))
        .route("/api/reports", get(list_reports))
        .route("/api/reports/:id", get(get_report))
        .route("/api/reports/:id/pdf", get(get_report_document))
        .with_state(store)
}

pub async fn serve(store: SharedStore, bind: &str) -> anyhow::Result<()> {
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address {bind}"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on http://{addr}");

    axum::serve(listener, router(store))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match self {
            ServiceError::Validation(violations) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Validation failed", "details": violations })),
            )
                .into_response(),
            ServiceError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Report not found" })),
            )
                .into_response(),
            ServiceError::Internal(err) => {
                tracing::error!("request failed: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

async fn analyze(
    State(store): State<SharedStore>,
    payload: Result<Json<AccountInput>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ServiceError> {
    let Json(input) = payload.map_err(|rejection| {
        ServiceError::Validation(vec![FieldViolation::new("body", rejection.body_text())])
    })?;
    input.validate().map_err(ServiceError::Validation)?;

    let result = analysis::create_analysis(&input);
    store.save(&result).await?;
    tracing::info!(
        id = %result.id,
        account = %result.account_name,
        overall = %result.overall_assessment.level,
        "analysis stored"
    );
    Ok(Json(result))
}

async fn list_reports(
    State(store): State<SharedStore>,
) -> Result<Json<Vec<AnalysisResult>>, ServiceError> {
    Ok(Json(store.list().await?))
}

async fn fetch(store: &dyn AnalysisStore, id: &str) -> Result<AnalysisResult, ServiceError> {
    // An id that does not parse cannot name a stored record.
    let parsed = Uuid::parse_str(id).map_err(|_| ServiceError::NotFound(id.to_string()))?;
    store
        .get(parsed)
        .await?
        .ok_or_else(|| ServiceError::NotFound(id.to_string()))
}

async fn get_report(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisResult>, ServiceError> {
    fetch(store.as_ref(), &id).await.map(Json)
}

async fn get_report_document(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Response, ServiceError> {
    let report = fetch(store.as_ref(), &id).await?;

    let blocks = markdown::parse(&report.markdown_report);
    let html = markdown::render_document(&report.account_name, &blocks);

    let safe_name: String = report
        .account_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let disposition = format!("attachment; filename=\"{safe_name}-diagnostic.html\"");

    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        html,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> (Router, SharedStore) {
        let store: SharedStore = Arc::new(MemoryStore::new());
        (router(store.clone()), store)
    }

    fn analyze_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn account_json(name: &str) -> String {
        json!({
            "accountName": name,
            "accountTenure": "established",
            "teamSize": 4,
            "retainerReality": {
                "scopedHoursPerMonth": 40,
                "actualHoursDelivered": 60,
                "seniorInvolvementFrequency": "frequently",
                "scopeChangeRequests": 6,
                "exceptionHandlingNormalized": true
            },
            "deliveryDrift": {
                "plannedVsReactiveRatio": 45,
                "lastMinuteRequestsPerWeek": 6,
                "missedDeadlinesLast3Months": 4,
                "teamOvertime": "regular",
                "processAdherenceLevel": "weak"
            },
            "clientRisk": {
                "stakeholderAccessibility": "limited",
                "feedbackTone": "mixed",
                "responseTimeToRequests": "slow",
                "scopeCreepBehaviour": "frequent",
                "paymentBehaviour": "delayed",
                "recentEscalations": 3
            }
        })
        .to_string()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn analyze_returns_the_stored_result() {
        let (app, store) = app();
        let response = app
            .oneshot(analyze_request(&account_json("Harbor & Lane")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["accountName"], "Harbor & Lane");
        assert_eq!(body["overallAssessment"]["level"], "high");

        let id = Uuid::parse_str(body["id"].as_str().unwrap()).unwrap();
        assert!(store.get(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn analyze_rejects_out_of_range_fields_with_details() {
        let (app, store) = app();
        let body = account_json("Harbor & Lane").replace("\"teamSize\":4", "\"teamSize\":0");
        let response = app.oneshot(analyze_request(&body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["details"][0]["field"], "teamSize");
        // Nothing was stored for the failed submission.
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn analyze_rejects_malformed_json() {
        let (app, _) = app();
        let response = app.oneshot(analyze_request("{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_report_round_trips_and_unknown_ids_are_404() {
        let (app, _) = app();
        let created = body_json(
            app.clone()
                .oneshot(analyze_request(&account_json("Northwind")))
                .await
                .unwrap(),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/reports/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["id"], *id);

        let missing = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/reports/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let garbled = app
            .oneshot(
                Request::builder()
                    .uri("/api/reports/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(garbled.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_reports_returns_every_record() {
        let (app, _) = app();
        for name in ["A", "B"] {
            app.clone()
                .oneshot(analyze_request(&account_json(name)))
                .await
                .unwrap();
        }

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/reports")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn document_export_is_an_html_attachment() {
        let (app, _) = app();
        let created = body_json(
            app.clone()
                .oneshot(analyze_request(&account_json("Harbor & Lane")))
                .await
                .unwrap(),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/reports/{id}/pdf"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Harbor  Lane-diagnostic.html\""
        );

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("<h1>Account Diagnostic Report: Harbor &amp; Lane</h1>"));
        assert!(html.contains("<h2>Signal Analysis</h2>"));
    }
}
