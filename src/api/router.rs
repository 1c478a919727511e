//! HTTP router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//!
//! Middleware stack (outermost → innermost):
//! 1. CORS (any origin) → 2. Access log

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;
use crate::lookup::LookupClient;

/// Build the service router.
pub fn api_router(core: Arc<CoreState>, lookup: LookupClient) -> Router {
    build_router(ApiContext::new(core, lookup))
}

fn build_router(ctx: ApiContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clients call both `/predict/` and `/predict`.
    Router::new()
        .route("/", get(endpoints::home::welcome))
        .route("/health", get(endpoints::health::check))
        .route("/get_all_symptoms", get(endpoints::symptoms::list))
        .route("/predict/", post(endpoints::predict::predict))
        .route("/predict", post(endpoints::predict::predict))
        .route("/get_data", post(endpoints::lookup::get_data))
        .route("/admin/reload", post(endpoints::admin::reload))
        .route("/admin/snapshot", get(endpoints::admin::snapshot))
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::access_log::log_access))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::collections::HashSet;
    use std::time::Duration;
    use tower::ServiceExt;

    use crate::api::types::PredictResponse;
    use crate::model::{AffinityModel, FactorModel};
    use crate::pipeline::recommend::RankOptions;
    use crate::pipeline::recommend::scorer::tests::BrokenModel;
    use crate::reference::ReferenceDataset;

    const CSV: &str = "\
symptom,syd,did,diagnose_index,diagnose,wei
fever,1,10,0,flu,0.9
cough,2,10,0,flu,0.5
cough,2,11,1,bronchitis,0.4
rash,3,12,2,measles,0.8
Fever,1,13,3,malaria,0.3
";

    const MODEL: &str = r#"{"rank": 2,
        "symptom_factors": [
            {"id": 1, "features": [1.0, 0.0]},
            {"id": 2, "features": [0.5, 0.5]},
            {"id": 3, "features": [0.0, 1.0]}
        ],
        "diagnosis_factors": [
            {"id": 10, "features": [0.9, 0.1]},
            {"id": 11, "features": [0.2, 0.6]},
            {"id": 12, "features": [0.1, 0.9]}
        ]}"#;

    fn dead_lookup() -> LookupClient {
        LookupClient::new(
            "http://127.0.0.1:9/icd9",
            "http://127.0.0.1:9/medlineplus",
            Duration::from_millis(200),
        )
        .unwrap()
    }

    fn core_with(model: Arc<dyn AffinityModel>) -> Arc<CoreState> {
        let dataset = ReferenceDataset::from_reader(CSV.as_bytes()).unwrap();
        Arc::new(CoreState::from_parts(dataset, model, RankOptions::default()))
    }

    fn test_app() -> Router {
        let model: Arc<dyn AffinityModel> = Arc::new(FactorModel::from_json(MODEL).unwrap());
        api_router(core_with(model), dead_lookup())
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 65536)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn home_returns_banner() {
        let response = test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"Welcome to HealthRecAPI");
    }

    #[tokio::test]
    async fn all_symptoms_are_distinct() {
        let response = test_app()
            .oneshot(Request::builder().uri("/get_all_symptoms").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        let list: Vec<String> = serde_json::from_value(json).unwrap();
        let unique: HashSet<_> = list.iter().collect();
        assert_eq!(list.len(), unique.len());
        assert_eq!(list, vec!["fever", "cough", "rash", "Fever"]);
    }

    #[tokio::test]
    async fn predict_fever_and_cough() {
        let response = test_app()
            .oneshot(post_json("/predict/", r#"{"symptoms": ["Fever ", "cough"]}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["message"], "Success");
        assert_eq!(json["value_input"], serde_json::json!(["Fever ", "cough"]));
        assert!(json.get("error").is_none());

        let result = json["result"].as_array().unwrap();
        // fever→flu 0.9, cough→flu 0.5, cough→bronchitis 0.4, fever→malaria (OOV)
        assert_eq!(result.len(), 3);
        assert_eq!(result[0]["diagnose"], "flu");
        let scores: Vec<f64> = result.iter().map(|r| r["prediction"].as_f64().unwrap()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn predict_without_trailing_slash() {
        let response = test_app()
            .oneshot(post_json("/predict", r#"{"symptoms": ["rash"]}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let parsed: PredictResponse = serde_json::from_value(response_json(response).await).unwrap();
        assert_eq!(parsed.result[0].diagnose, "measles");
    }

    #[tokio::test]
    async fn predict_empty_symptoms_is_validation_error() {
        let response = test_app()
            .oneshot(post_json("/predict/", r#"{"symptoms": []}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["message"], "Error");
        assert_eq!(json["error"], "No symptoms provided");
        assert_eq!(json["result"], serde_json::json!([]));
        assert_eq!(json["value_input"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn predict_missing_field_is_validation_error() {
        let response = test_app().oneshot(post_json("/predict/", "{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response_json(response).await["message"], "Error");
    }

    #[tokio::test]
    async fn predict_malformed_body_keeps_shape() {
        let response = test_app()
            .oneshot(post_json("/predict/", r#"{"symptoms": "fever"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["message"], "Error");
        assert_eq!(json["value_input"], serde_json::json!([]));
        assert_eq!(json["error"], "Invalid request body");
    }

    #[tokio::test]
    async fn predict_unknown_symptom_is_empty_success() {
        let response = test_app()
            .oneshot(post_json("/predict/", r#"{"symptoms": ["nonexistent_symptom_xyz"]}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["message"], "Success");
        assert_eq!(json["result"], serde_json::json!([]));
        assert_eq!(json["value_input"], serde_json::json!(["nonexistent_symptom_xyz"]));
    }

    #[tokio::test]
    async fn predict_model_failure_is_sanitized() {
        let app = api_router(core_with(Arc::new(BrokenModel)), dead_lookup());
        let response = app
            .oneshot(post_json("/predict/", r#"{"symptoms": ["fever"]}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json["message"], "Error");
        assert_eq!(json["error"], "Prediction model unavailable");
        assert_eq!(json["value_input"], serde_json::json!(["fever"]));
        assert!(!json["error"].as_str().unwrap().contains("unreachable"));
    }

    #[tokio::test]
    async fn get_data_requires_term() {
        let response = test_app().oneshot(post_json("/get_data", "{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response_json(response).await["error"], "No search term provided");
    }

    #[tokio::test]
    async fn get_data_upstream_down_is_502() {
        let response = test_app()
            .oneshot(post_json("/get_data", r#"{"term": "flu"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn get_data_against_stub() {
        let addr = crate::lookup::client::tests::spawn_stub().await;
        let model: Arc<dyn AffinityModel> = Arc::new(FactorModel::from_json(MODEL).unwrap());
        let app = api_router(core_with(model), crate::lookup::client::tests::stub_client(addr));

        let response = app
            .clone()
            .oneshot(post_json("/get_data", r#"{"term": "flu"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json[0]["icd9_code"], "4871");
        assert_eq!(json[0]["medlineplus_data"]["title"], "MedlinePlus Connect");

        let response = app
            .oneshot(post_json("/get_data", r#"{"term": "zzz"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response_json(response).await["error"],
            "No ICD-9 codes found for 'zzz'"
        );
    }

    #[tokio::test]
    async fn health_reports_generation() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["generation"], 1);
    }

    #[tokio::test]
    async fn reload_without_sources_is_internal_error() {
        let response = test_app()
            .oneshot(post_json("/admin/reload", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response_json(response).await["error"], "An internal error occurred");
    }

    #[tokio::test]
    async fn snapshot_summary_describes_state() {
        let response = test_app()
            .oneshot(Request::builder().uri("/admin/snapshot").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["rows"], 5);
        assert_eq!(json["model"]["rank"], 2);
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let request = Request::builder()
            .uri("/get_all_symptoms")
            .header("Origin", "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = test_app()
            .oneshot(Request::builder().uri("/nonexistent").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
