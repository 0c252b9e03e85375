//! API routes and handlers

mod directions;
mod health;
mod models;
mod page;
mod quality;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the main router: the demo page at `/` and the JSON API under `/v1`
pub fn create_router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/directions", get(directions::list_directions))
        .route("/quality", post(quality::estimate))
        .route("/models", get(models::list_models))
        .route("/models/:name", get(models::get_model_info));

    Router::new()
        .route("/", get(page::index))
        .nest("/v1", v1_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::time::Duration;
    use tower::ServiceExt;
    use transquest_core::EngineConfig;

    use crate::testing::test_state;

    fn test_router() -> Router {
        create_router(test_state(EngineConfig::default(), Duration::ZERO))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn quality_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/v1/quality")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn quality_endpoint_returns_aligned_tokens() {
        let response = test_router()
            .oneshot(quality_request(serde_json::json!({
                "direction": "en-de",
                "source": "Welcome",
                "target": "Herzlich willkommen"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["hter_display"], "0.33");
        assert_eq!(json["hter"], 0.33);
        assert_eq!(json["target_tokens"][0]["text"], "<GAP>");
        assert_eq!(json["target_tokens"][1]["text"], "Herzlich");
        assert_eq!(json["target_tokens"][1]["color"], "rgb(255, 204, 203)");
        assert_eq!(json["target_tokens"][3]["text"], "willkommen");
    }

    #[tokio::test]
    async fn unknown_direction_is_bad_request() {
        let response = test_router()
            .oneshot(quality_request(serde_json::json!({
                "direction": "fr-en",
                "source": "a",
                "target": "b"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["type"], "invalid_request_error");
    }

    #[tokio::test]
    async fn unloaded_direction_is_bad_request() {
        let response = test_router()
            .oneshot(quality_request(serde_json::json!({
                "direction": "en-zh",
                "source": "Welcome",
                "target": "欢迎"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn directions_report_load_state() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/v1/directions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let json = body_json(response).await;
        let directions = json["directions"].as_array().unwrap();
        assert_eq!(directions.len(), 3);
        assert_eq!(directions[0]["direction"], "en-de");
        assert_eq!(directions[0]["loaded"], true);
        assert_eq!(directions[2]["direction"], "multilingual");
        assert_eq!(directions[2]["loaded"], false);
        assert_eq!(directions[2]["word_model"], "en_zh");
    }

    #[tokio::test]
    async fn unknown_model_is_not_found() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/v1/models/fr_en")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn models_list_covers_catalog() {
        let response = test_router()
            .oneshot(Request::builder().uri("/v1/models").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let json = body_json(response).await;
        let models = json["models"].as_array().unwrap();
        assert_eq!(models.len(), 4);
        assert_eq!(models[0]["name"], "en_de");
        assert_eq!(models[0]["status"], "not_downloaded");
    }

    #[tokio::test]
    async fn index_renders_default_example() {
        let response = test_router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Herzlich willkommen</textarea>"));
        assert!(html.contains("<strong>0.33</strong>"));
    }
}
