//! HTTP surface: Axum router over the prediction store.
//!
//! CORS is driven by `[cors]` in the config; request spans come from
//! `TraceLayer`.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::HeaderValue,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::{AppConfig, CorsConfig};
use crate::store::PredictionStore;
use routes::{ApiState, AppState};

/// Build shared state from config: seeded store plus the configured snapshot.
pub fn state_from_config(cfg: &AppConfig) -> AppState {
    Arc::new(ApiState::new(
        PredictionStore::seeded(),
        cfg.stats_snapshot(),
        cfg.api.default_limit,
    ))
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/api/health", get(routes::health))
        .route("/api/stats", get(routes::get_stats))
        .route(
            "/api/predictions",
            get(routes::list_predictions).post(routes::create_prediction),
        )
        .route(
            "/api/predictions/:id",
            get(routes::get_prediction)
                .put(routes::update_prediction)
                .delete(routes::delete_prediction),
        )
        .route("/api/sports/:sport/stats", get(routes::get_sport_stats))
        .route("/api/telegram/stats", get(routes::get_telegram_stats))
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(cfg: &CorsConfig) -> CorsLayer {
    let origin = if cfg.allow_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = cfg
            .allow_origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Bind the configured address and serve until Ctrl+C.
pub async fn serve(state: AppState, cfg: &AppConfig) -> Result<()> {
    let addr = cfg.bind_addr()?;
    let app = build_router(state, &cfg.cors);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Prognosis API listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")?;

    info!("Prognosis API shut down cleanly.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn test_app() -> Router {
        build_router(Arc::new(ApiState::sample()), &CorsConfig::default())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_root_endpoint() {
        let (status, json) = get_json(test_app(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Sport Prognosis API");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, json) = get_json(test_app(), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let (status, json) = get_json(test_app(), "/api/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_predictions"], 1247);
        assert_eq!(json["sports_stats"]["hockey"]["predictions"], 285);
    }

    #[tokio::test]
    async fn test_list_hockey() {
        let (status, json) = get_json(test_app(), "/api/predictions?sport=hockey&limit=10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], 1);
        assert_eq!(json["predictions"].as_array().unwrap().len(), 1);
        assert_eq!(json["predictions"][0]["match"], "Rangers vs Bruins");
    }

    async fn status_and_detail(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_list_bad_limit_is_422() {
        for uri in ["/api/predictions?limit=abc", "/api/predictions?limit=-1"] {
            let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let (status, json) = status_and_detail(test_app(), req).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
            assert!(json["detail"].is_string());
        }
    }

    #[tokio::test]
    async fn test_post_malformed_json_is_422() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/predictions")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, json) = status_and_detail(test_app(), req).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json["detail"].is_string());
    }

    #[tokio::test]
    async fn test_post_without_content_type_is_422() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/predictions")
            .body(Body::from(r#"{"sport": "baseball"}"#))
            .unwrap();
        let (status, _) = status_and_detail(test_app(), req).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_get_unknown_prediction() {
        let (status, json) = get_json(test_app(), "/api/predictions/does-not-exist").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["detail"], "Prediction not found");
    }

    #[tokio::test]
    async fn test_put_unknown_prediction() {
        let body = serde_json::json!({
            "sport": "baseball", "match": "A vs B", "prediction": "A wins",
            "confidence": 60, "odds": 1.5, "status": "pending", "date": "2025-04-01"
        });
        let resp = test_app()
            .oneshot(json_request("PUT", "/api/predictions/unknown-id", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["detail"], "Prediction not found");
    }

    #[tokio::test]
    async fn test_post_missing_field_is_422() {
        let body = serde_json::json!({ "sport": "baseball", "match": "A vs B" });
        let resp = test_app()
            .oneshot(json_request("POST", "/api/predictions", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_sport_stats_endpoint() {
        let (status, json) = get_json(test_app(), "/api/sports/hockey/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["stats"]["predictions"], 285);
        assert_eq!(json["stats"]["accuracy"].as_f64(), Some(79.8));
        assert_eq!(json["recent_predictions"][0]["match"], "Rangers vs Bruins");
    }

    #[tokio::test]
    async fn test_sport_stats_unknown() {
        let (status, json) = get_json(test_app(), "/api/sports/curling/stats").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["detail"], "Sport not found");
    }

    #[tokio::test]
    async fn test_telegram_endpoint() {
        let (status, json) = get_json(test_app(), "/api/telegram/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["stats_message"].as_str().unwrap().contains("79.8%"));
        assert_eq!(json["recent_predictions"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let resp = test_app()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/predictions")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_cors_preflight_any_header_and_method() {
        let resp = test_app()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/predictions/some-id")
                    .header(header::ORIGIN, "https://example.com")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,x-request-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let headers = resp.headers();
        assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
        assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(), "*");
        assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(), "*");
    }

    #[tokio::test]
    async fn test_state_from_config_uses_override() {
        let cfg = AppConfig::parse(
            r#"
            [api]
            default_limit = 1
            "#,
        )
        .unwrap();
        let state = state_from_config(&cfg);
        assert_eq!(state.default_limit, 1);
        assert_eq!(state.store.len().await, 4);
        assert_eq!(state.stats.total_predictions, 1247);
    }
}
