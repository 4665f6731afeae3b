//! Daybook REST API
//!
//! HTTP API layer for Daybook, built with Axum.
//!
//! # Endpoints
//!
//! ## Diaries (bearer token required)
//! - `POST /api/v1/diaries` - Create an entry
//! - `GET /api/v1/diaries` - List entries
//! - `GET /api/v1/diaries/search?keyword=` - Keyword search
//! - `GET /api/v1/diaries/emotion/:emotion` - Filter by emotion
//! - `GET /api/v1/diaries/date/:date` - Filter by diary date
//! - `GET /api/v1/diaries/stats` - Statistics
//! - `GET /api/v1/diaries/:id` - Get an entry
//! - `PATCH /api/v1/diaries/:id` - Update an entry
//! - `DELETE /api/v1/diaries/:id` - Soft-delete an entry
//!
//! ## Profile (bearer token required)
//! - `GET /api/v1/profile` - Resolved identity
//!
//! ## Weather
//! - `GET /api/v1/weather?lat=&lon=` - Current condition
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use daybook::api::{serve, AppState};
//! use daybook::auth::StaticTokenProvider;
//! use daybook::config::ApiConfig;
//! use daybook::diary::DiaryService;
//! use daybook::store::SqliteDiaryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(SqliteDiaryStore::open("daybook.db".as_ref())?);
//!     let identity = Arc::new(StaticTokenProvider::new([("secret", 1)]));
//!
//!     let state = AppState::new(DiaryService::new(store), identity, ApiConfig::default());
//!     serve(state).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use middleware::AuthUser;
pub use state::AppState;

use axum::{
    http::{HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ApiConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let shared_state = Arc::new(state);

    let owner_routes = Router::new()
        .route(
            "/diaries",
            get(routes::diaries::list_diaries).post(routes::diaries::create_diary),
        )
        .route("/diaries/search", get(routes::diaries::search_diaries))
        .route("/diaries/emotion/:emotion", get(routes::diaries::diaries_by_emotion))
        .route("/diaries/date/:date", get(routes::diaries::diaries_by_date))
        .route("/diaries/stats", get(routes::diaries::diary_stats))
        .route(
            "/diaries/:id",
            get(routes::diaries::get_diary)
                .patch(routes::diaries::update_diary)
                .delete(routes::diaries::delete_diary),
        )
        .route("/profile", get(routes::profile::get_profile))
        .route_layer(from_fn_with_state(
            Arc::clone(&shared_state),
            middleware::require_user,
        ));

    let api_routes = owner_routes.route("/weather", get(routes::weather::current_weather));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let config = Arc::clone(&shared_state.config);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}

/// CORS from configured origins; an empty list allows any origin
fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    if config.cors_origins.is_empty() {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
}

/// Start the API server
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.config.addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Daybook API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Daybook API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenProvider;
    use crate::diary::DiaryService;
    use crate::store::SqliteDiaryStore;
    use crate::weather::WeatherProvider;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::util::ServiceExt;

    const ALICE: &str = "alice-token";
    const BOB: &str = "bob-token";

    struct Sunny;

    #[async_trait]
    impl WeatherProvider for Sunny {
        async fn classify(&self, _lat: f64, _lon: f64) -> String {
            "Clear".to_string()
        }
    }

    fn create_test_app() -> Router {
        let store = Arc::new(SqliteDiaryStore::in_memory().unwrap());
        let identity = Arc::new(StaticTokenProvider::new([(ALICE, 1), (BOB, 2)]));
        let state = AppState::new(
            DiaryService::with_weather(store, Arc::new(Sunny)),
            identity,
            ApiConfig::default(),
        )
        .with_weather(Arc::new(Sunny));

        build_router(state)
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create(app: &Router, token: &str, body: &str) -> Value {
        let response = app
            .clone()
            .oneshot(request("POST", "/api/v1/diaries", Some(token), Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await
    }

    #[tokio::test]
    async fn test_health_live() {
        let app = create_test_app();

        let response = app
            .oneshot(request("GET", "/health/live", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready() {
        let app = create_test_app();

        let response = app
            .oneshot(request("GET", "/health/ready", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let app = create_test_app();

        let response = app
            .oneshot(request("GET", "/health", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["weather"], "enabled");
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let app = create_test_app();

        let response = app
            .oneshot(request("GET", "/api/v1/diaries", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn test_unknown_token_is_unauthorized() {
        let app = create_test_app();

        let response = app
            .oneshot(request("GET", "/api/v1/profile", Some("nope"), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_profile() {
        let app = create_test_app();

        let response = app
            .oneshot(request("GET", "/api/v1/profile", Some(BOB), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["userId"], 2);
    }

    #[tokio::test]
    async fn test_create_diary() {
        let app = create_test_app();

        let body = create(
            &app,
            ALICE,
            r#"{"title":"Morning","content":"Walked the dog","emotion":"happy","diaryDate":"2024-05-01","lat":37.5,"lon":127.0}"#,
        )
        .await;

        assert_eq!(body["title"], "Morning");
        assert_eq!(body["diaryDate"], "2024-05-01");
        assert_eq!(body["userId"], 1);
        assert_eq!(body["weather"], "Clear");
        assert!(body["id"].as_i64().is_some());
    }

    #[tokio::test]
    async fn test_create_diary_validation_error() {
        let app = create_test_app();

        let response = app
            .oneshot(request(
                "POST",
                "/api/v1/diaries",
                Some(ALICE),
                Some(r#"{"title":"","content":"x","emotion":"happy","diaryDate":"2024-13-40"}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        let fields: Vec<&str> = body["error"]["details"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|d| d["field"].as_str())
            .collect();
        assert!(fields.contains(&"title"));
        assert!(fields.contains(&"diaryDate"));
    }

    #[tokio::test]
    async fn test_get_update_delete_lifecycle() {
        let app = create_test_app();

        let created = create(
            &app,
            ALICE,
            r#"{"title":"Draft","content":"first","emotion":"calm","diaryDate":"2024-05-02"}"#,
        )
        .await;
        let id = created["id"].as_i64().unwrap();
        let uri = format!("/api/v1/diaries/{}", id);

        let response = app
            .clone()
            .oneshot(request("PATCH", &uri, Some(ALICE), Some(r#"{"title":"Final"}"#)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = json_body(response).await;
        assert_eq!(updated["title"], "Final");
        assert_eq!(updated["content"], "first");

        let response = app
            .clone()
            .oneshot(request("DELETE", &uri, Some(ALICE), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .clone()
            .oneshot(request("GET", &uri, Some(ALICE), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(request("DELETE", &uri, Some(ALICE), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_other_owner_gets_not_found() {
        let app = create_test_app();

        let created = create(
            &app,
            ALICE,
            r#"{"title":"Private","content":"mine","emotion":"calm","diaryDate":"2024-05-02"}"#,
        )
        .await;
        let uri = format!("/api/v1/diaries/{}", created["id"]);

        let response = app
            .clone()
            .oneshot(request("GET", &uri, Some(BOB), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(request("GET", "/api/v1/diaries", Some(BOB), None))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_and_filters() {
        let app = create_test_app();

        create(
            &app,
            ALICE,
            r#"{"title":"Rainy walk","content":"wet","emotion":"sad","diaryDate":"2024-05-01"}"#,
        )
        .await;
        create(
            &app,
            ALICE,
            r#"{"title":"Picnic","content":"a long walk","emotion":"happy","diaryDate":"2024-05-03"}"#,
        )
        .await;

        let response = app
            .clone()
            .oneshot(request("GET", "/api/v1/diaries/search?keyword=walk", Some(ALICE), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 2);

        let response = app
            .clone()
            .oneshot(request("GET", "/api/v1/diaries/search?keyword=Walk", Some(ALICE), None))
            .await
            .unwrap();
        assert!(json_body(response).await.as_array().unwrap().is_empty());

        let response = app
            .clone()
            .oneshot(request("GET", "/api/v1/diaries/emotion/happy", Some(ALICE), None))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["title"], "Picnic");

        let response = app
            .clone()
            .oneshot(request("GET", "/api/v1/diaries/date/2024-05-01", Some(ALICE), None))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["title"], "Rainy walk");

        let response = app
            .oneshot(request("GET", "/api/v1/diaries/date/not-a-date", Some(ALICE), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stats_route() {
        let app = create_test_app();

        create(
            &app,
            ALICE,
            r#"{"title":"One","content":"x","emotion":"happy","diaryDate":"2024-05-01"}"#,
        )
        .await;

        let response = app
            .oneshot(request("GET", "/api/v1/diaries/stats", Some(ALICE), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["totalDiaries"], 1);
        assert_eq!(body["mostFrequentEmotion"], "happy");
    }

    #[tokio::test]
    async fn test_weather_route() {
        let app = create_test_app();

        let response = app
            .clone()
            .oneshot(request("GET", "/api/v1/weather?lat=37.5&lon=127.0", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["condition"], "Clear");

        let response = app
            .oneshot(request("GET", "/api/v1/weather?lat=99&lon=0", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_weather_route_disabled() {
        let store = Arc::new(SqliteDiaryStore::in_memory().unwrap());
        let identity = Arc::new(StaticTokenProvider::new([(ALICE, 1)]));
        let app = build_router(AppState::new(
            DiaryService::new(store),
            identity,
            ApiConfig::default(),
        ));

        let response = app
            .oneshot(request("GET", "/api/v1/weather?lat=1&lon=1", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_malformed_body_is_validation_error() {
        let app = create_test_app();

        for body in [
            r#"{"title":5,"content":"x","emotion":"happy","diaryDate":"2024-05-01"}"#,
            r#"{"title":"t","content":"x","emotion":"happy","diaryDate":"2024-05-01","mood":1}"#,
            "not json",
        ] {
            let response = app
                .clone()
                .oneshot(request("POST", "/api/v1/diaries", Some(ALICE), Some(body)))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
            let json = json_body(response).await;
            assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
            assert_eq!(json["error"]["details"][0]["field"], "body");
            assert!(json["request_id"].is_string());
        }
    }

    #[tokio::test]
    async fn test_malformed_update_body_is_validation_error() {
        let app = create_test_app();
        let created = create(
            &app,
            ALICE,
            r#"{"title":"t","content":"x","emotion":"calm","diaryDate":"2024-05-01"}"#,
        )
        .await;
        let uri = format!("/api/v1/diaries/{}", created["id"]);

        let response = app
            .oneshot(request("PATCH", &uri, Some(ALICE), Some(r#"{"lat":"north"}"#)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_not_found() {
        let app = create_test_app();

        for (method, body) in [
            ("GET", None),
            ("PATCH", Some(r#"{"title":"x"}"#)),
            ("DELETE", None),
        ] {
            let response = app
                .clone()
                .oneshot(request(method, "/api/v1/diaries/abc", Some(ALICE), body))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method}");
            let json = json_body(response).await;
            assert_eq!(json["error"]["code"], "NOT_FOUND");
        }
    }

    #[tokio::test]
    async fn test_malformed_query_is_validation_error() {
        let app = create_test_app();

        for uri in ["/api/v1/weather?lat=abc&lon=1", "/api/v1/weather?lon=1"] {
            let response = app
                .clone()
                .oneshot(request("GET", uri, None, None))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            let json = json_body(response).await;
            assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
            assert_eq!(json["error"]["details"][0]["field"], "query");
        }
    }

    #[tokio::test]
    async fn test_padded_date_route_is_rejected() {
        let app = create_test_app();

        let response = app
            .oneshot(request("GET", "/api/v1/diaries/date/%202024-05-01", Some(ALICE), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
