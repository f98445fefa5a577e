//! # Roulette Server
//!
//! Thin proxy between the spin client and the external user directory.
//!
//!
//!
//! # Routes
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | GET | `/api/random-user?fid=N` | profile JSON, 400 / 404 / 500 on failure |
//! | POST | `/api/webhook` | logs the JSON body, `{"success": true}` |
//! | GET | `/api/webhook` | liveness marker |
//!
//! The proxy is stateless. Every `/api/random-user` call is one upstream request, the
//! client owns retries and cooldown.
//!
//!
//!
//! # Configuration
//!
//! | Variable | Default |
//! |----------|---------|
//! | `RUST_PORT` | `1111` |
//! | `NEYNAR_API_URL` | `https://api.neynar.com` |
//! | `NEYNAR_API_KEY` | `/run/secrets/NEYNAR_API_KEY`, env, then the demo key |
//! | `UPSTREAM_TIMEOUT_MS` | `10000` |
//!
//! Logging follows `RUST_LOG`.
//! ```sh
//! RUST_LOG=info cargo run -p roulette
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod utils;

use config::Config;
use routes::{random_user_handler, webhook_handler, webhook_status_handler};
use state::State;

pub fn app(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/random-user", get(random_user_handler))
        .route(
            "/api/webhook",
            get(webhook_status_handler).post(webhook_handler),
        )
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new(Config::load()).expect("Failed to build HTTP client");

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    let app = app(state);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .expect("Failed to bind address");
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    info!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use axum::{
        Json,
        body::Body,
        extract::{self, Query},
        http::{Request, StatusCode},
        response::{IntoResponse, Response},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    async fn bulk(
        extract::State(calls): extract::State<Arc<AtomicUsize>>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Response {
        calls.fetch_add(1, Ordering::SeqCst);

        match params.get("fids").map(String::as_str) {
            Some("123") => Json(json!({
                "users": [{
                    "fid": 123,
                    "username": "abc",
                    "display_name": "Abc",
                    "pfp_url": "u",
                    "profile": { "bio": { "text": "hi" } },
                    "follower_count": 5,
                    "following_count": 2
                }]
            }))
            .into_response(),
            Some("500") => StatusCode::BAD_GATEWAY.into_response(),
            _ => Json(json!({ "users": [] })).into_response(),
        }
    }

    async fn test_app_counting() -> (Router, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let upstream = Router::new()
            .route("/v2/farcaster/user/bulk", get(bulk))
            .with_state(calls.clone());

        tokio::spawn(async move {
            axum::serve(listener, upstream).await.unwrap();
        });

        let config = Config {
            port: 0,
            directory_url: format!("http://{address}"),
            directory_key: "test-key".to_string(),
            upstream_timeout: Duration::from_secs(5),
        };

        (app(State::new(config).unwrap()), calls)
    }

    async fn test_app() -> Router {
        test_app_counting().await.0
    }

    async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_random_user_found() {
        let (status, body) = call(test_app().await, get_request("/api/random-user?fid=123")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "fid": 123,
                "username": "abc",
                "displayName": "Abc",
                "pfpUrl": "u",
                "bio": "hi",
                "followerCount": 5,
                "followingCount": 2
            })
        );
    }

    #[tokio::test]
    async fn test_random_user_not_found() {
        let (status, body) =
            call(test_app().await, get_request("/api/random-user?fid=999999")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "User not found" }));
    }

    #[tokio::test]
    async fn test_random_user_upstream_failure() {
        let (status, body) = call(test_app().await, get_request("/api/random-user?fid=500")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to fetch user data" }));
    }

    #[tokio::test]
    async fn test_random_user_rejects_bad_fid_without_upstream_call() {
        let (app, calls) = test_app_counting().await;

        let (missing, missing_body) = call(app.clone(), get_request("/api/random-user")).await;
        let (invalid, _) = call(app, get_request("/api/random-user?fid=abc")).await;

        assert_eq!(missing, StatusCode::BAD_REQUEST);
        assert_eq!(missing_body, json!({ "error": "FID is required" }));
        assert_eq!(invalid, StatusCode::BAD_REQUEST);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_random_user_odd_query_answers_json() {
        let (app, calls) = test_app_counting().await;

        let (repeated, repeated_body) =
            call(app.clone(), get_request("/api/random-user?fid=abc&fid=1x")).await;
        let (stray, stray_body) = call(app, get_request("/api/random-user?fid=%zz&other")).await;

        assert_eq!(repeated, StatusCode::BAD_REQUEST);
        assert_eq!(repeated_body, json!({ "error": "Invalid FID" }));
        assert_eq!(stray, StatusCode::BAD_REQUEST);
        assert_eq!(stray_body, json!({ "error": "Invalid FID" }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_webhook() {
        let app = test_app().await;

        let (status, body) = call(
            app.clone(),
            Request::builder()
                .method(Method::POST)
                .uri("/api/webhook")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"event":"frame_added"}"#))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));

        let (status, body) = call(app.clone(), get_request("/api/webhook")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "Webhook endpoint active" }));

        let (status, _) = call(
            app,
            Request::builder()
                .method(Method::POST)
                .uri("/api/webhook")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
