use std::net::SocketAddr;

use axum::{
    extract::DefaultBodyLimit,
    handler::Handler,
    middleware as axum_middleware,
    routing::{delete, get, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod auth;
mod config;
mod database;
mod error;
mod handlers;
mod middleware;
mod translator;
mod types;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting kotoba-api in {:?} mode", config.environment);

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("KOTOBA_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("kotoba-api listening on http://{}", bind_addr);

    // ConnectInfo feeds the per-IP rate-limit key
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes (token acquisition)
        .merge(auth_routes())
        // Protected API
        .merge(translation_routes())
        .merge(user_routes())
        // Global middleware
        .layer(DefaultBodyLimit::max(config::config().api.max_request_size_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router {
    use axum::routing::post;
    use handlers::public::auth;

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .layer(axum_middleware::from_fn(middleware::auth_rate_limit))
}

fn translation_routes() -> Router {
    use handlers::protected::translation;

    Router::new()
        // Creation pays upstream tokens, so the POST carries its own budget
        .route(
            "/api/translation",
            get(translation::translation_list).post(
                translation::translation_create
                    .layer(axum_middleware::from_fn(middleware::translate_rate_limit)),
            ),
        )
        .route("/api/translation/history", get(translation::history_list))
        .route(
            "/api/translation/:id",
            get(translation::translation_get).delete(translation::translation_delete),
        )
        .route("/api/translation/:id/favorite", put(translation::favorite_put))
        .route("/api/translation/:id/tags", put(translation::tags_put))
        // Innermost first: jwt -> user validation -> handler
        .layer(axum_middleware::from_fn(middleware::validate_user_middleware))
        .layer(axum_middleware::from_fn(middleware::jwt_auth_middleware))
        .layer(axum_middleware::from_fn(middleware::general_rate_limit))
}

fn user_routes() -> Router {
    use handlers::protected::user;

    Router::new()
        .route(
            "/api/user/profile",
            get(user::profile_get).put(user::profile_update),
        )
        .route("/api/user/preferences", put(user::preferences_update))
        .route("/api/user", delete(user::user_delete))
        .layer(axum_middleware::from_fn(middleware::validate_user_middleware))
        .layer(axum_middleware::from_fn(middleware::jwt_auth_middleware))
        .layer(axum_middleware::from_fn(middleware::general_rate_limit))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "kotoba-api",
            "version": version,
            "description": "Translation assistant backend - tone-aware translations with history, tags and favorites",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/api/auth/register, /api/auth/login, /api/auth/refresh (public - token acquisition)",
                "translation": "/api/translation[/:id], /api/translation/:id/favorite, /api/translation/:id/tags, /api/translation/history (protected)",
                "user": "/api/user/profile, /api/user/preferences, /api/user (protected)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
