use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod auth;
mod config;
mod database;
mod error;
mod handlers;
mod middleware;

use config::AppConfig;

/// Shared application state: connection pool plus immutable-after-init config.
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::SqlitePool,
    pub config: Arc<AppConfig>,
}

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();

    let pool = database::connect(&config.database)
        .await
        .unwrap_or_else(|e| panic!("failed to open database {}: {}", config.database.url, e));

    let state = AppState {
        pool,
        config: Arc::new(config),
    };

    let bind_addr = format!("0.0.0.0:{}", state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("tunevault listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.expect("server");
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        // Protected collections
        .merge(collection_routes(&state))
        // Admin console
        .merge(admin_routes(&state))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

fn collection_routes(state: &AppState) -> Router<AppState> {
    use handlers::protected::{albums, artists, playlists};

    Router::new()
        .route("/artists", get(artists::list).post(artists::create))
        .route(
            "/artists/:id",
            get(artists::show).put(artists::update).delete(artists::remove),
        )
        .route("/albums", get(albums::list).post(albums::create))
        .route(
            "/albums/:id",
            get(albums::show).put(albums::update).delete(albums::remove),
        )
        .route("/playlists", get(playlists::list).post(playlists::create))
        .route(
            "/playlists/:id",
            get(playlists::show)
                .put(playlists::update)
                .delete(playlists::remove),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::jwt_auth,
        ))
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    use handlers::admin;

    Router::new()
        .route("/admin/users", get(admin::users::list_all))
        .route("/admin/users/:id", delete(admin::users::remove))
        .route("/admin/users/:id/promote", put(admin::users::promote))
        .route("/admin/users/:id/demote", put(admin::users::demote))
        .route("/admin/artists", get(admin::artists::list_all))
        .route("/admin/artists/:id", delete(admin::artists::remove))
        // Layer order: auth is added last so it runs first, then the role gate
        .route_layer(axum_middleware::from_fn(middleware::require_admin))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::jwt_auth,
        ))
}

async fn root() -> axum::response::Json<serde_json::Value> {
    axum::response::Json(json!({
        "name": "tunevault",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Personal music collection REST API",
        "endpoints": {
            "home": "/ (public)",
            "auth": "/register, /login (public - account + token acquisition)",
            "artists": "/artists[/:id] (protected)",
            "albums": "/albums[/:id] (protected)",
            "playlists": "/playlists[/:id] (protected)",
            "admin": "/admin/* (admin role required)",
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "healthy",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
