use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use tasktrack_api::database::manager::DatabaseManager;
use tasktrack_api::handlers;
use tasktrack_api::middleware::jwt_auth_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = tasktrack_api::config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting Tasktrack API in {:?} mode", config.environment);

    // Best effort at startup; /health keeps reporting degraded until the
    // database is reachable and migrated.
    if let Err(e) = DatabaseManager::run_migrations().await {
        tracing::warn!("Could not apply migrations at startup: {}", e);
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("TASKTRACK_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Tasktrack API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes
        .merge(auth_public_routes())
        // Protected API
        .merge(task_routes())
        .merge(profile_routes())
        .merge(session_routes())
        .merge(admin_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_public_routes() -> Router {
    use axum::routing::post;
    use handlers::public::auth;

    Router::new()
        .route("/auth/register", post(auth::register_post))
        .route("/auth/login", post(auth::login_post))
        .route("/auth/refresh", post(auth::refresh_post))
}

fn task_routes() -> Router {
    use handlers::protected::tasks;

    Router::new()
        // Collection operations
        .route("/api/tasks", get(tasks::task_list).post(tasks::task_create))
        // Read-side projections
        .route("/api/tasks/summary", get(tasks::task_summary))
        .route("/api/tasks/statistics", get(tasks::task_statistics))
        // Owner-scoped detail operations
        .route(
            "/api/tasks/:id",
            get(tasks::task_get)
                .put(tasks::task_update)
                .patch(tasks::task_update)
                .delete(tasks::task_delete),
        )
        .route_layer(axum::middleware::from_fn(jwt_auth_middleware))
}

fn profile_routes() -> Router {
    use handlers::protected::profile;

    Router::new()
        .route(
            "/api/profile",
            get(profile::profile_get).patch(profile::profile_patch),
        )
        .route_layer(axum::middleware::from_fn(jwt_auth_middleware))
}

fn session_routes() -> Router {
    use handlers::protected::auth;

    Router::new()
        .route("/api/auth/whoami", get(auth::session_whoami))
        .route_layer(axum::middleware::from_fn(jwt_auth_middleware))
}

fn admin_routes() -> Router {
    use axum::routing::put;
    use handlers::elevated;

    Router::new()
        .route("/api/admin/users/:id/verify", put(elevated::user_verify_put))
        .route_layer(axum::middleware::from_fn(jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Tasktrack API",
            "version": version,
            "description": "Personal task-tracking backend API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/auth/register, /auth/login, /auth/refresh (public - token acquisition)",
                "tasks": "/api/tasks[/:id] (protected)",
                "summary": "/api/tasks/summary, /api/tasks/statistics (protected)",
                "profile": "/api/profile (protected)",
                "whoami": "/api/auth/whoami (protected)",
                "admin": "/api/admin/users/:id/verify (restricted, requires staff)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
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
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                axum::response::Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": "unreachable"
                    }
                })),
            )
        }
    }
}
