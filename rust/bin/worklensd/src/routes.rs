//! Route registration — pages, API modules, system + admin endpoints.

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::{get, post};

use worklens_geo::GeoDb;
use worklens_i18n::Catalog;
use worklens_reviews::service::ReviewService;

use crate::auth_middleware::{self, Claims, JwtState, require_root};
use crate::config::ServerConfig;
use crate::locale_middleware;
use crate::login;
use crate::pages;

/// Application shared state.
#[derive(Clone)]
pub struct AppState {
    pub server_config: Arc<ServerConfig>,
    pub jwt_state: Arc<JwtState>,
    pub catalog: Arc<Catalog>,
    pub geo: Arc<GeoDb>,
    pub reviews: Arc<ReviewService>,
}

/// Build the complete router with all routes.
pub fn build_router(state: AppState, module_routes: Vec<(&str, Router)>) -> Router {
    let jwt_state = state.jwt_state.clone();
    let geo = state.geo.clone();

    // Server-rendered pages + admin endpoints (need AppState).
    let site = Router::new()
        .route("/", get(pages::home))
        .route("/companies", get(pages::companies))
        .route("/companies/{slug}", get(pages::company))
        .route("/companies/{slug}/reviews", get(pages::company_reviews))
        .route("/admin/i18n/reload", post(reload_i18n))
        .fallback(pages::not_found)
        .with_state(state.clone());

    let mut app: Router<()> = site
        .merge(login::routes(state))
        .merge(system_routes());

    // Mount each module's JSON API under /api.
    // Module routers are already Router<()> (they called .with_state()).
    for (_name, router) in module_routes {
        app = app.nest("/api", router);
    }

    // Locale resolution runs outermost so every handler sees it;
    // token validation is independent and never rejects page loads.
    app.layer(middleware::from_fn_with_state(
        jwt_state,
        auth_middleware::auth_middleware,
    ))
    .layer(middleware::from_fn_with_state(
        geo,
        locale_middleware::locale_middleware,
    ))
}

fn system_routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "worklensd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// POST /admin/i18n/reload — atomically swap the translation catalog.
/// Root only.
async fn reload_i18n(
    axum::extract::State(state): axum::extract::State<AppState>,
    claims: Option<axum::Extension<Claims>>,
) -> axum::response::Response {
    if let Err(e) = require_root(claims.as_ref().map(|ext| &ext.0)) {
        return e.into_response();
    }
    let report = state.catalog.reload();
    axum::Json(serde_json::json!({
        "entries": report.total_entries(),
        "languages": report.loaded.len(),
        "errors": report
            .errors
            .iter()
            .map(|(lang, msg)| serde_json::json!({"lang": lang.as_str(), "error": msg}))
            .collect::<Vec<_>>(),
    }))
    .into_response()
}
