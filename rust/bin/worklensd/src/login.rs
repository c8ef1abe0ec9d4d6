//! Root login endpoint — verifies password against argon2id hash,
//! issues a JWT usable as Bearer token or `wl_token` cookie.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use crate::auth_middleware::Claims;
use crate::bootstrap::verify_root_password;
use crate::routes::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/login", post(login_handler))
        .with_state(state)
}

async fn login_handler(
    State(state): State<AppState>,
    axum::Json(body): axum::Json<LoginRequest>,
) -> axum::response::Response {
    if body.username != "root" {
        // Member accounts live outside this deployment; only the root
        // editor account logs in here.
        return (
            StatusCode::UNAUTHORIZED,
            axum::Json(serde_json::json!({ "error": "invalid credentials" })),
        )
            .into_response();
    }

    let config = &state.server_config;
    if !verify_root_password(&body.password, &config.root.password_hash) {
        return (
            StatusCode::UNAUTHORIZED,
            axum::Json(serde_json::json!({ "error": "invalid credentials" })),
        )
            .into_response();
    }

    let now = chrono::Utc::now().timestamp();
    let expire_secs = config.jwt.expire_secs;
    let claims = Claims {
        sub: "root".to_string(),
        name: "Root".to_string(),
        sid: worklens_core::new_id(),
        iat: now,
        exp: now + expire_secs as i64,
    };

    let token = match encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt.secret.as_bytes()),
    ) {
        Ok(t) => t,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    axum::Json(LoginResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: expire_secs,
    })
    .into_response()
}
