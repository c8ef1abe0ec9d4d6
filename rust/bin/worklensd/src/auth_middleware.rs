//! JWT authentication middleware.
//!
//! Pages on this site are public; a token only upgrades the viewer
//! from Preview to Full access. The middleware therefore never fails
//! a request over a missing or invalid token — it validates what is
//! there (Bearer header or `wl_token` cookie) and attaches `Claims`
//! plus a [`Viewer`] to the request extensions. Admin routes check
//! for the claims themselves.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use worklens_reviews::api::Viewer;
use worklens_reviews::model::AccessLevel;

/// Cookie carrying the access token for page views.
pub const TOKEN_COOKIE: &str = "wl_token";

/// JWT claims payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id ("root" for the superadmin).
    pub sub: String,
    /// Display name.
    pub name: String,
    /// Session id.
    pub sid: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

impl Claims {
    pub fn is_root(&self) -> bool {
        self.sub == "root"
    }
}

/// Shared JWT configuration for the middleware.
#[derive(Clone)]
pub struct JwtState {
    pub decoding_key: DecodingKey,
    pub validation: Validation,
}

/// Error for endpoints that do require authentication (admin).
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    PermissionDenied(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            AuthError::MissingToken => {
                (StatusCode::UNAUTHORIZED, "missing or invalid token".to_string())
            }
            AuthError::PermissionDenied(e) => {
                (StatusCode::FORBIDDEN, format!("permission denied: {}", e))
            }
        };
        let body = serde_json::json!({ "error": msg });
        (status, axum::Json(body)).into_response()
    }
}

/// Middleware: validate a token when present, attach claims + viewer.
pub async fn auth_middleware(
    State(jwt_state): State<Arc<JwtState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(claims) = extract_claims(&request, &jwt_state) {
        request.extensions_mut().insert(Viewer { access: AccessLevel::Full });
        request.extensions_mut().insert(claims);
    }
    next.run(request).await
}

fn extract_claims(request: &Request, jwt_state: &JwtState) -> Option<Claims> {
    let token = bearer_token(request).or_else(|| cookie_token(request))?;
    match jsonwebtoken::decode::<Claims>(&token, &jwt_state.decoding_key, &jwt_state.validation) {
        Ok(data) => Some(data.claims),
        Err(e) => {
            debug!("ignoring invalid token: {}", e);
            None
        }
    }
}

fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

fn cookie_token(request: &Request) -> Option<String> {
    let cookies = request.headers().get("cookie")?.to_str().ok()?;
    cookie_value(cookies, TOKEN_COOKIE)
}

/// Pull one cookie value out of a `Cookie:` header.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        if k.trim() == name {
            Some(v.trim().to_string())
        } else {
            None
        }
    })
}

/// Require root claims on an admin endpoint.
pub fn require_root(claims: Option<&Claims>) -> Result<(), AuthError> {
    match claims {
        None => Err(AuthError::MissingToken),
        Some(c) if c.is_root() => Ok(()),
        Some(c) => Err(AuthError::PermissionDenied(format!(
            "user {} is not root",
            c.sub
        ))),
    }
}
