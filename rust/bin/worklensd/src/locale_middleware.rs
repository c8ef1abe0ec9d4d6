//! Per-request locale resolution.
//!
//! Resolves the request language through the precedence chain
//! (query `lang` → `wl_lang` cookie → IP geolocation → default) and
//! stores the [`Resolution`] in the request extensions for handlers
//! and the page renderer. When the winning tier was the URL or the
//! IP, the result is persisted in the locale cookie so later
//! parameterless requests stay in the same language.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::trace;

use worklens_geo::GeoDb;
use worklens_locale::{Resolution, Source, client_ip, resolve};

use crate::auth_middleware::cookie_value;

/// Cookie carrying the previously resolved locale.
pub const LANG_COOKIE: &str = "wl_lang";

/// One year, in seconds.
const LANG_COOKIE_MAX_AGE: u64 = 31_536_000;

pub async fn locale_middleware(
    State(geo): State<Arc<GeoDb>>,
    mut request: Request,
    next: Next,
) -> Response {
    let query_lang = query_param(request.uri().query(), "lang");
    let cookie_lang = request
        .headers()
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(|header| cookie_value(header, LANG_COOKIE));

    let forwarded_for = header_str(&request, "x-forwarded-for");
    let real_ip = header_str(&request, "x-real-ip");
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip());

    let ip = client_ip(forwarded_for.as_deref(), real_ip.as_deref(), peer);
    let resolution = resolve(query_lang.as_deref(), cookie_lang.as_deref(), ip, &geo);
    trace!(lang = %resolution.lang, source = ?resolution.source, "locale resolved");

    request.extensions_mut().insert(resolution);
    let mut response = next.run(request).await;

    // Persist url/ip-derived locales; cookie and default change nothing.
    if matches!(resolution.source, Source::Url | Source::Ip) {
        if let Ok(value) = HeaderValue::from_str(&lang_cookie(resolution)) {
            response.headers_mut().append("set-cookie", value);
        }
    }
    response
}

fn lang_cookie(resolution: Resolution) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax",
        LANG_COOKIE,
        resolution.lang.as_str(),
        LANG_COOKIE_MAX_AGE
    )
}

fn header_str(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// First occurrence of a query parameter, percent-decoded.
fn query_param(query: Option<&str>, name: &str) -> Option<String> {
    let query = query?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, middleware, routing::get};
    use tower::ServiceExt;
    use worklens_core::Lang;

    async fn request(uri: &str, cookie: Option<&str>) -> Response {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(
                Arc::new(GeoDb::disabled()),
                locale_middleware,
            ));
        let mut builder = Request::builder().uri(uri);
        if let Some(c) = cookie {
            builder = builder.header("cookie", c);
        }
        let request = builder.body(Body::empty()).unwrap();
        app.oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn url_lang_persists_in_cookie() {
        let response = request("/?lang=ja", None).await;
        let cookie = response
            .headers()
            .get("set-cookie")
            .expect("set-cookie header")
            .to_str()
            .unwrap();
        assert!(cookie.starts_with("wl_lang=ja; "), "{}", cookie);
    }

    #[tokio::test]
    async fn cookie_tier_changes_nothing() {
        let response = request("/", Some("wl_lang=zh")).await;
        assert!(response.headers().get("set-cookie").is_none());
    }

    #[tokio::test]
    async fn default_tier_changes_nothing() {
        let response = request("/", None).await;
        assert!(response.headers().get("set-cookie").is_none());
    }

    #[test]
    fn query_param_extraction() {
        assert_eq!(query_param(Some("page=2&lang=ja"), "lang"), Some("ja".into()));
        assert_eq!(query_param(Some("page=2"), "lang"), None);
        assert_eq!(query_param(None, "lang"), None);
        // Percent-decoding happens before validation elsewhere.
        assert_eq!(
            query_param(Some("lang=%3Cscript%3E"), "lang"),
            Some("<script>".into())
        );
    }

    #[test]
    fn cookie_format() {
        let r = Resolution { lang: Lang::Zh, source: Source::Url };
        let c = lang_cookie(r);
        assert!(c.starts_with("wl_lang=zh; "));
        assert!(c.contains("Max-Age=31536000"));
        assert!(c.contains("SameSite=Lax"));
    }
}
