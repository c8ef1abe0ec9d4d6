use std::net::IpAddr;

use serde::Serialize;

use worklens_core::Lang;
use worklens_geo::{GeoDb, country_to_lang};

/// Which tier of the precedence chain produced the locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Url,
    Cookie,
    Ip,
    Default,
}

/// A resolved locale together with the tier that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub lang: Lang,
    pub source: Source,
}

/// Resolve the request locale. Strict precedence, first match wins:
///
/// 1. `lang` query parameter — only exact allow-list values count;
///    anything else is skipped, not rejected.
/// 2. Locale cookie, same validation.
/// 3. IP geolocation — counts only when the lookup actually maps the
///    address to a country. Geolocation failure of any kind drops to
///    the default tier; it can never override a cookie because the
///    cookie was already consulted above.
/// 4. Default (`en`).
///
/// Total function: every input combination yields a usable locale.
pub fn resolve(
    query_lang: Option<&str>,
    cookie_lang: Option<&str>,
    ip: Option<IpAddr>,
    geo: &GeoDb,
) -> Resolution {
    if let Some(lang) = query_lang.and_then(Lang::parse) {
        return Resolution { lang, source: Source::Url };
    }
    if let Some(lang) = cookie_lang.and_then(Lang::parse) {
        return Resolution { lang, source: Source::Cookie };
    }
    if let Some(addr) = ip {
        if let Some(code) = geo.country_code(addr) {
            return Resolution {
                lang: country_to_lang(&code),
                source: Source::Ip,
            };
        }
    }
    Resolution {
        lang: Lang::default(),
        source: Source::Default,
    }
}
