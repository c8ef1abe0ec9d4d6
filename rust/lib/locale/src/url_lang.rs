use url::Url;

use worklens_core::Lang;

/// Base used to parse site-relative hrefs. Never leaks into output:
/// relative inputs are re-serialized as path + query + fragment.
const RELATIVE_BASE: &str = "http://relative.invalid";

/// Add or replace the `lang` query parameter.
///
/// All other query parameters and the fragment are preserved. Inputs
/// that cannot be parsed as a URL come back unchanged.
pub fn add_lang_param(href: &str, lang: Lang) -> String {
    update_lang_param(href, lang)
}

/// Set `lang` to the given value, removing any previous `lang`
/// occurrences, so exactly one `lang` parameter remains.
pub fn update_lang_param(href: &str, lang: Lang) -> String {
    let (mut url, relative) = match parse_href(href) {
        Some(v) => v,
        None => return href.to_string(),
    };

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "lang")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    {
        let mut qp = url.query_pairs_mut();
        qp.clear();
        for (k, v) in &kept {
            qp.append_pair(k, v);
        }
        qp.append_pair("lang", lang.as_str());
    }

    if relative {
        serialize_relative(&url, href)
    } else {
        url.to_string()
    }
}

/// Extract a valid `lang` parameter value, if any. Invalid values
/// (not in the allow-list) read as absent.
pub fn extract_lang_param(href: &str) -> Option<Lang> {
    let (url, _) = parse_href(href)?;
    url.query_pairs()
        .find(|(k, _)| k == "lang")
        .and_then(|(_, v)| Lang::parse(&v))
}

/// Classify a link as internal to the site.
///
/// Relative paths are internal. Absolute http(s) URLs are internal iff
/// their host matches `site_host` (port-insensitive, case-insensitive).
/// Bare fragments, `javascript:`, `mailto:` and any other non-http
/// scheme are external — they never receive a language parameter.
pub fn is_internal_link(href: &str, site_host: &str) -> bool {
    if href.is_empty() || href.starts_with('#') {
        return false;
    }

    match Url::parse(href) {
        Ok(url) => match url.scheme() {
            "http" | "https" => hosts_match(url.host_str(), site_host),
            _ => false,
        },
        // Relative reference. Protocol-relative (`//host/...`) still
        // carries a foreign host, so resolve it before deciding.
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            if href.starts_with("//") {
                let base = Url::parse(RELATIVE_BASE).expect("static base");
                match base.join(href) {
                    Ok(joined) => hosts_match(joined.host_str(), site_host),
                    Err(_) => false,
                }
            } else {
                true
            }
        }
        Err(_) => false,
    }
}

/// Add the language parameter to internal links only; external links
/// pass through untouched.
pub fn localize_href(href: &str, lang: Lang, site_host: &str) -> String {
    if is_internal_link(href, site_host) {
        add_lang_param(href, lang)
    } else {
        href.to_string()
    }
}

fn parse_href(href: &str) -> Option<(Url, bool)> {
    match Url::parse(href) {
        Ok(url) => Some((url, false)),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse(RELATIVE_BASE).expect("static base");
            base.join(href).ok().map(|u| (u, true))
        }
        Err(_) => None,
    }
}

/// Reconstruct a relative reference from the parsed form. Parsing
/// roots the path at the base, so a directory-relative input
/// (`companies/acme`) gets its leading slash stripped back off;
/// `.`/`..` segments resolve against the site root either way.
fn serialize_relative(url: &Url, original: &str) -> String {
    let mut out = url.path().to_string();
    if !original.starts_with('/') && out.starts_with('/') {
        out.remove(0);
    }
    if let Some(q) = url.query() {
        out.push('?');
        out.push_str(q);
    }
    if let Some(f) = url.fragment() {
        out.push('#');
        out.push_str(f);
    }
    out
}

fn hosts_match(host: Option<&str>, site_host: &str) -> bool {
    let Some(host) = host else { return false };
    // site_host may be configured with a port ("example.com:8080").
    let site = site_host.rsplit_once(':').map_or(site_host, |(h, p)| {
        if p.chars().all(|c| c.is_ascii_digit()) { h } else { site_host }
    });
    host.eq_ignore_ascii_case(site)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str = "reviews.example.com";

    #[test]
    fn add_preserves_other_params() {
        let out = add_lang_param("/reviews?page=2", Lang::En);
        assert!(out.contains("page=2"), "{}", out);
        assert!(out.contains("lang=en"), "{}", out);
        assert!(out.starts_with("/reviews?"), "{}", out);
    }

    #[test]
    fn add_extract_round_trip() {
        for lang in Lang::ALL {
            let out = add_lang_param("/companies?industry=tech&page=3", lang);
            assert_eq!(extract_lang_param(&out), Some(lang));
            assert!(out.contains("industry=tech"));
            assert!(out.contains("page=3"));
        }
    }

    #[test]
    fn update_leaves_exactly_one_lang() {
        let out = update_lang_param("/reviews?lang=ja&page=2&lang=zh", Lang::En);
        assert_eq!(out.matches("lang=").count(), 1, "{}", out);
        assert!(out.contains("lang=en"));
        assert!(!out.contains("lang=ja"));
        assert!(out.contains("page=2"));
    }

    #[test]
    fn directory_relative_href_stays_relative() {
        let out = add_lang_param("companies/acme?page=2", Lang::Ja);
        assert!(out.starts_with("companies/acme?"), "{}", out);
        assert!(out.contains("page=2"));
        assert!(out.contains("lang=ja"));

        let rooted = add_lang_param("/companies/acme", Lang::Ja);
        assert!(rooted.starts_with("/companies/acme?"), "{}", rooted);
    }

    #[test]
    fn fragment_preserved() {
        let out = add_lang_param("/companies/acme?tab=reviews#salary", Lang::Ja);
        assert!(out.ends_with("#salary"), "{}", out);
        assert!(out.contains("tab=reviews"));
        assert!(out.contains("lang=ja"));
    }

    #[test]
    fn absolute_url_kept_absolute() {
        let out = add_lang_param("https://reviews.example.com/companies?page=1", Lang::Zh);
        assert!(out.starts_with("https://reviews.example.com/"), "{}", out);
        assert!(out.contains("lang=zh"));
    }

    #[test]
    fn extract_ignores_invalid_values() {
        assert_eq!(extract_lang_param("/x?lang=fr"), None);
        assert_eq!(extract_lang_param("/x?lang=%3Cscript%3E"), None);
        assert_eq!(extract_lang_param("/x?page=2"), None);
        assert_eq!(extract_lang_param("/x?lang=ja"), Some(Lang::Ja));
    }

    #[test]
    fn internal_link_classification() {
        assert!(is_internal_link("/companies", SITE));
        assert!(is_internal_link("companies/acme", SITE));
        assert!(is_internal_link("/reviews?page=2", SITE));
        assert!(is_internal_link("https://reviews.example.com/x", SITE));
        assert!(is_internal_link("http://REVIEWS.EXAMPLE.COM/x", SITE));
        // Port differences don't matter.
        assert!(is_internal_link("https://reviews.example.com:8443/x", SITE));

        assert!(!is_internal_link("#anchor", SITE));
        assert!(!is_internal_link("", SITE));
        assert!(!is_internal_link("javascript:alert(1)", SITE));
        assert!(!is_internal_link("mailto:jobs@example.com", SITE));
        assert!(!is_internal_link("https://evil.example.net/x", SITE));
        assert!(!is_internal_link("//evil.example.net/x", SITE));
    }

    #[test]
    fn localize_only_internal() {
        let out = localize_href("/companies", Lang::Ja, SITE);
        assert!(out.contains("lang=ja"));

        assert_eq!(
            localize_href("https://evil.example.net/x", Lang::Ja, SITE),
            "https://evil.example.net/x"
        );
        assert_eq!(localize_href("#top", Lang::Ja, SITE), "#top");
        assert_eq!(
            localize_href("mailto:jobs@example.com", Lang::Ja, SITE),
            "mailto:jobs@example.com"
        );
    }

    #[test]
    fn site_host_with_port() {
        assert!(is_internal_link("https://reviews.example.com/x", "reviews.example.com:8080"));
        assert!(is_internal_link("/relative", "reviews.example.com:8080"));
    }
}
