//! Server-rendered pages.
//!
//! Pages are rendered into an embedded HTML shell. The helpers
//! visible to the rendering code mirror the template helpers of the
//! site: translation lookup, localized date formatting and
//! language-aware internal links.

use axum::Extension;
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;

use worklens_core::{Lang, ListParams, ServiceError};
use worklens_i18n::format_date;
use worklens_locale::{Resolution, localize_href, update_lang_param};
use worklens_reviews::api::Viewer;
use worklens_reviews::model::{AccessLevel, Company, ReviewCategory};

use crate::routes::AppState;

const LAYOUT: &str = include_str!("web/layout.html");

/// Everything a page render needs, resolved once per request.
struct Page<'a> {
    state: &'a AppState,
    lang: Lang,
    /// Path + query of the current request, for the language switcher.
    current: String,
}

impl<'a> Page<'a> {
    /// Translation lookup for the resolved language.
    fn t(&self, key: &str) -> String {
        self.state.catalog.lookup(key, self.lang)
    }

    /// Language-aware internal link.
    fn href(&self, path: &str) -> String {
        localize_href(path, self.lang, &self.state.server_config.site.host)
    }

    fn render(&self, title: &str, content: &str) -> Html<String> {
        let nav = format!(
            "<a href=\"{}\">{}</a><a href=\"{}\">{}</a>",
            esc(&self.href("/")),
            esc(&self.t("nav.home")),
            esc(&self.href("/companies")),
            esc(&self.t("nav.companies")),
        );
        let switcher = Lang::ALL
            .iter()
            .map(|l| {
                let class = if *l == self.lang { " class=\"active\"" } else { "" };
                format!(
                    "<a{} href=\"{}\">{}</a> ",
                    class,
                    esc(&update_lang_param(&self.current, *l)),
                    l.native_name(),
                )
            })
            .collect::<String>();

        let html = LAYOUT
            .replace("{{lang}}", self.lang.as_str())
            .replace("{{title}}", &esc(title))
            .replace("{{nav}}", &nav)
            .replace("{{switcher}}", &switcher)
            .replace("{{content}}", content);
        Html(html)
    }
}

/// HTML-escape untrusted text.
fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn stars(rating: u8) -> String {
    let filled = rating.min(5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Path + query of the request, exactly as the client sent it. The
/// language switcher rewrites this, so nothing may be dropped.
fn current_uri(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

fn resolution_of(res: Option<Extension<Resolution>>) -> Resolution {
    res.map(|Extension(r)| r).unwrap_or(Resolution {
        lang: Lang::default(),
        source: worklens_locale::Source::Default,
    })
}

fn error_page(page: &Page<'_>, err: ServiceError) -> Response {
    let status = err.status_code();
    let content = format!(
        "<h1>{}</h1><p class=\"muted\">{}</p>",
        status.as_u16(),
        esc(&err.to_string())
    );
    (status, page.render(&page.t("site.title"), &content)).into_response()
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn home(
    State(state): State<AppState>,
    res: Option<Extension<Resolution>>,
    OriginalUri(uri): OriginalUri,
) -> Html<String> {
    let page = Page {
        state: &state,
        lang: resolution_of(res).lang,
        current: current_uri(&uri),
    };
    let content = format!(
        "<h1>{}</h1><p>{}</p><p><a href=\"{}\">{}</a></p>",
        esc(&page.t("home.heading")),
        esc(&page.t("home.tagline")),
        esc(&page.href("/companies")),
        esc(&page.t("nav.companies")),
    );
    page.render(&page.t("site.title"), &content)
}

#[derive(Deserialize)]
pub struct CompaniesQuery {
    page: Option<usize>,
    limit: Option<usize>,
    sort: Option<String>,
    industry: Option<String>,
}

pub async fn companies(
    State(state): State<AppState>,
    res: Option<Extension<Resolution>>,
    OriginalUri(uri): OriginalUri,
    Query(q): Query<CompaniesQuery>,
) -> Response {
    let lang = resolution_of(res).lang;
    let params = ListParams::from_query(q.page, q.limit, q.sort.clone());
    let page = Page { state: &state, lang, current: current_uri(&uri) };

    let listed = match state.reviews.list_companies(&params, q.industry.as_deref()) {
        Ok(l) => l,
        Err(e) => return error_page(&page, e),
    };

    let mut content = format!("<h1>{}</h1>", esc(&page.t("companies.heading")));
    for company in &listed.items {
        content.push_str(&company_card(&page, company));
    }
    content.push_str(&pager(&page, "/companies", listed.page, listed.pages));
    page.render(&page.t("companies.heading"), &content).into_response()
}

fn company_card(page: &Page<'_>, company: &Company) -> String {
    let industry = company
        .industry
        .as_deref()
        .map(|i| format!(" · {}", esc(i)))
        .unwrap_or_default();
    format!(
        "<div class=\"card\"><h3><a href=\"{}\">{}</a></h3>\
         <p class=\"muted\"><span class=\"stars\">{}</span> {} {}{}</p></div>",
        esc(&page.href(&format!("/companies/{}", company.slug))),
        esc(company.display_name(page.lang)),
        stars(company.avg_rating.round() as u8),
        company.review_count,
        esc(&page.t("companies.reviews")),
        industry,
    )
}

pub async fn company(
    State(state): State<AppState>,
    res: Option<Extension<Resolution>>,
    OriginalUri(uri): OriginalUri,
    Path(slug): Path<String>,
) -> Response {
    let lang = resolution_of(res).lang;
    let page = Page {
        state: &state,
        lang,
        current: current_uri(&uri),
    };

    let company = match state.reviews.get_company_by_slug(&slug) {
        Ok(c) => c,
        Err(e) => return error_page(&page, e),
    };
    let categories = match state.reviews.company_categories(&company.id) {
        Ok(c) => c,
        Err(e) => return error_page(&page, e),
    };

    let name = company.display_name(lang).to_string();
    let mut content = format!("<h1>{}</h1>", esc(&name));
    if let Some(ref loc) = company.location {
        content.push_str(&format!(
            "<p class=\"muted\">{}: {}</p>",
            esc(&page.t("company.location")),
            esc(loc)
        ));
    }
    if let Some(ref desc) = company.description {
        content.push_str(&format!("<p>{}</p>", esc(desc)));
    }
    content.push_str(&format!(
        "<h2>{}</h2>",
        esc(&page.t("company.categories_heading"))
    ));
    for cat in &categories {
        let href = page.href(&format!(
            "/companies/{}/reviews?category={}",
            company.slug,
            cat.category.as_str()
        ));
        content.push_str(&format!(
            "<div class=\"card\"><a href=\"{}\">{}</a> <span class=\"muted\">({})</span></div>",
            esc(&href),
            esc(&page.t(&cat.category.label_key())),
            cat.count,
        ));
    }
    page.render(&name, &content).into_response()
}

#[derive(Deserialize)]
pub struct ReviewsPageQuery {
    page: Option<usize>,
    limit: Option<usize>,
    category: Option<String>,
}

pub async fn company_reviews(
    State(state): State<AppState>,
    res: Option<Extension<Resolution>>,
    viewer: Option<Extension<Viewer>>,
    OriginalUri(uri): OriginalUri,
    Path(slug): Path<String>,
    Query(q): Query<ReviewsPageQuery>,
) -> Response {
    let lang = resolution_of(res).lang;
    let category = q.category.as_deref().and_then(ReviewCategory::parse);
    let base = match category {
        Some(cat) => format!("/companies/{}/reviews?category={}", slug, cat.as_str()),
        None => format!("/companies/{}/reviews", slug),
    };
    let page = Page { state: &state, lang, current: current_uri(&uri) };

    let access = viewer
        .map(|Extension(v)| v.access)
        .unwrap_or(AccessLevel::Preview);

    let company = match state.reviews.get_company_by_slug(&slug) {
        Ok(c) => c,
        Err(e) => return error_page(&page, e),
    };
    let params = ListParams::from_query(q.page, q.limit, None);
    let listed = match state.reviews.list_reviews(&company.id, category, &params, access) {
        Ok(l) => l,
        Err(e) => return error_page(&page, e),
    };

    let name = company.display_name(lang).to_string();
    let heading = match category {
        Some(cat) => format!("{} — {}", name, page.t(&cat.label_key())),
        None => format!("{} — {}", name, page.t("reviews.heading")),
    };
    let mut content = format!("<h1>{}</h1>", esc(&heading));
    for review in &listed.items {
        let date = review
            .submitted_at
            .as_deref()
            .map(|d| format_date(d, lang))
            .unwrap_or_default();
        content.push_str(&format!(
            "<div class=\"card\"><h3>{}</h3>\
             <p class=\"muted\"><span class=\"stars\">{}</span> {}</p><p>{}</p>",
            esc(&review.title),
            stars(review.rating),
            esc(&date),
            esc(&review.comment),
        ));
        if review.masked {
            content.push_str(&format!(
                "<p class=\"masked-note\">{}</p>",
                esc(&page.t("reviews.login_to_read"))
            ));
        }
        content.push_str("</div>");
    }
    if listed.items.is_empty() {
        content.push_str(&format!("<p class=\"muted\">{}</p>", esc(&page.t("reviews.empty"))));
    }
    content.push_str(&pager(&page, &base, listed.page, listed.pages));
    page.render(&heading, &content).into_response()
}

/// Previous/next pagination links. `base` may already carry a query.
fn pager(page: &Page<'_>, base: &str, current: usize, pages: usize) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    let prev = if current > 1 {
        format!(
            "<a href=\"{}\">← {}</a>",
            esc(&page.href(&format!("{}{}page={}", base, sep, current - 1))),
            esc(&page.t("pagination.prev")),
        )
    } else {
        format!("<span class=\"disabled\">← {}</span>", esc(&page.t("pagination.prev")))
    };
    let next = if current < pages {
        format!(
            "<a href=\"{}\">{} →</a>",
            esc(&page.href(&format!("{}{}page={}", base, sep, current + 1))),
            esc(&page.t("pagination.next")),
        )
    } else {
        format!("<span class=\"disabled\">{} →</span>", esc(&page.t("pagination.next")))
    };
    format!("<div class=\"pager\">{} {}</div>", prev, next)
}

pub async fn not_found(
    State(state): State<AppState>,
    res: Option<Extension<Resolution>>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    let page = Page {
        state: &state,
        lang: resolution_of(res).lang,
        current: current_uri(&uri),
    };
    (
        StatusCode::NOT_FOUND,
        page.render(&page.t("site.title"), &format!("<h1>404</h1><p>{}</p>", esc(&page.t("error.not_found")))),
    )
        .into_response()
}
