use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;

use worklens_core::{ListParams, ListResult};

use crate::model::Company;
use crate::service::CategoryCount;
use super::{ApiError, AppState, ok_json};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies", get(list_companies))
        .route("/companies/{id}", get(get_company))
        .route("/companies/{id}/categories", get(company_categories))
}

// Flattening ListParams into the query struct trips up
// serde_urlencoded on the numeric fields, so spell them out.
#[derive(Deserialize)]
struct CompanyQuery {
    page: Option<usize>,
    limit: Option<usize>,
    sort: Option<String>,
    industry: Option<String>,
}

async fn list_companies(
    State(svc): State<AppState>,
    Query(q): Query<CompanyQuery>,
) -> Result<Json<ListResult<Company>>, ApiError> {
    let params = ListParams::from_query(q.page, q.limit, q.sort);
    ok_json(svc.list_companies(&params, q.industry.as_deref()))
}

async fn get_company(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Company>, ApiError> {
    ok_json(svc.get_company(&id))
}

async fn company_categories(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<CategoryCount>>, ApiError> {
    ok_json(svc.company_categories(&id))
}
