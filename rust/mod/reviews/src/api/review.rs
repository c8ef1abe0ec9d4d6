use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;

use worklens_core::{ListParams, ListResult};

use crate::model::{AccessLevel, ReviewCategory, ReviewView};
use super::{ApiError, AppState, Viewer, ok_json};

pub fn routes() -> Router<AppState> {
    Router::new().route("/companies/{id}/reviews", get(list_reviews))
}

#[derive(Deserialize)]
struct ReviewQuery {
    page: Option<usize>,
    limit: Option<usize>,
    /// Category filter; unknown values read as "no filter" rather
    /// than an error, matching the locale-parameter philosophy.
    category: Option<String>,
}

async fn list_reviews(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<ReviewQuery>,
    viewer: Option<Extension<Viewer>>,
) -> Result<Json<ListResult<ReviewView>>, ApiError> {
    let access = viewer
        .map(|Extension(v)| v.access)
        .unwrap_or(AccessLevel::Preview);
    let category = q.category.as_deref().and_then(ReviewCategory::parse);
    let params = ListParams::from_query(q.page, q.limit, None);
    ok_json(svc.list_reviews(&id, category, &params, access))
}
