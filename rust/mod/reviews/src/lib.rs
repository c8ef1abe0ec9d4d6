pub mod api;
pub mod model;
pub mod service;
pub mod store;

use std::sync::Arc;

use axum::Router;
use worklens_core::Module;

use service::ReviewService;

/// Reviews module — companies and their employee reviews.
pub struct ReviewsModule {
    service: Arc<ReviewService>,
}

impl ReviewsModule {
    pub fn new(service: Arc<ReviewService>) -> Self {
        Self { service }
    }
}

impl Module for ReviewsModule {
    fn name(&self) -> &str {
        "reviews"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
