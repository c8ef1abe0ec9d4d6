mod company;
mod import;
mod review;

pub use company::CreateCompanyInput;
pub use import::ImportReport;
pub use review::{CategoryCount, CreateReviewInput};

use crate::store::Store;

/// Review service — business logic over the embedded store.
pub struct ReviewService {
    pub(crate) store: Store,
}

impl ReviewService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}
