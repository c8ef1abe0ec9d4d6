mod company;
mod review;

pub use company::Company;
pub use review::{AccessLevel, Review, ReviewCategory, ReviewStatus, ReviewView};
