pub mod catalog;
pub mod format;

pub use catalog::{Catalog, LoadReport};
pub use format::{format_date, format_number};
