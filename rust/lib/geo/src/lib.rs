pub mod mapping;
pub mod reader;

pub use mapping::country_to_lang;
pub use reader::{GeoDb, GeoError};
