pub mod context;
pub mod import;
