pub mod error;
pub mod lang;
pub mod module;
pub mod types;

pub use error::ServiceError;
pub use lang::Lang;
pub use module::Module;
pub use types::{ListParams, ListResult, new_id, now_rfc3339};
