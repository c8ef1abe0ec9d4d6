pub mod client_ip;
pub mod resolve;
pub mod url_lang;

pub use client_ip::client_ip;
pub use resolve::{Resolution, Source, resolve};
pub use url_lang::{
    add_lang_param, extract_lang_param, is_internal_link, localize_href, update_lang_param,
};
