pub mod url_id;

pub use url_id::extract_external_id;
