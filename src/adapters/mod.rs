pub mod http_api;

pub use http_api::{ApiClient, DEFAULT_API_BASE_URL};
