pub mod catalog_query;
pub mod checkout;
pub mod dashboard;
pub mod editor;
pub mod import_parser;
pub mod import_session;
pub mod import_template;
pub mod row_validator;
pub mod settings_cache;

pub use crate::domain::model::{ImportBatch, ImportSummary, NormalizedDomainRecord};
pub use crate::domain::ports::{AdminCatalog, CatalogApi, ConfigProvider, Storage};
pub use crate::utils::error::Result;
