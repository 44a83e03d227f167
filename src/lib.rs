pub mod adapters;
#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::ApiClient;
#[cfg(feature = "cli")]
pub use app::App;
#[cfg(feature = "cli")]
pub use config::args::CliConfig;
pub use config::{cli::LocalStorage, AppConfig};
pub use core::import_session::ImportSession;
pub use utils::error::{PbnError, Result};
