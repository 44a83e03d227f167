mod admin;
pub mod commands;

pub use commands::App;
