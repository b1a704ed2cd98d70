pub mod config;
pub mod logger;
pub mod sync_toml;
pub mod token;

pub use config::*;
pub use logger::setup_logging;
pub use sync_toml::{SyncToml, apply_file_to_settings, load_sync_toml};
pub use token::get_token;
