//! Engine module: CLI surface and terminal progress

pub mod arg_parser;
pub mod cli;
pub mod progress;

pub use arg_parser::Cli;
pub use cli::{handle_run, resolve_settings};
