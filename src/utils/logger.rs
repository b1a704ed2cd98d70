//! Terminal logging: `env_logger` with a colored `[issuesync ...]` prefix.

use colored::{ColoredString, Colorize};
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::fmt;
use std::io::Write;

fn level_tag(level: Level) -> ColoredString {
    match level {
        Level::Error => "ERROR".red(),
        Level::Warn => "WARN".yellow(),
        Level::Info => "INFO".normal(),
        Level::Debug | Level::Trace => "DEBUG".dimmed(),
    }
}

/// Render one log line. Warnings and errors name the emitting module; info lines carry no tag.
pub fn format_line(level: Level, target: &str, args: &fmt::Arguments<'_>) -> String {
    let name = env!("CARGO_PKG_NAME").cyan();
    match level {
        Level::Error | Level::Warn => {
            format!("[{} {} {}] {}", name, level_tag(level), target.white(), args)
        }
        Level::Info => format!("[{}] {}", name, args),
        Level::Debug | Level::Trace => format!("[{} {}] {}", name, level_tag(level), args),
    }
}

/// Install the logger: this crate at Info (Debug when `verbose`), dependencies at Warn.
/// Later calls are ignored.
pub fn setup_logging(verbose: bool) {
    let crate_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), crate_level)
        .format(|buf, record| {
            writeln!(
                buf,
                "{}",
                format_line(record.level(), record.target(), record.args())
            )
        })
        .try_init();
}
