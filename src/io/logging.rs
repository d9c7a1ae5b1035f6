//! Logger setup for the command-line tool

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Log level selected by the verbosity flags
///
/// `-q` silences everything but errors; each `-v` raises the level one step
/// from the default of warnings.
pub const fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Initialize the global logger
///
/// `RUST_LOG` is read first, then the crate's own level is set from the
/// flags so that `-v` works without touching the environment. Returns
/// `false` if a logger was already installed.
pub fn init_logger(verbosity: u8, quiet: bool) -> bool {
    let level = level_for(verbosity, quiet);
    let env = Env::default().filter_or("RUST_LOG", "warn");

    let mut builder = Builder::from_env(env);
    builder.filter_module("pipeloop", level);
    builder.format_timestamp(None);

    let installed = builder.try_init().is_ok();
    log::debug!("Logger initialized at {level:?}");
    installed
}
