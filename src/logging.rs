//! Logger setup and fatal error reporting shared by the binaries.

use log::LevelFilter;

/// Maps a verbosity level to a log level:
/// 1=error, 2=warning, 3=info, 4=debug, 5+=trace.
pub fn level_for(verbosity: i32) -> LevelFilter {
    match verbosity {
        v if v <= 1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Initialises `env_logger` on standard error. `RUST_LOG` module filters
/// still apply on top of the given verbosity.
pub fn init(verbosity: i32) {
    env_logger::Builder::new()
        .filter_level(level_for(verbosity))
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Reports a fatal error on standard error. Falls back to a plain line when
/// error logging is disabled, e.g. by `RUST_LOG=off`.
pub fn fatal(error: &dyn std::fmt::Display) {
    if log::log_enabled!(log::Level::Error) {
        log::error!("{error}");
    } else {
        eprintln!("Error: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(0), LevelFilter::Error);
        assert_eq!(level_for(1), LevelFilter::Error);
        assert_eq!(level_for(3), LevelFilter::Info);
        assert_eq!(level_for(4), LevelFilter::Debug);
        assert_eq!(level_for(9), LevelFilter::Trace);
    }
}
