//! Logging infrastructure for Filewarden.

use chrono::Local;
use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Logging configuration.
pub struct LogConfig {
    /// Log level
    pub level: LevelFilter,
    /// Show timestamps
    pub timestamps: bool,
    /// Show module path
    pub module_path: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            timestamps: true,
            module_path: false,
        }
    }
}

impl LogConfig {
    /// Create a log config from a level name string.
    pub fn from_level(level: &str) -> Self {
        let level = match level.to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" | "warning" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            _ => LevelFilter::Info,
        };

        Self {
            level,
            timestamps: true,
            module_path: level == LevelFilter::Debug || level == LevelFilter::Trace,
        }
    }

    /// Create a verbose log config for CLI.
    pub fn verbose() -> Self {
        Self {
            level: LevelFilter::Debug,
            timestamps: true,
            module_path: true,
        }
    }

    /// Create a quiet log config (errors only).
    pub fn quiet() -> Self {
        Self {
            level: LevelFilter::Error,
            timestamps: false,
            module_path: false,
        }
    }
}

/// Initialize the logging system.
pub fn init_logging(config: LogConfig) {
    let mut builder = Builder::new();

    builder.filter_level(config.level);

    builder.format(move |buf, record| {
        let mut output = String::new();

        if config.timestamps {
            output.push_str(&format!("{} ", Local::now().format("%Y-%m-%d %H:%M:%S")));
        }

        let level_str = match record.level() {
            log::Level::Error => "\x1b[31mERROR\x1b[0m",
            log::Level::Warn => "\x1b[33mWARN\x1b[0m ",
            log::Level::Info => "\x1b[32mINFO\x1b[0m ",
            log::Level::Debug => "\x1b[34mDEBUG\x1b[0m",
            log::Level::Trace => "\x1b[35mTRACE\x1b[0m",
        };
        output.push_str(&format!("[{}] ", level_str));

        if config.module_path {
            if let Some(path) = record.module_path() {
                output.push_str(&format!("{}: ", path));
            }
        }

        output.push_str(&format!("{}", record.args()));

        writeln!(buf, "{}", output)
    });

    // Ignore double-init so tests can call this freely
    let _ = builder.try_init();

    log::debug!("Logging initialized with level: {:?}", config.level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.level, LevelFilter::Info);
        assert!(config.timestamps);
    }

    #[test]
    fn test_log_config_from_level() {
        assert_eq!(LogConfig::from_level("debug").level, LevelFilter::Debug);
        assert_eq!(LogConfig::from_level("WARN").level, LevelFilter::Warn);
        assert_eq!(LogConfig::from_level("bogus").level, LevelFilter::Info);
    }

    #[test]
    fn test_log_config_presets() {
        assert_eq!(LogConfig::verbose().level, LevelFilter::Debug);
        assert!(LogConfig::verbose().module_path);
        assert_eq!(LogConfig::quiet().level, LevelFilter::Error);
        assert!(!LogConfig::quiet().timestamps);
    }
}
