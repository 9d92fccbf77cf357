use crate::config::Config;
use log::{LevelFilter, SetLoggerError};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// HTTP stack crates that log every connection and frame. Hidden unless the level is
/// `TRACE`.
const FILTERED_MODULES: &[&str] = &["tower", "tower_http", "hyper", "hyper_util", "h2", "axum"];

pub struct Logger {}

impl Logger {
    /// Installs a terminal logger at the configured level with RFC3339 timestamps.
    pub fn init_logger(config: &Config) -> Result<(), SetLoggerError> {
        let level = config.log_level_filter;
        let log_config = Self::build_log_config(Self::should_filter_dependencies(level));

        TermLogger::init(level, log_config, TerminalMode::Mixed, ColorChoice::Auto)
    }

    fn should_filter_dependencies(level: LevelFilter) -> bool {
        level != LevelFilter::Trace
    }

    fn build_log_config(filter_dependencies: bool) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        if filter_dependencies {
            for module in FILTERED_MODULES {
                builder.add_filter_ignore_str(module);
            }
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_stack_is_filtered() {
        // The HTTP stack logs every connection and frame; keep it out of normal output
        for module in ["tower", "tower_http", "hyper", "h2", "axum"] {
            assert!(
                FILTERED_MODULES.contains(&module),
                "{module} should be filtered"
            );
        }
    }

    #[test]
    fn own_crates_are_never_filtered() {
        for module in ["sse", "web", "service", "sse_server_rs"] {
            assert!(!FILTERED_MODULES.contains(&module));
        }
    }

    #[test]
    fn only_trace_shows_dependency_logs() {
        assert!(!Logger::should_filter_dependencies(LevelFilter::Trace));
        for level in [LevelFilter::Debug, LevelFilter::Info, LevelFilter::Warn] {
            assert!(Logger::should_filter_dependencies(level), "{level} should filter");
        }
    }
}
