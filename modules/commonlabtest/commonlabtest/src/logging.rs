//! `tracing-subscriber` setup for binaries embedding the module.

use anyhow::Context;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::LoggingConfig;

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over the configured level when set. Each `-v` raises the
/// configured level by one step.
///
/// # Errors
/// Fails when the directive does not parse or a global subscriber is already set.
pub fn init_logging(config: &LoggingConfig, verbosity: u8) -> anyhow::Result<()> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives)
            .context("invalid RUST_LOG directive")?,
        _ => EnvFilter::try_new(filter_directive(&config.level, verbosity))
            .with_context(|| format!("invalid logging.level '{}'", config.level))?,
    };

    let layer = if config.json {
        fmt::layer().json().with_current_span(true).boxed()
    } else {
        fmt::layer().with_target(true).boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .context("a global tracing subscriber is already installed")
}

/// Directive for the configured level after applying `-v` flags.
///
/// Plain levels are raised in place; composite directives keep their
/// per-target settings and get this crate's level appended.
#[must_use]
pub fn filter_directive(level: &str, verbosity: u8) -> String {
    if verbosity == 0 {
        return level.to_owned();
    }
    match level.trim().parse::<LevelFilter>() {
        Ok(base) => raise(base, verbosity).to_string().to_lowercase(),
        Err(_) => {
            let bumped = raise(LevelFilter::INFO, verbosity).to_string().to_lowercase();
            format!("{level},commonlabtest={bumped}")
        }
    }
}

fn raise(base: LevelFilter, verbosity: u8) -> LevelFilter {
    const STEPS: [LevelFilter; 6] = [
        LevelFilter::OFF,
        LevelFilter::ERROR,
        LevelFilter::WARN,
        LevelFilter::INFO,
        LevelFilter::DEBUG,
        LevelFilter::TRACE,
    ];
    let start = STEPS.iter().position(|l| *l == base).unwrap_or(3);
    let idx = (start + usize::from(verbosity)).min(STEPS.len() - 1);
    STEPS[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_verbosity_keeps_level() {
        assert_eq!(filter_directive("warn", 0), "warn");
        assert_eq!(filter_directive("info,sqlx=warn", 0), "info,sqlx=warn");
    }

    #[test]
    fn test_verbosity_raises_plain_level() {
        assert_eq!(filter_directive("info", 1), "debug");
        assert_eq!(filter_directive("warn", 2), "debug");
        assert_eq!(filter_directive("info", 5), "trace");
    }

    #[test]
    fn test_verbosity_on_composite_directive() {
        assert_eq!(
            filter_directive("info,sqlx=warn", 1),
            "info,sqlx=warn,commonlabtest=debug"
        );
    }

    #[test]
    fn test_directive_parses() {
        assert!(EnvFilter::try_new(filter_directive("error", 2)).is_ok());
    }
}
