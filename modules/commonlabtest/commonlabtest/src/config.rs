//! Layered configuration.
//!
//! Values are merged in order: built-in defaults, then the optional YAML file,
//! then `COMMONLABTEST__*` environment variables (`__` separates nesting
//! levels, e.g. `COMMONLABTEST__DATABASE__DSN`).

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceConfig;

pub const ENV_PREFIX: &str = "COMMONLABTEST__";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub dsn: String,
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection.
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: "sqlite://commonlabtest.db?mode=rwc".to_owned(),
            max_connections: 5,
            acquire_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads the configuration, optionally layering a YAML file over the defaults.
    ///
    /// # Errors
    /// Fails when the file does not exist, cannot be parsed, or the merged
    /// result does not validate.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.exists() {
                bail!("config file {} does not exist", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values serde cannot.
    ///
    /// # Errors
    /// Returns the first offending setting.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.dsn.trim().is_empty() {
            bail!("database.dsn must not be empty");
        }
        if self.database.max_connections == 0 {
            bail!("database.max_connections must be at least 1");
        }
        if self.service.min_reference_number_length == 0 {
            bail!("service.min_reference_number_length must be at least 1");
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Opens a connection pool for the configured DSN.
    ///
    /// # Errors
    /// Returns the driver error when the database cannot be reached.
    pub async fn connect(&self) -> anyhow::Result<DatabaseConnection> {
        let mut options = ConnectOptions::new(self.dsn.clone());
        options
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .sqlx_logging(false);
        Database::connect(options)
            .await
            .with_context(|| format!("failed to connect to {}", redact_dsn(&self.dsn)))
    }
}

/// Hides the password part of a DSN.
#[must_use]
pub fn redact_dsn(dsn: &str) -> String {
    let Some((scheme, rest)) = dsn.split_once("://") else {
        return dsn.to_owned();
    };
    let Some((credentials, host)) = rest.rsplit_once('@') else {
        return dsn.to_owned();
    };
    match credentials.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:***@{host}"),
        None => dsn.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::path::PathBuf;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_| {
            let config = AppConfig::load(None).unwrap();
            assert_eq!(config, AppConfig::default());
            assert_eq!(config.service.min_reference_number_length, 4);
            assert_eq!(config.logging.level, "info");
            Ok(())
        });
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "commonlabtest.yaml",
                r"
database:
  dsn: 'sqlite::memory:'
service:
  min_reference_number_length: 6
",
            )?;

            let config = AppConfig::load(Some(Path::new("commonlabtest.yaml"))).unwrap();

            assert_eq!(config.database.dsn, "sqlite::memory:");
            assert_eq!(config.database.max_connections, 5);
            assert_eq!(config.service.min_reference_number_length, 6);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_yaml() {
        Jail::expect_with(|jail| {
            jail.create_file("commonlabtest.yaml", "logging:\n  level: warn\n")?;
            jail.set_env("COMMONLABTEST__LOGGING__LEVEL", "debug");
            jail.set_env("COMMONLABTEST__DATABASE__MAX_CONNECTIONS", "9");

            let config = AppConfig::load(Some(Path::new("commonlabtest.yaml"))).unwrap();

            assert_eq!(config.logging.level, "debug");
            assert_eq!(config.database.max_connections, 9);
            Ok(())
        });
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("commonlabtest.yaml", "service:\n  min_length: 3\n")?;

            let err = AppConfig::load(Some(Path::new("commonlabtest.yaml"))).unwrap_err();
            assert!(err.to_string().contains("invalid configuration"));
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path: PathBuf = dir.path().join("absent.yaml");

        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_zero_connections_fails_validation() {
        let mut config = AppConfig::default();
        config.database.max_connections = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_redact_dsn() {
        assert_eq!(
            redact_dsn("postgres://lab:secret@db:5432/openmrs"),
            "postgres://lab:***@db:5432/openmrs"
        );
        assert_eq!(redact_dsn("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            redact_dsn("sqlite://commonlabtest.db?mode=rwc"),
            "sqlite://commonlabtest.db?mode=rwc"
        );
    }
}
