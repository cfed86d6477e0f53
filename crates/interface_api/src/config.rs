//! API configuration

use serde::Deserialize;
use std::path::PathBuf;

use core_kernel::{CoreError, Currency};

/// Longest quote validity window accepted from configuration
pub const MAX_QUOTE_VALIDITY_DAYS: i64 = 3650;

/// Longest idle session TTL accepted from configuration (one week)
pub const MAX_SESSION_TTL_MINUTES: i64 = 7 * 24 * 60;

fn bounded(name: &str, value: i64, max: i64) -> Result<i64, CoreError> {
    if (1..=max).contains(&value) {
        Ok(value)
    } else {
        Err(CoreError::configuration(format!(
            "{name} must be between 1 and {max}, got {value}"
        )))
    }
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// Originating agent stamped on committed quotes
    pub agent_name: String,
    /// Days a committed quote stays valid
    pub quote_validity_days: i64,
    /// Minutes a workflow session may sit idle before it is evicted
    pub session_ttl_minutes: i64,
    /// Currency code the catalog is priced in
    pub currency: String,
    /// Directory printed quote documents are written to
    pub print_output_dir: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            agent_name: "Web Portal".to_string(),
            quote_validity_days: domain_quote::quote::DEFAULT_VALIDITY_DAYS,
            session_ttl_minutes: domain_quote::DEFAULT_SESSION_TTL_MINUTES,
            currency: "KES".to_string(),
            print_output_dir: PathBuf::from("printed-quotes"),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables over the defaults
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("log_level", defaults.log_level)?
            .set_default("agent_name", defaults.agent_name)?
            .set_default("quote_validity_days", defaults.quote_validity_days)?
            .set_default("session_ttl_minutes", defaults.session_ttl_minutes)?
            .set_default("currency", defaults.currency)?
            .set_default(
                "print_output_dir",
                defaults.print_output_dir.to_string_lossy().into_owned(),
            )?
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parses the configured currency code
    pub fn currency(&self) -> Result<Currency, CoreError> {
        Ok(self.currency.parse()?)
    }

    /// Validity window applied to committed quotes
    pub fn quote_validity(&self) -> Result<chrono::Duration, CoreError> {
        let days = bounded("quote_validity_days", self.quote_validity_days, MAX_QUOTE_VALIDITY_DAYS)?;
        chrono::Duration::try_days(days)
            .ok_or_else(|| CoreError::configuration("quote_validity_days is out of range"))
    }

    /// Idle time after which a workflow session is evicted
    pub fn session_ttl(&self) -> Result<chrono::Duration, CoreError> {
        let minutes = bounded("session_ttl_minutes", self.session_ttl_minutes, MAX_SESSION_TTL_MINUTES)?;
        chrono::Duration::try_minutes(minutes)
            .ok_or_else(|| CoreError::configuration("session_ttl_minutes is out of range"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.currency(), Ok(Currency::KES));
        assert_eq!(config.quote_validity().unwrap().num_days(), 30);
        assert_eq!(config.session_ttl().unwrap().num_minutes(), 30);
    }

    #[test]
    fn test_unknown_currency_is_rejected() {
        let config = ApiConfig {
            currency: "XYZ".to_string(),
            ..ApiConfig::default()
        };
        assert!(matches!(config.currency(), Err(CoreError::Money(_))));
    }

    #[test]
    fn test_validity_must_be_positive() {
        let config = ApiConfig {
            quote_validity_days: 0,
            ..ApiConfig::default()
        };
        assert!(matches!(config.quote_validity(), Err(CoreError::Configuration(_))));
    }

    #[test]
    fn test_huge_validity_is_a_configuration_error() {
        for days in [MAX_QUOTE_VALIDITY_DAYS + 1, 100_000_000_000, i64::MAX] {
            let config = ApiConfig {
                quote_validity_days: days,
                ..ApiConfig::default()
            };
            assert!(matches!(config.quote_validity(), Err(CoreError::Configuration(_))));
        }
    }

    #[test]
    fn test_session_ttl_is_bounded() {
        let config = ApiConfig {
            session_ttl_minutes: 0,
            ..ApiConfig::default()
        };
        assert!(matches!(config.session_ttl(), Err(CoreError::Configuration(_))));
    }
}
