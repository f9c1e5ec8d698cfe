use std::env;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct ElasticsearchConfig {
    pub host: String,
    pub username: Option<String>,
    pub password: String,
    pub index: String,
    pub verify_certs: bool,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub elasticsearch: ElasticsearchConfig,
}

impl Config {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = parse_var("IMAGO_SEARCH_PORT", var("IMAGO_SEARCH_PORT", "8000"))?;

        let verify_certs = parse_bool(
            "ELASTICSEARCH_VERIFY_CERTS",
            var("ELASTICSEARCH_VERIFY_CERTS", "false"),
        )?;

        let timeout = match lookup("ELASTICSEARCH_TIMEOUT_SECS") {
            Some(raw) if !raw.trim().is_empty() => Some(Duration::from_secs(parse_var(
                "ELASTICSEARCH_TIMEOUT_SECS",
                raw,
            )?)),
            _ => None,
        };

        let username = lookup("ELASTICSEARCH_USERNAME").filter(|u| !u.is_empty());

        Ok(Config {
            host: var("IMAGO_SEARCH_HOST", "0.0.0.0"),
            port,
            elasticsearch: ElasticsearchConfig {
                host: var("ELASTICSEARCH_HOST", "http://localhost:9200")
                    .trim_end_matches('/')
                    .to_string(),
                username,
                password: var("ELASTICSEARCH_PASSWORD", ""),
                index: var("ELASTICSEARCH_INDEX", "imago"),
                verify_certs,
                timeout,
            },
        })
    }
}

fn parse_var<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            reason: e.to_string(),
            value,
        })
}

fn parse_bool(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value,
            reason: "expected a boolean".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.elasticsearch.host, "http://localhost:9200");
        assert_eq!(config.elasticsearch.index, "imago");
        assert!(config.elasticsearch.username.is_none());
        assert!(!config.elasticsearch.verify_certs);
        assert!(config.elasticsearch.timeout.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("IMAGO_SEARCH_PORT", "9090"),
            ("ELASTICSEARCH_HOST", "https://es.example.com:9200/"),
            ("ELASTICSEARCH_USERNAME", "elastic"),
            ("ELASTICSEARCH_PASSWORD", "secret"),
            ("ELASTICSEARCH_INDEX", "archive"),
            ("ELASTICSEARCH_VERIFY_CERTS", "true"),
            ("ELASTICSEARCH_TIMEOUT_SECS", "15"),
        ])
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.elasticsearch.host, "https://es.example.com:9200");
        assert_eq!(config.elasticsearch.username.as_deref(), Some("elastic"));
        assert_eq!(config.elasticsearch.password, "secret");
        assert_eq!(config.elasticsearch.index, "archive");
        assert!(config.elasticsearch.verify_certs);
        assert_eq!(config.elasticsearch.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_empty_username_means_no_auth() {
        let config = config_from(&[("ELASTICSEARCH_USERNAME", "")]).unwrap();
        assert!(config.elasticsearch.username.is_none());
    }

    #[test]
    fn test_invalid_port_names_variable() {
        let err = config_from(&[("IMAGO_SEARCH_PORT", "not-a-port")]).unwrap_err();
        assert!(err.to_string().contains("IMAGO_SEARCH_PORT"));
    }

    #[test]
    fn test_invalid_bool() {
        let err = config_from(&[("ELASTICSEARCH_VERIFY_CERTS", "maybe")]).unwrap_err();
        assert!(err.to_string().contains("ELASTICSEARCH_VERIFY_CERTS"));
    }
}
