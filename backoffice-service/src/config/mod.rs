use std::env;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(String),

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackofficeConfig {
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub bind_addr: String,
    pub security: SecurityConfig,
}

/// In dev, missing variables fall back to the default; in prod every variable
/// must be set explicitly.
fn get_env(name: &str, default: Option<&str>, is_prod: bool) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) => Ok(value),
        Err(_) => match default {
            Some(default) if !is_prod => Ok(default.to_string()),
            _ => Err(ConfigError::MissingVar(name.to_string())),
        },
    }
}

impl BackofficeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment =
            env_str
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    name: "ENVIRONMENT".to_string(),
                    value: env_str,
                })?;
        let is_prod = environment == Environment::Prod;

        Ok(BackofficeConfig {
            environment,
            service_name: get_env("SERVICE_NAME", Some("backoffice-service"), is_prod)?,
            service_version: get_env("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            bind_addr: get_env("BIND_ADDR", Some("0.0.0.0:8084"), is_prod)?,
            security: SecurityConfig {
                allowed_origins: get_env(
                    "ALLOWED_ORIGINS",
                    Some("http://localhost:3000"),
                    is_prod,
                )?
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            },
        })
    }

    /// Fixed configuration for tests; reads nothing from the environment.
    pub fn for_tests() -> Self {
        Self {
            environment: Environment::Dev,
            service_name: "backoffice-service".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "error".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            security: SecurityConfig {
                allowed_origins: vec!["http://localhost:3000".to_string()],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_defaults_apply_when_unset() {
        assert_eq!(
            get_env("BACKOFFICE_TEST_UNSET_VAR", Some("fallback"), false).unwrap(),
            "fallback"
        );
    }

    #[test]
    fn prod_requires_explicit_values() {
        assert!(get_env("BACKOFFICE_TEST_UNSET_VAR", Some("fallback"), true).is_err());
    }
}
