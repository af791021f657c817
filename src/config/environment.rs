//! Configuración de variables de entorno
//!
//! Todas las variables tienen valor por defecto salvo `DATABASE_URL`, que es
//! obligatoria en producción. Un número mal formado es un error de arranque.

use std::env;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub cors_origins: Vec<String>,
    pub log_level: tracing::Level,
    pub request_timeout: Duration,
}

impl EnvironmentConfig {
    /// Leer la configuración del entorno del proceso
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Leer la configuración desde una función de búsqueda arbitraria
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid number, got '{}'", raw))?,
            None => 3000,
        };

        let log_level = match var("LOG_LEVEL") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow!("LOG_LEVEL must be one of trace, debug, info, warn, error"))?,
            None => tracing::Level::INFO,
        };

        let request_timeout = match var("REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .with_context(|| format!("REQUEST_TIMEOUT_SECS must be a valid number, got '{}'", raw))?,
            ),
            None => Duration::from_secs(30),
        };

        let config = Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url: var("DATABASE_URL"),
            cors_origins: var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            log_level,
            request_timeout,
            environment,
        };

        if config.is_production() && config.database_url.is_none() {
            return Err(anyhow!("DATABASE_URL must be set in production"));
        }

        Ok(config)
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<EnvironmentConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvironmentConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.environment, "development");
        assert!(!config.is_production());
        assert_eq!(config.server_url(), "0.0.0.0:3000");
        assert_eq!(config.database_url, None);
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.log_level, tracing::Level::INFO);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_explicit_values() {
        let config = config_from(&[
            ("ENVIRONMENT", "production"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("DATABASE_URL", "postgres://app:secret@db/vehicles"),
            ("CORS_ORIGINS", "http://localhost:3000, http://localhost:8081,"),
            ("LOG_LEVEL", "debug"),
            ("REQUEST_TIMEOUT_SECS", "5"),
        ])
        .unwrap();

        assert!(config.is_production());
        assert_eq!(config.server_url(), "127.0.0.1:8080");
        assert_eq!(config.cors_origins, vec!["http://localhost:3000", "http://localhost:8081"]);
        assert_eq!(config.log_level, tracing::Level::DEBUG);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        assert!(config_from(&[("PORT", "tres mil")]).is_err());
        assert!(config_from(&[("REQUEST_TIMEOUT_SECS", "-1")]).is_err());
        assert!(config_from(&[("LOG_LEVEL", "verbose")]).is_err());
    }

    #[test]
    fn test_production_requires_database() {
        assert!(config_from(&[("ENVIRONMENT", "production")]).is_err());
    }
}
