//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del cliente: URL del backend,
//! versión del app enviada en cada request, timeouts y flags opcionales.

use std::env;
use std::time::Duration;

use crate::utils::errors::{AppError, AppResult};

const DEFAULT_APP_VERSION: &str = "1.0.0";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_VIACEP_URL: &str = "https://viacep.com.br/ws";

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    /// URL base del backend REST (sin barra final)
    pub api_base_url: String,
    /// Valor del header obligatorio `versaoApp`
    pub app_version: String,
    pub http_timeout: Duration,
    pub viacep_base_url: String,
    /// Enviar el check-in al backend además de guardarlo localmente
    pub checkin_sync: bool,
}

impl EnvironmentConfig {
    /// Cargar configuración desde variables de entorno (`.env` ya cargado por dotenvy)
    pub fn from_env() -> AppResult<Self> {
        let api_base_url = env::var("API_BASE_URL")
            .map_err(|_| AppError::Config("API_BASE_URL must be set".to_string()))?;

        let http_timeout = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::Config(format!("HTTP_TIMEOUT_SECS must be a valid number, got '{}'", raw))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let checkin_sync = match env::var("CHECKIN_SYNC") {
            Ok(raw) => parse_bool(&raw).ok_or_else(|| {
                AppError::Config(format!("CHECKIN_SYNC must be true/false, got '{}'", raw))
            })?,
            Err(_) => false,
        };

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            api_base_url: trim_base_url(&api_base_url),
            app_version: env::var("APP_VERSION").unwrap_or_else(|_| DEFAULT_APP_VERSION.to_string()),
            http_timeout: Duration::from_secs(http_timeout),
            viacep_base_url: trim_base_url(
                &env::var("VIACEP_BASE_URL").unwrap_or_else(|_| DEFAULT_VIACEP_URL.to_string()),
            ),
            checkin_sync,
        })
    }

    /// Configuración mínima apuntando a un backend concreto (tests y herramientas)
    pub fn for_base_url(api_base_url: &str) -> Self {
        Self {
            environment: "development".to_string(),
            api_base_url: trim_base_url(api_base_url),
            app_version: DEFAULT_APP_VERSION.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            viacep_base_url: DEFAULT_VIACEP_URL.to_string(),
            checkin_sync: false,
        }
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Nivel de log cuando `RUST_LOG_LEVEL` no está definido
    pub fn default_log_level(&self) -> tracing::Level {
        if self.is_development() {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_base_url_trims_slash() {
        let config = EnvironmentConfig::for_base_url("http://localhost:8000/api/");
        assert_eq!(config.api_base_url, "http://localhost:8000/api");
        assert_eq!(config.app_version, "1.0.0");
        assert!(!config.checkin_sync);
        assert!(config.is_development());
        assert_eq!(config.default_log_level(), tracing::Level::DEBUG);

        let production = EnvironmentConfig {
            environment: "production".to_string(),
            ..config
        };
        assert_eq!(production.default_log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" 0 "), Some(false));
        assert_eq!(parse_bool("talvez"), None);
    }
}
