//! Cliente HTTP para el backend REST de la distribuidora
//!
//! Todas las llamadas autenticadas llevan el bearer token de la sesión y el
//! header fijo `versaoApp`. Un 401 dispara el handler de sesión expirada.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::config::EnvironmentConfig;
use crate::utils::errors::{AppError, AppResult};

/// Header obligatorio con la versión del app
pub const APP_VERSION_HEADER: &str = "versaoApp";

/// Quién sabe el token actual (el store de sesión)
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self) -> Option<String>;
}

/// Qué hacer cuando el backend responde 401 a una llamada autenticada
#[async_trait]
pub trait UnauthorizedHandler: Send + Sync {
    async fn on_unauthorized(&self);
}

/// Cliente HTTP del backend
#[derive(Clone)]
pub struct SodaApiClient {
    client: Client,
    base_url: String,
    app_version: String,
    tokens: Arc<dyn TokenProvider>,
    unauthorized_handler: Option<Arc<dyn UnauthorizedHandler>>,
}

impl SodaApiClient {
    /// Crear nuevo cliente HTTP con la configuración del entorno
    pub fn new(config: &EnvironmentConfig, tokens: Arc<dyn TokenProvider>) -> AppResult<Self> {
        let client = Client::builder().timeout(config.http_timeout).build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            app_version: config.app_version.clone(),
            tokens,
            unauthorized_handler: None,
        })
    }

    /// Registrar el handler que limpia la sesión ante un 401
    pub fn with_unauthorized_handler(mut self, handler: Arc<dyn UnauthorizedHandler>) -> Self {
        self.unauthorized_handler = Some(handler);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET autenticado
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let request = self.request(Method::GET, path).await;
        self.execute(request, path, true).await
    }

    /// POST autenticado con body JSON
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path).await.json(body);
        self.execute(request, path, true).await
    }

    /// POST sin token (login). Un 401 aquí son credenciales inválidas, no sesión expirada.
    pub async fn post_public<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .client
            .post(self.url(path))
            .header(APP_VERSION_HEADER, &self.app_version)
            .json(body);
        self.execute(request, path, false).await
    }

    /// GET a un servicio externo (ViaCEP): sin token ni `versaoApp`
    pub async fn get_external_json<T: DeserializeOwned>(&self, url: &str) -> AppResult<T> {
        let request = self.client.get(url).header("Accept", "application/json");
        self.execute(request, url, false).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self
            .client
            .request(method, self.url(path))
            .header("Accept", "application/json")
            .header(APP_VERSION_HEADER, &self.app_version);

        if let Some(token) = self.tokens.bearer_token().await {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
        authenticated: bool,
    ) -> AppResult<T> {
        debug!("📤 Request a {}", path);

        let response = request.send().await.map_err(|e| {
            error!("❌ Error de red en {}: {}", path, e);
            AppError::Network(e)
        })?;

        let status = response.status();
        let body = response.text().await?;
        debug!("📡 {} respondió {}", path, status);

        if status == StatusCode::UNAUTHORIZED && authenticated {
            warn!("🔒 401 en {}, sesión expirada", path);
            if let Some(handler) = &self.unauthorized_handler {
                handler.on_unauthorized().await;
            }
            return Err(AppError::Unauthorized);
        }

        if !status.is_success() {
            let message = extract_error_message(&body);
            error!("❌ {} respondió {}: {}", path, status, message);
            return Err(AppError::Api { status, message });
        }

        // Algunos POST responden 200/201 sin cuerpo
        let payload = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(payload).map_err(|e| {
            error!("❌ Respuesta inesperada de {}: {}", path, e);
            AppError::Decode(e)
        })
    }
}

/// Sacar `message`/`error` del cuerpo JSON de error; si no es JSON, el texto tal cual
fn extract_error_message(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value
            .get("message")
            .or_else(|| value.get("error"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_default(),
        Err(_) => body.trim().chars().take(200).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoToken;

    #[async_trait]
    impl TokenProvider for NoToken {
        async fn bearer_token(&self) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_extract_error_message() {
        assert_eq!(extract_error_message(r#"{"message": "Cliente inativo"}"#), "Cliente inativo");
        assert_eq!(extract_error_message(r#"{"error": "Token inválido"}"#), "Token inválido");
        assert_eq!(extract_error_message(r#"{"detail": 1}"#), "");
        assert_eq!(extract_error_message("  Internal Server Error "), "Internal Server Error");
    }

    #[test]
    fn test_client_creation() {
        let config = EnvironmentConfig::for_base_url("http://localhost:8000/");
        let client = SodaApiClient::new(&config, Arc::new(NoToken)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/login"), "http://localhost:8000/login");
    }
}
