//! Store de sesión
//!
//! Guarda token, vendedor y distribuidor del login, y los entrega al cliente
//! HTTP como `TokenProvider`. Un 401 limpia la sesión y manda al login una vez.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::clients::{endpoints, SodaApiClient, TokenProvider, UnauthorizedHandler};
use crate::models::{Credentials, LoginRequest, LoginResponse};
use crate::stores::ui_store::UiStore;
use crate::utils::errors::{invalid_input_error, AppError, AppResult};

/// Dónde viven las credenciales de la sesión
#[async_trait]
pub trait CredentialStorage: Send + Sync {
    async fn load(&self) -> Option<Credentials>;
    async fn save(&self, credentials: Credentials);
    /// Borrar; devuelve si había algo guardado
    async fn clear(&self) -> bool;
}

/// Credenciales solo en memoria: se pierden al cerrar el proceso
#[derive(Debug, Default)]
pub struct MemoryCredentialStorage {
    credentials: RwLock<Option<Credentials>>,
}

#[async_trait]
impl CredentialStorage for MemoryCredentialStorage {
    async fn load(&self) -> Option<Credentials> {
        self.credentials.read().await.clone()
    }

    async fn save(&self, credentials: Credentials) {
        *self.credentials.write().await = Some(credentials);
    }

    async fn clear(&self) -> bool {
        self.credentials.write().await.take().is_some()
    }
}

/// Sesión del vendedor
pub struct SessionStore {
    storage: Arc<dyn CredentialStorage>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Arc::new(MemoryCredentialStorage::default()))
    }
}

impl SessionStore {
    pub fn new(storage: Arc<dyn CredentialStorage>) -> Self {
        Self { storage }
    }

    /// Login contra `/login` y guardado de credenciales
    pub async fn login(&self, api: &SodaApiClient, request: &LoginRequest) -> AppResult<Credentials> {
        if request.username.trim().is_empty() || request.password.is_empty() {
            return Err(invalid_input_error("Informe usuário e senha"));
        }

        let response: LoginResponse = match api.post_public(endpoints::LOGIN, request).await {
            Ok(response) => response,
            Err(AppError::Api { status, .. }) if status == reqwest::StatusCode::UNAUTHORIZED => {
                warn!("🔒 Credenciales inválidas para '{}'", request.username);
                return Err(invalid_input_error("Usuário ou senha inválidos"));
            }
            Err(e) => return Err(e),
        };

        let credentials = credentials_from(response, &request.username)?;
        self.storage.save(credentials.clone()).await;
        info!(
            "✅ Login de '{}' (vendedor {}, distribuidor {:?})",
            credentials.user_name, credentials.vendedor_id, credentials.distribuidor_id
        );
        Ok(credentials)
    }

    pub async fn logout(&self) {
        if self.storage.clear().await {
            info!("👋 Sesión cerrada");
        }
    }

    /// Borrar credenciales; `false` si ya no había sesión
    pub async fn clear(&self) -> bool {
        self.storage.clear().await
    }

    pub async fn credentials(&self) -> Option<Credentials> {
        self.storage.load().await
    }

    pub async fn is_logged_in(&self) -> bool {
        self.storage.load().await.is_some()
    }

    /// Credenciales o `Unauthorized` si no hay sesión
    pub async fn require(&self) -> AppResult<Credentials> {
        self.storage.load().await.ok_or(AppError::Unauthorized)
    }
}

fn credentials_from(response: LoginResponse, username: &str) -> AppResult<Credentials> {
    let vendedor_id = response
        .resolved_vendedor_id()
        .ok_or_else(|| invalid_input_error("Resposta de login sem vendedor"))?;

    let user_name = response
        .user
        .as_ref()
        .map(|u| u.name.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| username.to_string());

    Ok(Credentials {
        distribuidor_id: response.resolved_distribuidor_id(),
        token: response.token,
        vendedor_id,
        user_name,
    })
}

#[async_trait]
impl TokenProvider for SessionStore {
    async fn bearer_token(&self) -> Option<String> {
        self.storage.load().await.map(|c| c.token)
    }
}

/// Reacción a un 401: limpiar credenciales y volver al login.
///
/// Varias llamadas pueden fallar con 401 a la vez; solo la primera que
/// encuentra credenciales redirige.
pub struct SessionExpiryHandler {
    session: Arc<SessionStore>,
    ui: Arc<UiStore>,
}

impl SessionExpiryHandler {
    pub fn new(session: Arc<SessionStore>, ui: Arc<UiStore>) -> Self {
        Self { session, ui }
    }
}

#[async_trait]
impl UnauthorizedHandler for SessionExpiryHandler {
    async fn on_unauthorized(&self) {
        if self.session.clear().await {
            warn!("🔒 Sesión expirada, credenciales borradas");
            self.ui.redirect_to_login().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::ui_store::Screen;

    fn credentials() -> Credentials {
        Credentials {
            token: "abc".to_string(),
            vendedor_id: 7,
            distribuidor_id: Some(3),
            user_name: "Carlos".to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_storage_clear_is_idempotent() {
        let storage = MemoryCredentialStorage::default();
        storage.save(credentials()).await;
        assert!(storage.clear().await);
        assert!(!storage.clear().await);
        assert!(storage.load().await.is_none());
    }

    #[tokio::test]
    async fn test_session_provides_token() {
        let session = SessionStore::default();
        assert_eq!(session.bearer_token().await, None);
        assert!(session.require().await.unwrap_err().is_unauthorized());

        session.storage.save(credentials()).await;
        assert_eq!(session.bearer_token().await.as_deref(), Some("abc"));
        assert!(session.is_logged_in().await);
    }

    #[tokio::test]
    async fn test_expiry_handler_redirects_once() {
        let session = Arc::new(SessionStore::default());
        let ui = Arc::new(UiStore::new());
        session.storage.save(credentials()).await;
        ui.navigate(Screen::Routes).await;

        let handler = SessionExpiryHandler::new(session.clone(), ui.clone());
        handler.on_unauthorized().await;
        handler.on_unauthorized().await;
        handler.on_unauthorized().await;

        assert!(!session.is_logged_in().await);
        assert_eq!(ui.current_screen().await, Screen::Login);
        assert_eq!(ui.login_redirects(), 1);
    }

    #[test]
    fn test_credentials_from_response() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"token": "t", "user": {"id": 9, "name": ""}}"#).unwrap();
        let creds = credentials_from(response, "carlos").unwrap();
        assert_eq!(creds.vendedor_id, 9);
        assert_eq!(creds.user_name, "carlos");
        assert_eq!(creds.distribuidor_id, None);

        let sem_vendedor: LoginResponse = serde_json::from_str(r#"{"token": "t"}"#).unwrap();
        assert!(credentials_from(sem_vendedor, "carlos").is_err());
    }
}
