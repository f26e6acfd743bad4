//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del cliente
//! y su conversión a mensajes que se muestran al usuario.

use reqwest::StatusCode;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("Unauthorized: sessão expirada")]
    Unauthorized,

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Mensaje corto para mostrar en la pantalla (equivale al `error` de cada store)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(_) => "Falha de conexão com o servidor".to_string(),
            AppError::Api { status, message } if message.is_empty() => {
                format!("Erro do servidor ({})", status.as_u16())
            }
            AppError::Api { message, .. } => message.clone(),
            AppError::Unauthorized => "Sessão expirada, faça login novamente".to_string(),
            AppError::Validation(_) => "Dados inválidos".to_string(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Decode(_) => "Resposta inesperada do servidor".to_string(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Config(msg) => msg.clone(),
            AppError::Io(e) => e.to_string(),
        }
    }

    /// Verificar si el error fue un 401
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized)
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} '{}' não encontrado", resource, id))
}

/// Función helper para crear errores de entrada inválida
pub fn invalid_input_error(message: &str) -> AppError {
    AppError::InvalidInput(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_uses_api_message() {
        let err = AppError::Api {
            status: StatusCode::BAD_REQUEST,
            message: "Cliente inativo".to_string(),
        };
        assert_eq!(err.user_message(), "Cliente inativo");

        let err = AppError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: String::new(),
        };
        assert_eq!(err.user_message(), "Erro do servidor (500)");
    }

    #[test]
    fn test_helpers() {
        let err = not_found_error("Rota", "42");
        assert_eq!(err.user_message(), "Rota '42' não encontrado");
        assert!(!err.is_unauthorized());
        assert!(AppError::Unauthorized.is_unauthorized());
    }
}
