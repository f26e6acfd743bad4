use serde::{Deserialize, Serialize};

use crate::utils::serde_helpers::{opt_i64, opt_string};

/// Request de login (`POST /login`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Usuario devuelto por el backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "opt_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub distribuidor_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub ativo: Option<i64>,
}

/// Response de login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default, alias = "vendedorId", deserialize_with = "opt_i64")]
    pub vendedor_id: Option<i64>,
    #[serde(default, alias = "distribuidorId", deserialize_with = "opt_i64")]
    pub distribuidor_id: Option<i64>,
}

impl LoginResponse {
    /// Id del vendedor: el campo explícito o, si falta, el id del usuario
    pub fn resolved_vendedor_id(&self) -> Option<i64> {
        self.vendedor_id.or_else(|| self.user.as_ref().map(|u| u.id))
    }

    /// Id del distribuidor: el campo explícito o el del usuario
    pub fn resolved_distribuidor_id(&self) -> Option<i64> {
        self.distribuidor_id
            .or_else(|| self.user.as_ref().and_then(|u| u.distribuidor_id))
    }
}

/// Credenciales guardadas de la sesión activa
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub vendedor_id: i64,
    pub distribuidor_id: Option<i64>,
    pub user_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_resolves_ids_from_user() {
        let json = r#"{"token": "abc", "user": {"id": 7, "name": "Carlos", "distribuidor_id": "3"}}"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.resolved_vendedor_id(), Some(7));
        assert_eq!(response.resolved_distribuidor_id(), Some(3));
    }

    #[test]
    fn test_login_response_explicit_ids_win() {
        let json = r#"{"token": "abc", "vendedorId": 12, "distribuidorId": 4, "user": {"id": 7, "name": "Carlos"}}"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.resolved_vendedor_id(), Some(12));
        assert_eq!(response.resolved_distribuidor_id(), Some(4));
    }
}
