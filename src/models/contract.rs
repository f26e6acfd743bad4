//! Contratos pendientes de firma (`/pendencia-contrato/{vendedorId}`)

use serde::{Deserialize, Serialize};

use crate::utils::serde_helpers::{flag, opt_string};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    Pending,
    Signed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendenciaContrato {
    pub id: i64,
    #[serde(alias = "customerName")]
    pub cliente_nome: String,
    #[serde(default, alias = "customerPhone", deserialize_with = "opt_string")]
    pub telefone: Option<String>,
    #[serde(alias = "contractType")]
    pub tipo_contrato: String,
    #[serde(default, alias = "createdDate", deserialize_with = "opt_string")]
    pub data_criacao: Option<String>,
    pub status: ContractStatus,
    #[serde(default, deserialize_with = "opt_string")]
    pub link: Option<String>,
    #[serde(default, alias = "isAddendum", deserialize_with = "flag")]
    pub aditivo: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pendencia_from_api() {
        let json = r#"{"id": 3, "customerName": "Ana Costa", "customerPhone": "(11) 99999-9012",
            "contractType": "Aditivo - Adição Vasilhame 10L Água com Gás", "createdDate": "2024-01-13",
            "status": "signed", "link": "https://contracts.example/sign/ghi789", "isAddendum": true}"#;
        let contrato: PendenciaContrato = serde_json::from_str(json).unwrap();
        assert_eq!(contrato.status, ContractStatus::Signed);
        assert!(contrato.aditivo);
        assert_eq!(contrato.cliente_nome, "Ana Costa");
    }
}
