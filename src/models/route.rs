//! Modelo de Rota
//!
//! Este módulo contiene los structs de rutas y la relación rota ↔ cliente
//! tal como los devuelve el backend (`/rotas/{vendedorId}` y `/rotas-entregas`),
//! más los view models que arma la pantalla de rutas.

use serde::{Deserialize, Serialize};

use crate::utils::serde_helpers::{flag, opt_string};

/// Rota simplificada (GET /rotas/{vendedor_id})
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rota {
    pub id: i64,
    pub nome: String,
    #[serde(default, deserialize_with = "opt_string")]
    pub frequencia: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub observacao: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub ativo: bool,
    #[serde(default, deserialize_with = "flag")]
    pub checkin_fechado: bool,
    #[serde(default)]
    pub cidade_id: Option<i64>,
    /// Zona o bairro principal de la rota, cuando el backend lo informa
    #[serde(default, deserialize_with = "opt_string")]
    pub zona: Option<String>,
}

/// Cliente tal como viene dentro de `/rotas-entregas`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Cliente {
    pub id: i64,
    pub nome: String,
    #[serde(default, deserialize_with = "opt_string")]
    pub cpf_cnpj: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub telefone: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub telefone2: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub endereco: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub numero: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub complemento: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub bairro: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub cep: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub observacao: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub ativo: bool,
    // Coordenadas para GPS (llegan como texto)
    #[serde(default, deserialize_with = "opt_string")]
    pub latitude: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub longitude: Option<String>,
    // Perfil comercial
    #[serde(default, deserialize_with = "flag")]
    pub revendedor_agua: bool,
    #[serde(default, deserialize_with = "flag")]
    pub revendedor_xarope: bool,
    #[serde(default, deserialize_with = "flag")]
    pub cf_agua: bool,
    #[serde(default, deserialize_with = "flag")]
    pub cf_xarope: bool,
    #[serde(default, deserialize_with = "flag")]
    pub precoespecial_agua: bool,
    #[serde(default, deserialize_with = "flag")]
    pub precoespecial_xarope: bool,
}

impl Cliente {
    /// Dirección de una línea: "Rua X, 123 - Bairro"
    pub fn endereco_completo(&self) -> String {
        let rua = self.endereco.as_deref().unwrap_or_default();
        let numero = self.numero.as_deref().unwrap_or("s/n");
        match self.bairro.as_deref() {
            Some(bairro) => format!("{}, {} - {}", rua, numero, bairro),
            None => format!("{}, {}", rua, numero),
        }
    }

    /// Primer teléfono disponible
    pub fn telefone_principal(&self) -> String {
        self.telefone
            .clone()
            .or_else(|| self.telefone2.clone())
            .unwrap_or_default()
    }
}

/// Relación entre rota y cliente
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RotaEntrega {
    pub id: i64,
    #[serde(default)]
    pub sequencia: i64,
    #[serde(default)]
    pub num_garrafas: u32,
    #[serde(default)]
    pub num_garrafas_comprada: u32,
    pub rota_id: i64,
    pub cliente_id: i64,
}

/// Registro combinado devuelto por `/rotas-entregas`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RotaEntregaCompleta {
    pub rotaentrega: RotaEntrega,
    pub cliente: Cliente,
    pub rota: Rota,
    #[serde(default)]
    pub diassematendimento: Vec<String>,
    #[serde(default)]
    pub diassemconsumo: Vec<String>,
}

/// Estadísticas de la rota (calculadas en el cliente)
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub struct RotaStats {
    pub total_clientes: usize,
    pub pendentes: usize,
    pub concluidas: usize,
    pub total_garrafas: u32,
}

/// Prioridad del cliente según urgencia
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum PrioridadeCliente {
    Baixa,
    Normal,
    Urgente,
}

/// Status de entrega en vocabulario de rutas
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusEntrega {
    Pendente,
    Concluida,
    Falhou,
}

/// View model de la tarjeta de cliente en el detalle de rota
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClienteCardView {
    pub id: i64,
    pub sequencia: i64,
    pub nome: String,
    pub rota_nome: String,
    pub horario: String,
    pub endereco: String,
    pub telefone: String,
    pub garrafas: u32,
    pub observacao: Option<String>,
    pub prioridade: PrioridadeCliente,
    pub status: StatusEntrega,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// Estado de la rota en la pantalla de rutas
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RouteProgress {
    Pending,
    InProgress,
    Completed,
}

impl RouteProgress {
    pub fn label(&self) -> &'static str {
        match self {
            RouteProgress::Pending => "Pendente",
            RouteProgress::InProgress => "Em Andamento",
            RouteProgress::Completed => "Concluída",
        }
    }
}

/// Rota + datos derivados para la lista de rutas
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub rota: Rota,
    pub pending_deliveries: usize,
    pub status: RouteProgress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rota_entrega_completa_from_api() {
        let json = r#"{
            "rotaentrega": {"id": 10, "sequencia": 2, "num_garrafas": 12, "num_garrafas_comprada": 3, "rota_id": 1, "cliente_id": 5},
            "cliente": {"id": 5, "nome": "Bar do Zé", "telefone": 11988887777, "endereco": "Rua A", "numero": "10",
                        "bairro": "Centro", "ativo": 1, "cf_agua": true, "latitude": "-23.5", "longitude": "-46.6"},
            "rota": {"id": 1, "nome": "Rota A", "frequencia": "Segunda e Quarta", "observacao": "", "ativo": 1,
                     "checkin_fechado": 0, "cidade_id": 3},
            "diassematendimento": ["Segunda", "Quarta"],
            "diassemconsumo": []
        }"#;

        let item: RotaEntregaCompleta = serde_json::from_str(json).unwrap();
        assert_eq!(item.rotaentrega.num_garrafas, 12);
        assert_eq!(item.cliente.telefone.as_deref(), Some("11988887777"));
        assert!(item.cliente.cf_agua);
        assert!(!item.cliente.revendedor_xarope);
        assert!(item.rota.ativo);
        assert_eq!(item.rota.observacao, None);
        assert_eq!(item.cliente.endereco_completo(), "Rua A, 10 - Centro");
    }

    #[test]
    fn test_prioridade_ordering() {
        assert!(PrioridadeCliente::Urgente > PrioridadeCliente::Normal);
        assert!(PrioridadeCliente::Normal > PrioridadeCliente::Baixa);
    }
}
