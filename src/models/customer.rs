//! Modelo de clientes del roster de xarope y del cadastro de nuevos clientes

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::serde_helpers::{flag, opt_string};
use crate::utils::validation::{validate_cep, validate_not_empty, validate_phone};

/// Cliente de `/clientes/xarope/{vendedorId}`, con los campos derivados que arma el servicio
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ClienteXarope {
    pub id: i64,
    #[serde(default, deserialize_with = "opt_string")]
    pub nome: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub razaosocial: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub fone: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub celular: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub celular2: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub rua: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub numero: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub bairro: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub cidade: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub cep: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub latitude: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub longitude: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub observacao: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub ativo: bool,
    #[serde(default, deserialize_with = "flag")]
    pub cf_agua: bool,
    #[serde(default, deserialize_with = "flag")]
    pub revendedor_xarope: bool,
    #[serde(default, deserialize_with = "flag")]
    pub precoespecial_xarope: bool,
    #[serde(default, deserialize_with = "opt_string")]
    pub ultima_entrega: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub proxima_entrega: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub tipo_contrato: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub produto_preferido: Option<String>,
}

impl ClienteXarope {
    /// Nombre para mostrar: nome o, si falta, razón social
    pub fn display_name(&self) -> &str {
        self.nome
            .as_deref()
            .or(self.razaosocial.as_deref())
            .unwrap_or("Cliente sem nome")
    }

    /// Búsqueda case-insensitive por nome, razão social, telefones, rua y bairro
    pub fn matches(&self, termo: &str) -> bool {
        let termo = termo.to_lowercase();
        [
            &self.nome,
            &self.razaosocial,
            &self.fone,
            &self.celular2,
            &self.rua,
            &self.bairro,
        ]
        .iter()
        .any(|field| {
            field
                .as_deref()
                .map_or(false, |value| value.to_lowercase().contains(&termo))
        })
    }
}

/// Tipos de contrato ofrecidos en el cadastro
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TipoContrato {
    #[serde(rename = "Comodato Semanal")]
    ComodatoSemanal,
    #[serde(rename = "Comodato Quinzenal")]
    ComodatoQuinzenal,
    #[serde(rename = "Comodato Mensal")]
    ComodatoMensal,
    #[serde(rename = "Venda Direta")]
    VendaDireta,
}

impl TipoContrato {
    pub const ALL: [TipoContrato; 4] = [
        TipoContrato::ComodatoSemanal,
        TipoContrato::ComodatoQuinzenal,
        TipoContrato::ComodatoMensal,
        TipoContrato::VendaDireta,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TipoContrato::ComodatoSemanal => "Comodato Semanal",
            TipoContrato::ComodatoQuinzenal => "Comodato Quinzenal",
            TipoContrato::ComodatoMensal => "Comodato Mensal",
            TipoContrato::VendaDireta => "Venda Direta",
        }
    }
}

/// Formulario de cadastro de cliente (un contrato nuevo)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ClienteCadastroPayload {
    #[validate(custom = "validate_not_empty", length(max = 120))]
    pub nome: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,

    #[validate(custom = "validate_phone")]
    pub telefone: String,

    #[validate(custom = "validate_not_empty")]
    pub endereco: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bairro: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidade: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_cep")]
    pub cep: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub referencia: Option<String>,

    pub tipo_contrato: TipoContrato,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendedor_id: Option<i64>,
}

/// Estructura que exige `/contratos/v2/cadastro-de-clientes`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CadastroContratosPayload {
    pub contratos: ContratosLote,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContratosLote {
    pub novos_contratos: Vec<ClienteCadastroPayload>,
    pub alteracao_contrato: Vec<serde_json::Value>,
    pub inativacoes: Vec<serde_json::Value>,
}

impl CadastroContratosPayload {
    /// Envolver un único cadastro en el lote que espera el backend
    pub fn novo_contrato(payload: ClienteCadastroPayload) -> Self {
        Self {
            contratos: ContratosLote {
                novos_contratos: vec![payload],
                ..Default::default()
            },
        }
    }
}
