//! Contratos pendientes de firma y el link de WhatsApp para enviarlos.
//! La firma en sí la hace el cliente fuera de la aplicación.

use chrono::NaiveDate;
use tracing::info;

use crate::clients::{endpoints, SodaApiClient};
use crate::models::{ContractStatus, PendenciaContrato};
use crate::utils::errors::{invalid_input_error, AppResult};
use crate::utils::validation::{only_digits, validate_date};

const WHATSAPP_URL: &str = "https://wa.me/";

/// Contratos separados por estado
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContratosPorStatus {
    pub pendentes: Vec<PendenciaContrato>,
    pub assinados: Vec<PendenciaContrato>,
}

#[derive(Clone)]
pub struct ContractService {
    api: SodaApiClient,
}

impl ContractService {
    pub fn new(api: SodaApiClient) -> Self {
        Self { api }
    }

    pub async fn pendencias(&self, vendedor_id: i64) -> AppResult<ContratosPorStatus> {
        let contratos: Vec<PendenciaContrato> = self
            .api
            .get_json(&endpoints::pendencia_contrato(vendedor_id))
            .await?;
        let separados = separar_por_status(contratos);
        info!(
            "📄 {} contratos pendentes, {} assinados",
            separados.pendentes.len(),
            separados.assinados.len()
        );
        Ok(separados)
    }
}

pub fn separar_por_status(contratos: Vec<PendenciaContrato>) -> ContratosPorStatus {
    let (pendentes, assinados) = contratos
        .into_iter()
        .partition(|c| c.status == ContractStatus::Pending);
    ContratosPorStatus { pendentes, assinados }
}

/// Mensaje con el link de firma
pub fn mensagem_assinatura(cliente_nome: &str, link: &str) -> String {
    format!(
        "Olá {}! Seu contrato da Soda Cristal Tech está pronto para assinatura. Acesse o link: {}",
        cliente_nome, link
    )
}

/// Link `wa.me` con el mensaje de firma ya codificado
pub fn whatsapp_link(contrato: &PendenciaContrato) -> AppResult<String> {
    let telefone = contrato
        .telefone
        .as_deref()
        .map(only_digits)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| invalid_input_error("Contrato sem telefone"))?;
    let link = contrato
        .link
        .as_deref()
        .ok_or_else(|| invalid_input_error("Contrato sem link de assinatura"))?;

    let mensagem = mensagem_assinatura(&contrato.cliente_nome, link);
    Ok(format!("{}{}?text={}", WHATSAPP_URL, telefone, urlencoding::encode(&mensagem)))
}

/// Días desde la creación del contrato (None si la fecha no se entiende)
pub fn dias_desde_criacao(contrato: &PendenciaContrato, hoje: NaiveDate) -> Option<i64> {
    let criacao = validate_date(contrato.data_criacao.as_deref()?).ok()?;
    Some((hoje - criacao).num_days().abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contrato(id: i64, status: ContractStatus) -> PendenciaContrato {
        PendenciaContrato {
            id,
            cliente_nome: "Maria Santos".to_string(),
            telefone: Some("(11) 99999-5678".to_string()),
            tipo_contrato: "Comodato Semanal".to_string(),
            data_criacao: Some("2024-01-14".to_string()),
            status,
            link: Some("https://contracts.example/sign/def456".to_string()),
            aditivo: false,
        }
    }

    #[test]
    fn test_separar_por_status() {
        let separados = separar_por_status(vec![
            contrato(1, ContractStatus::Pending),
            contrato(2, ContractStatus::Signed),
            contrato(3, ContractStatus::Pending),
        ]);
        assert_eq!(separados.pendentes.len(), 2);
        assert_eq!(separados.assinados[0].id, 2);
    }

    #[test]
    fn test_whatsapp_link() {
        let link = whatsapp_link(&contrato(1, ContractStatus::Pending)).unwrap();
        assert!(link.starts_with("https://wa.me/11999995678?text="));
        assert!(link.contains("Ol%C3%A1%20Maria%20Santos%21"));
        assert!(link.contains("https%3A%2F%2Fcontracts.example%2Fsign%2Fdef456"));

        let mut sem_telefone = contrato(1, ContractStatus::Pending);
        sem_telefone.telefone = None;
        assert!(whatsapp_link(&sem_telefone).is_err());
    }

    #[test]
    fn test_dias_desde_criacao() {
        let hoje = NaiveDate::from_ymd_opt(2024, 1, 24).unwrap();
        assert_eq!(dias_desde_criacao(&contrato(1, ContractStatus::Pending), hoje), Some(10));
    }
}
