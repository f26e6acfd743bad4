//! Servicio de clientes
//!
//! Roster de clientes de xarope enriquecido con el historial de ventas del
//! vendedor, y cadastro de clientes nuevos por el endpoint de contratos.

use chrono::NaiveDateTime;
use tracing::{info, warn};
use validator::Validate;

use crate::clients::{endpoints, SodaApiClient};
use crate::models::{CadastroContratosPayload, ClienteCadastroPayload, ClienteXarope, Venda};
use crate::utils::errors::AppResult;

pub const SEM_ULTIMA_ENTREGA: &str = "Não temos ultima entrega";
pub const SEM_PROXIMA_ENTREGA: &str = "Não temos proxima entrega";

/// Vendedores con id ≤ 1 son el modo distribuidor: el backend responde 500 al historial
const PRIMEIRO_VENDEDOR_COM_HISTORICO: i64 = 2;

#[derive(Clone)]
pub struct CustomerService {
    api: SodaApiClient,
}

impl CustomerService {
    pub fn new(api: SodaApiClient) -> Self {
        Self { api }
    }

    /// Roster de clientes activos con los campos derivados ya resueltos.
    ///
    /// Clientes y ventas se piden en paralelo; si el historial de ventas falla
    /// se sigue con una lista vacía, pero un error en los clientes se propaga.
    pub async fn clientes_xarope(&self, vendedor_id: i64) -> AppResult<Vec<ClienteXarope>> {
        let clientes_path = endpoints::clientes_xarope(vendedor_id);
        let (clientes, vendas_vendedor, vendas_pendentes) = tokio::join!(
            self.api.get_json::<Vec<ClienteXarope>>(&clientes_path),
            self.historico(vendedor_id, endpoints::vendas_vendedor(vendedor_id)),
            self.historico(vendedor_id, endpoints::vendas_pendentes(vendedor_id)),
        );

        let clientes = clientes?;
        let vendas: Vec<Venda> = vendas_vendedor.into_iter().chain(vendas_pendentes).collect();

        let roster = enriquecer_clientes(clientes, &vendas);
        info!("👥 {} clientes activos cargados para vendedor {}", roster.len(), vendedor_id);
        Ok(roster)
    }

    async fn historico(&self, vendedor_id: i64, path: String) -> Vec<Venda> {
        if vendedor_id < PRIMEIRO_VENDEDOR_COM_HISTORICO {
            return Vec::new();
        }
        match self.api.get_json::<Vec<Venda>>(&path).await {
            Ok(vendas) => vendas,
            Err(e) => {
                warn!("⚠️ Historial de ventas no disponible ({}): {}", path, e);
                Vec::new()
            }
        }
    }

    /// Cadastrar un cliente nuevo como contrato
    pub async fn cadastrar_cliente(&self, payload: ClienteCadastroPayload) -> AppResult<serde_json::Value> {
        payload.validate()?;

        let nome = payload.nome.clone();
        let body = CadastroContratosPayload::novo_contrato(payload);
        let response = self
            .api
            .post_json(endpoints::CONTRATOS_V2_CADASTRO_CLIENTES, &body)
            .await?;

        info!("✅ Cliente '{}' cadastrado", nome);
        Ok(response)
    }
}

/// Filtrar activos y completar los campos que el backend puede omitir
pub fn enriquecer_clientes(clientes: Vec<ClienteXarope>, vendas: &[Venda]) -> Vec<ClienteXarope> {
    clientes
        .into_iter()
        .filter(|c| c.ativo)
        .map(|mut cliente| {
            if cliente.ultima_entrega.is_none() {
                cliente.ultima_entrega = ultima_venda(vendas, cliente.id);
            }
            cliente.ultima_entrega.get_or_insert_with(|| SEM_ULTIMA_ENTREGA.to_string());
            cliente.proxima_entrega.get_or_insert_with(|| SEM_PROXIMA_ENTREGA.to_string());

            if cliente.tipo_contrato.is_none() {
                cliente.tipo_contrato = Some(tipo_contrato_padrao(&cliente).to_string());
            }
            if cliente.produto_preferido.is_none() {
                cliente.produto_preferido = Some(produto_preferido_padrao(&cliente).to_string());
            }
            cliente
        })
        .collect()
}

/// `data_venda` de la venta más reciente del cliente
fn ultima_venda(vendas: &[Venda], cliente_id: i64) -> Option<String> {
    vendas
        .iter()
        .filter(|v| v.cliente_id == cliente_id)
        .max_by_key(|v| v.data().unwrap_or(NaiveDateTime::MIN))
        .map(|v| v.data_venda.clone())
}

fn tipo_contrato_padrao(cliente: &ClienteXarope) -> &'static str {
    let semanal = cliente
        .observacao
        .as_deref()
        .map_or(false, |o| o.contains("Semanal"));
    if semanal {
        "Comodato Semanal"
    } else {
        "Comodato Quinzenal"
    }
}

fn produto_preferido_padrao(cliente: &ClienteXarope) -> &'static str {
    if cliente.cf_agua {
        "Água com Gás 20L"
    } else {
        "Xarope de Cola"
    }
}

/// Búsqueda del roster; término vacío devuelve todos
pub fn filtrar_clientes(clientes: &[ClienteXarope], termo: &str) -> Vec<ClienteXarope> {
    if termo.is_empty() {
        return clientes.to_vec();
    }
    clientes.iter().filter(|c| c.matches(termo)).cloned().collect()
}
