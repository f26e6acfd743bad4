//! Servicio de ventas
//!
//! Catálogo del PDV (productos, formas de pago, promociones), envío de
//! ventas y pedidos, y el historial de ventas del vendedor.

use serde_json::json;
use tracing::{info, warn};

use crate::clients::{endpoints, SodaApiClient};
use crate::models::{MeioPagamento, Produto, Promocao, Venda, VendaResponse};
use crate::pdv::catalog::Catalogo;
use crate::utils::errors::{invalid_input_error, AppResult};

/// Destino del envío: venta inmediata o pedido para entregar después
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TipoEnvio {
    #[default]
    Venda,
    Pedido,
}

impl TipoEnvio {
    pub fn endpoint(&self) -> &'static str {
        match self {
            TipoEnvio::Venda => endpoints::VENDA_XAROPE_V2,
            TipoEnvio::Pedido => endpoints::PEDIDO_XAROPE_V2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TipoEnvio::Venda => "Venda",
            TipoEnvio::Pedido => "Pedido",
        }
    }
}

#[derive(Clone)]
pub struct SalesService {
    api: SodaApiClient,
}

impl SalesService {
    pub fn new(api: SodaApiClient) -> Self {
        Self { api }
    }

    pub async fn produtos(&self, vendedor_id: i64) -> AppResult<Vec<Produto>> {
        self.api.get_json(&endpoints::produtos(vendedor_id)).await
    }

    /// Formas de pago activas del distribuidor
    pub async fn meios_pagamento(&self, distribuidor_id: i64) -> AppResult<Vec<MeioPagamento>> {
        let meios: Vec<MeioPagamento> = self
            .api
            .get_json(&endpoints::meios_pagamento(distribuidor_id))
            .await?;
        Ok(meios.into_iter().filter(|m| m.ativo).collect())
    }

    pub async fn promocoes(&self, vendedor_id: i64) -> AppResult<Vec<Promocao>> {
        self.api.get_json(&endpoints::promocoes(vendedor_id)).await
    }

    /// Catálogo completo del PDV. Sin distribuidor no hay formas de pago que pedir.
    pub async fn catalogo(&self, vendedor_id: i64, distribuidor_id: Option<i64>) -> AppResult<Catalogo> {
        let meios = async {
            match distribuidor_id {
                Some(id) => self.meios_pagamento(id).await,
                None => {
                    warn!("⚠️ Sesión sin distribuidor, catálogo sin formas de pago");
                    Ok(Vec::new())
                }
            }
        };

        let (produtos, meios_pagamento, promocoes) =
            tokio::try_join!(self.produtos(vendedor_id), meios, self.promocoes(vendedor_id))?;

        info!(
            "🛒 Catálogo cargado: {} productos, {} formas de pago, {} promociones",
            produtos.len(),
            meios_pagamento.len(),
            promocoes.len()
        );
        Ok(Catalogo::new(produtos, meios_pagamento, promocoes))
    }

    /// Enviar una venta o un pedido
    pub async fn enviar(&self, venda: &Venda, tipo: TipoEnvio) -> AppResult<VendaResponse> {
        if venda.venda_item.is_empty() {
            return Err(invalid_input_error("Venda sem itens"));
        }

        let response: Option<VendaResponse> = self.api.post_json(tipo.endpoint(), venda).await?;
        let response = response.unwrap_or_default();
        info!(
            "💰 {} registrada para cliente {} (id: {:?})",
            tipo.label(),
            venda.cliente_id,
            response.id
        );
        Ok(response)
    }

    /// Cerrar una venta pendiente
    pub async fn finalizar_venda(&self, venda_id: i64) -> AppResult<serde_json::Value> {
        let response = self
            .api
            .post_json(&endpoints::finalizar_venda(venda_id), &json!({}))
            .await?;
        info!("✅ Venda {} finalizada", venda_id);
        Ok(response)
    }

    pub async fn vendas_vendedor(&self, vendedor_id: i64) -> AppResult<Vec<Venda>> {
        self.api.get_json(&endpoints::vendas_vendedor(vendedor_id)).await
    }

    pub async fn vendas_pendentes(&self, vendedor_id: i64) -> AppResult<Vec<Venda>> {
        self.api.get_json(&endpoints::vendas_pendentes(vendedor_id)).await
    }

    /// Historial de ventas de un cliente, más reciente primero
    pub async fn historico_cliente(&self, vendedor_id: i64, cliente_id: i64) -> AppResult<Vec<Venda>> {
        let mut vendas: Vec<Venda> = self
            .vendas_vendedor(vendedor_id)
            .await?
            .into_iter()
            .filter(|v| v.cliente_id == cliente_id)
            .collect();
        vendas.sort_by(|a, b| b.data().cmp(&a.data()));
        Ok(vendas)
    }
}
