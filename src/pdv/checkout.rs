//! Cierre de venta del PDV
//!
//! Valida carrito, cliente y forma de pago antes de enviar. Si el envío falla
//! el carrito queda intacto para reintentar a mano.

use chrono::Local;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info};

use crate::models::{ContasReceber, Delivery, Venda, VendaItem};
use crate::pdv::cart::Cart;
use crate::services::{SalesService, TipoEnvio};
use crate::utils::errors::AppError;
use crate::utils::money::format_brl;
use crate::utils::validation::API_DATETIME_FORMAT;

/// Cliente de mostrador, sin id en el roster
pub const CLIENTE_AVULSO_ID: i64 = 0;

/// Máximo de parcelas aceptado en el cierre
pub const MAX_PARCELAS: u32 = 12;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Adicione pelo menos um item ao carrinho")]
    EmptyCart,

    #[error("Informe o nome do cliente")]
    MissingCustomer,

    #[error("Selecione a forma de pagamento")]
    MissingPaymentMethod,

    #[error("Parcelas devem ficar entre 1 e {}", MAX_PARCELAS)]
    InvalidInstallments(u32),

    #[error("Erro ao registrar venda: {0}")]
    Submit(#[from] AppError),
}

impl CheckoutError {
    /// Texto del toast
    pub fn toast(&self) -> String {
        match self {
            CheckoutError::Submit(e) => format!("Erro ao registrar venda: {}", e.user_message()),
            other => other.to_string(),
        }
    }
}

/// Comprobante de una venta enviada
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    pub venda_id: Option<i64>,
    pub cliente_nome: String,
    pub total: Decimal,
    pub tipo: TipoEnvio,
}

impl CheckoutReceipt {
    pub fn toast(&self) -> String {
        format!(
            "{} realizada com sucesso! Cliente: {} Total: {}",
            self.tipo.label(),
            self.cliente_nome,
            format_brl(self.total)
        )
    }
}

/// Estado de una pantalla de PDV (suelta o de una entrega)
#[derive(Debug, Clone, Default)]
pub struct PdvSession {
    pub cart: Cart,
    pub cliente_id: Option<i64>,
    pub customer_name: String,
    pub meio_pagamento_id: Option<i64>,
    pub promocao_id: Option<i64>,
    pub parcelas: u32,
    pub tipo: TipoEnvio,
    pub is_processing: bool,
}

impl PdvSession {
    pub fn new() -> Self {
        Self {
            parcelas: 1,
            ..Default::default()
        }
    }

    /// PDV abierto desde una entrega: el cliente ya viene cargado
    pub fn for_delivery(delivery: &Delivery) -> Self {
        Self {
            cliente_id: Some(delivery.customer_id),
            customer_name: delivery.customer_name.clone(),
            ..Self::new()
        }
    }

    pub fn validate(&self) -> Result<i64, CheckoutError> {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if self.customer_name.trim().is_empty() {
            return Err(CheckoutError::MissingCustomer);
        }
        let meio_pagamento_id = self.meio_pagamento_id.ok_or(CheckoutError::MissingPaymentMethod)?;
        if !(1..=MAX_PARCELAS).contains(&self.parcelas) {
            return Err(CheckoutError::InvalidInstallments(self.parcelas));
        }
        Ok(meio_pagamento_id)
    }

    /// `Venda` lista para enviar
    pub fn build_venda(&self, vendedor_id: i64, meio_pagamento_id: i64) -> Venda {
        let venda_item = self
            .cart
            .lines()
            .iter()
            .map(|line| VendaItem {
                id: None,
                produto_id: line.produto.id,
                quantidade: line.quantidade,
                venda_id: None,
                valor_unitario: line.produto.preco,
                unidade_medida: line
                    .produto
                    .unidade_medida
                    .clone()
                    .unwrap_or_else(|| "UN".to_string()),
                desconto: Decimal::ZERO,
                acrescimo: Decimal::ZERO,
            })
            .collect();

        Venda {
            id: None,
            cliente_id: self.cliente_id.unwrap_or(CLIENTE_AVULSO_ID),
            data_venda: Local::now().format(API_DATETIME_FORMAT).to_string(),
            vendedor: Some(vendedor_id),
            promocao_id: self.promocao_id.map(|id| id.to_string()),
            cliente_nome: Some(self.customer_name.trim().to_string()),
            venda_item,
            contas_receber: Some(ContasReceber::dividir(
                self.cart.total(),
                self.parcelas,
                meio_pagamento_id,
            )),
        }
    }

    /// Validar, enviar y, solo si salió bien, limpiar carrito, cliente y forma de pago
    pub async fn finalize(
        &mut self,
        sales: &SalesService,
        vendedor_id: i64,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let meio_pagamento_id = self.validate()?;
        let venda = self.build_venda(vendedor_id, meio_pagamento_id);
        let total = self.cart.total();

        self.is_processing = true;
        let result = sales.enviar(&venda, self.tipo).await;
        self.is_processing = false;

        let response = result.map_err(|e| {
            error!("❌ Venda no registrada, el carrito se mantiene: {}", e);
            CheckoutError::Submit(e)
        })?;

        let receipt = CheckoutReceipt {
            venda_id: response.id,
            cliente_nome: self.customer_name.trim().to_string(),
            total,
            tipo: self.tipo,
        };
        info!("💰 {}", receipt.toast());

        self.cart.clear();
        self.customer_name.clear();
        self.meio_pagamento_id = None;
        self.promocao_id = None;
        self.parcelas = 1;
        Ok(receipt)
    }
}
