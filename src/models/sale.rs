//! Modelo de ventas (PDV) y catálogo
//!
//! `Venda` es tanto lo que devuelve `/vendas_vendedor` como lo que se envía a
//! `/vendaxarope/v2` y `/pedidoxarope/v2`.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::money;
use crate::utils::serde_helpers::{flag, opt_i64, opt_string};
use crate::utils::validation::validate_api_datetime;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Venda {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub cliente_id: i64,
    /// "yyyy-MM-dd HH:mm:ss"
    pub data_venda: String,
    #[serde(default, deserialize_with = "opt_i64")]
    pub vendedor: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "opt_string")]
    pub promocao_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "opt_string")]
    pub cliente_nome: Option<String>,
    #[serde(default)]
    pub venda_item: Vec<VendaItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contas_receber: Option<ContasReceber>,
}

impl Venda {
    /// Fecha de la venta ya parseada (None si el backend mandó algo ilegible)
    pub fn data(&self) -> Option<NaiveDateTime> {
        validate_api_datetime(&self.data_venda).ok()
    }

    /// Total de los ítems (precio × cantidad − desconto + acréscimo)
    pub fn total_itens(&self) -> Decimal {
        self.venda_item.iter().map(VendaItem::subtotal).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VendaItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub produto_id: i64,
    pub quantidade: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venda_id: Option<i64>,
    #[serde(with = "money::flexible")]
    pub valor_unitario: Decimal,
    #[serde(default = "default_unidade")]
    pub unidade_medida: String,
    #[serde(default, with = "money::flexible")]
    pub desconto: Decimal,
    #[serde(default, with = "money::flexible")]
    pub acrescimo: Decimal,
}

impl VendaItem {
    pub fn subtotal(&self) -> Decimal {
        self.valor_unitario * Decimal::from(self.quantidade) - self.desconto + self.acrescimo
    }
}

fn default_unidade() -> String {
    "UN".to_string()
}

/// Conta a receber de la venta, dividida en parcelas
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContasReceber {
    #[serde(with = "money::as_text")]
    pub valor: Decimal,
    #[serde(default)]
    pub parcelas: Vec<Parcela>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Parcela {
    #[serde(default, deserialize_with = "flag")]
    pub recebido: bool,
    #[serde(with = "money::as_text")]
    pub valor: Decimal,
    pub meio_pagamento_id: i64,
}

impl ContasReceber {
    /// Dividir el total en `parcelas` cuotas; el resto del redondeo va a la última.
    /// Una venta a la vista (1 parcela) se marca como recibida.
    pub fn dividir(total: Decimal, parcelas: u32, meio_pagamento_id: i64) -> Self {
        let total = money::to_cents(total);
        let count = parcelas.max(1);
        let base = money::to_cents(
            (total / Decimal::from(count)).round_dp_with_strategy(2, rust_decimal::RoundingStrategy::ToZero),
        );

        let mut lista: Vec<Parcela> = (0..count)
            .map(|_| Parcela {
                recebido: count == 1,
                valor: base,
                meio_pagamento_id,
            })
            .collect();

        let distribuido = base * Decimal::from(count - 1);
        if let Some(ultima) = lista.last_mut() {
            ultima.valor = money::to_cents(total - distribuido);
        }

        Self {
            valor: total,
            parcelas: lista,
        }
    }
}

/// Producto del catálogo (`/produtos/{vendedorId}`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Produto {
    pub id: i64,
    pub nome: String,
    #[serde(with = "money::flexible")]
    pub preco: Decimal,
    #[serde(default, deserialize_with = "opt_string")]
    pub categoria: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub unidade_medida: Option<String>,
}

impl Produto {
    pub fn categoria_label(&self) -> &str {
        self.categoria.as_deref().unwrap_or("Outros")
    }
}

/// Forma de pago (`/meiospagamento/{distribuidorId}`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeioPagamento {
    pub id: i64,
    pub descricao: String,
    #[serde(default = "default_true", deserialize_with = "flag")]
    pub ativo: bool,
}

fn default_true() -> bool {
    true
}

/// Promoción vigente (`/promocoes/{vendedorId}`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Promocao {
    pub id: i64,
    pub descricao: String,
    #[serde(default, deserialize_with = "opt_i64")]
    pub produto_id: Option<i64>,
    #[serde(default, with = "money::flexible")]
    pub desconto: Decimal,
}

/// Respuesta del POST de venta/pedido
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VendaResponse {
    #[serde(default, deserialize_with = "opt_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "opt_string")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dividir_uma_parcela() {
        let contas = ContasReceber::dividir(Decimal::new(32, 0), 1, 3);
        assert_eq!(contas.valor, Decimal::new(3200, 2));
        assert_eq!(contas.parcelas.len(), 1);
        assert!(contas.parcelas[0].recebido);
        assert_eq!(contas.parcelas[0].valor, Decimal::new(3200, 2));
    }

    #[test]
    fn test_dividir_resto_na_ultima() {
        let contas = ContasReceber::dividir(Decimal::new(100, 0), 3, 2);
        let valores: Vec<Decimal> = contas.parcelas.iter().map(|p| p.valor).collect();
        assert_eq!(
            valores,
            vec![Decimal::new(3333, 2), Decimal::new(3333, 2), Decimal::new(3334, 2)]
        );
        assert!(contas.parcelas.iter().all(|p| !p.recebido));
        let soma: Decimal = valores.iter().sum();
        assert_eq!(soma, contas.valor);
    }

    #[test]
    fn test_dividir_zero_parcelas_vira_uma() {
        let contas = ContasReceber::dividir(Decimal::new(10, 0), 0, 1);
        assert_eq!(contas.parcelas.len(), 1);
    }

    #[test]
    fn test_venda_from_api() {
        let json = r#"{
            "id": 99, "cliente_id": 5, "data_venda": "2024-01-24 14:30:00", "vendedor": "7",
            "venda_item": [
                {"id": 1, "produto_id": 1, "quantidade": 2, "venda_id": 99, "valor_unitario": "8.50",
                 "unidade_medida": "UN", "desconto": 0, "acrescimo": 0}
            ],
            "contas_receber": {"valor": "17.00", "parcelas": [{"recebido": 1, "valor": "17.00", "meio_pagamento_id": 1}]}
        }"#;
        let venda: Venda = serde_json::from_str(json).unwrap();
        assert_eq!(venda.vendedor, Some(7));
        assert_eq!(venda.total_itens(), Decimal::new(1700, 2));
        assert!(venda.contas_receber.as_ref().unwrap().parcelas[0].recebido);
        assert!(venda.data().is_some());
    }
}
