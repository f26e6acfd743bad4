//! Modelo de entregas y check-in
//!
//! `Delivery` es el view model que la pantalla de entregas arma a partir de
//! `RotaEntregaCompleta`; `DeliveryStatusData` es lo que el check-in guarda localmente.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resultado del check-in en la visita
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CheckInStatus {
    Delivered,
    NoSale,
    AbsentReturn,
    AbsentNoReturn,
}

impl CheckInStatus {
    pub const ALL: [CheckInStatus; 4] = [
        CheckInStatus::Delivered,
        CheckInStatus::NoSale,
        CheckInStatus::AbsentReturn,
        CheckInStatus::AbsentNoReturn,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CheckInStatus::Delivered => "Entregue",
            CheckInStatus::NoSale => "Não quis consumir",
            CheckInStatus::AbsentReturn => "Ausente - Retornar",
            CheckInStatus::AbsentNoReturn => "Ausente - Não retornar",
        }
    }

    /// Mensaje del toast al cerrar el check-in
    pub fn completion_message(&self) -> &'static str {
        match self {
            CheckInStatus::Delivered => "Entrega realizada com sucesso!",
            CheckInStatus::NoSale => "Cliente não quis consumir",
            CheckInStatus::AbsentReturn => "Cliente ausente - Retornar",
            CheckInStatus::AbsentNoReturn => "Cliente ausente - Não retornar",
        }
    }

    /// Solo con el cliente presente se pregunta si hubo venta
    pub fn asks_for_sale(&self) -> bool {
        matches!(self, CheckInStatus::Delivered | CheckInStatus::NoSale)
    }

    /// Estado de la entrega que resulta de este check-in
    pub fn delivery_status(&self) -> DeliveryStatus {
        match self {
            CheckInStatus::Delivered | CheckInStatus::NoSale => DeliveryStatus::Completed,
            CheckInStatus::AbsentReturn | CheckInStatus::AbsentNoReturn => DeliveryStatus::Failed,
        }
    }
}

/// Registro de check-in guardado por id de entrega
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStatusData {
    pub check_in_status: Option<CheckInStatus>,
    pub had_sale: Option<bool>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl DeliveryStatusData {
    /// Registro completo con timestamp de ahora
    pub fn now(status: CheckInStatus, had_sale: bool) -> Self {
        Self {
            check_in_status: Some(status),
            had_sale: Some(had_sale),
            timestamp: Some(Utc::now()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryPriority {
    Low,
    Medium,
    High,
}

impl DeliveryPriority {
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryPriority::High => "Alta",
            DeliveryPriority::Medium => "Média",
            DeliveryPriority::Low => "Baixa",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bottles {
    pub quantity: u32,
    pub size: String,
}

/// Entrega para las pantallas de entregas / detalle de rota / check-in / PDV
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: String,
    pub order_id: String,
    pub order_code: String,
    pub customer_id: i64,
    pub customer_name: String,
    pub customer_phone: String,
    pub address: String,
    pub bottles: Bottles,
    pub status: DeliveryStatus,
    pub priority: DeliveryPriority,
    pub estimated_time: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub route_name: String,
    pub notes: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl Delivery {
    /// Aplicar el check-in local sobre el estado base de la entrega
    pub fn with_status(mut self, data: Option<&DeliveryStatusData>) -> Self {
        if let Some(status) = data.and_then(|d| d.check_in_status) {
            self.status = status.delivery_status();
            self.completed_at = data.and_then(|d| d.timestamp);
        }
        self
    }

    /// Zona tomada del final de la dirección ("Rua X, 10 - Centro" → "Centro")
    pub fn zone(&self) -> &str {
        self.address
            .split(" - ")
            .nth(1)
            .unwrap_or("Zona não especificada")
    }
}

/// Rota armada en el cliente para el detalle (puede ser de una sola entrega)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedRoute {
    pub id: String,
    pub name: String,
    pub zone: String,
    pub deliveries: Vec<Delivery>,
}

impl SelectedRoute {
    /// Rota individual creada al elegir una entrega en la pantalla de entregas
    pub fn single(delivery: Delivery) -> Self {
        let name = if delivery.route_name.is_empty() {
            "Rota Individual".to_string()
        } else {
            delivery.route_name.clone()
        };
        Self {
            id: format!("route-{}", delivery.id),
            name,
            zone: delivery.zone().to_string(),
            deliveries: vec![delivery],
        }
    }

    pub fn is_single_delivery(&self) -> bool {
        self.deliveries.len() == 1
    }
}

/// Entrada del historial corto de check-ins de la pantalla de check-in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRecord {
    pub id: String,
    pub delivery_id: String,
    pub customer_name: String,
    pub address: String,
    pub status: CheckInStatus,
    pub had_sale: bool,
    pub timestamp: DateTime<Utc>,
}

/// Cuerpo de `POST /checkin/{vendedorId}` cuando la sincronización está activa
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckInSyncPayload {
    pub rotaentrega_id: String,
    pub cliente_id: i64,
    pub status: CheckInStatus,
    pub houve_venda: bool,
    /// "yyyy-MM-dd HH:mm:ss"
    pub data_checkin: String,
}
