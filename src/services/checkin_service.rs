//! Check-in de la visita
//!
//! El resultado se guarda en el `DeliveryStore` local, que es la fuente de verdad.
//! Con `CHECKIN_SYNC=true` además se envía a `/checkin/{vendedorId}`; si ese
//! envío falla el registro local se mantiene.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::clients::{endpoints, SodaApiClient};
use crate::models::{CheckInRecord, CheckInStatus, CheckInSyncPayload, Delivery, DeliveryStatusData};
use crate::stores::{DeliveryStore, Screen};
use crate::utils::errors::AppResult;
use crate::utils::validation::API_DATETIME_FORMAT;

/// Próximo paso después de elegir el resultado de la visita
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInStep {
    /// Cliente presente: falta preguntar si hubo venta
    AskSale(CheckInStatus),
    /// Cliente ausente: se cierra sin venta
    Finish { status: CheckInStatus, had_sale: bool },
}

pub fn choose_status(status: CheckInStatus) -> CheckInStep {
    if status.asks_for_sale() {
        CheckInStep::AskSale(status)
    } else {
        CheckInStep::Finish {
            status,
            had_sale: false,
        }
    }
}

/// Resultado de cerrar un check-in
#[derive(Debug, Clone, PartialEq)]
pub struct CheckInOutcome {
    pub next_screen: Screen,
    pub message: &'static str,
    pub synced: bool,
}

#[derive(Clone)]
pub struct CheckInService {
    api: SodaApiClient,
    deliveries: Arc<DeliveryStore>,
    sync: bool,
}

impl CheckInService {
    pub fn new(api: SodaApiClient, deliveries: Arc<DeliveryStore>, sync: bool) -> Self {
        Self { api, deliveries, sync }
    }

    /// Registrar el check-in y decidir a qué pantalla seguir:
    /// PDV de la entrega si hubo venta, detalle de ruta si no.
    pub async fn complete_checkin(
        &self,
        vendedor_id: i64,
        delivery: &Delivery,
        status: CheckInStatus,
        had_sale: bool,
    ) -> CheckInOutcome {
        let had_sale = had_sale && status.asks_for_sale();
        let data = DeliveryStatusData::now(status, had_sale);
        let timestamp = data.timestamp.unwrap_or_else(Utc::now);

        self.deliveries.set(&delivery.id, data).await;
        self.deliveries
            .push_recent(CheckInRecord {
                id: Uuid::new_v4().to_string(),
                delivery_id: delivery.id.clone(),
                customer_name: delivery.customer_name.clone(),
                address: delivery.address.clone(),
                status,
                had_sale,
                timestamp,
            })
            .await;

        info!(
            "📍 Check-in {} para {} ({}), venta: {}",
            delivery.id,
            delivery.customer_name,
            status.label(),
            had_sale
        );

        let synced = if self.sync {
            let payload = CheckInSyncPayload {
                rotaentrega_id: delivery.id.clone(),
                cliente_id: delivery.customer_id,
                status,
                houve_venda: had_sale,
                data_checkin: timestamp.format(API_DATETIME_FORMAT).to_string(),
            };
            match self.sync_checkin(vendedor_id, &payload).await {
                Ok(()) => true,
                Err(e) => {
                    warn!("⚠️ Check-in {} guardado solo localmente: {}", delivery.id, e);
                    false
                }
            }
        } else {
            false
        };

        CheckInOutcome {
            next_screen: if had_sale { Screen::PdvDelivery } else { Screen::RouteDetails },
            message: status.completion_message(),
            synced,
        }
    }

    async fn sync_checkin(&self, vendedor_id: i64, payload: &CheckInSyncPayload) -> AppResult<()> {
        let _: serde_json::Value = self
            .api
            .post_json(&endpoints::checkin(vendedor_id), payload)
            .await?;
        Ok(())
    }

    /// Check-ins del día registrados en el backend
    pub async fn fetch_checkins(&self, vendedor_id: i64) -> AppResult<Vec<serde_json::Value>> {
        let checkins: Option<Vec<serde_json::Value>> =
            self.api.get_json(&endpoints::checkin_full(vendedor_id)).await?;
        Ok(checkins.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choose_status() {
        assert_eq!(
            choose_status(CheckInStatus::Delivered),
            CheckInStep::AskSale(CheckInStatus::Delivered)
        );
        assert_eq!(
            choose_status(CheckInStatus::NoSale),
            CheckInStep::AskSale(CheckInStatus::NoSale)
        );
        assert_eq!(
            choose_status(CheckInStatus::AbsentReturn),
            CheckInStep::Finish {
                status: CheckInStatus::AbsentReturn,
                had_sale: false
            }
        );
    }
}
