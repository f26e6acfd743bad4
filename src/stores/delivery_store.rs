//! Store de entregas
//!
//! Mapa local id de entrega → resultado del check-in. No valida transiciones:
//! la última escritura gana y no hay undo.

use std::collections::{HashMap, VecDeque};

use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{CheckInRecord, Delivery, DeliveryStatusData, SelectedRoute};

/// Cantidad de check-ins que muestra la pantalla de check-in
pub const RECENT_CHECK_INS: usize = 5;

#[derive(Debug, Default)]
struct DeliveryState {
    statuses: HashMap<String, DeliveryStatusData>,
    selected_delivery: Option<Delivery>,
    selected_route: Option<SelectedRoute>,
    recent: VecDeque<CheckInRecord>,
}

#[derive(Debug, Default)]
pub struct DeliveryStore {
    state: RwLock<DeliveryState>,
}

impl DeliveryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Guardar el resultado de una entrega (reemplaza el anterior)
    pub async fn set(&self, delivery_id: &str, status: DeliveryStatusData) {
        debug!("📝 Status de entrega {}: {:?}", delivery_id, status.check_in_status);
        self.state
            .write()
            .await
            .statuses
            .insert(delivery_id.to_string(), status);
    }

    pub async fn get(&self, delivery_id: &str) -> Option<DeliveryStatusData> {
        self.state.read().await.statuses.get(delivery_id).cloned()
    }

    /// Copia del mapa completo para las pantallas que cruzan listas con status
    pub async fn snapshot(&self) -> HashMap<String, DeliveryStatusData> {
        self.state.read().await.statuses.clone()
    }

    /// Entregas sin check-in
    pub async fn pending(&self, deliveries: &[Delivery]) -> Vec<Delivery> {
        let state = self.state.read().await;
        deliveries
            .iter()
            .filter(|d| !has_outcome(&state.statuses, &d.id))
            .cloned()
            .collect()
    }

    /// Entregas con check-in, con el status ya aplicado
    pub async fn processed(&self, deliveries: &[Delivery]) -> Vec<Delivery> {
        let state = self.state.read().await;
        deliveries
            .iter()
            .filter(|d| has_outcome(&state.statuses, &d.id))
            .map(|d| d.clone().with_status(state.statuses.get(&d.id)))
            .collect()
    }

    pub async fn selected_delivery(&self) -> Option<Delivery> {
        self.state.read().await.selected_delivery.clone()
    }

    pub async fn set_selected_delivery(&self, delivery: Option<Delivery>) {
        self.state.write().await.selected_delivery = delivery;
    }

    pub async fn selected_route(&self) -> Option<SelectedRoute> {
        self.state.read().await.selected_route.clone()
    }

    pub async fn set_selected_route(&self, route: Option<SelectedRoute>) {
        self.state.write().await.selected_route = route;
    }

    /// Elegir una entrega suelta desde la pantalla de entregas
    pub async fn select_single_delivery(&self, delivery: Delivery) {
        let mut state = self.state.write().await;
        state.selected_route = Some(SelectedRoute::single(delivery.clone()));
        state.selected_delivery = Some(delivery);
    }

    /// El detalle de ruta se abrió desde una sola entrega
    pub async fn is_single_delivery_route(&self) -> bool {
        let state = self.state.read().await;
        state.selected_delivery.is_some()
            && state
                .selected_route
                .as_ref()
                .map_or(false, SelectedRoute::is_single_delivery)
    }

    /// Agregar al historial corto (más reciente primero)
    pub async fn push_recent(&self, record: CheckInRecord) {
        let mut state = self.state.write().await;
        state.recent.push_front(record);
        state.recent.truncate(RECENT_CHECK_INS);
    }

    pub async fn recent_check_ins(&self) -> Vec<CheckInRecord> {
        self.state.read().await.recent.iter().cloned().collect()
    }

    /// Limpiar todo (logout)
    pub async fn reset(&self) {
        *self.state.write().await = DeliveryState::default();
    }
}

fn has_outcome(statuses: &HashMap<String, DeliveryStatusData>, delivery_id: &str) -> bool {
    statuses
        .get(delivery_id)
        .map_or(false, |s| s.check_in_status.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bottles, CheckInStatus, DeliveryPriority, DeliveryStatus};
    use chrono::Utc;

    fn delivery(id: &str) -> Delivery {
        Delivery {
            id: id.to_string(),
            order_id: format!("PED-{}", id),
            order_code: "SCT-1".to_string(),
            customer_id: 1,
            customer_name: "Cliente".to_string(),
            customer_phone: String::new(),
            address: "Rua A, 1 - Centro".to_string(),
            bottles: Bottles {
                quantity: 1,
                size: "20L".to_string(),
            },
            status: DeliveryStatus::Pending,
            priority: DeliveryPriority::Low,
            estimated_time: "08:00".to_string(),
            completed_at: None,
            route_name: "Rota A".to_string(),
            notes: None,
            latitude: None,
            longitude: None,
        }
    }

    fn record(n: usize) -> CheckInRecord {
        CheckInRecord {
            id: format!("r{}", n),
            delivery_id: n.to_string(),
            customer_name: "Cliente".to_string(),
            address: String::new(),
            status: CheckInStatus::Delivered,
            had_sale: false,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = DeliveryStore::new();
        assert!(store.get("10").await.is_none());

        store.set("10", DeliveryStatusData::now(CheckInStatus::AbsentReturn, false)).await;
        store.set("10", DeliveryStatusData::now(CheckInStatus::Delivered, true)).await;

        let status = store.get("10").await.unwrap();
        assert_eq!(status.check_in_status, Some(CheckInStatus::Delivered));
        assert_eq!(status.had_sale, Some(true));

        // Sin validación de transiciones: se puede volver a "ausente"
        store.set("10", DeliveryStatusData::now(CheckInStatus::AbsentNoReturn, false)).await;
        assert_eq!(
            store.get("10").await.unwrap().check_in_status,
            Some(CheckInStatus::AbsentNoReturn)
        );
    }

    #[tokio::test]
    async fn test_pending_and_processed() {
        let store = DeliveryStore::new();
        let deliveries = vec![delivery("1"), delivery("2"), delivery("3")];
        store.set("2", DeliveryStatusData::now(CheckInStatus::AbsentReturn, false)).await;
        store.set("3", DeliveryStatusData::default()).await;

        let pending: Vec<String> = store.pending(&deliveries).await.into_iter().map(|d| d.id).collect();
        assert_eq!(pending, vec!["1", "3"]);

        let processed = store.processed(&deliveries).await;
        assert_eq!(processed.len(), 1);
        assert_eq!(processed[0].status, DeliveryStatus::Failed);
    }

    #[tokio::test]
    async fn test_recent_check_ins_capped() {
        let store = DeliveryStore::new();
        for n in 0..7 {
            store.push_recent(record(n)).await;
        }
        let recent = store.recent_check_ins().await;
        assert_eq!(recent.len(), RECENT_CHECK_INS);
        assert_eq!(recent[0].id, "r6");
        assert_eq!(recent[4].id, "r2");
    }

    #[tokio::test]
    async fn test_single_delivery_selection() {
        let store = DeliveryStore::new();
        assert!(!store.is_single_delivery_route().await);

        store.select_single_delivery(delivery("10")).await;
        assert!(store.is_single_delivery_route().await);
        assert_eq!(store.selected_route().await.unwrap().id, "route-10");

        store.reset().await;
        assert!(store.selected_delivery().await.is_none());
    }
}
