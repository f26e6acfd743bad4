//! Store de rutas
//!
//! Rutas del vendedor, ruta actual y clientes cargados. `rotas` y `clientes_rota`
//! tienen cada uno su secuencia de carga: una respuesta vieja se descarta solo si
//! empezó otra carga del mismo campo.

use futures::future::try_join_all;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::models::{Rota, RotaEntregaCompleta};
use crate::services::route_service::{filtrar_por_dia, RouteService};
use crate::stores::load_sequence::{InFlight, LoadSequence};
use crate::utils::errors::AppResult;

/// Snapshot del estado para las pantallas
#[derive(Debug, Clone, Default)]
pub struct RouteState {
    pub rotas: Vec<Rota>,
    pub rota_atual: Option<Rota>,
    pub clientes_rota: Vec<RotaEntregaCompleta>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Tickets de una carga, uno por campo que escribe
#[derive(Debug, Clone, Copy, Default)]
struct Tickets {
    rotas: Option<u64>,
    clientes: Option<u64>,
}

pub struct RouteStore {
    service: RouteService,
    state: RwLock<RouteState>,
    rotas_seq: LoadSequence,
    clientes_seq: LoadSequence,
    in_flight: InFlight,
}

impl RouteStore {
    pub fn new(service: RouteService) -> Self {
        Self {
            service,
            state: RwLock::new(RouteState::default()),
            rotas_seq: LoadSequence::new(),
            clientes_seq: LoadSequence::new(),
            in_flight: InFlight::new(),
        }
    }

    pub async fn snapshot(&self) -> RouteState {
        self.state.read().await.clone()
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }

    async fn begin_load(&self, rotas: bool, clientes: bool) -> Tickets {
        let mut state = self.state.write().await;
        self.in_flight.begin();
        state.is_loading = true;
        state.error = None;
        Tickets {
            rotas: rotas.then(|| self.rotas_seq.start()),
            clientes: clientes.then(|| self.clientes_seq.start()),
        }
    }

    /// Qué campos de esta carga siguen siendo los más nuevos
    fn current(&self, tickets: Tickets) -> Tickets {
        Tickets {
            rotas: tickets.rotas.filter(|t| self.rotas_seq.is_current(*t)),
            clientes: tickets.clientes.filter(|t| self.clientes_seq.is_current(*t)),
        }
    }

    /// Aplica el resultado a los campos que nadie volvió a cargar mientras tanto
    async fn finish_load<T>(
        &self,
        tickets: Tickets,
        result: AppResult<T>,
        fallback_message: &str,
        apply: impl FnOnce(&mut RouteState, T, Tickets),
    ) -> bool {
        let mut state = self.state.write().await;
        state.is_loading = self.in_flight.end();

        let current = self.current(tickets);
        if current.rotas.is_none() && current.clientes.is_none() {
            debug!("⏭️ Carga de rutas {:?} descartada, hay una más nueva", tickets);
            return false;
        }

        match result {
            Ok(value) => {
                apply(&mut state, value, current);
                true
            }
            Err(e) => {
                error!("❌ {}: {}", fallback_message, e);
                let message = e.user_message();
                state.error = Some(if message.is_empty() {
                    fallback_message.to_string()
                } else {
                    message
                });
                false
            }
        }
    }

    /// Cargar las rutas del vendedor
    pub async fn load_rotas(&self, vendedor_id: i64) -> bool {
        let tickets = self.begin_load(true, false).await;
        let result = self.service.rotas_vendedor(vendedor_id).await;
        self.finish_load(tickets, result, "Erro ao carregar rotas", |state, rotas, _| {
            state.rotas = rotas;
        })
        .await
    }

    /// Elegir la ruta actual entre las ya cargadas
    pub async fn select_rota(&self, rota_id: i64) -> Option<Rota> {
        let mut state = self.state.write().await;
        state.rota_atual = state.rotas.iter().find(|r| r.id == rota_id).cloned();
        state.rota_atual.clone()
    }

    /// Cargar los clientes de una ruta
    pub async fn load_clientes_rota(&self, rota_id: i64) -> bool {
        let tickets = self.begin_load(false, true).await;
        let result = self.service.clientes_por_rota(rota_id).await;
        self.finish_load(tickets, result, "Erro ao carregar clientes", |state, clientes, _| {
            state.clientes_rota = clientes;
        })
        .await
    }

    /// Rutas activas y los clientes de todas ellas atendidos en `dia`.
    ///
    /// Los clientes de cada ruta se piden en paralelo; el primer error aborta la carga.
    pub async fn load_todays_routes(&self, vendedor_id: i64, dia: &str) -> bool {
        let tickets = self.begin_load(true, true).await;
        let result = self.fetch_todays_routes(vendedor_id, dia).await;
        self.finish_load(
            tickets,
            result,
            "Erro ao carregar rotas do dia",
            |state, (rotas, clientes), current| {
                if current.rotas.is_some() {
                    state.rota_atual = rotas.first().cloned();
                    state.rotas = rotas;
                }
                if current.clientes.is_some() {
                    state.clientes_rota = clientes;
                }
            },
        )
        .await
    }

    async fn fetch_todays_routes(
        &self,
        vendedor_id: i64,
        dia: &str,
    ) -> AppResult<(Vec<Rota>, Vec<RotaEntregaCompleta>)> {
        let rotas = self.service.rotas_vendedor(vendedor_id).await?;
        let por_rota =
            try_join_all(rotas.iter().map(|rota| self.service.clientes_por_rota(rota.id))).await?;

        let todos: Vec<RotaEntregaCompleta> = por_rota.into_iter().flatten().collect();
        let do_dia = filtrar_por_dia(&todos, dia);
        info!(
            "📅 {}: {} clientes de {} en {} rotas",
            dia,
            do_dia.len(),
            todos.len(),
            rotas.len()
        );
        Ok((rotas, do_dia))
    }

    /// Sincronización completa: todos los vínculos rota ↔ cliente del vendedor
    pub async fn sync_rotas_entregas(&self) -> bool {
        let tickets = self.begin_load(false, true).await;
        let result = self.service.rotas_entregas_completas().await;
        self.finish_load(tickets, result, "Erro ao sincronizar rotas", |state, clientes, _| {
            state.clientes_rota = clientes;
        })
        .await
    }

    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        self.rotas_seq.invalidate();
        self.clientes_seq.invalidate();
        *state = RouteState::default();
    }
}
