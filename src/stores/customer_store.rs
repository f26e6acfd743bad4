//! Store de clientes: roster, búsqueda y cadastro

use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::models::{ClienteCadastroPayload, ClienteXarope};
use crate::services::customer_service::{filtrar_clientes, CustomerService};
use crate::stores::load_sequence::{InFlight, LoadSequence};

#[derive(Debug, Clone, Default)]
pub struct CustomerState {
    pub clientes: Vec<ClienteXarope>,
    pub filtered_clientes: Vec<ClienteXarope>,
    pub is_loading: bool,
    pub is_submitting: bool,
    pub error: Option<String>,
}

pub struct CustomerStore {
    service: CustomerService,
    state: RwLock<CustomerState>,
    load_seq: LoadSequence,
    in_flight: InFlight,
}

impl CustomerStore {
    pub fn new(service: CustomerService) -> Self {
        Self {
            service,
            state: RwLock::new(CustomerState::default()),
            load_seq: LoadSequence::new(),
            in_flight: InFlight::new(),
        }
    }

    pub async fn snapshot(&self) -> CustomerState {
        self.state.read().await.clone()
    }

    pub async fn load_clientes(&self, vendedor_id: i64) -> bool {
        let ticket = {
            let mut state = self.state.write().await;
            self.in_flight.begin();
            state.is_loading = true;
            state.error = None;
            self.load_seq.start()
        };

        let result = self.service.clientes_xarope(vendedor_id).await;

        let mut state = self.state.write().await;
        state.is_loading = self.in_flight.end();
        if !self.load_seq.is_current(ticket) {
            debug!("⏭️ Carga de clientes {} descartada, hay una más nueva", ticket);
            return false;
        }

        match result {
            Ok(clientes) => {
                state.filtered_clientes = clientes.clone();
                state.clientes = clientes;
                true
            }
            Err(e) => {
                error!("❌ Erro ao carregar clientes: {}", e);
                state.error = Some(e.user_message());
                false
            }
        }
    }

    /// Filtrar el roster cargado; el resultado queda en `filtered_clientes`
    pub async fn filtra_clientes(&self, termo: &str) -> Vec<ClienteXarope> {
        let mut state = self.state.write().await;
        state.filtered_clientes = filtrar_clientes(&state.clientes, termo);
        state.filtered_clientes.clone()
    }

    /// Cadastrar cliente; `false` deja el mensaje en `error`
    pub async fn cadastrar_cliente(&self, payload: ClienteCadastroPayload) -> bool {
        {
            let mut state = self.state.write().await;
            state.is_submitting = true;
            state.error = None;
        }

        let result = self.service.cadastrar_cliente(payload).await;

        let mut state = self.state.write().await;
        state.is_submitting = false;
        match result {
            Ok(_) => true,
            Err(e) => {
                error!("❌ Erro ao cadastrar cliente: {}", e);
                state.error = Some(e.user_message());
                false
            }
        }
    }

    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }

    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        self.load_seq.invalidate();
        *state = CustomerState::default();
    }
}
