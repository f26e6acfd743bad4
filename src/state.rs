//! Shared application state
//!
//! Este módulo arma el estado compartido de la aplicación: configuración,
//! cliente HTTP, stores y servicios. Reemplaza a los stores globales: las
//! pantallas reciben `&AppState`.

use std::sync::Arc;

use tracing::info;

use crate::clients::SodaApiClient;
use crate::config::environment::EnvironmentConfig;
use crate::models::{Credentials, Delivery, LoginRequest, SelectedRoute};
use crate::services::{
    CepService, CheckInService, ContractService, CustomerService, RouteService, SalesService,
};
use crate::stores::{
    CredentialStorage, CustomerStore, DeliveryStore, MemoryCredentialStorage, RouteStore, Screen,
    SessionExpiryHandler, SessionStore, UiStore,
};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub api: SodaApiClient,
    pub session: Arc<SessionStore>,
    pub ui: Arc<UiStore>,
    pub deliveries: Arc<DeliveryStore>,
    pub routes: Arc<RouteStore>,
    pub customers: Arc<CustomerStore>,
    pub sales: SalesService,
    pub checkin: CheckInService,
    pub contracts: ContractService,
    pub cep: CepService,
}

impl AppState {
    pub fn new(config: EnvironmentConfig) -> AppResult<Self> {
        Self::with_storage(config, Arc::new(MemoryCredentialStorage::default()))
    }

    /// Estado con un almacenamiento de credenciales propio
    pub fn with_storage(config: EnvironmentConfig, storage: Arc<dyn CredentialStorage>) -> AppResult<Self> {
        let session = Arc::new(SessionStore::new(storage));
        let ui = Arc::new(UiStore::new());
        let deliveries = Arc::new(DeliveryStore::new());

        let expiry = Arc::new(SessionExpiryHandler::new(session.clone(), ui.clone()));
        let api = SodaApiClient::new(&config, session.clone())?.with_unauthorized_handler(expiry);

        info!(
            "🚀 Cliente listo contra {} (versaoApp {}, check-in sync: {})",
            config.api_base_url, config.app_version, config.checkin_sync
        );

        Ok(Self {
            routes: Arc::new(RouteStore::new(RouteService::new(api.clone()))),
            customers: Arc::new(CustomerStore::new(CustomerService::new(api.clone()))),
            sales: SalesService::new(api.clone()),
            checkin: CheckInService::new(api.clone(), deliveries.clone(), config.checkin_sync),
            contracts: ContractService::new(api.clone()),
            cep: CepService::new(api.clone(), config.viacep_base_url.clone()),
            config,
            api,
            session,
            ui,
            deliveries,
        })
    }

    /// Login y entrada a la pantalla de entregas
    pub async fn login(&self, username: &str, password: &str) -> AppResult<Credentials> {
        let request = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        let credentials = self.session.login(&self.api, &request).await?;
        self.ui.navigate(Screen::Deliveries).await;
        Ok(credentials)
    }

    /// Logout manual: limpia sesión y datos cargados
    pub async fn logout(&self) {
        self.session.logout().await;
        self.deliveries.reset().await;
        self.routes.reset().await;
        self.customers.reset().await;
        self.ui.set_selected_customer(None).await;
        self.ui.navigate(Screen::Login).await;
    }

    pub async fn vendedor_id(&self) -> AppResult<i64> {
        Ok(self.session.require().await?.vendedor_id)
    }

    /// Abrir el detalle de ruta desde una entrega suelta
    pub async fn open_delivery(&self, delivery: Delivery) {
        self.deliveries.select_single_delivery(delivery).await;
        self.ui.navigate(Screen::RouteDetails).await;
    }

    /// Abrir el detalle de una ruta completa
    pub async fn open_route(&self, route: SelectedRoute) {
        self.deliveries.set_selected_delivery(None).await;
        self.deliveries.set_selected_route(Some(route)).await;
        self.ui.navigate(Screen::RouteDetails).await;
    }

    /// "Voltar" según la pantalla actual y cómo se llegó al detalle de ruta
    pub async fn back(&self) -> Screen {
        let single = self.deliveries.is_single_delivery_route().await;
        self.ui.back(single).await
    }
}
