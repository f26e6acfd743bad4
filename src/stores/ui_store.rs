//! Store de navegación
//!
//! Pantalla actual, cliente seleccionado y la redirección al login tras un 401.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::ClienteXarope;

/// Pantallas de la aplicación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    Deliveries,
    Routes,
    RouteDetails,
    CheckIn,
    Customers,
    CustomerHistory,
    CustomerRegistration,
    Contracts,
    Pdv,
    PdvDelivery,
}

impl Screen {
    /// Pestañas de la navegación inferior
    pub const BOTTOM_TABS: [Screen; 4] = [Screen::Deliveries, Screen::Routes, Screen::Customers, Screen::Pdv];

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Login => "Login",
            Screen::Deliveries => "Entregas",
            Screen::Routes => "Rotas",
            Screen::RouteDetails => "Detalhes da Rota",
            Screen::CheckIn => "Check-in",
            Screen::Customers => "Clientes",
            Screen::CustomerHistory => "Histórico do Cliente",
            Screen::CustomerRegistration => "Cadastro de Cliente",
            Screen::Contracts => "Contratos Pendentes",
            Screen::Pdv => "PDV",
            Screen::PdvDelivery => "PDV da Entrega",
        }
    }

    /// Pantalla a la que lleva "voltar". `single_delivery_route` indica que el
    /// detalle de ruta se abrió desde una entrega suelta.
    pub fn back_target(&self, single_delivery_route: bool) -> Option<Screen> {
        match self {
            Screen::RouteDetails if single_delivery_route => Some(Screen::Deliveries),
            Screen::RouteDetails => Some(Screen::Routes),
            Screen::CheckIn | Screen::PdvDelivery => Some(Screen::RouteDetails),
            Screen::CustomerHistory | Screen::CustomerRegistration | Screen::Contracts => {
                Some(Screen::Customers)
            }
            Screen::Login | Screen::Deliveries | Screen::Routes | Screen::Customers | Screen::Pdv => None,
        }
    }

    pub fn is_bottom_tab(&self) -> bool {
        Self::BOTTOM_TABS.contains(self)
    }
}

#[derive(Debug)]
struct UiState {
    current_screen: Screen,
    selected_customer: Option<ClienteXarope>,
}

/// Estado de navegación
#[derive(Debug)]
pub struct UiStore {
    state: RwLock<UiState>,
    login_redirects: AtomicUsize,
}

impl Default for UiStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UiStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(UiState {
                current_screen: Screen::Login,
                selected_customer: None,
            }),
            login_redirects: AtomicUsize::new(0),
        }
    }

    pub async fn current_screen(&self) -> Screen {
        self.state.read().await.current_screen
    }

    pub async fn navigate(&self, screen: Screen) {
        let mut state = self.state.write().await;
        debug!("🧭 {:?} → {:?}", state.current_screen, screen);
        state.current_screen = screen;
    }

    /// Volver a la pantalla anterior; devuelve la pantalla resultante
    pub async fn back(&self, single_delivery_route: bool) -> Screen {
        let mut state = self.state.write().await;
        if let Some(target) = state.current_screen.back_target(single_delivery_route) {
            state.current_screen = target;
        }
        state.current_screen
    }

    pub async fn selected_customer(&self) -> Option<ClienteXarope> {
        self.state.read().await.selected_customer.clone()
    }

    pub async fn set_selected_customer(&self, customer: Option<ClienteXarope>) {
        self.state.write().await.selected_customer = customer;
    }

    /// Mandar al login. No hace nada si ya estamos ahí; devuelve si redirigió.
    pub async fn redirect_to_login(&self) -> bool {
        let mut state = self.state.write().await;
        if state.current_screen == Screen::Login {
            return false;
        }
        state.current_screen = Screen::Login;
        state.selected_customer = None;
        self.login_redirects.fetch_add(1, Ordering::SeqCst);
        info!("🔐 Redirigiendo al login");
        true
    }

    /// Cuántas veces se forzó la vuelta al login
    pub fn login_redirects(&self) -> usize {
        self.login_redirects.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_targets() {
        assert_eq!(Screen::RouteDetails.back_target(true), Some(Screen::Deliveries));
        assert_eq!(Screen::RouteDetails.back_target(false), Some(Screen::Routes));
        assert_eq!(Screen::CheckIn.back_target(false), Some(Screen::RouteDetails));
        assert_eq!(Screen::PdvDelivery.back_target(true), Some(Screen::RouteDetails));
        assert_eq!(Screen::Contracts.back_target(false), Some(Screen::Customers));
        assert_eq!(Screen::Pdv.back_target(false), None);
        assert!(Screen::Customers.is_bottom_tab());
        assert!(!Screen::CheckIn.is_bottom_tab());
    }

    #[tokio::test]
    async fn test_redirect_to_login_only_once() {
        let ui = UiStore::new();
        assert!(!ui.redirect_to_login().await);

        ui.navigate(Screen::Routes).await;
        assert!(ui.redirect_to_login().await);
        assert!(!ui.redirect_to_login().await);
        assert_eq!(ui.current_screen().await, Screen::Login);
        assert_eq!(ui.login_redirects(), 1);
    }

    #[tokio::test]
    async fn test_back_navigation() {
        let ui = UiStore::new();
        ui.navigate(Screen::CheckIn).await;
        assert_eq!(ui.back(false).await, Screen::RouteDetails);
        assert_eq!(ui.back(false).await, Screen::Routes);
        assert_eq!(ui.back(false).await, Screen::Routes);
    }
}
