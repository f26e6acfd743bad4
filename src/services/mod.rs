//! Services module
//!
//! Este módulo contiene la lógica de negocio del cliente. Cada servicio envuelve
//! un grupo de endpoints del backend y las reglas que las pantallas aplican
//! sobre sus respuestas.

pub mod cep_service;
pub mod checkin_service;
pub mod contract_service;
pub mod customer_service;
pub mod route_service;
pub mod sales_service;

pub use cep_service::CepService;
pub use checkin_service::{CheckInOutcome, CheckInService, CheckInStep};
pub use contract_service::{ContractService, ContratosPorStatus};
pub use customer_service::CustomerService;
pub use route_service::RouteService;
pub use sales_service::{SalesService, TipoEnvio};
