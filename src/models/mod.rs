//! Modelos del sistema
//!
//! Este módulo contiene los registros que espejan exactamente las respuestas
//! del backend REST, más los view models que arman las pantallas.

pub mod address;
pub mod auth;
pub mod contract;
pub mod customer;
pub mod delivery;
pub mod route;
pub mod sale;

pub use address::Endereco;
pub use auth::{Credentials, LoginRequest, LoginResponse, User};
pub use contract::{ContractStatus, PendenciaContrato};
pub use customer::{CadastroContratosPayload, ClienteCadastroPayload, ClienteXarope, TipoContrato};
pub use delivery::{
    Bottles, CheckInRecord, CheckInStatus, CheckInSyncPayload, Delivery, DeliveryPriority, DeliveryStatus,
    DeliveryStatusData, SelectedRoute,
};
pub use route::{
    Cliente, ClienteCardView, PrioridadeCliente, Rota, RotaEntrega, RotaEntregaCompleta,
    RotaStats, RouteProgress, RouteSummary, StatusEntrega,
};
pub use sale::{ContasReceber, MeioPagamento, Parcela, Produto, Promocao, Venda, VendaItem, VendaResponse};
