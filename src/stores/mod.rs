//! Stores del cliente
//!
//! Cada store es dueño de su parte del estado y se comparte por `Arc` desde `AppState`.

pub mod customer_store;
pub mod delivery_store;
pub mod load_sequence;
pub mod route_store;
pub mod session_store;
pub mod ui_store;

pub use customer_store::{CustomerState, CustomerStore};
pub use delivery_store::DeliveryStore;
pub use route_store::{RouteState, RouteStore};
pub use session_store::{CredentialStorage, MemoryCredentialStorage, SessionExpiryHandler, SessionStore};
pub use ui_store::{Screen, UiStore};
