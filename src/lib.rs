//! Cliente de operaciones de campo para la distribuidora
//!
//! Rutas del vendedor, check-in de visitas y PDV de xaropes sobre el backend REST.

pub mod clients;
pub mod config;
pub mod models;
pub mod pdv;
pub mod services;
pub mod state;
pub mod stores;
pub mod utils;

pub use state::AppState;
pub use utils::errors::{AppError, AppResult};
