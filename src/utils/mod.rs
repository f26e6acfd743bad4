//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! dinero y deserialización tolerante de las respuestas del backend.

pub mod errors;
pub mod money;
pub mod serde_helpers;
pub mod validation;

pub use errors::{AppError, AppResult};
