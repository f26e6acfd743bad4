//! Configuración del proyecto
//!
//! Este módulo contiene las variables de entorno del cliente.

pub mod environment;

pub use environment::*;
