//! PDV: carrito, catálogo y cierre de venta

pub mod cart;
pub mod catalog;
pub mod checkout;

pub use cart::{Cart, CartLine};
pub use catalog::{Catalogo, ALL_CATEGORIES};
pub use checkout::{CheckoutError, CheckoutReceipt, PdvSession, MAX_PARCELAS};
