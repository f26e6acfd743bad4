//! Control de cargas concurrentes de los stores
//!
//! Cada campo cargado desde el backend tiene su propia `LoadSequence`: solo se
//! aplica la respuesta de la última carga iniciada para ese campo. `InFlight`
//! cuenta las cargas en curso del store para derivar `is_loading`.
//!
//! Ambos se leen y escriben con el lock de escritura del estado tomado, así
//! ninguna carga nueva puede empezar entre el chequeo y la escritura.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct LoadSequence {
    current: AtomicU64,
}

impl LoadSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empezar una carga y devolver su ticket
    pub fn start(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.current.load(Ordering::SeqCst) == ticket
    }

    /// Descartar cualquier carga en curso (reset del store)
    pub fn invalidate(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Default)]
pub struct InFlight {
    count: AtomicUsize,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    /// Terminar una carga; devuelve si quedan otras en curso
    pub fn end(&self) -> bool {
        let previous = self
            .count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| Some(n.saturating_sub(1)))
            .unwrap_or(0);
        previous > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_last_ticket_is_current() {
        let seq = LoadSequence::new();
        let first = seq.start();
        let second = seq.start();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));

        seq.invalidate();
        assert!(!seq.is_current(second));
    }

    #[test]
    fn test_sequences_are_independent() {
        let rotas = LoadSequence::new();
        let clientes = LoadSequence::new();
        let r = rotas.start();
        let c = clientes.start();
        assert!(rotas.is_current(r));
        assert!(clientes.is_current(c));
    }

    #[test]
    fn test_in_flight() {
        let in_flight = InFlight::new();
        in_flight.begin();
        in_flight.begin();
        assert!(in_flight.end());
        assert!(!in_flight.end());
        // Un end de más no da la vuelta
        assert!(!in_flight.end());
    }
}
