//! Carrito del PDV
//!
//! Líneas ordenadas por orden de inserción, una por producto. Ninguna línea
//! guardada tiene cantidad 0: bajar a cero elimina la línea.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Produto;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub produto: Produto,
    pub quantidade: u32,
}

impl CartLine {
    pub fn subtotal(&self) -> Decimal {
        self.produto.preco * Decimal::from(self.quantidade)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, produto_id: i64) -> Option<usize> {
        self.lines.iter().position(|l| l.produto.id == produto_id)
    }

    /// Sumar una unidad (o agregar la línea con 1)
    pub fn add(&mut self, produto: &Produto) {
        match self.position(produto.id) {
            Some(i) => self.lines[i].quantidade += 1,
            None => self.lines.push(CartLine {
                produto: produto.clone(),
                quantidade: 1,
            }),
        }
    }

    /// Restar una unidad; en 1 la línea desaparece
    pub fn remove(&mut self, produto_id: i64) {
        if let Some(i) = self.position(produto_id) {
            if self.lines[i].quantidade > 1 {
                self.lines[i].quantidade -= 1;
            } else {
                self.lines.remove(i);
            }
        }
    }

    /// Fijar la cantidad de una línea existente; `n <= 0` la elimina
    pub fn set_quantity(&mut self, produto_id: i64, n: i64) {
        let Some(i) = self.position(produto_id) else {
            return;
        };
        if n <= 0 {
            self.lines.remove(i);
        } else {
            self.lines[i].quantidade = u32::try_from(n).unwrap_or(u32::MAX);
        }
    }

    /// Σ preço × quantidade
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    pub fn item_quantity(&self, produto_id: i64) -> u32 {
        self.position(produto_id)
            .map_or(0, |i| self.lines[i].quantidade)
    }

    /// Unidades totales en el carrito
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantidade).sum()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn produto(id: i64, preco: Decimal) -> Produto {
        Produto {
            id,
            nome: format!("Produto {}", id),
            preco,
            categoria: Some("Xaropes".to_string()),
            unidade_medida: None,
        }
    }

    #[test]
    fn test_cart_example() {
        let a = produto(1, Decimal::new(850, 2));
        let b = produto(2, Decimal::new(1500, 2));
        let mut cart = Cart::new();

        cart.add(&a);
        cart.add(&a);
        cart.add(&b);
        assert_eq!(cart.total(), Decimal::new(3200, 2));
        assert_eq!(cart.item_count(), 3);

        cart.remove(a.id);
        assert_eq!(cart.total(), Decimal::new(2350, 2));
        assert_eq!(cart.item_quantity(a.id), 1);

        cart.set_quantity(a.id, 0);
        assert_eq!(cart.item_quantity(a.id), 0);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total(), Decimal::new(1500, 2));
    }

    #[test]
    fn test_set_quantity() {
        let a = produto(1, Decimal::new(850, 2));
        let mut cart = Cart::new();

        // Producto fuera del carrito: no se agrega
        cart.set_quantity(a.id, 3);
        assert!(cart.is_empty());

        cart.add(&a);
        cart.set_quantity(a.id, 4);
        assert_eq!(cart.total(), Decimal::new(3400, 2));
        cart.set_quantity(a.id, -2);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = Cart::new();
        cart.remove(99);
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_total_matches_lines_after_any_sequence() {
        let produtos: Vec<Produto> = (1..=4)
            .map(|id| produto(id, Decimal::new(id * 275 + 50, 2)))
            .collect();
        let mut cart = Cart::new();

        // Secuencia determinística de operaciones mezcladas
        let mut seed: u64 = 42;
        for step in 0..500 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let p = &produtos[(seed >> 33) as usize % produtos.len()];
            match (seed >> 40) % 4 {
                0 | 1 => cart.add(p),
                2 => cart.remove(p.id),
                _ => cart.set_quantity(p.id, ((seed >> 50) % 7) as i64 - 2),
            }

            let esperado: Decimal = produtos
                .iter()
                .map(|p| p.preco * Decimal::from(cart.item_quantity(p.id)))
                .sum();
            assert_eq!(cart.total(), esperado, "paso {}", step);
            assert!(cart.lines().iter().all(|l| l.quantidade > 0), "paso {}", step);

            let mut ids: Vec<i64> = cart.lines().iter().map(|l| l.produto.id).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), cart.lines().len());
        }
    }
}
