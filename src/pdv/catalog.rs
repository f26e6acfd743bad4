//! Catálogo del PDV: productos, formas de pago y promociones

use std::collections::HashSet;

use crate::models::{MeioPagamento, Produto, Promocao};

/// Categoría que no filtra
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalogo {
    pub produtos: Vec<Produto>,
    pub meios_pagamento: Vec<MeioPagamento>,
    pub promocoes: Vec<Promocao>,
}

impl Catalogo {
    pub fn new(produtos: Vec<Produto>, meios_pagamento: Vec<MeioPagamento>, promocoes: Vec<Promocao>) -> Self {
        Self {
            produtos,
            meios_pagamento,
            promocoes,
        }
    }

    /// `"all"` primero y después cada categoría en el orden en que aparece
    pub fn categorias(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut categorias = vec![ALL_CATEGORIES.to_string()];
        for produto in &self.produtos {
            let categoria = produto.categoria_label();
            if seen.insert(categoria) {
                categorias.push(categoria.to_string());
            }
        }
        categorias
    }

    /// Productos de la categoría cuyo nombre contiene `busca` (sin distinguir mayúsculas)
    pub fn filtrar(&self, categoria: &str, busca: &str) -> Vec<&Produto> {
        let busca = busca.to_lowercase();
        self.produtos
            .iter()
            .filter(|p| categoria == ALL_CATEGORIES || p.categoria_label() == categoria)
            .filter(|p| p.nome.to_lowercase().contains(&busca))
            .collect()
    }

    pub fn produto(&self, id: i64) -> Option<&Produto> {
        self.produtos.iter().find(|p| p.id == id)
    }

    pub fn meio_pagamento(&self, id: i64) -> Option<&MeioPagamento> {
        self.meios_pagamento.iter().find(|m| m.id == id)
    }

    pub fn promocao(&self, id: i64) -> Option<&Promocao> {
        self.promocoes.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn produto(id: i64, nome: &str, categoria: Option<&str>) -> Produto {
        Produto {
            id,
            nome: nome.to_string(),
            preco: Decimal::new(850, 2),
            categoria: categoria.map(str::to_string),
            unidade_medida: None,
        }
    }

    fn catalogo() -> Catalogo {
        Catalogo::new(
            vec![
                produto(1, "Xarope Guaraná 500ml", Some("Xaropes")),
                produto(7, "Xarope Guaraná 1L", Some("Xaropes Premium")),
                produto(2, "Xarope Cola 500ml", Some("Xaropes")),
                produto(14, "Dosador para Xarope", Some("Acessórios")),
                produto(20, "Brinde", None),
            ],
            vec![],
            vec![],
        )
    }

    #[test]
    fn test_categorias_em_ordem() {
        assert_eq!(
            catalogo().categorias(),
            vec!["all", "Xaropes", "Xaropes Premium", "Acessórios", "Outros"]
        );
    }

    #[test]
    fn test_filtrar() {
        let catalogo = catalogo();
        assert_eq!(catalogo.filtrar(ALL_CATEGORIES, "").len(), 5);
        assert_eq!(catalogo.filtrar("Xaropes", "").len(), 2);
        assert_eq!(catalogo.filtrar(ALL_CATEGORIES, "GUARANÁ").len(), 2);
        assert_eq!(catalogo.filtrar("Xaropes", "cola")[0].id, 2);
        assert_eq!(catalogo.filtrar(ALL_CATEGORIES, "Dosador para Xarope").len(), 1);
        assert!(catalogo.filtrar("Acessórios", "cola").is_empty());
    }
}
