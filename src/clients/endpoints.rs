//! Rutas del backend REST
//!
//! Todas relativas a `API_BASE_URL`, salvo ViaCEP que es externo y sin auth.

// Autenticación
pub const LOGIN: &str = "/login";

// Rotas y clientes
pub const ROTAS_ENTREGAS: &str = "/rotas-entregas";

pub fn rotas_vendedor(vendedor_id: i64) -> String {
    format!("/rotas/{}", vendedor_id)
}

pub fn rotas_entregas_rota(rota_id: i64) -> String {
    format!("/rotas-entregas/rota/{}", rota_id)
}

pub fn clientes_xarope(vendedor_id: i64) -> String {
    format!("/clientes/xarope/{}", vendedor_id)
}

// Sincronización (GET)
pub fn produtos(vendedor_id: i64) -> String {
    format!("/produtos/{}", vendedor_id)
}

pub fn meios_pagamento(distribuidor_id: i64) -> String {
    format!("/meiospagamento/{}", distribuidor_id)
}

pub fn promocoes(vendedor_id: i64) -> String {
    format!("/promocoes/{}", vendedor_id)
}

pub fn vendas_pendentes(vendedor_id: i64) -> String {
    format!("/vendas_pendentes/{}", vendedor_id)
}

pub fn vendas_vendedor(vendedor_id: i64) -> String {
    format!("/vendas_vendedor/{}", vendedor_id)
}

pub fn pendencia_contrato(vendedor_id: i64) -> String {
    format!("/pendencia-contrato/{}", vendedor_id)
}

// Transacciones (POST)
pub const CONTRATOS_V2_CADASTRO_CLIENTES: &str = "/contratos/v2/cadastro-de-clientes";
pub const VENDA_XAROPE_V2: &str = "/vendaxarope/v2";
pub const PEDIDO_XAROPE_V2: &str = "/pedidoxarope/v2";

pub fn checkin_full(vendedor_id: i64) -> String {
    format!("/checkin/full/{}", vendedor_id)
}

pub fn checkin(vendedor_id: i64) -> String {
    format!("/checkin/{}", vendedor_id)
}

pub fn finalizar_venda(venda_id: i64) -> String {
    format!("/finaliza_venda/{}", venda_id)
}

// Utilitarios
pub fn cep(viacep_base_url: &str, cep: &str) -> String {
    format!("{}/{}/json", viacep_base_url.trim_end_matches('/'), cep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(rotas_vendedor(7), "/rotas/7");
        assert_eq!(rotas_entregas_rota(3), "/rotas-entregas/rota/3");
        assert_eq!(clientes_xarope(7), "/clientes/xarope/7");
        assert_eq!(meios_pagamento(2), "/meiospagamento/2");
        assert_eq!(checkin_full(7), "/checkin/full/7");
        assert_eq!(finalizar_venda(99), "/finaliza_venda/99");
        assert_eq!(
            cep("https://viacep.com.br/ws/", "01310100"),
            "https://viacep.com.br/ws/01310100/json"
        );
    }
}
