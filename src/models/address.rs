use serde::{Deserialize, Serialize};

use crate::utils::serde_helpers::flag;

/// Respuesta de ViaCEP (`https://viacep.com.br/ws/{cep}/json`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Endereco {
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub logradouro: String,
    #[serde(default)]
    pub complemento: String,
    #[serde(default)]
    pub bairro: String,
    #[serde(default)]
    pub localidade: String,
    #[serde(default)]
    pub uf: String,
    /// ViaCEP responde 200 con `{"erro": true}` cuando el CEP no existe
    #[serde(default, deserialize_with = "flag")]
    pub erro: bool,
}

impl Endereco {
    /// "São Paulo/SP"
    pub fn cidade_uf(&self) -> String {
        if self.uf.is_empty() {
            self.localidade.clone()
        } else {
            format!("{}/{}", self.localidade, self.uf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endereco_from_viacep() {
        let json = r#"{"cep": "01310-100", "logradouro": "Avenida Paulista", "complemento": "de 612 a 1510 - lado par",
            "bairro": "Bela Vista", "localidade": "São Paulo", "uf": "SP", "ibge": "3550308"}"#;
        let endereco: Endereco = serde_json::from_str(json).unwrap();
        assert!(!endereco.erro);
        assert_eq!(endereco.cidade_uf(), "São Paulo/SP");

        let missing: Endereco = serde_json::from_str(r#"{"erro": "true"}"#).unwrap();
        assert!(missing.erro);
    }
}
