use tracing::{debug, warn};

use crate::clients::{endpoints, SodaApiClient};
use crate::models::Endereco;
use crate::utils::errors::{invalid_input_error, not_found_error, AppResult};
use crate::utils::validation::{only_digits, validate_cep};

/// Consulta de CEP en ViaCEP para prellenar el cadastro
#[derive(Clone)]
pub struct CepService {
    api: SodaApiClient,
    base_url: String,
}

impl CepService {
    pub fn new(api: SodaApiClient, base_url: String) -> Self {
        Self { api, base_url }
    }

    pub async fn buscar(&self, cep: &str) -> AppResult<Endereco> {
        if validate_cep(cep.trim()).is_err() {
            return Err(invalid_input_error("CEP inválido"));
        }

        let digits = only_digits(cep);
        debug!("📮 Consultando CEP {}", digits);
        let endereco: Endereco = self
            .api
            .get_external_json(&endpoints::cep(&self.base_url, &digits))
            .await?;

        if endereco.erro {
            warn!("⚠️ CEP {} no existe", digits);
            return Err(not_found_error("CEP", &digits));
        }
        Ok(endereco)
    }
}
