//! Backend simulado para los tests de integración

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use soda_field_ops::config::EnvironmentConfig;
use soda_field_ops::AppState;

pub const TOKEN: &str = "tok-123";
pub const VENDEDOR_ID: i64 = 7;

/// Requests que llegaron al backend simulado
#[derive(Clone, Default)]
pub struct Recorder {
    pub requests: Arc<Mutex<Vec<Recorded>>>,
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub app_version: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

impl Recorder {
    pub fn record(&self, path: &str, headers: &HeaderMap, body: Option<Value>) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.requests.lock().unwrap().push(Recorded {
            path: path.to_string(),
            app_version: header("versaoapp"),
            authorization: header("authorization"),
            body,
        });
    }

    pub fn for_path(&self, path: &str) -> Vec<Recorded> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }
}

/// Levanta el router en 127.0.0.1:0 y devuelve la URL base
pub async fn spawn_backend(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Router con `/login` aceptando cualquier usuario
pub fn with_login(router: Router) -> Router {
    router.route(
        "/login",
        post(|| async {
            Json(json!({
                "token": TOKEN,
                "user": {"id": VENDEDOR_ID, "name": "Carlos Vendedor", "distribuidor_id": 3}
            }))
        }),
    )
}

pub fn state_for(base_url: &str) -> AppState {
    AppState::new(EnvironmentConfig::for_base_url(base_url)).unwrap()
}

/// Estado con la sesión ya iniciada contra el backend simulado
pub async fn logged_in(base_url: &str) -> AppState {
    let state = state_for(base_url);
    state.login("carlos", "secreta").await.unwrap();
    state
}

pub fn rota_json(id: i64, nome: &str, ativo: i64) -> Value {
    json!({
        "id": id, "nome": nome, "frequencia": "Segunda e Quarta", "observacao": null,
        "ativo": ativo, "checkin_fechado": 0, "cidade_id": 1
    })
}

pub fn rota_entrega_json(id: i64, rota_id: i64, sequencia: i64, dias: &[&str]) -> Value {
    json!({
        "rotaentrega": {"id": id, "sequencia": sequencia, "num_garrafas": 4, "num_garrafas_comprada": 0,
                        "rota_id": rota_id, "cliente_id": id * 10},
        "cliente": {"id": id * 10, "nome": format!("Cliente {}", id), "telefone": "11988887777",
                    "endereco": "Rua A", "numero": "10", "bairro": "Centro", "ativo": 1},
        "rota": rota_json(rota_id, "Rota A", 1),
        "diassematendimento": dias,
        "diassemconsumo": []
    })
}
