//! Servicio de rutas
//!
//! Envuelve los endpoints de rotas y concentra las reglas que las pantallas
//! aplican sobre `RotaEntregaCompleta`: filtro por día, prioridad,
//! estadísticas y los adapters a tarjeta de cliente y a `Delivery`.

use std::collections::HashMap;

use chrono::{Datelike, NaiveTime, Weekday};
use tracing::{debug, info};

use crate::clients::{endpoints, SodaApiClient};
use crate::models::{
    Bottles, ClienteCardView, Delivery, DeliveryPriority, DeliveryStatus, DeliveryStatusData,
    PrioridadeCliente, Rota, RotaEntregaCompleta, RotaStats, RouteProgress, RouteSummary,
    StatusEntrega,
};
use crate::utils::errors::AppResult;
use crate::utils::validation::parse_coordinates;

const GOOGLE_MAPS_DIR_URL: &str = "https://www.google.com/maps/dir/?api=1&destination=";
const BOTTLE_SIZE: &str = "20L";
const PRIMEIRA_VISITA: (u32, u32) = (8, 0);
const MINUTOS_POR_CLIENTE: u32 = 15;
const OBSERVACAO_URGENTE: [&str; 2] = ["urgente", "prioridade"];
const GARRAFAS_PRIORIDADE_NORMAL: u32 = 10;

/// Servicio de rutas del vendedor
#[derive(Clone)]
pub struct RouteService {
    api: SodaApiClient,
}

impl RouteService {
    pub fn new(api: SodaApiClient) -> Self {
        Self { api }
    }

    /// Rutas del vendedor, solo las activas
    pub async fn rotas_vendedor(&self, vendedor_id: i64) -> AppResult<Vec<Rota>> {
        let rotas: Vec<Rota> = self.api.get_json(&endpoints::rotas_vendedor(vendedor_id)).await?;
        let total = rotas.len();
        let ativas: Vec<Rota> = rotas.into_iter().filter(|r| r.ativo).collect();
        info!("🗺️ {} rotas activas de {} para vendedor {}", ativas.len(), total, vendedor_id);
        Ok(ativas)
    }

    /// Clientes de una ruta, ordenados por `sequencia`
    pub async fn clientes_por_rota(&self, rota_id: i64) -> AppResult<Vec<RotaEntregaCompleta>> {
        let mut clientes: Vec<RotaEntregaCompleta> =
            self.api.get_json(&endpoints::rotas_entregas_rota(rota_id)).await?;
        clientes.sort_by_key(|c| c.rotaentrega.sequencia);
        debug!("👥 {} clientes en rota {}", clientes.len(), rota_id);
        Ok(clientes)
    }

    /// Todos los clientes de todas las rutas (sincronización completa)
    pub async fn rotas_entregas_completas(&self) -> AppResult<Vec<RotaEntregaCompleta>> {
        self.api.get_json(endpoints::ROTAS_ENTREGAS).await
    }
}

/// Nombre del día tal como llega en `diassematendimento`
pub fn dia_da_semana(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Segunda",
        Weekday::Tue => "Terça",
        Weekday::Wed => "Quarta",
        Weekday::Thu => "Quinta",
        Weekday::Fri => "Sexta",
        Weekday::Sat => "Sábado",
        Weekday::Sun => "Domingo",
    }
}

/// Día de hoy en el formato de `diassematendimento`
pub fn dia_de_hoje() -> &'static str {
    dia_da_semana(chrono::Local::now().weekday())
}

/// Clientes atendidos en el día indicado
pub fn filtrar_por_dia(clientes: &[RotaEntregaCompleta], dia: &str) -> Vec<RotaEntregaCompleta> {
    let dia = dia.to_lowercase();
    clientes
        .iter()
        .filter(|c| c.diassematendimento.iter().any(|d| d.to_lowercase() == dia))
        .cloned()
        .collect()
}

/// Prioridad: observación con "urgente"/"prioridade" gana; después el volumen de garrafas
pub fn calcular_prioridade(cliente: &RotaEntregaCompleta) -> PrioridadeCliente {
    let observacao = cliente
        .cliente
        .observacao
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();

    if OBSERVACAO_URGENTE.iter().any(|p| observacao.contains(p)) {
        return PrioridadeCliente::Urgente;
    }

    if cliente.rotaentrega.num_garrafas >= GARRAFAS_PRIORIDADE_NORMAL {
        return PrioridadeCliente::Normal;
    }

    PrioridadeCliente::Baixa
}

pub fn to_delivery_priority(prioridade: PrioridadeCliente) -> DeliveryPriority {
    match prioridade {
        PrioridadeCliente::Urgente => DeliveryPriority::High,
        PrioridadeCliente::Normal => DeliveryPriority::Medium,
        PrioridadeCliente::Baixa => DeliveryPriority::Low,
    }
}

/// Hora estimada de la visita: 08:00 + 15 minutos por posición en la ruta
pub fn horario_estimado(posicao: usize) -> String {
    let inicio = NaiveTime::from_hms_opt(PRIMEIRA_VISITA.0, PRIMEIRA_VISITA.1, 0).unwrap_or_default();
    let minutos = (posicao as i64).saturating_mul(MINUTOS_POR_CLIENTE as i64);
    let (horario, _) = inicio.overflowing_add_signed(chrono::Duration::minutes(minutos));
    horario.format("%H:%M").to_string()
}

/// Estadísticas de una ruta con los check-ins locales aplicados
pub fn estatisticas(
    clientes: &[RotaEntregaCompleta],
    statuses: &HashMap<String, DeliveryStatusData>,
) -> RotaStats {
    let concluidas = clientes
        .iter()
        .filter(|c| has_check_in(statuses, c.rotaentrega.id))
        .count();

    RotaStats {
        total_clientes: clientes.len(),
        pendentes: clientes.len() - concluidas,
        concluidas,
        total_garrafas: clientes.iter().map(|c| c.rotaentrega.num_garrafas).sum(),
    }
}

fn has_check_in(statuses: &HashMap<String, DeliveryStatusData>, rotaentrega_id: i64) -> bool {
    statuses
        .get(&rotaentrega_id.to_string())
        .map_or(false, |s| s.check_in_status.is_some())
}

/// Tarjeta de cliente del detalle de ruta
pub fn to_card_view(
    cliente: &RotaEntregaCompleta,
    posicao: usize,
    status: Option<&DeliveryStatusData>,
) -> ClienteCardView {
    let RotaEntregaCompleta {
        rotaentrega,
        cliente: dados,
        rota,
        ..
    } = cliente;

    let status = match status.and_then(|s| s.check_in_status) {
        Some(check_in) => match check_in.delivery_status() {
            DeliveryStatus::Failed => StatusEntrega::Falhou,
            _ => StatusEntrega::Concluida,
        },
        None => StatusEntrega::Pendente,
    };

    ClienteCardView {
        id: dados.id,
        sequencia: rotaentrega.sequencia,
        nome: dados.nome.clone(),
        rota_nome: rota.nome.clone(),
        horario: horario_estimado(posicao),
        endereco: dados.endereco_completo(),
        telefone: dados.telefone_principal(),
        garrafas: rotaentrega.num_garrafas,
        observacao: dados.observacao.clone(),
        prioridade: calcular_prioridade(cliente),
        status,
        latitude: dados.latitude.clone(),
        longitude: dados.longitude.clone(),
    }
}

/// Adapter de `RotaEntregaCompleta` al `Delivery` de las pantallas de entrega.
/// El status base siempre es pendiente; el check-in local se aplica con `Delivery::with_status`.
pub fn to_delivery(cliente: &RotaEntregaCompleta, posicao: usize) -> Delivery {
    let id = cliente.rotaentrega.id;
    Delivery {
        id: id.to_string(),
        order_id: format!("PED-{}", id),
        order_code: format!("SCT-{}", cliente.cliente.id),
        customer_id: cliente.cliente.id,
        customer_name: cliente.cliente.nome.clone(),
        customer_phone: cliente.cliente.telefone_principal(),
        address: cliente.cliente.endereco_completo(),
        bottles: Bottles {
            quantity: cliente.rotaentrega.num_garrafas,
            size: BOTTLE_SIZE.to_string(),
        },
        status: DeliveryStatus::Pending,
        priority: to_delivery_priority(calcular_prioridade(cliente)),
        estimated_time: horario_estimado(posicao),
        completed_at: None,
        route_name: cliente.rota.nome.clone(),
        notes: cliente.cliente.observacao.clone(),
        latitude: cliente.cliente.latitude.clone(),
        longitude: cliente.cliente.longitude.clone(),
    }
}

/// Entregas de la lista con el check-in local ya aplicado
pub fn deliveries_with_status(
    clientes: &[RotaEntregaCompleta],
    statuses: &HashMap<String, DeliveryStatusData>,
) -> Vec<Delivery> {
    clientes
        .iter()
        .enumerate()
        .map(|(posicao, c)| {
            let delivery = to_delivery(c, posicao);
            let status = statuses.get(&delivery.id);
            delivery.with_status(status)
        })
        .collect()
}

/// URL de direcciones de Google Maps. Solo se construye, nunca se abre.
///
/// `None` si las coordenadas del backend no son números o están fuera de rango.
pub fn maps_url(latitude: &str, longitude: &str) -> Option<String> {
    let (lat, lng) = parse_coordinates(latitude, longitude)?;
    let destino = format!("{},{}", lat, lng);
    Some(format!("{}{}", GOOGLE_MAPS_DIR_URL, urlencoding::encode(&destino)))
}

/// Resumen de cada ruta para la pantalla de rutas
pub fn route_summaries(
    rotas: &[Rota],
    clientes: &[RotaEntregaCompleta],
    statuses: &HashMap<String, DeliveryStatusData>,
) -> Vec<RouteSummary> {
    rotas
        .iter()
        .map(|rota| {
            let (feitas, pendentes) = clientes
                .iter()
                .filter(|c| c.rotaentrega.rota_id == rota.id)
                .fold((0usize, 0usize), |(feitas, pendentes), c| {
                    if has_check_in(statuses, c.rotaentrega.id) {
                        (feitas + 1, pendentes)
                    } else {
                        (feitas, pendentes + 1)
                    }
                });

            let status = if rota.checkin_fechado {
                RouteProgress::Completed
            } else if feitas > 0 {
                RouteProgress::InProgress
            } else {
                RouteProgress::Pending
            };

            RouteSummary {
                rota: rota.clone(),
                pending_deliveries: pendentes,
                status,
            }
        })
        .collect()
}

/// Búsqueda de rutas por nombre, frecuencia o zona (case-insensitive)
pub fn buscar_rotas<'a>(summaries: &'a [RouteSummary], termo: &str) -> Vec<&'a RouteSummary> {
    let termo = termo.trim().to_lowercase();
    summaries
        .iter()
        .filter(|s| {
            termo.is_empty()
                || [Some(&s.rota.nome), s.rota.frequencia.as_ref(), s.rota.zona.as_ref()]
                    .into_iter()
                    .flatten()
                    .any(|campo| campo.to_lowercase().contains(&termo))
        })
        .collect()
}
