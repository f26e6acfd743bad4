use std::io::{self, Write};

use anyhow::Result;
use colored::*;
use dotenvy::dotenv;
use tracing::{error, info};

use soda_field_ops::config::EnvironmentConfig;
use soda_field_ops::models::{
    CheckInStatus, ClienteCadastroPayload, Delivery, DeliveryStatus, SelectedRoute, TipoContrato,
};
use soda_field_ops::pdv::{Catalogo, PdvSession, ALL_CATEGORIES, MAX_PARCELAS};
use soda_field_ops::services::checkin_service::{choose_status, CheckInStep};
use soda_field_ops::services::{contract_service, route_service};
use soda_field_ops::stores::Screen;
use soda_field_ops::utils::money::format_brl;
use soda_field_ops::{AppError, AppState};

/// Estado propio de la terminal entre pantallas
struct Terminal {
    state: AppState,
    pdv: PdvSession,
    catalogo: Option<Catalogo>,
    categoria: String,
    busca_produto: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging: DEBUG por defecto en desarrollo
    let level = std::env::var("RUST_LOG_LEVEL")
        .ok()
        .and_then(|l| l.parse::<tracing::Level>().ok())
        .unwrap_or_else(|| config.default_log_level());
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚚 Soda Field Ops ({})", config.environment);

    let state = AppState::new(config)?;
    let mut terminal = Terminal {
        state,
        pdv: PdvSession::new(),
        catalogo: None,
        categoria: ALL_CATEGORIES.to_string(),
        busca_produto: String::new(),
    };

    println!("{}", "🚚 Soda Cristal - Entregas".bright_blue().bold());
    println!("{}", "==========================".bright_blue());

    loop {
        let screen = terminal.state.ui.current_screen().await;
        let keep_going = match screen {
            Screen::Login => terminal.login().await?,
            Screen::Deliveries => terminal.deliveries().await?,
            Screen::Routes => terminal.routes().await?,
            Screen::RouteDetails => terminal.route_details().await?,
            Screen::CheckIn => terminal.check_in().await?,
            Screen::Customers => terminal.customers().await?,
            Screen::CustomerHistory => terminal.customer_history().await?,
            Screen::CustomerRegistration => terminal.customer_registration().await?,
            Screen::Contracts => terminal.contracts().await?,
            Screen::Pdv | Screen::PdvDelivery => terminal.pdv(screen).await?,
        };
        if !keep_going {
            println!("{}", "👋 Até logo!".bright_green());
            break;
        }
    }

    Ok(())
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label.bright_yellow());
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

fn optional(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn header(title: &str) {
    println!();
    println!("{}", title.bright_green().bold());
    println!("{}", "=".repeat(title.chars().count()).bright_green());
}

fn show_error(err: &AppError) {
    println!("{}", format!("❌ {}", err.user_message()).bright_red());
}

fn show_tabs() {
    let tabs: Vec<String> = Screen::BOTTOM_TABS
        .iter()
        .enumerate()
        .map(|(i, s)| format!("t{} {}", i + 1, s.title()))
        .collect();
    println!("{}", tabs.join("  |  ").dimmed());
}

/// Opciones comunes: pestañas, logout y salir. Devuelve `None` si la opción no era común.
async fn common_option(state: &AppState, choice: &str) -> Option<bool> {
    match choice {
        "q" => Some(false),
        "s" => {
            state.logout().await;
            Some(true)
        }
        tab if tab.starts_with('t') => {
            let index = tab[1..].parse::<usize>().ok()?;
            let screen = Screen::BOTTOM_TABS.get(index.checked_sub(1)?)?;
            state.ui.navigate(*screen).await;
            Some(true)
        }
        _ => None,
    }
}

fn parse_index(raw: &str, len: usize) -> Option<usize> {
    raw.parse::<usize>().ok().filter(|n| *n >= 1 && *n <= len).map(|n| n - 1)
}

fn print_delivery(index: usize, delivery: &Delivery) {
    let status = match delivery.status {
        DeliveryStatus::Pending => "pendente".yellow(),
        DeliveryStatus::Completed => "concluída".green(),
        DeliveryStatus::Failed => "falhou".red(),
    };
    println!(
        "{:>2}. {} {} - {} ({} x {}) [{}] {}",
        index + 1,
        delivery.estimated_time,
        delivery.customer_name.bold(),
        delivery.address,
        delivery.bottles.quantity,
        delivery.bottles.size,
        delivery.priority.label(),
        status
    );
}

impl Terminal {
    /// Vendedor de la sesión; sin sesión vuelve al login
    async fn vendedor_or_login(&self) -> Option<i64> {
        match self.state.vendedor_id().await {
            Ok(id) => Some(id),
            Err(_) => {
                self.state.ui.navigate(Screen::Login).await;
                None
            }
        }
    }

    async fn login(&mut self) -> Result<bool> {
        header("🔐 LOGIN");
        let username = prompt("Usuário (vazio para sair): ")?;
        if username.is_empty() {
            return Ok(false);
        }
        let password = prompt("Senha: ")?;

        match self.state.login(&username, &password).await {
            Ok(credentials) => {
                println!("{}", format!("✅ Bem-vindo, {}!", credentials.user_name).bright_green());
                self.pdv = PdvSession::new();
                self.catalogo = None;
            }
            Err(e) => show_error(&e),
        }
        Ok(true)
    }

    async fn deliveries(&mut self) -> Result<bool> {
        let Some(vendedor_id) = self.vendedor_or_login().await else {
            return Ok(true);
        };
        let dia = route_service::dia_de_hoje();
        header(&format!("📦 ENTREGAS DE HOJE ({})", dia));

        if !self.state.routes.load_todays_routes(vendedor_id, dia).await {
            if let Some(message) = self.state.routes.error().await {
                println!("{}", format!("❌ {}", message).bright_red());
            }
        }

        let snapshot = self.state.routes.snapshot().await;
        let statuses = self.state.deliveries.snapshot().await;
        let all = route_service::deliveries_with_status(&snapshot.clientes_rota, &statuses);
        let pending = self.state.deliveries.pending(&all).await;
        let processed = self.state.deliveries.processed(&all).await;
        let stats = route_service::estatisticas(&snapshot.clientes_rota, &statuses);

        println!(
            "{} clientes • {} pendentes • {} atendidos • {} garrafas",
            stats.total_clientes, stats.pendentes, stats.concluidas, stats.total_garrafas
        );
        for (i, delivery) in pending.iter().enumerate() {
            print_delivery(i, delivery);
        }
        if !processed.is_empty() {
            println!("{}", format!("{} atendimentos realizados hoje", processed.len()).dimmed());
        }
        if self.state.config.checkin_sync {
            match self.state.checkin.fetch_checkins(vendedor_id).await {
                Ok(checkins) => println!("{}", format!("{} check-ins no servidor", checkins.len()).dimmed()),
                Err(e) => show_error(&e),
            }
        }

        show_tabs();
        let choice = prompt("Nº da entrega, r recarregar, s sair da conta, q fechar: ")?;
        if let Some(keep) = common_option(&self.state, &choice).await {
            return Ok(keep);
        }
        if choice == "r" {
            self.state.routes.clear_error().await;
        } else if let Some(i) = parse_index(&choice, pending.len()) {
            self.state.open_delivery(pending[i].clone()).await;
        }
        Ok(true)
    }

    async fn routes(&mut self) -> Result<bool> {
        let Some(vendedor_id) = self.vendedor_or_login().await else {
            return Ok(true);
        };
        header("🗺️ ROTAS");

        // Rutas y vínculos de todas ellas, para el estado de cada ruta
        let (rotas_ok, vinculos_ok) = tokio::join!(
            self.state.routes.load_rotas(vendedor_id),
            self.state.routes.sync_rotas_entregas(),
        );
        if !(rotas_ok && vinculos_ok) {
            if let Some(message) = self.state.routes.error().await {
                println!("{}", format!("❌ {}", message).bright_red());
            }
        }
        let snapshot = self.state.routes.snapshot().await;
        let statuses = self.state.deliveries.snapshot().await;
        let summaries = route_service::route_summaries(&snapshot.rotas, &snapshot.clientes_rota, &statuses);

        let termo = prompt("Buscar rota (enter para todas): ")?;
        let found = route_service::buscar_rotas(&summaries, &termo);
        for (i, summary) in found.iter().enumerate() {
            println!(
                "{:>2}. {} - {} [{}]",
                i + 1,
                summary.rota.nome.bold(),
                summary.rota.frequencia.as_deref().unwrap_or("-"),
                summary.status.label()
            );
        }

        show_tabs();
        let choice = prompt("Nº da rota, s sair da conta, q fechar: ")?;
        if let Some(keep) = common_option(&self.state, &choice).await {
            return Ok(keep);
        }
        let Some(i) = parse_index(&choice, found.len()) else {
            return Ok(true);
        };

        let rota = found[i].rota.clone();
        self.state.routes.select_rota(rota.id).await;
        if !self.state.routes.load_clientes_rota(rota.id).await {
            if let Some(message) = self.state.routes.error().await {
                println!("{}", format!("❌ {}", message).bright_red());
            }
            return Ok(true);
        }

        let clientes = self.state.routes.snapshot().await.clientes_rota;
        let deliveries = clientes
            .iter()
            .enumerate()
            .map(|(posicao, c)| route_service::to_delivery(c, posicao))
            .collect();
        self.state
            .open_route(SelectedRoute {
                id: rota.id.to_string(),
                name: rota.nome.clone(),
                zone: rota.zona.clone().unwrap_or_default(),
                deliveries,
            })
            .await;
        Ok(true)
    }

    async fn route_details(&mut self) -> Result<bool> {
        let Some(route) = self.state.deliveries.selected_route().await else {
            self.state.ui.navigate(Screen::Routes).await;
            return Ok(true);
        };
        header(&format!("📍 {} ({})", route.name, route.zone));

        let statuses = self.state.deliveries.snapshot().await;
        let deliveries: Vec<Delivery> = route
            .deliveries
            .iter()
            .map(|d| d.clone().with_status(statuses.get(&d.id)))
            .collect();
        for (i, delivery) in deliveries.iter().enumerate() {
            print_delivery(i, delivery);
        }

        let choice = prompt("c<N> check-in, p<N> PDV, m<N> mapa, v voltar: ")?;
        if choice == "v" {
            self.state.back().await;
            return Ok(true);
        }
        let mut chars = choice.chars();
        let action = chars.next();
        let Some(i) = parse_index(chars.as_str(), deliveries.len()) else {
            return Ok(true);
        };
        let delivery = deliveries[i].clone();

        match action {
            Some('c') => {
                self.state.deliveries.set_selected_delivery(Some(delivery)).await;
                self.state.ui.navigate(Screen::CheckIn).await;
            }
            Some('p') => {
                self.pdv = PdvSession::for_delivery(&delivery);
                self.state.deliveries.set_selected_delivery(Some(delivery)).await;
                self.state.ui.navigate(Screen::PdvDelivery).await;
            }
            Some('m') => {
                let url = delivery
                    .latitude
                    .as_deref()
                    .zip(delivery.longitude.as_deref())
                    .and_then(|(lat, lon)| route_service::maps_url(lat, lon));
                match url {
                    Some(url) => println!("🧭 {}", url),
                    None => println!("{}", "⚠️ Cliente sem coordenadas válidas".yellow()),
                }
            }
            _ => {}
        }
        Ok(true)
    }

    async fn check_in(&mut self) -> Result<bool> {
        let Some(delivery) = self.state.deliveries.selected_delivery().await else {
            self.state.ui.navigate(Screen::RouteDetails).await;
            return Ok(true);
        };
        header(&format!("✅ CHECK-IN: {}", delivery.customer_name));
        println!("{}", delivery.address);

        for (i, status) in CheckInStatus::ALL.iter().enumerate() {
            println!("{}. {}", i + 1, status.label());
        }
        let recent = self.state.deliveries.recent_check_ins().await;
        if !recent.is_empty() {
            println!("{}", "Últimos check-ins:".dimmed());
            for record in recent {
                println!(
                    "{}",
                    format!(
                        "  {} {} - {}",
                        record.timestamp.format("%H:%M"),
                        record.customer_name,
                        record.status.label()
                    )
                    .dimmed()
                );
            }
        }

        let choice = prompt("Resultado da visita (v voltar): ")?;
        if choice == "v" {
            self.state.back().await;
            return Ok(true);
        }
        let Some(i) = parse_index(&choice, CheckInStatus::ALL.len()) else {
            return Ok(true);
        };

        let (status, had_sale) = match choose_status(CheckInStatus::ALL[i]) {
            CheckInStep::AskSale(status) => {
                let answer = prompt("Houve venda de xarope? (s/n): ")?;
                (status, answer.eq_ignore_ascii_case("s"))
            }
            CheckInStep::Finish { status, had_sale } => (status, had_sale),
        };

        let Some(vendedor_id) = self.vendedor_or_login().await else {
            return Ok(true);
        };
        let outcome = self
            .state
            .checkin
            .complete_checkin(vendedor_id, &delivery, status, had_sale)
            .await;
        println!("{}", format!("✅ {}", outcome.message).bright_green());

        if outcome.next_screen == Screen::PdvDelivery {
            self.pdv = PdvSession::for_delivery(&delivery);
        }
        self.state.ui.navigate(outcome.next_screen).await;
        Ok(true)
    }

    async fn customers(&mut self) -> Result<bool> {
        let Some(vendedor_id) = self.vendedor_or_login().await else {
            return Ok(true);
        };
        header("👥 CLIENTES");

        if !self.state.customers.load_clientes(vendedor_id).await {
            if let Some(message) = self.state.customers.snapshot().await.error {
                println!("{}", format!("❌ {}", message).bright_red());
            }
        }
        let termo = prompt("Buscar cliente (enter para todos): ")?;
        let clientes = self.state.customers.filtra_clientes(&termo).await;
        for (i, cliente) in clientes.iter().enumerate() {
            println!(
                "{:>2}. {} - {} | última: {} | {}",
                i + 1,
                cliente.display_name().bold(),
                cliente.bairro.as_deref().unwrap_or("-"),
                cliente.ultima_entrega.as_deref().unwrap_or("-"),
                cliente.tipo_contrato.as_deref().unwrap_or("-")
            );
        }

        show_tabs();
        let choice = prompt("h<N> histórico, n novo cliente, c contratos, s sair da conta, q fechar: ")?;
        if let Some(keep) = common_option(&self.state, &choice).await {
            return Ok(keep);
        }
        match choice.as_str() {
            "n" => self.state.ui.navigate(Screen::CustomerRegistration).await,
            "c" => self.state.ui.navigate(Screen::Contracts).await,
            other if other.starts_with('h') => {
                if let Some(i) = parse_index(&other[1..], clientes.len()) {
                    self.state.ui.set_selected_customer(Some(clientes[i].clone())).await;
                    self.state.ui.navigate(Screen::CustomerHistory).await;
                }
            }
            _ => {}
        }
        Ok(true)
    }

    async fn customer_history(&mut self) -> Result<bool> {
        let Some(cliente) = self.state.ui.selected_customer().await else {
            self.state.back().await;
            return Ok(true);
        };
        header(&format!("🧾 HISTÓRICO: {}", cliente.display_name()));

        let Some(vendedor_id) = self.vendedor_or_login().await else {
            return Ok(true);
        };
        let vendas = match self.state.sales.historico_cliente(vendedor_id, cliente.id).await {
            Ok(vendas) => vendas,
            Err(e) => {
                show_error(&e);
                Vec::new()
            }
        };
        if vendas.is_empty() {
            println!("Nenhuma venda registrada");
        }
        for (i, venda) in vendas.iter().enumerate() {
            println!(
                "{:>2}. {} - {} itens - {}",
                i + 1,
                venda.data_venda,
                venda.venda_item.len(),
                format_brl(venda.total_itens())
            );
        }

        let choice = prompt("f<N> finalizar venda, enter para voltar: ")?;
        let venda_id = choice
            .strip_prefix('f')
            .and_then(|n| parse_index(n, vendas.len()))
            .and_then(|i| vendas[i].id);
        match venda_id {
            Some(id) => match self.state.sales.finalizar_venda(id).await {
                Ok(_) => println!("{}", format!("✅ Venda {} finalizada", id).bright_green()),
                Err(e) => show_error(&e),
            },
            None => {
                self.state.back().await;
            }
        }
        Ok(true)
    }

    async fn customer_registration(&mut self) -> Result<bool> {
        header("📝 CADASTRO DE CLIENTE");
        let nome = prompt("Nome: ")?;
        let telefone = prompt("Telefone: ")?;
        let cep = optional(prompt("CEP (opcional): ")?);

        let mut endereco = None;
        let mut bairro = None;
        let mut cidade = None;
        if let Some(cep) = cep.as_deref() {
            match self.state.cep.buscar(cep).await {
                Ok(found) => {
                    println!("📮 {} - {} - {}", found.logradouro, found.bairro, found.cidade_uf());
                    endereco = optional(found.logradouro.clone());
                    bairro = optional(found.bairro.clone());
                    cidade = optional(found.localidade.clone());
                }
                Err(e) => show_error(&e),
            }
        }

        let endereco = match endereco {
            Some(rua) => rua,
            None => prompt("Endereço: ")?,
        };
        let numero = optional(prompt("Número: ")?);
        let bairro = match bairro {
            Some(b) => Some(b),
            None => optional(prompt("Bairro: ")?),
        };
        let email = optional(prompt("E-mail (opcional): ")?);
        let referencia = optional(prompt("Referência (opcional): ")?);

        for (i, tipo) in TipoContrato::ALL.iter().enumerate() {
            println!("{}. {}", i + 1, tipo.label());
        }
        let Some(tipo) = parse_index(&prompt("Tipo de contrato: ")?, TipoContrato::ALL.len())
            .map(|i| TipoContrato::ALL[i])
        else {
            println!("{}", "❌ Selecione o tipo de contrato".bright_red());
            return Ok(true);
        };

        let payload = ClienteCadastroPayload {
            nome,
            email,
            telefone,
            endereco,
            numero,
            bairro,
            cidade,
            cep,
            referencia,
            tipo_contrato: tipo,
            vendedor_id: self.state.vendedor_id().await.ok(),
        };

        if self.state.customers.cadastrar_cliente(payload).await {
            println!("{}", "✅ Cliente cadastrado! Contrato enviado para assinatura".bright_green());
            self.state.ui.navigate(Screen::Contracts).await;
        } else {
            if let Some(message) = self.state.customers.snapshot().await.error {
                println!("{}", format!("❌ {}", message).bright_red());
            }
            self.state.customers.clear_error().await;
            if prompt("Tentar de novo? (s/n): ")?.eq_ignore_ascii_case("n") {
                self.state.back().await;
            }
        }
        Ok(true)
    }

    async fn contracts(&mut self) -> Result<bool> {
        let Some(vendedor_id) = self.vendedor_or_login().await else {
            return Ok(true);
        };
        header("📄 CONTRATOS");

        let contratos = match self.state.contracts.pendencias(vendedor_id).await {
            Ok(contratos) => contratos,
            Err(e) => {
                show_error(&e);
                self.state.back().await;
                return Ok(true);
            }
        };
        let hoje = chrono::Local::now().date_naive();
        println!("{}", "Pendentes".bold());
        for (i, c) in contratos.pendentes.iter().enumerate() {
            let dias = contract_service::dias_desde_criacao(c, hoje)
                .map(|d| format!("há {} dias", d))
                .unwrap_or_default();
            println!("{:>2}. {} - {} {}", i + 1, c.cliente_nome, c.tipo_contrato, dias.dimmed());
        }
        println!("{}", "Assinados".bold());
        for c in &contratos.assinados {
            println!("    {} - {}", c.cliente_nome, c.tipo_contrato);
        }

        let choice = prompt("w<N> link de WhatsApp, v voltar: ")?;
        if let Some(rest) = choice.strip_prefix('w') {
            if let Some(i) = parse_index(rest, contratos.pendentes.len()) {
                match contract_service::whatsapp_link(&contratos.pendentes[i]) {
                    Ok(link) => println!("💬 {}", link),
                    Err(e) => show_error(&e),
                }
            }
        } else if choice == "v" {
            self.state.back().await;
        }
        Ok(true)
    }

    async fn pdv(&mut self, screen: Screen) -> Result<bool> {
        let Ok(credentials) = self.state.session.require().await else {
            self.state.ui.navigate(Screen::Login).await;
            return Ok(true);
        };
        header(if screen == Screen::PdvDelivery { "🛒 PDV DA ENTREGA" } else { "🛒 PDV" });

        if self.catalogo.is_none() {
            match self
                .state
                .sales
                .catalogo(credentials.vendedor_id, credentials.distribuidor_id)
                .await
            {
                Ok(catalogo) => self.catalogo = Some(catalogo),
                Err(e) => {
                    show_error(&e);
                    self.state.ui.navigate(Screen::Deliveries).await;
                    return Ok(true);
                }
            }
        }
        let Some(catalogo) = self.catalogo.as_ref() else {
            return Ok(true);
        };

        println!("Categorias: {}", catalogo.categorias().join(", ").dimmed());
        let produtos = catalogo.filtrar(&self.categoria, &self.busca_produto);
        for produto in &produtos {
            let no_carrinho = self.pdv.cart.item_quantity(produto.id);
            println!(
                "{:>3}. {} {} {}",
                produto.id,
                produto.nome,
                format_brl(produto.preco),
                if no_carrinho > 0 { format!("(x{})", no_carrinho).green() } else { "".normal() }
            );
        }
        println!(
            "Carrinho: {} itens • Total {} • Cliente: {} • Pagamento: {}",
            self.pdv.cart.item_count(),
            format_brl(self.pdv.cart.total()).bold(),
            if self.pdv.customer_name.is_empty() { "-" } else { self.pdv.customer_name.as_str() },
            self.pdv
                .meio_pagamento_id
                .and_then(|id| catalogo.meio_pagamento(id))
                .map_or("-", |m| m.descricao.as_str())
        );

        if screen == Screen::Pdv {
            show_tabs();
        }
        let choice = prompt("+<id> / -<id> / =<id> <qtd> / c <categoria> / b <busca> / n cliente / f pagamento / x finalizar / v voltar: ")?;
        if screen == Screen::Pdv {
            if let Some(keep) = common_option(&self.state, &choice).await {
                return Ok(keep);
            }
        }

        if let Some(id) = choice.strip_prefix('+').and_then(|id| id.trim().parse::<i64>().ok()) {
            if let Some(produto) = catalogo.produto(id) {
                self.pdv.cart.add(produto);
            }
        } else if let Some(id) = choice.strip_prefix('-').and_then(|id| id.trim().parse::<i64>().ok()) {
            self.pdv.cart.remove(id);
        } else if let Some(rest) = choice.strip_prefix('=') {
            let mut parts = rest.split_whitespace();
            if let (Some(Ok(id)), Some(Ok(n))) =
                (parts.next().map(str::parse::<i64>), parts.next().map(str::parse::<i64>))
            {
                self.pdv.cart.set_quantity(id, n);
            }
        } else if let Some(categoria) = choice.strip_prefix("c ") {
            self.categoria = categoria.trim().to_string();
        } else if let Some(busca) = choice.strip_prefix('b') {
            self.busca_produto = busca.trim().to_string();
        } else if choice == "n" {
            self.pdv.customer_name = prompt("Nome do cliente: ")?;
        } else if choice == "f" {
            for meio in &catalogo.meios_pagamento {
                println!("{}. {}", meio.id, meio.descricao);
            }
            self.pdv.meio_pagamento_id = prompt("Forma de pagamento: ")?.parse::<i64>().ok();
            self.pdv.parcelas = prompt(&format!("Parcelas (1-{}): ", MAX_PARCELAS))?
                .parse::<u32>()
                .unwrap_or(1)
                .clamp(1, MAX_PARCELAS);
        } else if choice == "x" {
            match self.pdv.finalize(&self.state.sales, credentials.vendedor_id).await {
                Ok(receipt) => println!("{}", format!("✅ {}", receipt.toast()).bright_green()),
                Err(e) => {
                    error!("❌ Checkout: {}", e);
                    println!("{}", format!("❌ {}", e.toast()).bright_red());
                }
            }
        } else if choice == "v" && screen == Screen::PdvDelivery {
            self.state.back().await;
        }
        Ok(true)
    }
}
