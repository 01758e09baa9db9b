//! Command handlers: run one operation and print the result

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::api::{ApiClient, PaginatedResponse};
use crate::auth::{Access, Registration, Session};
use crate::booking::{self, HireForm};
use crate::catalog::{Catalog, CatalogError, DashboardTab, MockCatalog, SearchFilters};
use crate::chat::{ChatSession, OsDice};
use crate::config::{ChatSettings, Config};
use crate::models::{
    format_brl, DriverListing, DriverProfile, Freight, FreightAction, FreightStatus, ProfileUpdate,
    Review, Role, User,
};
use crate::tui::{self, LogBuffer};
use crate::validation::{self, forms::SearchQuery};

/// Everything a command may touch
pub struct App {
    pub session: Session<Config>,
    pub catalog: MockCatalog,
    pub api: ApiClient,
    pub page_size: usize,
    pub chat: ChatSettings,
    /// Print JSON instead of text
    pub json: bool,
}

impl App {
    pub fn load(json: bool) -> Result<Self> {
        let config = Config::load()?;
        let page_size = config.page_size;
        let chat = config.chat;

        Ok(Self {
            session: Session::restore(config),
            catalog: MockCatalog::seeded(),
            api: ApiClient::new(),
            page_size,
            chat,
            json,
        })
    }

    fn current_user(&self, access: Access) -> Result<User> {
        Ok(self.session.require(access)?.clone())
    }

    fn driver(&self, id: u32) -> Result<DriverListing> {
        self.catalog
            .driver(id)
            .with_context(|| format!("Freteiro {} não encontrado", id))
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", out);
    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub async fn login(app: &mut App, email: &str, password: &str) -> Result<()> {
    if !app.session.login(email, password) {
        bail!("Email ou senha incorretos.");
    }
    app.api.sign_in(email, password).await;

    let user = app.current_user(Access::Authenticated)?;
    if app.json {
        return print_json(&user);
    }
    println!("Bem-vindo, {}! ({})", user.name, user.role.as_str());
    Ok(())
}

pub async fn logout(app: &mut App) -> Result<()> {
    if !app.session.is_authenticated() {
        println!("Nenhuma sessão ativa.");
        return Ok(());
    }
    app.api.sign_out().await;
    app.session.logout();
    println!("Sessão encerrada.");
    Ok(())
}

pub fn status(app: &App) -> Result<()> {
    let Some(user) = app.session.user() else {
        if app.json {
            return print_json(&serde_json::Value::Null);
        }
        println!("Não autenticado. Use 'busca-ja login'.");
        return Ok(());
    };

    if app.json {
        return print_json(user);
    }
    println!("Conectado como {} <{}>", user.name, user.email);
    println!("  Tipo: {}", user.role.as_str());
    if app.session.is_driver() {
        println!("  Painel: busca-ja dashboard");
    }
    Ok(())
}

pub async fn register(app: &mut App, registration: Registration) -> Result<()> {
    registration.check()?;

    let resp = app
        .api
        .sign_up(
            &registration.email,
            &registration.password,
            &registration.name,
            registration.role,
        )
        .await;
    if !resp.success {
        bail!("Falha no cadastro: {}", resp.error.unwrap_or_default());
    }

    let photo = registration.identity_photo.clone();
    if let Some(ref profile) = registration.driver {
        app.api.register_driver(profile).await;
    }

    let user = app.session.register(registration);
    if let Some(photo) = photo {
        app.api.upload_document(&photo, &user.id).await;
    }

    if app.json {
        return print_json(&user);
    }
    println!("Conta criada para {} ({}).", user.name, user.role.as_str());
    Ok(())
}

pub fn profile(app: &mut App, update: ProfileUpdate) -> Result<()> {
    if !update.is_empty() && !app.session.update_profile(update) {
        app.session.require(Access::Authenticated)?;
    }

    let user = app.current_user(Access::Authenticated)?;
    if app.json {
        return print_json(&user);
    }

    println!("{} ({})", user.name, user.initials());
    println!("  Email:    {}", user.email);
    println!("  Tipo:     {}", user.role.as_str());
    if let Some(ref phone) = user.phone {
        println!("  Telefone: {}", phone);
    }
    if let Some(ref whatsapp) = user.whatsapp {
        println!("  WhatsApp: {}", whatsapp);
    }
    if let Some(ref driver) = user.driver {
        print_driver_profile(driver);
    }
    Ok(())
}

fn print_driver_profile(driver: &DriverProfile) {
    println!("  Veículo:  {} ({}kg)", driver.vehicle_type, driver.max_capacity_kg);
    println!("  Área:     {}", driver.service_area);
    println!("  Preço/km: {}", format_brl(driver.price_per_km));
    println!(
        "  Nota:     {:.1} ({} avaliações){}",
        driver.average_rating,
        driver.rating_count,
        if driver.verified { ", verificado" } else { "" }
    );
}

pub fn validate(app: &App, kind: &str, value: &str) -> Result<()> {
    let result = validation::validate_named(value, kind);
    if app.json {
        return print_json(&result);
    }
    if result.is_valid {
        println!("✓ {}", result.message);
    } else {
        println!("✗ {}", result.message);
    }
    Ok(())
}

pub async fn search(app: &App, filters: SearchFilters, page: usize, quick: bool) -> Result<()> {
    let filters = if quick {
        let field = |v: &Option<String>| v.clone().unwrap_or_default();
        SearchQuery::new(
            &field(&filters.origin),
            &field(&filters.destination),
            &field(&filters.date),
            &field(&filters.max_price),
        )?
        .into_filters()
    } else {
        filters
    };

    app.api.search_drivers(&filters).await;
    let results = app.catalog.search_drivers(&filters, page, app.page_size);

    if app.json {
        return print_json(&PaginatedResponse::from(results));
    }

    if let (Some(origin), Some(destination)) = (&filters.origin, &filters.destination) {
        println!("{} → {}", origin, destination);
    }
    if results.items.is_empty() {
        println!("Nenhum freteiro encontrado.");
        return Ok(());
    }
    for driver in &results.items {
        print_listing(driver);
    }
    println!(
        "Página {} de {} ({} freteiros)",
        results.page,
        results.total_pages(),
        results.total
    );
    Ok(())
}

fn print_listing(driver: &DriverListing) {
    println!(
        "{:>3}  {}{}",
        driver.id,
        driver.name,
        if driver.verified { " ✓" } else { "" }
    );
    println!(
        "     {:.1} {} ({} avaliações) | {} | {} | {}",
        driver.rating,
        driver.rating_text(),
        driver.review_count,
        driver.vehicle(),
        driver.typical_duration,
        format_brl(driver.price)
    );
}

pub fn vehicles(app: &App) -> Result<()> {
    let classes = app.catalog.vehicle_classes();
    if app.json {
        return print_json(&classes);
    }
    for class in &classes {
        println!(
            "{:<16} {} x {} x {}  a partir de {}",
            class.title(),
            class.height,
            class.width,
            class.depth,
            format_brl(class.starting_price)
        );
    }
    Ok(())
}

pub async fn driver(app: &App, id: u32) -> Result<()> {
    app.api.driver_by_id(id).await;
    let driver = app.driver(id)?;
    let reviews = app.catalog.reviews(id);

    if app.json {
        return print_json(&serde_json::json!({ "driver": driver, "reviews": reviews }));
    }

    print_listing(&driver);
    println!("     {}", driver.description);
    println!("     Atende: {}", driver.service_area);
    println!("     Telefone: {}", driver.phone);
    if driver.issues_invoice {
        println!("     Emite nota fiscal");
    }
    if driver.carries_furniture {
        println!("     Transporta móveis");
    }
    if !reviews.is_empty() {
        println!();
        println!("Avaliações:");
        for review in &reviews {
            println!(
                "  {} {} ({}) em {}",
                review.score,
                review.label(),
                review.author,
                review.date.format("%d/%m/%Y")
            );
            if let Some(ref comment) = review.comment {
                println!("    {}", comment);
            }
        }
    }
    Ok(())
}

pub async fn hire(app: &App, driver_id: u32, form: HireForm) -> Result<()> {
    let user = app.current_user(Access::Authenticated)?;
    let driver = app.catalog.driver(driver_id);

    let draft = booking::submit(driver.as_ref(), form, today())?;
    app.api.book_freight(draft.driver.id, &draft.form).await;
    let confirmation = booking::confirm(Some(draft), &user)?;

    if app.json {
        return print_json(&confirmation);
    }

    let freight = &confirmation.freight;
    println!("{}", confirmation.headline());
    println!("{}", confirmation.follow_up());
    println!();
    println!("Freteiro: {} ({})", freight.driver_name, freight.contact_phone);
    println!("Serviço agendado para {}", freight.date.format("%d/%m/%Y"));
    for policy in confirmation.policies {
        println!("  • {}", policy);
    }
    println!("{} → {}", freight.origin, freight.destination);
    println!(
        "Pagamento: {} ({})",
        freight.payment.label(),
        freight.payment.description()
    );
    println!("TOTAL: {}", format_brl(freight.price));
    Ok(())
}

pub async fn freights(app: &App, status: Option<FreightStatus>) -> Result<()> {
    let user = app.current_user(Access::Authenticated)?;
    app.api.my_freights(&user.id).await;

    let freights: Vec<Freight> = app
        .catalog
        .client_freights(&user.id)
        .into_iter()
        .filter(|f| status.map_or(true, |s| f.status == s))
        .collect();

    if app.json {
        return print_json(&freights);
    }
    if freights.is_empty() {
        println!("Nenhum frete encontrado.");
        return Ok(());
    }
    for freight in &freights {
        print_freight(freight, &freight.driver_name);
    }

    let counts: Vec<String> = FreightStatus::ALL
        .iter()
        .map(|s| (s, freights.iter().filter(|f| f.status == *s).count()))
        .filter(|(_, n)| *n > 0)
        .map(|(s, n)| format!("{}: {}", s.label(), n))
        .collect();
    println!("{}", counts.join(" | "));
    Ok(())
}

pub async fn dashboard(app: &App, tab: DashboardTab) -> Result<()> {
    let user = app.current_user(Access::Driver)?;
    app.api.driver_freights(&user.id).await;

    let freights = app.catalog.dashboard(&user.id, tab);
    if app.json {
        return print_json(&freights);
    }

    println!("{} ({})", tab.label(), freights.len());
    if freights.is_empty() {
        println!("{}", tab.empty_message());
    }
    for freight in &freights {
        print_freight(freight, &freight.client_name);
    }
    Ok(())
}

fn print_freight(freight: &Freight, counterpart: &str) {
    let when = match freight.time {
        Some(time) => format!("{} {}", freight.date.format("%d/%m/%Y"), time.format("%H:%M")),
        None => freight.date.format("%d/%m/%Y").to_string(),
    };
    println!("#{} [{}] {}", freight.id, freight.status.label(), counterpart);
    println!("     {} → {}", freight.origin, freight.destination);
    println!(
        "     {} | {} | {} ({})",
        when,
        freight.description,
        format_brl(freight.price),
        freight.payment.label()
    );
}

/// Drivers move their own freights along; either party may cancel.
pub async fn freight_action(app: &mut App, id: u32, action: FreightAction) -> Result<()> {
    let access = match action {
        FreightAction::Cancel => Access::Authenticated,
        _ => Access::Driver,
    };
    let user = app.current_user(access)?;

    let current = app
        .catalog
        .freight(id)
        .ok_or(CatalogError::FreightNotFound(id))?;
    if !may_act(&current, &user, action) {
        bail!("O frete #{} não pertence a você.", id);
    }

    let freight = app.catalog.apply(id, action)?;
    app.api.update_freight_status(id, freight.status).await;

    if app.json {
        return print_json(&freight);
    }
    println!("Frete #{}: {}", freight.id, freight.status.label());
    if freight.status.is_final() {
        println!("Este frete foi encerrado.");
    }
    Ok(())
}

fn may_act(freight: &Freight, user: &User, action: FreightAction) -> bool {
    let driver = freight.driver_id == user.id;
    match action {
        FreightAction::Cancel => driver || freight.client_id == user.id,
        _ => driver,
    }
}

pub fn review(app: &mut App, driver_id: u32, score: u8, comment: Option<String>) -> Result<()> {
    let user = app.current_user(Access::Authenticated)?;
    let review = Review::new(user.name, score, comment, today())?;
    let label = review.label();

    app.catalog.add_review(driver_id, review)?;
    let driver = app.driver(driver_id)?;

    if app.json {
        return print_json(&driver);
    }
    println!("Avaliação registrada: {} ({})", score, label);
    println!(
        "{} agora tem nota {:.1} ({} avaliações)",
        driver.name, driver.rating, driver.review_count
    );
    Ok(())
}

pub async fn upload(app: &App, file: &Path) -> Result<()> {
    let user = app.current_user(Access::Authenticated)?;
    if !file.is_file() {
        bail!("Arquivo não encontrado: {}", file.display());
    }

    let resp = app.api.upload_document(file, &user.id).await;
    if app.json {
        return print_json(&resp);
    }
    match resp.data {
        Some(path) => println!("Documento enviado: {}", path),
        None => bail!("Falha no envio: {}", resp.error.unwrap_or_default()),
    }
    Ok(())
}

pub async fn chat(app: &App, driver_id: u32, logs: LogBuffer) -> Result<()> {
    let driver = app.driver(driver_id)?;
    let (session, events) = ChatSession::open(driver.name, app.chat.timing(), Arc::new(OsDice));

    let result = tui::run(session, events, logs.clone()).await;

    for line in logs.drain() {
        eprintln!("{}", line);
    }
    result
}

/// Identity photo given on the command line, if any
pub fn photo_path(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
}

/// Driver profile assembled from registration flags
pub fn driver_profile(
    role: Role,
    vehicle: Option<String>,
    capacity_kg: Option<u32>,
    area: Option<String>,
    price_per_km: Option<String>,
) -> Option<DriverProfile> {
    if role != Role::Driver {
        return None;
    }
    let price_per_km = price_per_km
        .as_deref()
        .and_then(validation::parse_amount)
        .map(|reais| (reais * 100.0).round() as u64)
        .unwrap_or(0);

    Some(DriverProfile {
        max_capacity_kg: capacity_kg.unwrap_or(0),
        vehicle_type: vehicle.unwrap_or_default(),
        service_area: area.unwrap_or_default(),
        price_per_km,
        average_rating: 0.0,
        rating_count: 0,
        verified: false,
        available: true,
    })
}
