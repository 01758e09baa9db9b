//! Busca Já - freight marketplace client
//!
//! Connects people who need to move cargo with independent freight drivers
//! (freteiros), from the terminal.

mod api;
mod auth;
mod booking;
mod catalog;
mod chat;
mod commands;
mod config;
mod models;
mod tui;
mod validation;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::Registration;
use booking::HireForm;
use catalog::{DashboardTab, SearchFilters};
use commands::App;
use models::{FreightAction, FreightStatus, PaymentMethod, ProfileUpdate, Role};

#[derive(Parser)]
#[command(name = "busca-ja")]
#[command(about = "Encontre freteiros e contrate fretes pelo terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show who is signed in
    Status,

    /// Create an account
    Register(RegisterArgs),

    /// Show or update the signed-in profile
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        whatsapp: Option<String>,
        /// Avatar image URL
        #[arg(long)]
        avatar: Option<String>,
    },

    /// Check a field value: cidade, endereco, data or valor
    Validate { kind: String, value: String },

    /// Search for drivers
    Search {
        #[arg(long)]
        origin: Option<String>,
        #[arg(long)]
        destination: Option<String>,
        #[arg(long)]
        date: Option<String>,
        /// Maximum price, e.g. "R$ 500,00"
        #[arg(long)]
        max_price: Option<String>,
        /// Vehicle capacity class in kg (300, 450, 500, 2500, 4800)
        #[arg(long)]
        vehicle: Option<u32>,
        #[arg(long)]
        min_capacity: Option<u32>,
        #[arg(long)]
        min_rating: Option<f32>,
        /// Only verified drivers
        #[arg(long)]
        verified: bool,
        #[arg(long, default_value = "1")]
        page: usize,
        /// Home-screen search: origin, destination, date and max price required
        #[arg(long)]
        quick: bool,
    },

    /// List vehicle capacity classes
    Vehicles,

    /// Show a driver's profile and reviews
    Driver { id: u32 },

    /// Hire a driver
    Hire {
        driver_id: u32,
        #[arg(long)]
        origin: String,
        #[arg(long)]
        destination: String,
        /// YYYY-MM-DD or DD/MM/YYYY
        #[arg(long)]
        date: String,
        /// Cargo description
        #[arg(long)]
        cargo: String,
        /// HH:MM
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        weight: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// dinheiro, pix or cartao
        #[arg(long, default_value = "dinheiro")]
        payment: PaymentMethod,
    },

    /// List your freights
    Freights {
        /// pendente, agendado, em_andamento, concluido or cancelado
        #[arg(long)]
        status: Option<FreightStatus>,
    },

    /// Driver dashboard
    Dashboard {
        #[arg(long, value_enum, default_value_t = TabArg::New)]
        tab: TabArg,
    },

    /// Change a freight's status
    Freight {
        #[arg(value_enum)]
        action: ActionArg,
        id: u32,
    },

    /// Rate a driver from 1 to 10
    Review {
        driver_id: u32,
        #[arg(long)]
        score: u8,
        #[arg(long)]
        comment: Option<String>,
    },

    /// Upload a document
    Upload { file: PathBuf },

    /// Open a chat with a driver
    Chat { driver_id: u32 },
}

#[derive(Args)]
struct RegisterArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    #[arg(long)]
    confirm_password: String,
    /// Register as a freight driver
    #[arg(long)]
    driver: bool,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    whatsapp: Option<String>,
    /// Photo holding your ID document (drivers)
    #[arg(long)]
    identity_photo: Option<PathBuf>,
    #[arg(long)]
    vehicle: Option<String>,
    #[arg(long)]
    capacity: Option<u32>,
    #[arg(long)]
    area: Option<String>,
    #[arg(long)]
    price_per_km: Option<String>,
}

impl RegisterArgs {
    fn into_registration(self) -> Registration {
        let role = if self.driver { Role::Driver } else { Role::Client };
        Registration {
            driver: commands::driver_profile(
                role,
                self.vehicle,
                self.capacity,
                self.area,
                self.price_per_km,
            ),
            identity_photo: commands::photo_path(self.identity_photo),
            name: self.name,
            email: self.email,
            password: self.password,
            password_confirmation: self.confirm_password,
            role,
            phone: self.phone,
            whatsapp: self.whatsapp,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TabArg {
    New,
    Active,
    Finished,
}

impl From<TabArg> for DashboardTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::New => DashboardTab::New,
            TabArg::Active => DashboardTab::Active,
            TabArg::Finished => DashboardTab::Finished,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ActionArg {
    Accept,
    Decline,
    Start,
    Finish,
    Cancel,
}

impl From<ActionArg> for FreightAction {
    fn from(action: ActionArg) -> Self {
        match action {
            ActionArg::Accept => FreightAction::Accept,
            ActionArg::Decline => FreightAction::Decline,
            ActionArg::Start => FreightAction::Start,
            ActionArg::Finish => FreightAction::Finish,
            ActionArg::Cancel => FreightAction::Cancel,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging. The chat screen owns the terminal, so its logs go
    // to a buffer instead.
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());
    let logs = tui::LogBuffer::new();
    if matches!(cli.command, Commands::Chat { .. }) {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(logs.clone()),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    let mut app = App::load(cli.json)?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::login(&mut app, &email, &password).await?;
        }
        Commands::Logout => {
            commands::logout(&mut app).await?;
        }
        Commands::Status => {
            commands::status(&app)?;
        }
        Commands::Register(args) => {
            commands::register(&mut app, args.into_registration()).await?;
        }
        Commands::Profile {
            name,
            email,
            phone,
            whatsapp,
            avatar,
        } => {
            let update = ProfileUpdate {
                name,
                email,
                avatar,
                phone,
                whatsapp,
                driver: None,
            };
            commands::profile(&mut app, update)?;
        }
        Commands::Validate { kind, value } => {
            commands::validate(&app, &kind, &value)?;
        }
        Commands::Search {
            origin,
            destination,
            date,
            max_price,
            vehicle,
            min_capacity,
            min_rating,
            verified,
            page,
            quick,
        } => {
            let filters = SearchFilters {
                origin,
                destination,
                date,
                max_price,
                vehicle_kg: vehicle,
                min_capacity_kg: min_capacity,
                min_rating,
                verified_only: verified,
            };
            commands::search(&app, filters, page, quick).await?;
        }
        Commands::Vehicles => {
            commands::vehicles(&app)?;
        }
        Commands::Driver { id } => {
            commands::driver(&app, id).await?;
        }
        Commands::Hire {
            driver_id,
            origin,
            destination,
            date,
            cargo,
            time,
            weight,
            notes,
            payment,
        } => {
            let form = HireForm {
                origin,
                destination,
                date,
                time,
                cargo,
                weight,
                notes,
                payment,
            };
            commands::hire(&app, driver_id, form).await?;
        }
        Commands::Freights { status } => {
            commands::freights(&app, status).await?;
        }
        Commands::Dashboard { tab } => {
            commands::dashboard(&app, tab.into()).await?;
        }
        Commands::Freight { action, id } => {
            commands::freight_action(&mut app, id, action.into()).await?;
        }
        Commands::Review {
            driver_id,
            score,
            comment,
        } => {
            commands::review(&mut app, driver_id, score, comment)?;
        }
        Commands::Upload { file } => {
            commands::upload(&app, &file).await?;
        }
        Commands::Chat { driver_id } => {
            commands::chat(&app, driver_id, logs).await?;
        }
    }

    Ok(())
}
