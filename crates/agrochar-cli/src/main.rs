use agrochar_client::SessionEvent;
use agrochar_core::Operation;
use agrochar_core::model::Role;
use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod commands;
mod navigation;

use commands::{App, GlobalOptions};

#[derive(Parser)]
#[command(name = "agrochar")]
#[command(about = "AgroChar CLI - crop residue advisory and marketplace client", long_about = None)]
struct Cli {
    /// Log requests and responses to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Answer failed data calls with canned data
    #[arg(long, global = true)]
    mock: bool,

    /// Backend base URL, including the API version prefix
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        phone: String,
        #[arg(long)]
        password: String,
    },
    /// End the session, locally even if the backend is unreachable
    Logout,
    /// Show the stored session without contacting the backend
    Whoami,
    /// Fetch the current user's profile from the backend
    Me,
    /// Create an account
    Register {
        name: String,
        phone: String,
        #[arg(long)]
        password: String,
        /// farmer, buyer or admin
        #[arg(long, default_value = "farmer")]
        role: Role,
    },
    /// Rank residue-management alternatives for a field
    Advise {
        /// Field size in acres
        size_acres: f64,
        crop: String,
        district: String,
        #[arg(long)]
        state: Option<String>,
    },
    /// Find buyers near a district
    Nearby {
        district: String,
        /// Residue product, e.g. biochar or pellets
        #[arg(long = "type")]
        residue_type: Option<String>,
        #[arg(long)]
        radius_km: Option<u32>,
    },
    /// Place a bid on a listing
    Bid {
        listing_id: String,
        price_per_ton: f64,
        quantity_tons: f64,
    },
    /// Run a read-only operation by name, e.g. `crops-list`
    Get { operation: Operation },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let app = App::build(&GlobalOptions {
        mock: cli.mock,
        base_url: cli.base_url.clone(),
    })?;
    let mut events = app.api.inner().subscribe();

    let outcome = run(&app, cli.command).await;

    // Navigation happens here, never inside the client
    if let Some((route, event)) = navigation::pending_route(&mut events) {
        match event {
            SessionEvent::Established { .. } => {
                println!("{}", format!("Next: {}", route).cyan());
            }
            SessionEvent::Cleared { reason } => {
                eprintln!(
                    "{}",
                    format!("Session {}; next: {}", navigation::describe_clear(reason), route)
                        .yellow()
                );
            }
        }
    }

    outcome
}

async fn run(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::Login { phone, password } => commands::auth::login(app, phone, password).await,
        Commands::Logout => commands::auth::logout(app).await,
        Commands::Whoami => commands::auth::whoami(app),
        Commands::Me => commands::auth::me(app).await,
        Commands::Register {
            name,
            phone,
            password,
            role,
        } => commands::auth::register(app, name, phone, password, role).await,
        Commands::Advise {
            size_acres,
            crop,
            district,
            state,
        } => commands::data::advise(app, size_acres, crop, district, state).await,
        Commands::Nearby {
            district,
            residue_type,
            radius_km,
        } => commands::data::nearby(app, district, residue_type, radius_km).await,
        Commands::Bid {
            listing_id,
            price_per_ton,
            quantity_tons,
        } => commands::data::bid(app, listing_id, price_per_ton, quantity_tons).await,
        Commands::Get { operation } => commands::data::get(app, operation).await,
    }
}
