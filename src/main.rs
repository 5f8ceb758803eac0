mod ui;

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use beehive_dashboard::config::{self, AppConfig};
use beehive_dashboard::network::ApiClient;
use beehive_dashboard::session::IdentityStore;
use beehive_dashboard::storage::{self, SqliteCredentialSlot};
use beehive_dashboard::{DashboardRuntime, PollSettings};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tokio::sync::mpsc;
use ui::DashboardApp;

#[derive(Parser)]
#[command(
    name = "beehive-dashboard",
    version,
    about = "Beehive dashboard: admin chat and notifications"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand)]
enum Mode {
    /// Sign in and store the access token
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored access token
    Logout,
    /// Print the identity carried by the stored token
    Whoami,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let mut app_config = config::load_config(&cli.config);
    if !Path::new(&cli.config).exists() {
        if let Err(err) = config::save_config(&cli.config, &app_config) {
            log::warn!("Could not write default config to {}: {err}", cli.config);
        }
    }
    app_config.apply_env_overrides();

    let identity = open_identity_store(&app_config)?;
    let client = ApiClient::new(
        app_config.api_base_url.clone(),
        app_config.routes.clone(),
        identity.clone(),
    )?;

    match cli.mode {
        Some(Mode::Login { username, password }) => {
            let token = client.sign_in(&username, &password).await?;
            identity.save_credential(&token)?;
            match identity.live_identity() {
                Some(who) => println!("Signed in as {} ({})", who.subject_id, who.role),
                None => println!("Signed in, but the returned token carries no usable identity"),
            }
            Ok(())
        }
        Some(Mode::Logout) => {
            identity.clear_credential()?;
            println!("Signed out");
            Ok(())
        }
        Some(Mode::Whoami) => {
            match identity.derive_identity() {
                Some(who) => {
                    let state = if who.is_live() { "live" } else { "expired" };
                    let name = who.display_name.as_deref().unwrap_or("-");
                    println!("{} ({}) name={name} session={state}", who.subject_id, who.role);
                }
                None => println!("Not signed in"),
            }
            Ok(())
        }
        None => run_dashboard(app_config, identity, client).await,
    }
}

fn open_identity_store(app_config: &AppConfig) -> Result<IdentityStore, Box<dyn Error>> {
    storage::ensure_data_dir(&app_config.data_dir)?;
    let db_path = storage::session_db_path(&app_config.data_dir);
    let slot = SqliteCredentialSlot::with_path(&db_path)?;
    log::info!("Credential store at {}", db_path.display());
    Ok(IdentityStore::new(Arc::new(slot)))
}

async fn run_dashboard(
    app_config: AppConfig,
    identity: IdentityStore,
    client: ApiClient,
) -> Result<(), Box<dyn Error>> {
    let Some(viewer) = identity.live_identity() else {
        return Err("no live session; run `beehive-dashboard login` first".into());
    };
    log::info!("Dashboard starting for {} ({})", viewer.subject_id, viewer.role);

    // UI -> runtime
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // runtime -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    let runtime = DashboardRuntime::new(
        Arc::new(client),
        identity,
        PollSettings::from(&app_config),
        cmd_rx,
        event_tx,
    );
    tokio::spawn(runtime.run());

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Beehive Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, Some(viewer), cmd_tx, event_rx)))),
    )?;
    Ok(())
}
