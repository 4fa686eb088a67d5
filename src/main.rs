use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smart_inventory::{api, codes::CodeGenerator, config::Config, db, inventory::Inventory};

#[derive(Parser)]
#[command(name = "inventory")]
#[command(about = "Equipment inventory tracking with scannable QR codes")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Port for the HTTP server (overrides INVENTORY_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind (overrides INVENTORY_HOST)
        #[arg(long)]
        host: Option<String>,
    },
    /// Create or upgrade the database schema and exit
    Migrate,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "smart_inventory=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn open_database(config: &Config) -> anyhow::Result<db::Database> {
    tracing::info!("Using database at {}", config.database_path.display());
    let db = db::Database::open(&config.database_path)?;
    db.migrate()?;
    Ok(db)
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let db = open_database(&config)?;
    let codes = CodeGenerator::new(&config.static_dir, config.base_url());
    let inventory = Inventory::new(db, codes);

    let app = api::create_router_with_config(inventory, &config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(
        "Smart Inventory listening on http://{} (codes point at {})",
        config.bind_addr(),
        config.base_url()
    );

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::from_env()?;

    match cli.command {
        Some(Commands::Serve { port, host }) => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            serve(config).await?;
        }
        Some(Commands::Migrate) => {
            open_database(&config)?;
            tracing::info!("Database is up to date");
        }
        None => serve(config).await?,
    }

    Ok(())
}
