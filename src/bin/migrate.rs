use clap::Parser;
use dotenv::dotenv;
use morchy_api::server::{config::ServerConfig, database};
use morchy_api::version::VERSION;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version = VERSION, about = "Applies the database schema migrations", long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::load(args.config.as_deref())?;
    let db = database::connect(&config.database).await?;

    if let Err(e) = database::run_migrations(&db).await {
        error!(error = %e, "Migration failed.");
        return Err(e.into());
    }
    info!("Database schema is up to date.");
    db.close().await?;
    Ok(())
}
