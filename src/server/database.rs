use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tracing::info;

use crate::server::config::DatabaseConfig;

/// Opens the connection pool. The server wraps it in an `Arc` shared by every
/// service.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url());
    opt.max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    info!(
        host = %config.host,
        port = config.port,
        database = %config.name,
        max_connections = config.max_connections,
        "Connected to database."
    );
    Ok(db)
}

/// Applies the SQL files under `migrations/`, which are embedded at compile time.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), sqlx::migrate::MigrateError> {
    let migrator = sqlx::migrate!("./migrations");
    migrator.run(db.get_postgres_connection_pool()).await?;
    info!(count = migrator.iter().count(), "Database migrations applied.");
    Ok(())
}
