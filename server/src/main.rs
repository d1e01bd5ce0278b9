mod config;
mod http;
mod routes;
mod seed;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use platform_db::{DatabaseSettings, DbPool, connect};
use platform_obs::{ObsConfig, init_tracing};
use tracing::info;

use crate::{
    config::AppConfig,
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "company-api", version, about = "Departments and employees REST API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve(ServeCommand),
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Insert sample departments and employees into an empty database.
    Seed,
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,
    #[arg(long, help = "Allow starting even when migrations are pending")]
    allow_dirty: bool,
    #[arg(long, help = "Serve from a private in-memory database (migrated and seeded)")]
    in_memory: bool,
}

impl From<&ServeCommand> for ServeConfig {
    fn from(value: &ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(ObsConfig::from_env())?;
    let cli = Cli::parse();
    let app_config = AppConfig::load()?;
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, app_config).await,
        Command::Migrate(action) => match action {
            MigrateCommand::Up => migrate_up(&app_config.database).await,
            MigrateCommand::Down => migrate_down(&app_config.database).await,
        },
        Command::Seed => run_seed(&app_config.database).await,
    }
}

async fn setup_pool(settings: &DatabaseSettings) -> Result<DbPool> {
    connect(settings)
        .await
        .with_context(|| format!("failed to connect to {}", settings.url))
}

async fn run_server(cmd: ServeCommand, config: AppConfig) -> Result<()> {
    let config = if cmd.in_memory {
        config.with_in_memory_database()
    } else {
        config
    };
    let pool = setup_pool(&config.database).await?;
    if config.database.is_in_memory() {
        Migrator::up(&pool, None).await?;
        seed::seed(&pool).await?;
    } else {
        ensure_migrations(&pool, cmd.allow_dirty).await?;
    }
    let state = AppState {
        pool,
        config: Arc::new(config),
    };
    http::serve(ServeConfig::from(&cmd), state).await
}

async fn ensure_migrations(pool: &DbPool, allow_dirty: bool) -> Result<()> {
    let pending = Migrator::get_pending_migrations(pool).await?;
    if !pending.is_empty() && !allow_dirty {
        anyhow::bail!(
            "pending migrations detected; run `company-api migrate up` or pass --allow-dirty"
        );
    }
    Ok(())
}

async fn migrate_up(settings: &DatabaseSettings) -> Result<()> {
    let pool = setup_pool(settings).await?;
    Migrator::up(&pool, None).await?;
    info!("database migrations applied");
    Ok(())
}

async fn migrate_down(settings: &DatabaseSettings) -> Result<()> {
    let pool = setup_pool(settings).await?;
    Migrator::down(&pool, Some(1)).await?;
    info!("most recent migration rolled back");
    Ok(())
}

async fn run_seed(settings: &DatabaseSettings) -> Result<()> {
    let pool = setup_pool(settings).await?;
    ensure_migrations(&pool, false).await?;
    let report = seed::seed(&pool).await?;
    info!(
        departments = report.departments,
        employees = report.employees,
        "seed finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["company-api", "serve", "--in-memory"]).unwrap();
        let Command::Serve(cmd) = cli.command else {
            panic!("expected serve");
        };
        assert!(cmd.in_memory);
        assert!(!cmd.allow_dirty);
    }
}
