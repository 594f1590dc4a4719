use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use recipes::api::rest::IdentityHeader;
use recipes::domain::service::{Service, ServiceConfig};
use recipes::infra::media::FsImageStore;
use recipes::infra::storage::{migrations::Migrator, SeaOrmRecipesRepository};
use recipes::RecipesConfig;

mod request_id;
mod web;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const RECIPES_MODULE: &str = "recipes";

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
/// - Adds `mode=rwc` when no query is given so a fresh file gets created.
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    out.push('?');
    out.push_str(query.unwrap_or("mode=rwc"));
    Ok(out)
}

/// Foodgram Server - recipes, favorites, shopping lists and subscriptions
#[derive(Parser)]
#[command(name = "foodgram-server")]
#[command(about = "Foodgram Server - recipe sharing backend")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Foodgram Server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config),
    }
}

/// Detect DB backend from URL scheme (sqlite/postgres).
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim().to_owned();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    let url = Url::parse(&raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;

    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        "postgres" | "postgresql" => Ok("postgres"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

fn resolve_under(base: &Path, dir: &str) -> PathBuf {
    let p = PathBuf::from(dir);
    if p.is_relative() {
        base.join(p)
    } else {
        p
    }
}

async fn connect_database(
    config: &AppConfig,
    args: &CliArgs,
    base_dir: &Path,
) -> Result<DatabaseConnection> {
    let (dsn, max_conns, busy_timeout_ms) = if args.mock {
        // Every pooled connection would get its own in-memory database.
        ("sqlite::memory:".to_string(), 1, None)
    } else {
        let db_config = config
            .database
            .as_ref()
            .ok_or_else(|| anyhow!("No database configuration found"))?;
        detect_from_dsn(db_config)?;

        let mut dsn = db_config.url.trim().to_owned();
        if dsn.starts_with("sqlite://") {
            dsn = absolutize_sqlite_dsn(&dsn, base_dir, true)?;
        }
        (
            dsn,
            db_config.max_conns.unwrap_or(10),
            db_config.busy_timeout_ms,
        )
    };

    let mut opts = ConnectOptions::new(dsn.clone());
    opts.max_connections(max_conns)
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    if args.mock {
        // The database lives as long as its only connection.
        let forever = Duration::from_secs(365 * 24 * 3600);
        opts.min_connections(1)
            .idle_timeout(forever)
            .max_lifetime(forever);
    }
    if dsn.starts_with("sqlite") {
        let busy = Duration::from_millis(u64::from(busy_timeout_ms.unwrap_or(5000)));
        opts.map_sqlx_sqlite_opts(move |o| o.busy_timeout(busy).foreign_keys(true));
    }

    tracing::info!("Connecting to database: {}", dsn);
    let db = Database::connect(opts)
        .await
        .with_context(|| format!("Failed to connect to {dsn}"))?;
    tracing::info!("Connected DB backend: {:?}", db.get_database_backend());

    Migrator::up(&db, None)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");
    Ok(db)
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    let base_dir = PathBuf::from(&config.server.home_dir);
    let recipes_cfg: RecipesConfig = config.module_config(RECIPES_MODULE)?;
    let identity = IdentityHeader::new(&recipes_cfg.identity_header)?;

    let db = connect_database(&config, &args, &base_dir).await?;

    let media_root = resolve_under(&base_dir, &recipes_cfg.media_dir);
    let service = Arc::new(Service::new(
        Arc::new(SeaOrmRecipesRepository::new(db)),
        Arc::new(FsImageStore::new(&media_root, recipes_cfg.media_url.clone())),
        ServiceConfig::from(&recipes_cfg),
    ));

    let router = web::build_router(&config.server, &recipes_cfg, service, identity, &media_root)?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid bind address '{}:{}'",
                config.server.host, config.server.port
            )
        })?;
    web::serve(addr, router).await
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    let recipes_cfg: RecipesConfig = config.module_config(RECIPES_MODULE)?;
    IdentityHeader::new(&recipes_cfg.identity_header)?;
    web::validate_media_url(&recipes_cfg.media_url)?;
    if let Some(db) = &config.database {
        detect_from_dsn(db)?;
    }
    if recipes_cfg.min_cooking_time > recipes_cfg.max_cooking_time
        || recipes_cfg.min_amount > recipes_cfg.max_amount
    {
        bail!("modules.recipes: minimum bounds must not exceed maximum bounds");
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}
