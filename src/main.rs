// Copyright 2023 Remi Bernotavicius

use axum::http::HeaderValue;
use clap::Parser;
use clap::Subcommand;
use simple_logger::SimpleLogger;
use std::net::SocketAddr;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};

mod api;
mod database;
mod error;
mod payload;
mod query;
mod units;
mod validation;

type Error = Box<dyn std::error::Error + Send + Sync + 'static>;
type Result<T> = std::result::Result<T, Error>;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(clap::Args, Debug)]
struct DatabaseArgs {
    /// SQLite file to use, created if missing.
    #[arg(long, env = "RECIPE_SERVER_DATABASE")]
    database: Option<PathBuf>,
}

impl DatabaseArgs {
    fn path(self) -> Result<PathBuf> {
        match self.database {
            Some(path) => Ok(path),
            None => Ok(data_path()?.join("data.sqlite")),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the REST API.
    Serve {
        #[command(flatten)]
        database: DatabaseArgs,

        #[arg(long, env = "RECIPE_SERVER_BIND", default_value = "127.0.0.1:8000")]
        bind: SocketAddr,

        /// Origins allowed to make cross-origin requests.
        #[arg(
            long = "cors-origin",
            env = "RECIPE_SERVER_CORS_ORIGINS",
            value_delimiter = ',',
            default_value = "http://localhost:3000"
        )]
        cors_origins: Vec<String>,

        #[arg(long, env = "RECIPE_SERVER_POOL_SIZE", default_value_t = 8)]
        pool_size: u32,
    },
    /// Apply pending migrations and exit.
    Migrate {
        #[command(flatten)]
        database: DatabaseArgs,
    },
}

/// This is where the database and other user-data lives on-disk. On Linux it should be like:
/// `~/.local/share/recipe_manager/`
fn data_path() -> Result<PathBuf> {
    let dirs = directories::BaseDirs::new().ok_or("failed to get user home directory")?;
    let path = dirs.data_dir().join("recipe_manager");
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

fn cors(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin.trim()))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("shutting down"),
        Err(error) => {
            log::error!("unable to listen for ctrl-c: {error}");
            std::future::pending::<()>().await;
        }
    }
}

async fn serve(
    database_path: PathBuf,
    bind: SocketAddr,
    cors_origins: Vec<String>,
    pool_size: u32,
) -> Result<()> {
    log::info!("using database {}", database_path.display());
    let pool = database::establish_pool(&database_path, pool_size)?;
    let app = api::router(api::AppState::new(pool)).layer(cors(&cors_origins)?);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    log::info!("listening on http://{}{}", listener.local_addr()?, api::API_PREFIX);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()?;

    match args.commands {
        Commands::Serve {
            database: db,
            bind,
            cors_origins,
            pool_size,
        } => serve(db.path()?, bind, cors_origins, pool_size).await?,
        Commands::Migrate { database: db } => {
            let path = db.path()?;
            database::establish_pool(&path, 1)?;
            log::info!("{} is up to date", path.display());
        }
    }
    Ok(())
}
