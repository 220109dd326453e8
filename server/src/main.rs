use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hyper::Request;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tower::ServiceBuilder;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use server::AppState;
use server::database::{self, SqliteStore};
use server::handlers::http::handle_request;
use server::handlers::http::routes::build_router;
use server::ports::{AuthService, JokeRepository, UserRepository};
use server::tower_middle::TimeoutLayer;
use shared::config::{LiveConfig, load_config};
use shared::types::NewJoke;
use shared::types::server_config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "jokes-server", version, about = "Remix Jokes HTTP server")]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "jokes.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create the demo user and sample jokes
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = read_config(&cli.config)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .context("Invalid logging filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let database_url = config.database.resolved_url();
    let pool = database::connect(&database_url, config.database.max_connections)
        .await
        .with_context(|| format!("Failed to open database {}", database_url))?;
    database::create_tables(&pool)
        .await
        .context("Failed to create database schema")?;

    let live_config = LiveConfig::new(config.clone());
    let store = SqliteStore::new(pool, live_config.clone());

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, live_config, store, cli.config).await,
        Command::Seed => seed(&store).await,
    }
}

/// A missing file falls back to defaults; a present but invalid file is fatal.
fn read_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        eprintln!(
            "Config file {} not found, using defaults",
            path.display()
        );
        return Ok(AppConfig::default());
    }
    load_config(path).with_context(|| format!("Failed to load config {}", path.display()))
}

async fn serve(
    config: AppConfig,
    live_config: LiveConfig,
    store: SqliteStore,
    config_path: PathBuf,
) -> Result<()> {
    let addr: SocketAddr = config
        .server
        .addr()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.addr()))?;
    let request_timeout = Duration::from_secs(config.server.request_timeout_secs);
    let connection_limit = Arc::new(Semaphore::new(config.server.max_connections));

    #[cfg(unix)]
    spawn_reload_on_sighup(config_path, live_config.clone());
    #[cfg(not(unix))]
    let _ = config_path;

    let state = AppState::new(live_config, store);
    let router = Arc::new(build_router());

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let permit = connection_limit
            .clone()
            .acquire_owned()
            .await
            .context("Connection limiter closed")?;

        let (stream, peer) = tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown signal received, no longer accepting connections");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                    continue;
                }
            },
        };

        let io = TokioIo::new(stream);
        let router = router.clone();
        let state = state.clone();

        tokio::task::spawn(async move {
            let _permit = permit;

            let svc = ServiceBuilder::new()
                .layer(TimeoutLayer::new(request_timeout))
                .service(tower::service_fn(move |req: Request<Incoming>| {
                    handle_request(req, router.clone(), state.clone())
                }));

            if let Err(err) = http1::Builder::new()
                .timer(TokioTimer::new())
                .serve_connection(io, TowerToHyperService::new(svc))
                .await
            {
                error!("Error serving connection from {}: {:?}", peer, err);
            }
        });
    }

    info!("Server stopped");
    Ok(())
}

/// Re-read the config file on SIGHUP. The `[auth]` section, session lifetime
/// included, is read per request; bind address, pool and logging settings
/// need a restart.
#[cfg(unix)]
fn spawn_reload_on_sighup(path: PathBuf, live: LiveConfig) {
    use tokio::signal::unix::{SignalKind, signal};

    tokio::spawn(async move {
        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(stream) => stream,
            Err(e) => {
                warn!("SIGHUP reload disabled: {}", e);
                return;
            }
        };

        while hangup.recv().await.is_some() {
            match load_config(&path) {
                Ok(new) => {
                    live.reload(new).await;
                    info!("Configuration reloaded from {}", path.display());
                }
                Err(e) => error!("Config reload failed, keeping current settings: {}", e),
            }
        }
    });
}

async fn seed(store: &SqliteStore) -> Result<()> {
    let kody = match store.find_user_by_username("kody").await? {
        Some(user) => {
            info!("Seed user already present: {}", user);
            user
        }
        None => store.create_user("kody", "twixrox").await?,
    };

    for (name, content) in sample_jokes() {
        let joke = store
            .create_joke(NewJoke {
                name: name.to_string(),
                content: content.to_string(),
                jokester_id: kody.id.clone(),
            })
            .await?;
        info!("Seeded joke {} ({})", joke.name, joke.id);
    }

    info!("Seeding complete");
    Ok(())
}

fn sample_jokes() -> [(&'static str, &'static str); 5] {
    [
        (
            "Road worker",
            "I never wanted to believe that my Dad was stealing from his job as a road worker. But when I got home, all the signs were there.",
        ),
        (
            "Frisbee",
            "I was wondering why the frisbee was getting bigger, then it hit me.",
        ),
        (
            "Trees",
            "Why do trees seem suspicious on sunny days? Dunno, they're just a bit shady.",
        ),
        (
            "Skeletons",
            "Why don't skeletons ride roller coasters? They don't have the stomach for it.",
        ),
        (
            "Hippos",
            "Why don't you find hippopotamuses hiding in trees? They're really good at it.",
        ),
    ]
}
