mod app;
mod cache;
mod config;
mod context;
mod events;
mod handlers;
mod service;
mod state;
mod storage;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use notekeeper_auth::{AuthConfig, TokenService};
use notekeeper_core::events::RegistrationEvent;
use notekeeper_core::notes::UserId;

use crate::{
    app::create_app,
    config::{Config, LogFormat},
    events::spawn_consumer,
    state::AppState,
};

/// Notekeeper - Personal notes with a cached read path
#[derive(Parser, Debug)]
#[command(name = "notekeeper")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST", global = true)]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "8081", env = "PORT", global = true)]
    port: u16,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server and the registration consumer (default)
    Serve,
    /// Print a bearer token for a user, signed with JWT_SECRET
    IssueToken {
        #[arg(long)]
        user_id: UserId,
    },
    /// Publish a user registration event to the configured stream
    PublishRegistration {
        #[arg(long)]
        user_id: UserId,
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();

    init_tracing(config.log_format);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&cli.host, cli.port, config).await,
        Command::IssueToken { user_id } => issue_token(user_id),
        Command::PublishRegistration { user_id, email } => {
            publish_registration(&config, RegistrationEvent::new(user_id, email)).await
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "notekeeper=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn serve(host: &str, port: u16, config: Config) -> Result<()> {
    let auth_config = AuthConfig::from_env();
    let (state, source) = AppState::new(&config, &auth_config).await?;

    let consumer = spawn_consumer(
        source,
        state.notes.clone(),
        state.subscribe_shutdown(),
        config.commit_interval(),
    );

    let app = create_app(state.clone(), config.request_timeout());

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // Otherwise fall back to CLI-specified host:port
        None => {
            let addr = format!("{host}:{port}");
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!("listening on {}", listener.local_addr()?);

    // Run the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state.clone()))
        .await?;

    // Covers the server exiting on its own, without a signal
    state.signal_shutdown();
    if let Err(err) = consumer.await {
        tracing::error!(error = %err, "Registration consumer panicked");
    }

    tracing::info!("Server stopped");
    Ok(())
}

fn issue_token(user_id: UserId) -> Result<()> {
    if user_id <= 0 {
        bail!("user id must be positive, got {user_id}");
    }
    let tokens = TokenService::new(&AuthConfig::from_env());
    println!("{}", tokens.issue(user_id)?);
    Ok(())
}

#[cfg(feature = "redis")]
async fn publish_registration(config: &Config, event: RegistrationEvent) -> Result<()> {
    use notekeeper_core::events::RegistrationPublisher;

    let publisher = events::redis_impl::RedisStreamPublisher::connect(
        &config.redis_url,
        &config.registration_stream,
    )
    .await?;
    let id = publisher.publish(&event).await?;
    println!("{id}");
    Ok(())
}

#[cfg(not(feature = "redis"))]
async fn publish_registration(_config: &Config, _event: RegistrationEvent) -> Result<()> {
    bail!(
        "the in-memory registration bus only reaches the running server; \
        build with the 'redis' feature or use POST /_dev/registrations"
    )
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM) and stop background tasks.
async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }

    // Stop the registration consumer
    state.signal_shutdown();
}
