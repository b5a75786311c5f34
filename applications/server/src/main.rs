/// Cinelist Server - account and playlist backend
use clap::{Parser, Subcommand};
use cinelist_server::{
    config::{IdentityMode, ServerConfig},
    create_router,
    services::AuthService,
    state::AppState,
};
use cinelist_storage::SqliteStore;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cinelist-server")]
#[command(about = "Cinelist account and playlist server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user
    AddUser {
        /// Username
        #[arg(short, long)]
        username: String,
        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// List all users
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cinelist_server=info,cinelist_storage=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Serve => {
            serve(config).await?;
        }
        Commands::AddUser { username, password } => {
            add_user(config, &username, &password).await?;
        }
        Commands::ListUsers => {
            list_users(config).await?;
        }
    }

    Ok(())
}

/// Open the pool, apply migrations, and wrap everything in the app state
async fn build_state(config: &ServerConfig) -> anyhow::Result<AppState> {
    let pool = cinelist_storage::create_pool_with(
        &config.storage.database_url,
        config.storage.pool_options(),
    )
    .await?;
    cinelist_storage::run_migrations(&pool).await?;
    tracing::info!("Database connected");

    let store = Arc::new(SqliteStore::new(pool));
    let auth_service = Arc::new(AuthService::from_settings(&config.auth));

    Ok(AppState::new(store, auth_service))
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Cinelist Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    match config.auth.identity_mode {
        IdentityMode::Header => tracing::warn!(
            "Identity mode is 'header': the username header is trusted as-is, \
             any client can act as any user"
        ),
        IdentityMode::Token => tracing::info!("Identity mode is 'token'"),
    }

    let app_state = build_state(&config).await?;
    let app = create_router(app_state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn add_user(config: ServerConfig, username: &str, password: &str) -> anyhow::Result<()> {
    let app_state = build_state(&config).await?;
    let user = app_state.accounts.register(username, password).await?;

    println!("Created user: {}", user.username);
    Ok(())
}

async fn list_users(config: ServerConfig) -> anyhow::Result<()> {
    let app_state = build_state(&config).await?;
    let users = app_state.accounts.list_users().await?;

    println!("Users:");
    for user in users {
        println!("  {} - {}", user.username, user.created_at.to_rfc3339());
    }

    Ok(())
}
