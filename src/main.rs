use clap::Parser;
use dotenvy::dotenv;
use tracing::info;

use campus::cli::{Cli, Commands, MigrateAction, migration_status, run_migrations};
use campus::logging::{init_tracing, shutdown_tracer};
use campus::metrics::{init_metrics, metrics_app};
use campus::router::init_router;
use campus::state::AppState;
use campus_config::{CorsConfig, JwtConfig, RateLimitConfig, ServerConfig};
use campus_db::init_db_pool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let server_config = ServerConfig::from_env()?;
    init_tracing(&server_config)?;

    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let db = init_db_pool(&database_url).await?;

    let result = match cli.command() {
        Commands::Serve => serve(server_config, db).await,
        Commands::Migrate {
            action: MigrateAction::Up,
        } => run_migrations(&db).await,
        Commands::Migrate {
            action: MigrateAction::Status,
        } => {
            for (version, description, applied) in migration_status(&db).await? {
                let mark = if applied { "applied" } else { "pending" };
                println!("{version} {mark:<8} {description}");
            }
            Ok(())
        }
    };

    shutdown_tracer();
    result
}

async fn serve(server_config: ServerConfig, db: campus_db::PgPool) -> anyhow::Result<()> {
    let jwt_config = JwtConfig::from_env()?;
    // Built once up front so the first unknown-user login does not pay for it.
    tokio::task::spawn_blocking(campus_core::dummy_hash).await??;
    let rate_limit = RateLimitConfig::from_env()?;
    info!(
        auth_rate_limit = rate_limit.auth_rate_limit,
        "Auth rate limit configured but not enforced"
    );

    let state = AppState::new(db, &jwt_config, CorsConfig::from_env());

    let mut app = init_router(state);
    if let Some(handle) = init_metrics()? {
        app = app.merge(metrics_app(handle));
    }

    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(address = %address, "Server listening");
    info!("Swagger UI available at http://{}/swagger-ui", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}
