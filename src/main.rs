use fitness_api::api::routes::create_routes;
use fitness_api::config::{
    create_initial_admin, run_migrations, AppConfig, BootstrapConfig, DatabaseConfig, SmtpConfig,
};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let app_config = AppConfig::from_env()?;
    let smtp_config = SmtpConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;

    let pool = db_config.create_pool().await?;
    run_migrations(&pool).await?;
    create_initial_admin(&pool, &BootstrapConfig::from_env()).await?;

    let app = create_routes(
        pool,
        &app_config.jwt_secret,
        app_config.token_expire_minutes,
        smtp_config,
    );

    let listener = TcpListener::bind(app_config.server_address()).await?;
    info!("Fitness API listening on http://{}", app_config.server_address());

    axum::serve(listener, app).await?;

    Ok(())
}
