use budgetbook::config::{database, fx};
use budgetbook::errors::Result;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing as early as possible.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Env vars can also be set externally, a missing .env is fine.
    dotenv().ok();
    info!("Attempted to load .env file.");

    let fx_table = fx::load_default_fx_table()?;
    info!(reference = %fx_table.reference(), "FX table loaded.");

    let db = database::create_connection().await?;
    database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    Ok(())
}
