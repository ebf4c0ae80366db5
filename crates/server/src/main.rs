//! # server
//!
//! REST API server for diurnal utilization models.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    server::init_tracing();

    let config = ServerConfig::from_env()?;
    server::serve(config).await
}
