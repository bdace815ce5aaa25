//! Web server command

use std::path::Path;

use anyhow::Result;
use khata_core::db::Database;
use khata_core::KhataConfig;
use khata_server::{parse_allowed_origins, ServerConfig, ALLOWED_ORIGINS_ENV};

/// Build the server configuration from flags and the environment
pub fn server_config(app: KhataConfig, no_auth: bool, origins_env: Option<&str>) -> ServerConfig {
    ServerConfig {
        require_auth: !no_auth,
        allowed_origins: origins_env.map(parse_allowed_origins).unwrap_or_default(),
        app,
    }
}

pub async fn cmd_serve(
    db: Database,
    app: KhataConfig,
    db_path: &Path,
    host: &str,
    port: u16,
    no_auth: bool,
) -> Result<()> {
    let origins_env = std::env::var(ALLOWED_ORIGINS_ENV).ok();
    let config = server_config(app, no_auth, origins_env.as_deref());

    println!("🚀 Starting Khata web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    println!(
        "   Currency: {}  UTC offset: {} min",
        config.app.currency_symbol, config.app.display_utc_offset_minutes
    );
    if !config.allowed_origins.is_empty() {
        println!("   CORS origins: {}", config.allowed_origins.join(", "));
    }
    if no_auth {
        println!("   ⚠️  Authentication DISABLED (--no-auth)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    khata_server::serve_with_config(db, host, port, config).await?;

    Ok(())
}
