//! Freelance Desk demo server
//!
//! Serves the desk API from in-memory stores. Set `DESK_CONFIG` to a YAML
//! file (see `desk.yaml` next to this file) to override the defaults.
//!
//! ```text
//! DESK_CONFIG=demos/server/desk.yaml cargo run --example desk_server
//! ```

use anyhow::Result;
use desk::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "desk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::var("DESK_CONFIG") {
        Ok(path) => {
            tracing::info!(path = %path, "loading configuration");
            DeskConfig::from_yaml_file(&path)?
        }
        Err(_) => DeskConfig::default(),
    };

    println!("🚀 Starting Freelance Desk on http://{}", config.server.addr());
    println!("\n  GET    /health");
    println!("  POST   /csrf-token                      - Issue a CSRF token (x-session-id)");
    for collection in ["clients", "projects", "tasks", "time-entries", "invoices"] {
        println!("  GET    /{collection:<15}                 - List");
        println!("  POST   /{collection:<15}                 - Create");
        println!("  GET    /{collection}/{{id}}");
        println!("  PATCH  /{collection}/{{id}}                - Partial update (PUT works too)");
        println!("  DELETE /{collection}/{{id}}");
    }
    println!("  GET    /invoices/next-number");
    println!("  GET    /invoices/number-exists?number=INV-0001&exclude_id=1");

    ServerBuilder::new().with_config(config).serve().await
}
