//! Domain redirect server (v1)
//!
//! Answers requests for an old domain with a redirect to a new one and hands
//! everything else to a fallback handler.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request      ┌──────────────────────────────────────────────┐
//!     ────────────────────┼─▶ TraceLayer ─▶ RedirectLayer ──┐            │
//!                         │                  │              │            │
//!                         │     host == old  │              │ otherwise  │
//!                         │                  ▼              ▼            │
//!     Client Response     │          301/302 + Location   fallback 404   │
//!     ◀───────────────────┼──────────────────────────────────────────────│
//!                         │                                              │
//!                         │  startup: env map + config file              │
//!                         │     → MiddlewareConfigResolver               │
//!                         │     → RedirectConfig (immutable)             │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use domain_redirect::config::{load_config, AppConfig, EnvProvider, MiddlewareConfigResolver, SectionProvider};
use domain_redirect::observability::{init_tracing, TracingLogger};
use domain_redirect::HttpServer;

#[derive(Parser)]
#[command(name = "domain-redirect")]
#[command(about = "Redirect requests for an old domain to a new one", long_about = None)]
struct Cli {
    /// TOML configuration file. When given, its redirect section is mandatory.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_file = cli.config.as_deref().map(load_config).transpose()?;
    let has_file = config_file.is_some();
    let mut config = config_file.unwrap_or_else(AppConfig::default);
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    init_tracing(&format!(
        "domain_redirect={level},tower_http={level}",
        level = config.observability.log_level
    ));

    tracing::info!("domain-redirect v0.1.0 starting");

    let mut resolver = MiddlewareConfigResolver::new().with_provider(EnvProvider::from_process_env());
    if has_file {
        resolver = resolver.with_provider(SectionProvider::new(config.redirect.clone()));
    }
    if config.observability.diagnostics {
        resolver = resolver.with_logger(Arc::new(TracingLogger));
    }

    let redirect = match resolver.into_layer() {
        Ok(layer) => layer,
        Err(e) => {
            tracing::error!(error = %e, "Redirect configuration rejected");
            return Err(e.into());
        }
    };

    let effective = redirect.config();
    if effective.is_active() {
        tracing::info!(
            old_domain = %effective.old_domain(),
            new_domain = %effective.new_domain(),
            status = effective.status().as_u16(),
            mode = ?effective.mode(),
            "Configuration loaded"
        );
    } else {
        tracing::warn!("OLD_DOMAIN or NEW_DOMAIN not set, all requests pass through");
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    let server = HttpServer::new(config, redirect);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
