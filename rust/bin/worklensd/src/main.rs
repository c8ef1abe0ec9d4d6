//! `worklensd` — the WorkLens server binary.
//!
//! Usage:
//!   worklensd -c <config path> [--listen <addr>]
//!
//! Serves the multilingual company-review site: server-rendered pages,
//! the JSON API, and the admin endpoints.

mod auth_middleware;
mod bootstrap;
mod config;
mod locale_middleware;
mod login;
mod pages;
mod routes;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use jsonwebtoken::{DecodingKey, Validation};
use tracing::{info, warn};

use worklens_core::Module;
use worklens_geo::GeoDb;
use worklens_i18n::Catalog;
use worklens_reviews::ReviewsModule;
use worklens_reviews::service::ReviewService;
use worklens_reviews::store::Store;

use auth_middleware::JwtState;
use config::ServerConfig;
use routes::AppState;

/// WorkLens server.
#[derive(Parser, Debug)]
#[command(name = "worklensd", about = "WorkLens server")]
struct Cli {
    /// Path to the server config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: PathBuf,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    info!("Loading configuration from {}", cli.config.display());
    let server_config = ServerConfig::load(&cli.config)?;
    bootstrap::verify_config(&server_config)?;

    let data_dir = PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    // Storage.
    let store = Store::open(&server_config.resolve_db_path())
        .map_err(|e| anyhow::anyhow!("failed to open review store: {}", e))?;
    let reviews = Arc::new(ReviewService::new(store));
    info!("Review store opened at {}", server_config.resolve_db_path().display());

    // Translation catalog. A broken file only costs that language.
    let translations_dir = server_config.resolve_translations_dir();
    let (catalog, report) = Catalog::load(&translations_dir);
    for (lang, count) in &report.loaded {
        info!("Translations loaded: {} ({} entries)", lang, count);
    }
    for (lang, err) in &report.errors {
        warn!("Translations missing for {}: {} (falling back to en)", lang, err);
    }
    let catalog = Arc::new(catalog);

    // Geolocation. A missing database degrades detection, nothing else.
    let geo = Arc::new(open_geo(&server_config));

    // JWT state for (optional) authentication.
    let jwt_state = Arc::new(JwtState {
        decoding_key: DecodingKey::from_secret(server_config.jwt.secret.as_bytes()),
        validation: Validation::default(),
    });

    let reviews_module = ReviewsModule::new(Arc::clone(&reviews));
    let module_routes = vec![(reviews_module.name(), reviews_module.routes())];
    info!("Reviews module mounted under /api");

    let app_state = AppState {
        server_config: Arc::new(server_config),
        jwt_state,
        catalog,
        geo,
        reviews,
    };

    let app = routes::build_router(app_state, module_routes);

    // Start server. ConnectInfo supplies the peer address for the
    // geolocation fallback tier.
    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("WorkLens server listening on {}", cli.listen);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn open_geo(config: &ServerConfig) -> GeoDb {
    let Some(path) = config.geo.database_path.as_deref() else {
        warn!("No geolocation database configured; IP detection disabled");
        return GeoDb::disabled();
    };
    match GeoDb::open(Path::new(path)) {
        Ok(db) => {
            info!("Geolocation database opened at {}", path);
            db
        }
        Err(e) => {
            warn!("{}; IP detection disabled", e);
            GeoDb::disabled()
        }
    }
}
