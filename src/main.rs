mod app;
mod config;
mod details;
mod domain;
mod favorites;
mod openlibrary;
mod search;
mod shelf_api;
mod storage;

use std::{path::Path, sync::Arc};

use anyhow::Context;
use app::{AppSettings, ShelfApp};
use config::Config;
use migration::MigratorTrait;
use openlibrary::OpenLibraryClient;
use poem::{
    EndpointExt, Route, Server,
    listener::TcpListener,
    middleware::{Cors, Tracing as PoemTracing},
};
use poem_openapi::OpenApiService;
use sea_orm::Database;
use storage::SqliteBlobStore;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt::SubscriberBuilder, prelude::*};

type ShelfResult<T> = anyhow::Result<T>;

#[tokio::main]
async fn main() -> ShelfResult<()> {
    // Respect RUST_LOG if set, default to info for our crate and warn for deps.
    let default_filter = format!(
        "{}=info,poem=info,reqwest=warn,h2=warn,sea_orm=warn,sqlx=warn",
        env!("CARGO_PKG_NAME")
    );
    let env_filter = std::env::var("RUST_LOG").unwrap_or(default_filter);
    SubscriberBuilder::default()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .with_level(true)
        .pretty()
        .finish()
        .with(ErrorLayer::default())
        .init();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting OpenShelf");

    if Path::new(".env.local").exists() {
        dotenvy::from_filename(".env.local")?;
    } else if Path::new(".env").exists() {
        dotenvy::from_filename(".env")?;
    };
    let config = Config::load();
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let db_conn = Database::connect(&config.db_connection_string)
        .await
        .with_context(|| "Failed to connect to database")?;

    migration::Migrator::up(&db_conn, None)
        .await
        .with_context(|| "Failed to run database migrations")?;

    let client = OpenLibraryClient::new(&config.open_library_base_url)?;
    tracing::info!(
        catalog = %config.open_library_base_url,
        covers = %config.covers_base_url,
        "configured catalog client"
    );

    let settings = AppSettings {
        catalog_base_url: config.open_library_base_url.clone(),
        covers_base_url: config.covers_base_url.clone(),
        search_limit: config.search_limit,
        toast_ttl: chrono::Duration::try_seconds(config.toast_ttl_secs)
            .context("TOAST_TTL_SECS is out of range")?,
    };
    let blobs = SqliteBlobStore::new(Arc::new(db_conn));
    let app = ShelfApp::load(Arc::new(client), Arc::new(blobs), settings).await;

    run_poem(Arc::new(app), &config.bind_addr).await?;
    Ok(())
}

pub async fn run_poem(app: Arc<ShelfApp>, bind_addr: &str) -> ShelfResult<()> {
    let version = env!("CARGO_PKG_VERSION");
    let api = shelf_api::ShelfApi { app };
    let api_service = OpenApiService::new(api, "OpenShelf API", version)
        .server(format!("http://{}", bind_addr));
    let ui = api_service.rapidoc();
    let spec = api_service.spec();
    let route = Route::new()
        .nest("/", api_service)
        .nest("/ui", ui)
        .nest("/spec", poem::endpoint::make_sync(move |_| spec.clone()))
        .with(Cors::new())
        .with(PoemTracing);

    tracing::info!(%bind_addr, "starting HTTP server");
    Server::new(TcpListener::bind(bind_addr)).run(route).await?;
    Ok(())
}
