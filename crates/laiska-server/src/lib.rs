//! HTTP service for laiska.
//!
//! Wires the credential, session, and device handlers into one actix-web
//! application over a single injected [`Store`].
//!
//! - [`Config`]: Environment-derived settings
//! - [`Services`]: Shared state and the route table
//! - [`run()`]: Connects, migrates, serves until shutdown
mod config;

pub use config::*;

use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::middleware::Logger;
use actix_web::web;
use laiska_auth::AdminSecret;
use laiska_auth::Crypto;
use laiska_auth::Hasher;
use laiska_records::Postgres;
use laiska_records::Store;
use std::sync::Arc;

/// Shared application state, cloned into every worker.
#[derive(Clone)]
pub struct Services {
    store: web::Data<dyn Store>,
    crypto: web::Data<Crypto>,
    hasher: web::Data<Hasher>,
    admin: web::Data<AdminSecret>,
}

impl Services {
    pub fn new(store: Arc<dyn Store>, config: &Config) -> anyhow::Result<Self> {
        let hasher = Hasher::new(config.pepper.as_bytes(), config.salting)
            .map_err(|e| anyhow::anyhow!("invalid password pepper: {}", e))?;
        Ok(Self {
            store: web::Data::from(store),
            crypto: web::Data::new(Crypto::new(config.jwt_secret.as_bytes())),
            hasher: web::Data::new(hasher),
            admin: web::Data::new(AdminSecret::new(config.admin_secret.clone())),
        })
    }

    #[rustfmt::skip]
    pub fn install(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.store.clone())
            .app_data(self.crypto.clone())
            .app_data(self.hasher.clone())
            .app_data(self.admin.clone())
            .app_data(laiska_auth::json_config())
            .route("/ping",             web::get().to(ping))
            .route("/health",           web::get().to(health))
            .route("/signup",           web::post().to(laiska_auth::signup))
            .route("/login",            web::post().to(laiska_auth::login))
            .route("/logout",           web::post().to(laiska_auth::logout))
            .route("/protected",        web::get().to(laiska_auth::protected))
            .route("/users",            web::delete().to(laiska_auth::delete_user))
            .route("/sensors",          web::get().to(laiska_devices::sensors))
            .route("/sensors/{uuid}",   web::delete().to(laiska_devices::delete_sensor))
            .route("/register_sensor",  web::post().to(laiska_devices::register_sensor))
            .route("/sensor_data",      web::post().to(laiska_devices::sensor_data));
    }
}

async fn ping() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

async fn health(store: web::Data<dyn Store>) -> HttpResponse {
    match store
        .ping()
        .await
        .inspect_err(|e| log::error!("health check failed: {}", e))
    {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "status": "healthy" })),
        Err(_) => HttpResponse::InternalServerError()
            .json(serde_json::json!({ "status": "unhealthy" })),
    }
}

/// Connects to the database, creates the schema, and serves until
/// the server receives a shutdown signal.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let client = laiska_pg::db(&config.db_url).await?;
    let store = Postgres::new(client, config.store_timeout);
    store.migrate().await?;
    let store: Arc<dyn Store> = Arc::new(store);
    let services = Services::new(store.clone(), &config)?;
    log::info!("listening on {}", config.bind);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .configure(|cfg| services.install(cfg))
    })
    .bind(config.bind.as_str())?
    .run()
    .await?;
    drop(store);
    log::info!("server stopped");
    Ok(())
}
