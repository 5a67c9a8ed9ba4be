use std::io;
use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};
use chrono::Duration;

use taskvault::auth::{PasswordHasher, TokenService};
use taskvault::config::Config;
use taskvault::routes;
use taskvault::store::{MemoryStore, PgStore};
use taskvault::AppState;

fn startup_error<E: std::fmt::Display>(error: E) -> io::Error {
    io::Error::other(error.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(startup_error)?;
    log::debug!("Loaded configuration: {:?}", config);

    let tokens = TokenService::new(&config.jwt_secret, Duration::minutes(config.token_ttl_minutes));
    let hasher = PasswordHasher::new(config.bcrypt_cost).map_err(startup_error)?;

    let state = if config.uses_memory_store() {
        log::warn!("Using the in-memory store; data will be lost on restart");
        AppState::new(Arc::new(MemoryStore::new()), tokens, hasher)
    } else {
        let store = PgStore::connect(&config.database_url, config.database_max_connections)
            .await
            .map_err(startup_error)?;
        store.ensure_schema().await.map_err(startup_error)?;
        AppState::new(Arc::new(store), tokens, hasher)
    };
    let state = web::Data::new(state);

    log::info!("Starting TaskVault server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::NormalizePath::trim())
            .wrap(middleware::Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
