mod config;
mod constants;
mod database;
mod errors;
mod handlers;
mod middleware;
mod migrations;
mod models;
mod openapi;
mod repositories;
mod routes;
mod services;
mod utils;
mod validators;

use std::process;
use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{error, info};

use crate::config::Config;
use crate::middleware::Cors;
use crate::migrations::{MigrationRunner, MigrationSource, PgMigrationStore};
use crate::repositories::PgUserRepository;
use crate::services::UserService;

fn init_logger(default_filter: &str) {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or(default_filter));
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment variables and configuration
    dotenv::dotenv().ok();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            init_logger("info");
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    init_logger(if config.server.is_release() {
        "info"
    } else {
        "debug"
    });

    match &config.source {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => info!("No configuration file found, using defaults and environment"),
    }

    // Connect to PostgreSQL
    let pool = match database::connect(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            process::exit(1);
        }
    };

    // Bring the schema up to date before serving traffic
    let source = match config.migrations.directory() {
        Some(dir) => MigrationSource::directory(dir),
        None => MigrationSource::embedded(),
    };
    if let Err(e) = MigrationRunner::new(PgMigrationStore::new(pool.clone()))
        .run(&source)
        .await
    {
        error!("Failed to run migrations: {}", e);
        process::exit(1);
    }

    // Initialize services
    let repository = Arc::new(PgUserRepository::new(
        pool,
        config.database.query_timeout(),
    ));
    let user_service = web::Data::new(UserService::new(
        repository,
        config.service.operation_timeout(),
        config.service.password_hash_cost,
    ));

    // Start HTTP server
    let server_addr = config.server.bind_address();
    info!("Starting server at http://{}", server_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors)
            .wrap(Logger::default())
            .app_data(user_service.clone())
            .configure(routes::configure_routes)
    })
    .bind(&server_addr)?
    .run()
    .await
}
